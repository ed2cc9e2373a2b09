//! Run coordinator: fetch, select, then retrieve each picked link in order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use engine_logging::{engine_error, engine_info, engine_warn};
use picker_core::{select, Link, PickerConfig};
use thiserror::Error;
use url::Url;

use crate::decode::{decode_listing, DecodeError};
use crate::fetch::{Fetcher, ProgressSink};
use crate::filename::landing_name;
use crate::persist::{ensure_output_dir, PersistError};
use crate::retrieve::{RetrieveError, Retriever};
use crate::{EngineEvent, FetchError, PickedItem, RunReport};

#[derive(Debug, Error)]
pub enum PickerError {
    #[error("could not read listing {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("could not decode listing {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: DecodeError,
    },
    #[error("No files found at {url}")]
    NoFilesFound { url: String },
    #[error("link {href:?} does not resolve against {base}: {source}")]
    UnresolvableLink {
        href: String,
        base: String,
        #[source]
        source: url::ParseError,
    },
    #[error(transparent)]
    OutputDir(#[from] PersistError),
    #[error("could not retrieve {url}: {source}")]
    Retrieve {
        url: String,
        #[source]
        source: RetrieveError,
    },
}

/// Everything a single run reads. Built once and never modified.
#[derive(Debug, Clone)]
pub struct RunContext {
    config: Arc<PickerConfig>,
    listing_url: Url,
    output_dir: PathBuf,
    dry_run: bool,
}

impl RunContext {
    /// `default_output_dir` is used when the configuration has no `local` option.
    pub fn new(config: PickerConfig, default_output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = config
            .local
            .clone()
            .unwrap_or_else(|| default_output_dir.into());
        Self {
            listing_url: config.listing_url(),
            config: Arc::new(config),
            output_dir,
            dry_run: false,
        }
    }

    /// Select and report, but retrieve nothing.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn listing_url(&self) -> &Url {
        &self.listing_url
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

pub struct Picker<'a> {
    fetcher: &'a dyn Fetcher,
    retriever: &'a dyn Retriever,
    sink: &'a dyn ProgressSink,
}

impl<'a> Picker<'a> {
    pub fn new(
        fetcher: &'a dyn Fetcher,
        retriever: &'a dyn Retriever,
        sink: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            fetcher,
            retriever,
            sink,
        }
    }

    pub async fn run(&self, ctx: &RunContext) -> Result<RunReport, PickerError> {
        let picked = self.pick(ctx).await?;
        let url = ctx.listing_url().to_string();

        if picked.is_empty() {
            if !ctx.config().tolerate_empty {
                engine_error!("No files found at {}", url);
                return Err(PickerError::NoFilesFound { url });
            }
            engine_warn!("No files found at {}; 'no-error' is set, continuing", url);
        } else if !ctx.is_dry_run() {
            ensure_output_dir(ctx.output_dir())?;
        }

        let mut items = Vec::with_capacity(picked.len());
        for link in &picked {
            let item = self.retrieve_one(ctx, link).await?;
            self.sink.emit(EngineEvent::ItemRetrieved(item.clone()));
            items.push(item);
        }

        self.sink.emit(EngineEvent::RunFinished { items: items.len() });
        Ok(RunReport {
            listing_url: url,
            items,
            dry_run: ctx.is_dry_run(),
        })
    }

    /// Fetches the listing and runs the selection stages on it.
    pub async fn pick(&self, ctx: &RunContext) -> Result<Vec<Link>, PickerError> {
        let url = ctx.listing_url();
        let output = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|source| PickerError::Fetch {
                url: url.to_string(),
                source,
            })?;
        self.sink.emit(EngineEvent::ListingFetched {
            url: output.metadata.final_url.clone(),
            bytes: output.metadata.byte_len,
        });

        let decoded = decode_listing(&output.bytes, output.metadata.content_type.as_deref())
            .map_err(|source| PickerError::Decode {
                url: url.to_string(),
                source,
            })?;

        let picked = select(&decoded.text, ctx.config());
        self.sink.emit(EngineEvent::CandidatesSelected {
            count: picked.len(),
        });
        Ok(picked)
    }

    async fn retrieve_one(&self, ctx: &RunContext, link: &Link) -> Result<PickedItem, PickerError> {
        let source = ctx
            .listing_url()
            .join(&link.raw_href)
            .map_err(|source| PickerError::UnresolvableLink {
                href: link.raw_href.clone(),
                base: ctx.listing_url().to_string(),
                source,
            })?;
        let destination = ctx
            .output_dir()
            .join(landing_name(&link.match_target, &link.href));

        let bytes = if ctx.is_dry_run() {
            None
        } else {
            engine_info!("Pulling {} -> {}", source, destination.display());
            let written = self
                .retriever
                .retrieve(&source, &destination)
                .await
                .map_err(|source_err| PickerError::Retrieve {
                    url: source.to_string(),
                    source: source_err,
                })?;
            Some(written)
        };

        Ok(PickedItem {
            name: link.match_target.clone(),
            source_url: source.to_string(),
            destination,
            bytes,
        })
    }
}
