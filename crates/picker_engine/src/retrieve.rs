//! Per-item retrieval: one call per picked link.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{atomic::AtomicUsize, Arc};

use engine_logging::{engine_debug, engine_warn};
use futures_util::StreamExt;
use thiserror::Error;
use tokio::process::Command;
use url::Url;

use crate::fetch::{build_client, check_size, check_status, map_reqwest_error, FetchSettings};
use crate::persist::{PersistError, StagedFile};
use crate::FetchError;

#[derive(Debug, Error)]
pub enum RetrieveError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("could not write download: {0}")]
    Persist(#[from] PersistError),
    #[error("could not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited with {status}")]
    Command { program: String, status: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Copies one remote artifact to a local path and returns the bytes written.
#[async_trait::async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, source: &Url, destination: &Path) -> Result<u64, RetrieveError>;
}

/// Downloads in-process, streaming to a staged file next to the destination.
#[derive(Debug, Clone)]
pub struct HttpRetriever {
    settings: FetchSettings,
}

impl HttpRetriever {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl Retriever for HttpRetriever {
    async fn retrieve(&self, source: &Url, destination: &Path) -> Result<u64, RetrieveError> {
        let client = build_client(&self.settings, Arc::new(AtomicUsize::new(0)))?;
        engine_debug!("Pulling URL: {}", source);

        let response = client
            .get(source.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = check_status(response)?;
        if let Some(len) = response.content_length() {
            check_size(&self.settings, len)?;
        }

        let mut staged = StagedFile::create(destination)?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            check_size(&self.settings, staged.written() + chunk.len() as u64)?;
            staged.write_chunk(&chunk)?;
        }

        let written = staged.written();
        staged.commit()?;
        Ok(written)
    }
}

/// How chatty the external downloader should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

/// Delegates each download to `wget`.
#[derive(Debug, Clone)]
pub struct WgetRetriever {
    program: PathBuf,
    use_proxy: bool,
    verbosity: Verbosity,
}

impl WgetRetriever {
    pub fn new(use_proxy: bool, verbosity: Verbosity) -> Self {
        Self::with_program("wget", use_proxy, verbosity)
    }

    pub fn with_program(program: impl Into<PathBuf>, use_proxy: bool, verbosity: Verbosity) -> Self {
        Self {
            program: program.into(),
            use_proxy,
            verbosity,
        }
    }

    /// Arguments passed to the program for one download.
    pub fn arguments(&self, source: &Url, destination: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        match self.verbosity {
            Verbosity::Debug => args.push("--debug".into()),
            Verbosity::Verbose => args.push("--verbose".into()),
            Verbosity::Quiet => args.push("--quiet".into()),
            Verbosity::Normal => {}
        }
        if !self.use_proxy {
            args.push("--no-proxy".into());
        }
        args.push("--no-use-server-timestamps".into());
        args.push("-O".into());
        args.push(destination.as_os_str().to_owned());
        args.push(source.as_str().into());
        args
    }
}

#[async_trait::async_trait]
impl Retriever for WgetRetriever {
    async fn retrieve(&self, source: &Url, destination: &Path) -> Result<u64, RetrieveError> {
        let program = self.program.display().to_string();
        let args = self.arguments(source, destination);
        engine_debug!(
            "Running {} {}",
            program,
            args.iter()
                .map(|arg| arg.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|source| RetrieveError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            // wget leaves an empty or partial file behind when -O is used.
            if let Err(err) = tokio::fs::remove_file(destination).await {
                if err.kind() != io::ErrorKind::NotFound {
                    engine_warn!("Could not remove partial {}: {}", destination.display(), err);
                }
            }
            return Err(RetrieveError::Command {
                program,
                status: status.to_string(),
            });
        }

        Ok(tokio::fs::metadata(destination).await?.len())
    }
}
