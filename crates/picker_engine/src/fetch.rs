use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use engine_logging::{engine_debug, engine_info};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::{EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// When false, proxy settings from the environment are ignored.
    pub use_proxy: bool,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            use_proxy: true,
        }
    }
}

impl FetchSettings {
    /// Limits suited to artifact downloads rather than listing pages.
    pub fn for_downloads() -> Self {
        Self {
            request_timeout: Duration::from_secs(30 * 60),
            max_bytes: u64::MAX,
            ..Self::default()
        }
    }

    pub fn with_proxy(mut self, use_proxy: bool) -> Self {
        self.use_proxy = use_proxy;
        self
    }
}

/// Receives engine events as a run progresses.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Writes every event to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: EngineEvent) {
        match event {
            EngineEvent::ListingFetched { url, bytes } => {
                engine_info!("Read {} bytes from {}", bytes, url);
            }
            EngineEvent::CandidatesSelected { count } => {
                engine_info!("{} link(s) selected", count);
            }
            EngineEvent::ItemRetrieved(item) => match item.bytes {
                Some(bytes) => engine_info!(
                    "Pulled {} ({} bytes) -> {}",
                    item.source_url,
                    bytes,
                    item.destination.display()
                ),
                None => engine_info!(
                    "Would pull {} -> {}",
                    item.source_url,
                    item.destination.display()
                ),
            },
            EngineEvent::RunFinished { items } => {
                engine_debug!("Run finished with {} item(s)", items);
            }
        }
    }
}

/// Reads a directory listing.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchOutput, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchOutput, FetchError> {
        let redirect_counter = Arc::new(AtomicUsize::new(0));
        let client = build_client(&self.settings, redirect_counter.clone())?;

        engine_info!("Reading URL: {}", url);
        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = check_status(response)?;

        if let Some(content_len) = response.content_length() {
            check_size(&self.settings, content_len)?;
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            check_size(&self.settings, bytes.len() as u64 + chunk.len() as u64)?;
            bytes.extend_from_slice(&chunk);
        }

        let metadata = FetchMetadata {
            original_url: url.to_string(),
            final_url,
            redirect_count: redirect_counter.load(Ordering::Relaxed),
            content_type,
            byte_len: bytes.len() as u64,
        };

        Ok(FetchOutput { bytes, metadata })
    }
}

pub(crate) fn build_client(
    settings: &FetchSettings,
    redirect_counter: Arc<AtomicUsize>,
) -> Result<reqwest::Client, FetchError> {
    let redirect_limit = settings.redirect_limit;
    let policy = reqwest::redirect::Policy::custom(move |attempt| {
        let count = attempt.previous().len();
        redirect_counter.store(count, Ordering::Relaxed);
        if count >= redirect_limit {
            attempt.error("redirect limit exceeded")
        } else {
            attempt.follow()
        }
    });

    let mut builder = reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .redirect(policy);
    if !settings.use_proxy {
        builder = builder.no_proxy();
    }
    builder
        .build()
        .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
}

pub(crate) fn check_status(response: reqwest::Response) -> Result<reqwest::Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(FetchError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ))
    }
}

pub(crate) fn check_size(settings: &FetchSettings, actual: u64) -> Result<(), FetchError> {
    if actual > settings.max_bytes {
        return Err(FetchError::new(
            FailureKind::TooLarge {
                max_bytes: settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        ));
    }
    Ok(())
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    if err.is_builder() {
        return FetchError::new(FailureKind::InvalidUrl, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
