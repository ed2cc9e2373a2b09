//! Raw string options and the validated configuration built from them.
//!
//! Option names and boolean spellings follow the listing picker's historic
//! configuration files, e.g.
//!
//! ```text
//! URL=https://pypi.org/simple/cartographer
//! use-text=True
//! format=cartographer-{version}.tar.gz
//! order=large->small:version
//! pick=first:3
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use engine_logging::{engine_error, engine_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::format::{FormatError, FormatPattern};
use crate::link::{MatchSource, Normalization};
use crate::order::OrderSpec;
use crate::pick::{PickChain, PickRegistry};

pub const OPT_URL: &str = "URL";
pub const OPT_FORMAT: &str = "format";
pub const OPT_ORDER: &str = "order";
pub const OPT_PICK: &str = "pick";
pub const OPT_USE_TEXT: &str = "use-text";
pub const OPT_IGNORE_LINK_PATHS: &str = "ignore-link-paths";
pub const OPT_NO_ERROR: &str = "no-error";
pub const OPT_NO_PROXY: &str = "no-proxy";
pub const OPT_LOCAL: &str = "local";

const KNOWN_OPTIONS: &[&str] = &[
    OPT_URL,
    OPT_FORMAT,
    OPT_ORDER,
    OPT_PICK,
    OPT_USE_TEXT,
    OPT_IGNORE_LINK_PATHS,
    OPT_NO_ERROR,
    OPT_NO_PROXY,
    OPT_LOCAL,
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required option '{0}' is missing")]
    MissingOption(&'static str),
    #[error("option 'URL' is not a valid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("option 'format' is invalid: {0}")]
    InvalidFormat(#[from] FormatError),
}

/// Option name → value, exactly as written in a section or on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawOptions(BTreeMap<String, String>);

impl RawOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn is_true(&self, name: &str) -> bool {
        self.get(name) == Some("True")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawOptions {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Validated picker configuration. Stages read it, never re-parse strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerConfig {
    pub url: Url,
    pub use_text: bool,
    pub ignore_link_paths: bool,
    pub tolerate_empty: bool,
    pub use_proxy: bool,
    pub format: Option<FormatPattern>,
    pub order: Option<OrderSpec>,
    pub pick: PickChain,
    pub local: Option<PathBuf>,
}

impl PickerConfig {
    pub fn from_options(options: &RawOptions) -> Result<Self, ConfigError> {
        Self::from_options_with(options, &PickRegistry::with_builtins())
    }

    pub fn from_options_with(
        options: &RawOptions,
        registry: &PickRegistry,
    ) -> Result<Self, ConfigError> {
        for (name, _) in options.iter() {
            if !KNOWN_OPTIONS.contains(&name) {
                engine_warn!("Unknown option '{}' ignored", name);
            }
        }

        let url = options
            .get(OPT_URL)
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingOption(OPT_URL))?;
        let url = Url::parse(url)?;

        let format = options
            .get(OPT_FORMAT)
            .map(FormatPattern::parse)
            .transpose()?;

        let order = options
            .get(OPT_ORDER)
            .and_then(|text| match text.parse::<OrderSpec>() {
                Ok(spec) => Some(spec),
                Err(err) => {
                    engine_error!("order {:?} ignored: {}", text, err);
                    None
                }
            });

        let pick = options
            .get(OPT_PICK)
            .map(|text| registry.parse_chain(text))
            .unwrap_or_default();

        Ok(Self {
            url,
            use_text: options.is_true(OPT_USE_TEXT),
            ignore_link_paths: options.is_true(OPT_IGNORE_LINK_PATHS),
            // Present and anything but "False" means an empty result is acceptable.
            tolerate_empty: options.get(OPT_NO_ERROR).is_some_and(|v| v != "False"),
            use_proxy: !options.is_true(OPT_NO_PROXY),
            format,
            order,
            pick,
            local: options.get(OPT_LOCAL).map(PathBuf::from),
        })
    }

    pub fn normalization(&self) -> Normalization {
        Normalization {
            source: if self.use_text {
                MatchSource::Text
            } else {
                MatchSource::Href
            },
            ignore_link_paths: self.ignore_link_paths,
        }
    }

    /// The listing URL with the trailing `/` that relative hrefs are joined against.
    pub fn listing_url(&self) -> Url {
        let mut url = self.url.clone();
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url
    }
}
