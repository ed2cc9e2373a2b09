use crate::anchors::RawLink;
use crate::format::Fields;

/// Which part of an anchor the format is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchSource {
    #[default]
    Href,
    Text,
}

/// Normalization applied to every discovered anchor before format matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Normalization {
    pub source: MatchSource,
    /// Keep only what follows the last `/` of the match target.
    pub ignore_link_paths: bool,
}

/// A candidate flowing through the selection stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Percent-decoded `href`.
    pub href: String,
    /// `href` as written in the listing; this is what gets requested.
    pub raw_href: String,
    pub text: String,
    /// The string formats, orderings and landing names are computed from.
    pub match_target: String,
    pub fields: Fields,
}

impl Link {
    pub fn from_raw(raw: RawLink, normalization: Normalization) -> Self {
        let target = match normalization.source {
            MatchSource::Href => raw.href.as_str(),
            MatchSource::Text => raw.text.as_str(),
        };
        let match_target = if normalization.ignore_link_paths {
            last_segment(target).to_string()
        } else {
            target.to_string()
        };
        Self {
            href: raw.href,
            raw_href: raw.raw_href,
            text: raw.text,
            match_target,
            fields: Fields::new(),
        }
    }

    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Everything after the final `/`, or the whole string when there is none.
pub fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
