use std::borrow::Cow;
use std::sync::OnceLock;

use engine_logging::{engine_info, engine_warn};
use regex::Regex;

const ANCHOR_OPEN: &str = "<a ";
const ANCHOR_CLOSE: &str = "</a";

/// One anchor found in a listing, before any normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink {
    /// Percent-decoded `href` value.
    pub href: String,
    /// The `href` value exactly as written, for resolving against the listing URL.
    pub raw_href: String,
    /// Visible anchor text with any `#fragment` suffix removed.
    pub text: String,
}

impl RawLink {
    /// A link whose `href` needed no decoding.
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        let href = href.into();
        Self {
            raw_href: href.clone(),
            href,
            text: text.into(),
        }
    }

    pub fn with_raw_href(mut self, raw_href: impl Into<String>) -> Self {
        self.raw_href = raw_href.into();
        self
    }
}

fn href_value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `href` has already been consumed; only the assignment and quoted value remain.
    RE.get_or_init(|| {
        Regex::new(r#"^\s*=\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')"#)
            .expect("static href pattern is valid")
    })
}

/// Pulls `(href, text)` pairs out of a directory listing, in document order.
///
/// This is deliberately not an HTML parser: the document is cut on `<a ` and
/// `</a`, and the first `href` assignment in each anchor is read with a
/// permissive quoted-value match. An anchor without a readable `href` is logged
/// and skipped; it never stops the rest of the document from being read.
pub fn extract_links(markup: &str) -> Vec<RawLink> {
    let mut links = Vec::new();

    for fragment in markup.split(ANCHOR_OPEN).skip(1) {
        let anchor = fragment.split(ANCHOR_CLOSE).next().unwrap_or(fragment);
        let (attributes, inner) = anchor.split_once('>').unwrap_or((anchor, ""));

        let Some((_, after_href)) = attributes.split_once("href") else {
            engine_info!("Anchor without href skipped: <a {}>", attributes.trim());
            continue;
        };
        let Some(captures) = href_value_re().captures(after_href) else {
            engine_info!("Anchor href malformed, skipped: <a {}>", attributes.trim());
            continue;
        };
        let raw_href = captures
            .name("dq")
            .or_else(|| captures.name("sq"))
            .map_or("", |m| m.as_str());

        links.push(RawLink {
            href: percent_decode(raw_href).into_owned(),
            raw_href: raw_href.to_string(),
            text: strip_fragment(inner).to_string(),
        });
    }

    links
}

fn percent_decode(raw: &str) -> Cow<'_, str> {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded,
        Err(err) => {
            engine_warn!("href {:?} is not valid UTF-8 once decoded ({}); keeping it raw", raw, err);
            Cow::Borrowed(raw)
        }
    }
}

fn strip_fragment(text: &str) -> &str {
    text.split('#').next().unwrap_or(text)
}
