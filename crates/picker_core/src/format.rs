//! Tagged glob patterns ("formats").
//!
//! A format is a shell-style glob in which `{name}` marks a named wildcard.
//! `{{` and `}}` stand for literal braces. Each format yields two matchers: a
//! coarse glob with every tag replaced by `*`, used as the cheap membership
//! test, and an extraction pattern with one greedy named capture per tag.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use regex::Regex;
use thiserror::Error;

/// Tag name → substring captured at that tag's position.
pub type Fields = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unterminated tag starting at byte {position}")]
    UnterminatedTag { position: usize },
    #[error("unmatched '}}' at byte {position} (use '}}}}' for a literal brace)")]
    StrayClosingBrace { position: usize },
    #[error("tag name {name:?} is not an identifier")]
    InvalidTagName { name: String },
    #[error("tag {{{name}}} appears more than once")]
    DuplicateTag { name: String },
    #[error("pattern does not compile: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Glob(String),
    Tag(String),
}

/// A compiled format.
#[derive(Clone)]
pub struct FormatPattern {
    source: String,
    coarse_glob: String,
    tags: Vec<String>,
    coarse: Regex,
    extract: Regex,
}

impl FormatPattern {
    pub fn parse(pattern: &str) -> Result<Self, FormatError> {
        let pieces = tokenize(pattern)?;

        let mut coarse_glob = String::with_capacity(pattern.len());
        let mut extract_body = String::new();
        let mut tags = Vec::new();
        for piece in &pieces {
            match piece {
                Piece::Glob(text) => {
                    coarse_glob.push_str(text);
                    extract_body.push_str(&glob_to_regex(text));
                }
                Piece::Tag(name) => {
                    coarse_glob.push('*');
                    extract_body.push_str(&format!("(?P<{name}>.*)"));
                    tags.push(name.clone());
                }
            }
        }

        let coarse = Regex::new(&anchored(&glob_to_regex(&coarse_glob)))?;
        let extract = Regex::new(&anchored(&extract_body))?;

        Ok(Self {
            source: pattern.to_string(),
            coarse_glob,
            tags,
            coarse,
            extract,
        })
    }

    /// The format with every tag replaced by `*` and escaped braces collapsed.
    pub fn coarse_glob(&self) -> &str {
        &self.coarse_glob
    }

    /// Tag names in the order they appear.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn extraction_pattern(&self) -> &str {
        self.extract.as_str()
    }

    pub fn matches_glob(&self, candidate: &str) -> bool {
        self.coarse.is_match(candidate)
    }

    /// Matches the whole of `candidate` and returns the captured tag values.
    pub fn extract(&self, candidate: &str) -> Option<Fields> {
        let captures = self.extract.captures(candidate)?;
        Some(
            self.tags
                .iter()
                .map(|tag| {
                    let value = captures.name(tag).map_or("", |m| m.as_str());
                    (tag.clone(), value.to_string())
                })
                .collect(),
        )
    }
}

impl fmt::Debug for FormatPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatPattern")
            .field("source", &self.source)
            .field("coarse_glob", &self.coarse_glob)
            .field("tags", &self.tags)
            .finish()
    }
}

impl PartialEq for FormatPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for FormatPattern {}

fn tokenize(pattern: &str) -> Result<Vec<Piece>, FormatError> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut seen = HashSet::new();
    let mut chars = pattern.char_indices().peekable();

    while let Some((position, ch)) = chars.next() {
        match ch {
            '{' if chars.peek().map(|&(_, c)| c) == Some('{') => {
                chars.next();
                literal.push('{');
            }
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(FormatError::UnterminatedTag { position });
                }
                if !is_identifier(&name) {
                    return Err(FormatError::InvalidTagName { name });
                }
                if !seen.insert(name.clone()) {
                    return Err(FormatError::DuplicateTag { name });
                }
                if !literal.is_empty() {
                    pieces.push(Piece::Glob(std::mem::take(&mut literal)));
                }
                pieces.push(Piece::Tag(name));
            }
            '}' if chars.peek().map(|&(_, c)| c) == Some('}') => {
                chars.next();
                literal.push('}');
            }
            '}' => return Err(FormatError::StrayClosingBrace { position }),
            other => literal.push(other),
        }
    }

    if !literal.is_empty() {
        pieces.push(Piece::Glob(literal));
    }
    Ok(pieces)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

fn anchored(body: &str) -> String {
    format!(r"(?s)\A(?:{body})\z")
}

/// Translates a shell glob into an unanchored regular expression body.
///
/// fnmatch semantics: `*` matches any run of characters (path separators
/// included), `?` exactly one, `[...]` a class and `[!...]` a negated class.
/// A `[` without a closing `]` is a literal bracket. Everything else matches
/// itself.
pub fn glob_to_regex(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::with_capacity(glob.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            '*' => {
                while chars.get(i) == Some(&'*') {
                    i += 1;
                }
                out.push_str(".*");
            }
            '?' => out.push('.'),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.push_str(&translate_class(&chars[i..end]));
                    i = end + 1;
                }
                None => out.push_str(r"\["),
            },
            other => {
                let mut buf = [0u8; 4];
                out.push_str(&regex::escape(other.encode_utf8(&mut buf)));
            }
        }
    }

    out
}

/// Index of the `]` closing a class whose body starts at `start`.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    // A leading ']' is part of the class.
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    while j < chars.len() && chars[j] != ']' {
        j += 1;
    }
    (j < chars.len()).then_some(j)
}

fn translate_class(body: &[char]) -> String {
    let (negated, members) = match body.split_first() {
        Some((&'!', rest)) => (true, rest),
        _ => (false, body),
    };

    let mut out = String::from("[");
    if negated {
        out.push('^');
    }
    let mut previous_was_range = false;
    for (idx, &c) in members.iter().enumerate() {
        let is_range =
            c == '-' && idx > 0 && idx + 1 < members.len() && !previous_was_range;
        if is_range {
            out.push('-');
        } else {
            if matches!(c, '\\' | '[' | ']' | '^' | '&' | '~' | '-') {
                out.push('\\');
            }
            out.push(c);
        }
        previous_was_range = is_range;
    }
    out.push(']');
    out
}
