//! The pick chain: `operator:argument` directives applied one after another.
//!
//! Operators are resolved through a [`PickRegistry`] when the chain is parsed,
//! so a misspelled operator is reported once, before any candidate is looked
//! at, and never reaches [`PickChain::apply`].

use std::collections::BTreeMap;
use std::fmt;

use engine_logging::{engine_debug, engine_dropped, engine_error};
use thiserror::Error;

use crate::link::Link;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PickParseError {
    #[error("pick entries need an <operator>:<argument> format, got {0:?}")]
    MissingSeparator(String),
    #[error("no pick operator named {0:?}")]
    UnknownOperator(String),
    #[error("pick '{operator}:{argument}' did not get a non-negative integer")]
    NotACount { operator: String, argument: String },
    #[error("pick 'item:{0}' expected format: <item>=<value>")]
    MissingEquals(String),
}

/// A parsed pick operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOp {
    /// Keep the first `n` candidates.
    First(usize),
    /// Keep the last `n` candidates.
    Last(usize),
    /// Keep candidates whose `field` equals `value`, ignoring surrounding whitespace.
    Item { field: String, value: String },
}

impl PickOp {
    pub fn apply(&self, links: Vec<Link>) -> Vec<Link> {
        match self {
            PickOp::First(count) => {
                let mut links = links;
                links.truncate(*count);
                links
            }
            PickOp::Last(count) => {
                let mut links = links;
                let skip = links.len().saturating_sub(*count);
                links.split_off(skip)
            }
            PickOp::Item { field, value } => {
                let wanted = value.trim();
                links
                    .into_iter()
                    .filter(|link| match link.field(field) {
                        Some(actual) if actual.trim() == wanted => true,
                        Some(actual) => {
                            engine_dropped!("pick", link.match_target, "{{{}}} is {:?}", field, actual);
                            false
                        }
                        None => {
                            engine_error!(
                                "pick 'item:{}={}' item '{}' was not found in {:?}",
                                field,
                                value,
                                field,
                                link.match_target
                            );
                            false
                        }
                    })
                    .collect()
            }
        }
    }
}

/// One pick step as written by the user, with its parsed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickDirective {
    pub operator: String,
    pub argument: String,
    pub op: PickOp,
}

impl fmt::Display for PickDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.operator, self.argument)
    }
}

/// Turns the text after `operator:` into an operation.
pub type ArgumentParser = fn(&str) -> Result<PickOp, PickParseError>;

/// Operator name → argument parser.
#[derive(Clone)]
pub struct PickRegistry {
    parsers: BTreeMap<String, ArgumentParser>,
}

impl PickRegistry {
    /// A registry that knows no operators.
    pub fn empty() -> Self {
        Self {
            parsers: BTreeMap::new(),
        }
    }

    /// A registry with `first`, `last` and `item`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry
            .register("first", parse_first)
            .register("last", parse_last)
            .register("item", parse_item);
        registry
    }

    pub fn register(&mut self, operator: impl Into<String>, parser: ArgumentParser) -> &mut Self {
        self.parsers.insert(operator.into(), parser);
        self
    }

    pub fn operators(&self) -> impl Iterator<Item = &str> {
        self.parsers.keys().map(String::as_str)
    }

    pub fn parse_directive(&self, entry: &str) -> Result<PickDirective, PickParseError> {
        let (operator, argument) = entry
            .split_once(':')
            .ok_or_else(|| PickParseError::MissingSeparator(entry.to_string()))?;
        let operator = operator.trim();
        let parser = self
            .parsers
            .get(operator)
            .ok_or_else(|| PickParseError::UnknownOperator(operator.to_string()))?;
        let op = parser(argument)?;
        Ok(PickDirective {
            operator: operator.to_string(),
            argument: argument.to_string(),
            op,
        })
    }

    /// Parses a newline- or `;`-separated list of directives.
    ///
    /// Entries that do not parse are logged and left out, so they behave as
    /// no-ops in the resulting chain.
    pub fn parse_chain(&self, text: &str) -> PickChain {
        let directives = text
            .split(['\n', ';'])
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .filter_map(|entry| match self.parse_directive(entry) {
                Ok(directive) => Some(directive),
                Err(err) => {
                    engine_error!("pick entry {:?} skipped: {}", entry, err);
                    None
                }
            })
            .collect();
        PickChain { directives }
    }
}

impl Default for PickRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for PickRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.parsers.keys()).finish()
    }
}

fn parse_count(operator: &str, argument: &str) -> Result<usize, PickParseError> {
    argument
        .trim()
        .parse::<usize>()
        .map_err(|_| PickParseError::NotACount {
            operator: operator.to_string(),
            argument: argument.to_string(),
        })
}

fn parse_first(argument: &str) -> Result<PickOp, PickParseError> {
    parse_count("first", argument).map(PickOp::First)
}

fn parse_last(argument: &str) -> Result<PickOp, PickParseError> {
    parse_count("last", argument).map(PickOp::Last)
}

fn parse_item(argument: &str) -> Result<PickOp, PickParseError> {
    let (field, value) = argument
        .split_once('=')
        .ok_or_else(|| PickParseError::MissingEquals(argument.to_string()))?;
    Ok(PickOp::Item {
        field: field.trim().to_string(),
        value: value.to_string(),
    })
}

/// Pick directives in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickChain {
    directives: Vec<PickDirective>,
}

impl PickChain {
    pub fn directives(&self) -> &[PickDirective] {
        &self.directives
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Each directive sees exactly the output of the one before it.
    pub fn apply(&self, links: Vec<Link>) -> Vec<Link> {
        self.directives.iter().fold(links, |links, directive| {
            let before = links.len();
            let links = directive.op.apply(links);
            engine_debug!(
                "pick '{}' kept {} of {} candidates",
                directive,
                links.len(),
                before
            );
            links
        })
    }
}
