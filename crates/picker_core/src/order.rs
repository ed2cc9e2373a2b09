use std::fmt;
use std::str::FromStr;

use engine_logging::engine_error;
use thiserror::Error;

use crate::link::Link;

const ASCENDING: &str = "small->large";
const DESCENDING: &str = "large->small";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Ascending => f.write_str(ASCENDING),
            Direction::Descending => f.write_str(DESCENDING),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderParseError {
    #[error("unknown order direction {0:?} (expected 'small->large' or 'large->small')")]
    UnknownDirection(String),
}

/// `<direction>:<field>,<field>,...`; no fields means "order by the whole match target".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSpec {
    pub direction: Direction,
    pub fields: Vec<String>,
}

impl OrderSpec {
    pub fn whole_string(direction: Direction) -> Self {
        Self {
            direction,
            fields: Vec::new(),
        }
    }

    pub fn by_fields<I, S>(direction: Direction, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            direction,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl FromStr for OrderSpec {
    type Err = OrderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (direction, items) = s.split_once(':').unwrap_or((s, ""));
        let direction = match direction.trim() {
            ASCENDING => Direction::Ascending,
            DESCENDING => Direction::Descending,
            other => return Err(OrderParseError::UnknownDirection(other.to_string())),
        };
        let fields = items
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        Ok(Self { direction, fields })
    }
}

/// Sorts candidates by `spec`.
///
/// Keys compare as strings; the original position is the final key
/// component, so equal keys keep their input order when ascending and the
/// mirrored order when descending. A missing field sorts before every value.
pub fn order_links(links: Vec<Link>, spec: &OrderSpec) -> Vec<Link> {
    let mut keyed: Vec<(Vec<Option<String>>, usize, Link)> = links
        .into_iter()
        .enumerate()
        .map(|(index, link)| (sort_key(&link, &spec.fields), index, link))
        .collect();

    keyed.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
    if spec.direction == Direction::Descending {
        keyed.reverse();
    }

    keyed.into_iter().map(|(_, _, link)| link).collect()
}

fn sort_key(link: &Link, fields: &[String]) -> Vec<Option<String>> {
    if fields.is_empty() {
        return vec![Some(link.match_target.clone())];
    }
    fields
        .iter()
        .map(|name| {
            let value = link.field(name).map(ToOwned::to_owned);
            if value.is_none() {
                engine_error!("{{{}}} was expected in {:?}", name, link.match_target);
            }
            value
        })
        .collect()
}
