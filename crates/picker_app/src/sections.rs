//! Named option sections stored in a RON file.
//!
//! ```text
//! {
//!     "newest-pkg": {
//!         "URL": "https://downloads.example.com/pkg",
//!         "format": "pkg-{version}.tar.gz",
//!         "order": "large->small:version",
//!         "pick": "first:1",
//!     },
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use engine_logging::engine_info;
use picker_core::RawOptions;

pub type Sections = BTreeMap<String, RawOptions>;

pub fn load_sections(path: &Path) -> Result<Sections> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("could not read sections from {:?}", path))?;
    let sections = parse_sections(&content)
        .with_context(|| format!("could not parse sections in {:?}", path))?;
    engine_info!("Loaded {} section(s) from {:?}", sections.len(), path);
    Ok(sections)
}

pub fn parse_sections(content: &str) -> Result<Sections> {
    Ok(ron::from_str(content)?)
}

/// Sections to run, in name order. An empty `only` selects every section.
pub fn select_sections<'a>(
    sections: &'a Sections,
    only: &[String],
) -> Result<Vec<(&'a str, &'a RawOptions)>> {
    if let Some(missing) = only.iter().find(|name| !sections.contains_key(*name)) {
        bail!("no section named '{}'", missing);
    }
    Ok(sections
        .iter()
        .filter(|(name, _)| only.is_empty() || only.contains(name))
        .map(|(name, options)| (name.as_str(), options))
        .collect())
}
