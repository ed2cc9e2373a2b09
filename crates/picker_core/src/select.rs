use engine_logging::{engine_debug, engine_dropped, engine_error, engine_trace};

use crate::anchors::extract_links;
use crate::format::FormatPattern;
use crate::link::Link;
use crate::options::PickerConfig;
use crate::order::order_links;

/// Runs the pure part of a pick: extract, normalize, format, order, pick.
pub fn select(markup: &str, config: &PickerConfig) -> Vec<Link> {
    let normalization = config.normalization();
    let links: Vec<Link> = extract_links(markup)
        .into_iter()
        .map(|raw| Link::from_raw(raw, normalization))
        .collect();
    trace_stage("pull", &links);

    let links = match &config.format {
        Some(format) => apply_format(links, format),
        None => links,
    };
    trace_stage("format", &links);

    let links = match &config.order {
        Some(spec) => order_links(links, spec),
        None => links,
    };
    trace_stage("order", &links);

    let links = config.pick.apply(links);
    trace_stage("pick", &links);
    links
}

/// Keeps the links whose match target fits `format` and fills in their fields.
pub fn apply_format(links: Vec<Link>, format: &FormatPattern) -> Vec<Link> {
    links
        .into_iter()
        .filter_map(|link| {
            if !format.matches_glob(&link.match_target) {
                engine_dropped!("format", link.match_target, "does not match '{}'", format.coarse_glob());
                return None;
            }
            match format.extract(&link.match_target) {
                Some(fields) => Some(link.with_fields(fields)),
                None => {
                    engine_error!(
                        "link {:?} was expected to match '{}'",
                        link.match_target,
                        format.extraction_pattern()
                    );
                    None
                }
            }
        })
        .collect()
}

fn trace_stage(stage: &str, links: &[Link]) {
    engine_debug!("{} candidates after {}", links.len(), stage);
    for link in links {
        engine_trace!("  [{}] {:?} {:?}", stage, link.match_target, link.fields);
    }
}
