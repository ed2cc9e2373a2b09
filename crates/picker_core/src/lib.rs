//! Picker core: the pure selection engine.
//!
//! Turns listing markup into an ordered, filtered set of [`Link`]s. Nothing in
//! this crate performs IO; fetching and retrieval live in `picker_engine`.
mod anchors;
mod format;
mod link;
mod options;
mod order;
mod pick;
mod select;

pub use anchors::{extract_links, RawLink};
pub use format::{glob_to_regex, Fields, FormatError, FormatPattern};
pub use link::{last_segment, Link, MatchSource, Normalization};
pub use options::{
    ConfigError, PickerConfig, RawOptions, OPT_FORMAT, OPT_IGNORE_LINK_PATHS, OPT_LOCAL,
    OPT_NO_ERROR, OPT_NO_PROXY, OPT_ORDER, OPT_PICK, OPT_URL, OPT_USE_TEXT,
};
pub use order::{order_links, Direction, OrderParseError, OrderSpec};
pub use pick::{ArgumentParser, PickChain, PickDirective, PickOp, PickParseError, PickRegistry};
pub use select::{apply_format, select};
