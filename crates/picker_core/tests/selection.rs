use picker_core::{apply_format, select, FormatPattern, Link, Normalization, PickerConfig, RawLink, RawOptions};
use pretty_assertions::assert_eq;

fn init_logging() {
    engine_logging::initialize_for_tests();
}

const LISTING: &str = r#"<html><body>
<a href="../">Parent Directory</a>
<a href="pkg-1.5.4.tar.gz">pkg-1.5.4.tar.gz</a>
<a href="pkg-1.0.0.tar.gz">pkg-1.0.0.tar.gz</a>
<a href="pkg-1.0.0.tar.gz.asc">pkg-1.0.0.tar.gz.asc</a>
<a href="pkg-2.0.0.tar.gz">pkg-2.0.0.tar.gz</a>
<a href="README">README</a>
</body></html>"#;

fn config(extra: &[(&str, &str)]) -> PickerConfig {
    let mut options = RawOptions::new().with("URL", "https://downloads.example.com/pkg/");
    for (name, value) in extra {
        options.set(*name, *value);
    }
    PickerConfig::from_options(&options).expect("valid options")
}

fn hrefs(links: &[Link]) -> Vec<&str> {
    links.iter().map(|l| l.href.as_str()).collect()
}

#[test]
fn smallest_version_first() {
    init_logging();
    let config = config(&[
        ("format", "pkg-{version}.tar.gz"),
        ("order", "small->large:version"),
        ("pick", "first:1"),
    ]);

    let picked = select(LISTING, &config);
    assert_eq!(hrefs(&picked), ["pkg-1.0.0.tar.gz"]);
    assert_eq!(picked[0].field("version"), Some("1.0.0"));
}

#[test]
fn largest_version_first() {
    init_logging();
    let config = config(&[
        ("format", "pkg-{version}.tar.gz"),
        ("order", "large->small:version"),
        ("pick", "first:1"),
    ]);

    assert_eq!(hrefs(&select(LISTING, &config)), ["pkg-2.0.0.tar.gz"]);
}

#[test]
fn format_alone_keeps_page_order() {
    init_logging();
    let config = config(&[("format", "pkg-{version}.tar.gz")]);
    assert_eq!(
        hrefs(&select(LISTING, &config)),
        ["pkg-1.5.4.tar.gz", "pkg-1.0.0.tar.gz", "pkg-2.0.0.tar.gz"]
    );
}

#[test]
fn item_pick_without_a_match_selects_nothing() {
    init_logging();
    let config = config(&[
        ("format", "pkg-{version}.tar.gz"),
        ("pick", "item:version=9.9.9"),
    ]);
    assert!(select(LISTING, &config).is_empty());
}

#[test]
fn no_format_passes_every_anchor() {
    init_logging();
    let config = config(&[("pick", "last:1")]);
    let picked = select(LISTING, &config);
    assert_eq!(hrefs(&picked), ["README"]);
    assert!(picked[0].fields.is_empty());
}

#[test]
fn anchor_text_and_path_stripping_feed_the_format() {
    init_logging();
    let listing = r#"
<a href="/files/8c1f/download">mirror/tool-0.9.zip</a>
<a href="/files/77aa/download">mirror/tool-0.10.zip</a>
<a href="/files/0000/download">mirror/other.zip</a>
"#;
    let config = config(&[
        ("use-text", "True"),
        ("ignore-link-paths", "True"),
        ("format", "tool-{version}.zip"),
        ("order", "large->small"),
    ]);

    let picked = select(listing, &config);
    let targets: Vec<&str> = picked.iter().map(|l| l.match_target.as_str()).collect();
    assert_eq!(targets, ["tool-0.9.zip", "tool-0.10.zip"]);
    assert_eq!(hrefs(&picked), ["/files/8c1f/download", "/files/77aa/download"]);
}

#[test]
fn inconsistent_glob_match_is_dropped() {
    init_logging();
    let format = FormatPattern::parse("[{x}]").unwrap();
    let links = vec![
        Link::from_raw(RawLink::new("*", "*"), Normalization::default()),
        Link::from_raw(RawLink::new("[y]", "[y]"), Normalization::default()),
    ];
    assert!(apply_format(links, &format).is_empty());
}
