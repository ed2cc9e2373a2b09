use picker_core::{extract_links, RawLink};
use pretty_assertions::assert_eq;

fn init_logging() {
    engine_logging::initialize_for_tests();
}

const APACHE_INDEX: &str = r#"<html>
<head><title>Index of /pkg</title></head>
<body>
<h1>Index of /pkg</h1>
<pre><a href="?C=N;O=D">Name</a>
<a href="../">Parent Directory</a>
<a href="pkg-1.0.0.tar.gz">pkg-1.0.0.tar.gz</a>       2024-01-01 10:00  1.2M
<a class="dl" href='pkg%201.5.tar.gz'>pkg 1.5.tar.gz#sha256=abc</a>
</pre>
</body></html>"#;

#[test]
fn anchors_are_extracted_in_document_order() {
    init_logging();
    let links = extract_links(APACHE_INDEX);

    assert_eq!(
        links,
        vec![
            RawLink::new("?C=N;O=D", "Name"),
            RawLink::new("../", "Parent Directory"),
            RawLink::new("pkg-1.0.0.tar.gz", "pkg-1.0.0.tar.gz"),
            RawLink::new("pkg 1.5.tar.gz", "pkg 1.5.tar.gz").with_raw_href("pkg%201.5.tar.gz"),
        ]
    );
}

#[test]
fn empty_document_yields_nothing() {
    init_logging();
    assert!(extract_links("").is_empty());
    assert!(extract_links("<p>no anchors here</p>").is_empty());
}

#[test]
fn malformed_anchors_are_skipped_without_stopping_extraction() {
    init_logging();
    let html = concat!(
        r#"<a name="top">bookmark</a>"#,
        r#"<a href=unquoted>bad value</a>"#,
        r#"<a href="good.zip">good.zip</a>"#,
    );

    assert_eq!(extract_links(html), vec![RawLink::new("good.zip", "good.zip")]);
}

#[test]
fn href_may_follow_other_attributes_and_surround_equals_with_spaces() {
    init_logging();
    let html = r#"<a title="x" data-id=3 href = "files/a.bin" >a.bin</a>"#;
    assert_eq!(
        extract_links(html),
        vec![RawLink::new("files/a.bin", "a.bin")]
    );
}

#[test]
fn inner_markup_is_kept_and_unclosed_anchor_runs_to_end() {
    init_logging();
    let html = r#"<a href="x.iso"><b>x</b>.iso</a><a href="y.iso">y.iso"#;
    assert_eq!(
        extract_links(html),
        vec![
            RawLink::new("x.iso", "<b>x</b>.iso"),
            RawLink::new("y.iso", "y.iso"),
        ]
    );
}

#[test]
fn anchor_without_closing_bracket_has_empty_text() {
    init_logging();
    let html = r#"<a href="z.tar""#;
    assert_eq!(extract_links(html), vec![RawLink::new("z.tar", "")]);
}

#[test]
fn single_quoted_href_stops_at_its_own_quote() {
    init_logging();
    let html = r#"<a href='pkg-1.0.tar.gz' title='pkg'>pkg-1.0.tar.gz</a>"#;
    assert_eq!(
        extract_links(html),
        vec![RawLink::new("pkg-1.0.tar.gz", "pkg-1.0.tar.gz")]
    );
}

#[test]
fn each_quote_style_may_contain_the_other() {
    init_logging();
    let html = concat!(
        r#"<a href="it's.tar" class='x'>a</a>"#,
        r#"<a href='say "hi".tar' class="y">b</a>"#,
        r#"<a href="mismatched.tar'>c</a>"#,
    );
    assert_eq!(
        extract_links(html),
        vec![
            RawLink::new("it's.tar", "a"),
            RawLink::new(r#"say "hi".tar"#, "b"),
        ]
    );
}

#[test]
fn encoded_href_is_kept_as_written_beside_the_decoded_one() {
    init_logging();
    let links = extract_links(r#"<a href="c%23-1.0.tar.gz">c#-1.0.tar.gz</a>"#);
    assert_eq!(links[0].href, "c#-1.0.tar.gz");
    assert_eq!(links[0].raw_href, "c%23-1.0.tar.gz");
}
