use picker_core::{glob_to_regex, Fields, FormatError, FormatPattern};
use pretty_assertions::assert_eq;

fn fields(pairs: &[(&str, &str)]) -> Fields {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn format(pattern: &str) -> FormatPattern {
    FormatPattern::parse(pattern).expect("valid format")
}

#[test]
fn untagged_patterns_behave_like_fnmatch() {
    let star = format("*.tar.gz");
    assert!(star.matches_glob("pkg-1.0.tar.gz"));
    assert!(star.matches_glob("nested/dir/pkg.tar.gz"));
    assert!(star.matches_glob(".tar.gz"));
    assert!(!star.matches_glob("pkg.tar.gz.sig"));
    assert!(!star.matches_glob("pkg.tar.gzip"));
    assert_eq!(star.extract("pkg.tar.gz"), Some(Fields::new()));
    assert!(star.tags().is_empty());

    let single = format("pkg-?.zip");
    assert!(single.matches_glob("pkg-1.zip"));
    assert!(!single.matches_glob("pkg-10.zip"));
    assert!(!single.matches_glob("pkg-.zip"));

    let class = format("[ab]*.txt");
    assert!(class.matches_glob("a1.txt"));
    assert!(class.matches_glob("b.txt"));
    assert!(!class.matches_glob("c.txt"));

    let negated = format("[!ab]*");
    assert!(negated.matches_glob("c"));
    assert!(!negated.matches_glob("a"));

    let range = format("v[0-9].bin");
    assert!(range.matches_glob("v7.bin"));
    assert!(!range.matches_glob("vx.bin"));
}

#[test]
fn regex_metacharacters_and_open_brackets_are_literal() {
    let literal = format("a+b(1)^$.txt");
    assert!(literal.matches_glob("a+b(1)^$.txt"));
    assert!(!literal.matches_glob("aab(1)^$.txt"));

    let open = format("file[1.txt");
    assert!(open.matches_glob("file[1.txt"));
    assert!(!open.matches_glob("file1.txt"));

    let leading_bracket = format("[]]x");
    assert!(leading_bracket.matches_glob("]x"));
}

#[test]
fn matching_is_anchored_and_spans_newlines() {
    let pattern = format("a*z");
    assert!(!pattern.matches_glob("xa-z"));
    assert!(!pattern.matches_glob("a-zx"));
    assert!(pattern.matches_glob("a\nz"));
}

#[test]
fn tags_are_greedy_from_the_left() {
    let pattern = format("{a}.{b}");
    assert_eq!(
        pattern.extract("1.5.4.tar.gz"),
        Some(fields(&[("a", "1.5.4.tar"), ("b", "gz")]))
    );
    assert_eq!(pattern.coarse_glob(), "*.*");
}

#[test]
fn doubled_braces_are_literal() {
    let pattern = format("v{{1}}-{ver}");
    assert_eq!(pattern.tags(), ["ver".to_string()]);
    assert_eq!(pattern.coarse_glob(), "v{1}-*");
    assert!(pattern.matches_glob("v{1}-2.0"));
    assert_eq!(pattern.extract("v{1}-2.0"), Some(fields(&[("ver", "2.0")])));
    assert_eq!(pattern.extract("v1-2.0"), None);
}

#[test]
fn tags_mix_with_wildcards() {
    let pattern = format("{name}-{version}.tar.*");
    assert_eq!(
        pattern.extract("my-pkg-1.2.tar.bz2"),
        Some(fields(&[("name", "my-pkg"), ("version", "1.2")]))
    );
    assert_eq!(pattern.extract("my-pkg-1.2.zip"), None);
}

#[test]
fn glob_can_accept_what_extraction_rejects() {
    // The class swallows the tag in the coarse glob but not in the extraction pattern.
    let pattern = format("[{x}]");
    assert!(pattern.matches_glob("*"));
    assert_eq!(pattern.extract("*"), None);
}

#[test]
fn invalid_formats_are_rejected() {
    assert!(matches!(
        FormatPattern::parse("pkg-{version"),
        Err(FormatError::UnterminatedTag { position: 4 })
    ));
    assert!(matches!(
        FormatPattern::parse("a}b"),
        Err(FormatError::StrayClosingBrace { position: 1 })
    ));
    assert!(matches!(
        FormatPattern::parse("{1x}"),
        Err(FormatError::InvalidTagName { .. })
    ));
    assert!(matches!(
        FormatPattern::parse("{}"),
        Err(FormatError::InvalidTagName { .. })
    ));
    assert!(matches!(
        FormatPattern::parse("{a}-{a}"),
        Err(FormatError::DuplicateTag { .. })
    ));
}

#[test]
fn glob_translation_is_a_plain_function() {
    assert_eq!(glob_to_regex("*.tar.gz"), r".*\.tar\.gz");
    assert_eq!(glob_to_regex("a**?"), "a.*.");
    assert_eq!(glob_to_regex("[!x-z]"), "[^x-z]");
    assert_eq!(glob_to_regex("["), r"\[");
}
