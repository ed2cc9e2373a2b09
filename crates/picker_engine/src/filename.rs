use picker_core::last_segment;
use sha2::{Digest, Sha256};

const MAX_NAME_LEN: usize = 200;

/// Local file name for a picked link.
///
/// The final path segment of the match target, as the name the link was
/// selected by. Falls back to the href's last segment, then to
/// `download--{short_hash(href)}`, and is made safe for Windows file systems.
pub fn landing_name(match_target: &str, href: &str) -> String {
    let href_path = href.split(['?', '#']).next().unwrap_or(href);
    let candidate = [last_segment(match_target), last_segment(href_path)]
        .into_iter()
        .map(sanitize)
        .find(|name| !name.is_empty());

    match candidate {
        Some(name) => name,
        None => format!("download--{}", short_hash(href)),
    }
}

fn sanitize(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let mut name = cleaned.trim_matches(&[' ', '.'][..]).to_string();
    if name.len() > MAX_NAME_LEN {
        let mut end = MAX_NAME_LEN;
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        name.truncate(end);
    }
    if is_reserved_windows_name(&name) {
        name.insert(0, '_');
    }
    name
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    let stem = name.split('.').next().unwrap_or(name);
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(stem))
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
