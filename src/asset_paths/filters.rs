use regex::Regex;

fn passthrough_patterns() -> &'static [Regex] {
    use std::sync::OnceLock;

    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            vec![
                Regex::new(r"//").expect("invalid protocol-relative regex"),
                Regex::new(r"^/$").expect("invalid site root regex"),
            ]
        })
        .as_slice()
}

/// Determine whether an asset reference must be returned untouched.
///
/// Anything containing a double slash points outside the local tree (`//cdn/lib.js`,
/// `https://host/pic.png`), and a lone `/` names the site root rather than a file.
pub fn is_passthrough_reference(value: &str) -> bool {
    passthrough_patterns()
        .iter()
        .any(|pattern| pattern.is_match(value))
}

/// Split a single leading root separator off a reference.
///
/// Returns whether the reference was root-relative together with the remaining path.
pub fn split_root(value: &str) -> (bool, &str) {
    match value.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, value),
    }
}
