//! POSIX path arithmetic over plain strings.
//!
//! `std::path` would apply Windows rules on Windows hosts, which breaks references that are
//! always written with `/`. These helpers operate on the text directly and never consult the
//! filesystem.

/// Final segment of `path`, ignoring trailing separators.
///
/// Returns an empty string for `""` and for paths made only of separators.
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(index) => &trimmed[index + 1..],
        None => trimmed,
    }
}

/// Directory portion of `path`.
///
/// Mirrors the POSIX `dirname` utility: `.` when there is no separator, `/` for a file
/// directly below the root, and trailing separators on the final segment are ignored.
pub fn dirname(path: &str) -> &str {
    let bytes = path.as_bytes();
    if bytes.is_empty() {
        return ".";
    }

    let has_root = bytes[0] == b'/';
    let mut end = None;
    let mut matched_slash = true;
    for index in (1..bytes.len()).rev() {
        if bytes[index] == b'/' {
            if !matched_slash {
                end = Some(index);
                break;
            }
        } else {
            matched_slash = false;
        }
    }

    match end {
        None if has_root => "/",
        None => ".",
        Some(1) if has_root => "//",
        Some(end) => &path[..end],
    }
}

/// Normalise `path` by collapsing separators and resolving `.` and `..` segments.
///
/// Leading `..` segments survive on relative paths, while an absolute path can never climb
/// above `/`. A trailing separator is preserved, and a relative path that collapses to
/// nothing becomes `.`.
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let is_absolute = path.starts_with('/');
    let has_trailing_separator = path.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if is_absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let mut normalized = segments.join("/");
    if normalized.is_empty() && !is_absolute {
        normalized.push('.');
    }
    if !normalized.is_empty() && has_trailing_separator {
        normalized.push('/');
    }

    if is_absolute {
        format!("/{normalized}")
    } else {
        normalized
    }
}

/// Normalise a directory path into its canonical comparable form.
///
/// Same as [`normalize`] but without a trailing separator, so `images/` and `images//.` both
/// become `images`. The root stays `/`.
pub fn normalize_dir(path: &str) -> String {
    let mut normalized = normalize(path);
    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// Replace Windows separators so discovered paths compare equal to document text.
pub fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}
