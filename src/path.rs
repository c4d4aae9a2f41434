//! Repository path utilities.
//!
//! Canonical form: absolute (leading `/`), no duplicate slashes, no `.` or
//! `..` segments, no trailing slash except for the root `/` itself.

/// Normalize a file path to canonical form.
///
/// Duplicate slashes collapse, `.` segments are dropped and `..` segments
/// resolve lexically without escaping the root. The result starts with `/`
/// and never ends with `/` unless it is the root itself.
pub fn normalize_file_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => segments.push(name),
        }
    }
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Normalize a directory path to the same canonical form as files.
///
/// Directory paths in mapping keys carry no trailing slash, so this is the
/// same normalization; the separate name documents intent at call sites.
pub fn normalize_dir_path(path: &str) -> String {
    normalize_file_path(path)
}

/// Split a normalized path into (parent_dir, name).
///
/// The parent is itself in canonical form; the root path yields
/// `("/", "")` since the root has no entry name.
pub fn split_parent_name(path: &str) -> (String, String) {
    match path.rfind('/') {
        Some(0) if path.len() == 1 => ("/".to_string(), String::new()),
        Some(0) => ("/".to_string(), path[1..].to_string()),
        Some(idx) => (path[..idx].to_string(), path[idx + 1..].to_string()),
        None => ("/".to_string(), path.to_string()),
    }
}
