//! Filename and extension extraction from a resource URL.
//!
//! Works on the URL text, not a parsed URL: anything a page hands us is
//! accepted and none of these functions can fail.

/// Returns the text after the last `/` of `url`, cut at the first `?`.
///
/// An URL ending in `/` yields an empty filename.
pub fn filename_from_url(url: &str) -> &str {
    let last = url.rsplit('/').next().unwrap_or(url);
    match last.find('?') {
        Some(q) => &last[..q],
        None => last,
    }
}

/// Lowercased extension of `filename` including the leading dot, or an empty
/// string when there is no `.` or nothing follows the last one.
pub fn extension_from_filename(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!(".{}", ext.to_lowercase()),
        _ => String::new(),
    }
}
