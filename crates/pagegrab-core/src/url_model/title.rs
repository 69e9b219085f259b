//! Manifest filename derived from the page title.

/// Used in place of the page title when the tab has none.
const UNTITLED: &str = "page-resources";

/// Replaces everything outside `[a-z0-9]` (any case) with `-`, one per UTF-16
/// code unit, and lowercases the rest.
pub fn sanitize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else {
            out.extend(std::iter::repeat('-').take(c.len_utf16()));
        }
    }
    out
}

/// `<sanitized-title>-resources.json`; a missing or empty title counts as
/// `page-resources`.
pub fn manifest_filename(title: Option<&str>) -> String {
    let title = title.filter(|t| !t.is_empty()).unwrap_or(UNTITLED);
    format!("{}-resources.json", sanitize_title(title))
}
