//! URL-path derivation and filename handling.
//!
//! Splits a resource URL into the filename and extension shown to the user,
//! builds the manifest filename from a page title, and turns a suggested
//! filename into something safe to create on a Linux filesystem.

mod path;
mod sanitize;
mod title;

pub use path::{extension_from_filename, filename_from_url};
pub use sanitize::sanitize_filename_for_linux;
pub use title::{manifest_filename, sanitize_title};

/// Local name used when a suggested filename sanitizes to nothing usable.
const DEFAULT_FILENAME: &str = "download.bin";

/// Turns a suggested filename into a name that can be created on disk.
///
/// The suggestion is sanitized for Linux (no `/`, NUL, or control chars; no
/// leading/trailing dots or spaces). Reserved names like "." or ".." and empty
/// results fall back to `download.bin`.
///
/// # Examples
///
/// - `local_filename("report.pdf")` → `"report.pdf"`
/// - `local_filename("../etc/passwd")` → `"etc_passwd"`
pub fn local_filename(suggested: &str) -> String {
    let sanitized = sanitize_filename_for_linux(suggested);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}
