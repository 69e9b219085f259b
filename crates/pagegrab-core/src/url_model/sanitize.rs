//! Filesystem-safe names for downloaded resources.

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Sanitizes a suggested filename before it is created on disk.
///
/// Path separators, NUL, control characters and blanks become `_` (runs are
/// collapsed), leading/trailing dots, spaces and underscores are trimmed, and
/// the result is cut to at most 255 bytes on a char boundary.
pub fn sanitize_filename_for_linux(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let unsafe_char = matches!(c, '\0' | '/' | '\\' | ' ' | '\t') || c.is_control();
        if unsafe_char || c == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(c);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == ' ' || c == '.' || c == '_');
    let mut take = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}
