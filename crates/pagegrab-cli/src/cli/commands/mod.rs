//! CLI command handlers. Each command is in its own file.

mod download;
mod export;
mod open;
mod scan;

pub use download::run_download;
pub use export::run_export;
pub use open::run_open;
pub use scan::run_scan;

#[cfg(test)]
pub(crate) use open::{parse_line, Line};
