//! `pagegrab scan <url>` – list a page's resources.

use anyhow::Result;
use pagegrab_core::config::PagegrabConfig;

use crate::cli::{load_session, PageArgs};

pub fn run_scan(cfg: &PagegrabConfig, page: &PageArgs) -> Result<()> {
    let session = load_session(cfg, page, false)?;
    print!("{}", session.render());
    Ok(())
}
