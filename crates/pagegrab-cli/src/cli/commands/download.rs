//! `pagegrab download <url>` – download some rows, or the whole view.

use anyhow::Result;
use pagegrab_core::config::PagegrabConfig;

use crate::cli::{load_session, print_report, save_as, transfer_queue, PageArgs, SaveArgs};

pub fn run_download(
    cfg: &PagegrabConfig,
    page: &PageArgs,
    rows: &[usize],
    save: &SaveArgs,
) -> Result<()> {
    let session = load_session(cfg, page, save_as(cfg, save))?;
    let queue = transfer_queue(cfg, save)?;

    if rows.is_empty() {
        if let Err(notice) = session.bulk_download(&queue) {
            println!("{notice}");
            return Ok(());
        }
    } else {
        for &row in rows {
            if let Err(notice) = session.download_row(row, &queue) {
                println!("{notice}");
            }
        }
    }

    if queue.pending() > 0 {
        println!("Downloading {} resource(s) to {}", queue.pending(), queue.dir().display());
    }
    print_report(&queue.wait());
    Ok(())
}
