//! `pagegrab export <url>` – save the visible resources as a JSON manifest.

use anyhow::Result;
use pagegrab_core::config::PagegrabConfig;
use pagegrab_core::{Event, Outcome};

use crate::cli::{load_session, print_report, save_as, transfer_queue, PageArgs, SaveArgs};

pub fn run_export(cfg: &PagegrabConfig, page: &PageArgs, save: &SaveArgs) -> Result<()> {
    let mut session = load_session(cfg, page, save_as(cfg, save))?;
    let queue = transfer_queue(cfg, save)?;

    match session.handle(Event::Export, &queue) {
        Outcome::Exported(exported) => {
            println!(
                "Exporting {} resource(s) as {}",
                exported.manifest.total_resources, exported.filename
            );
        }
        Outcome::Notice(notice) => println!("{notice}"),
        other => tracing::debug!("unexpected export outcome: {:?}", other),
    }
    print_report(&queue.wait());
    Ok(())
}
