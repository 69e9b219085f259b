//! CLI for pagegrab.

mod commands;
mod prompt;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pagegrab_core::config::{self, PagegrabConfig};
use pagegrab_core::downloads::{AcceptSuggested, DestinationPrompt, TransferQueue, TransferReport};
use pagegrab_core::fetch::FetchOptions;
use pagegrab_core::scanner::{PageSource, RemotePage, SnapshotPage};
use pagegrab_core::{Filters, Session};
use std::path::PathBuf;

use commands::{run_download, run_export, run_open, run_scan};
use prompt::StdinPrompt;

/// Top-level CLI for pagegrab.
#[derive(Debug, Parser)]
#[command(name = "pagegrab")]
#[command(about = "pagegrab: list, download and export the images and files linked from a web page", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// The page to inspect and the initial filters.
#[derive(Debug, Clone, Args)]
pub struct PageArgs {
    /// Page URL. Relative links are resolved against it.
    pub url: String,

    /// Read the page from a saved HTML file instead of fetching URL.
    #[arg(long, value_name = "FILE")]
    pub html: Option<PathBuf>,

    /// Hide image resources.
    #[arg(long)]
    pub no_images: bool,

    /// Hide file-link resources.
    #[arg(long)]
    pub no_files: bool,
}

/// Where downloads go and whether to confirm each destination.
#[derive(Debug, Clone, Args)]
pub struct SaveArgs {
    /// Download directory (default: config `download_dir`, else the current directory).
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Save to the suggested path without asking.
    #[arg(short = 'y', long)]
    pub yes: bool,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Scan a page and list its resources.
    Scan {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Download resources from a page: the given rows, or every visible resource.
    Download {
        #[command(flatten)]
        page: PageArgs,

        /// Row number from `pagegrab scan` (repeatable).
        #[arg(long = "row", value_name = "N")]
        rows: Vec<usize>,

        #[command(flatten)]
        save: SaveArgs,
    },

    /// Export the visible resources as a JSON manifest.
    Export {
        #[command(flatten)]
        page: PageArgs,

        #[command(flatten)]
        save: SaveArgs,
    },

    /// Open an interactive session on a page.
    Open {
        #[command(flatten)]
        page: PageArgs,

        #[command(flatten)]
        save: SaveArgs,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Scan { page } => run_scan(&cfg, &page),
            CliCommand::Download { page, rows, save } => run_download(&cfg, &page, &rows, &save),
            CliCommand::Export { page, save } => run_export(&cfg, &page, &save),
            CliCommand::Open { page, save } => run_open(&cfg, &page, &save),
        }
    }
}

/// Filters from config, narrowed by `--no-images` / `--no-files`.
pub(crate) fn initial_filters(cfg: &PagegrabConfig, page: &PageArgs) -> Filters {
    let mut filters = Filters::from(cfg.filters);
    if page.no_images {
        filters.show_images = false;
    }
    if page.no_files {
        filters.show_files = false;
    }
    filters
}

pub(crate) fn page_source(cfg: &PagegrabConfig, page: &PageArgs) -> Result<Box<dyn PageSource>> {
    let source: Box<dyn PageSource> = match &page.html {
        Some(path) => Box::new(SnapshotPage::from_file(page.url.clone(), path)?),
        None => Box::new(RemotePage::new(page.url.clone(), FetchOptions::from(cfg))),
    };
    Ok(source)
}

/// Opens a session on the page and runs its one scan.
pub(crate) fn load_session(cfg: &PagegrabConfig, page: &PageArgs, save_as: bool) -> Result<Session> {
    let source = page_source(cfg, page)?;
    let mut session = Session::new(initial_filters(cfg, page), save_as);
    session.load(source.as_ref());
    Ok(session)
}

pub(crate) fn save_as(cfg: &PagegrabConfig, save: &SaveArgs) -> bool {
    cfg.save_as && !save.yes
}

pub(crate) fn transfer_queue(cfg: &PagegrabConfig, save: &SaveArgs) -> Result<TransferQueue> {
    let dir = match save.dir.clone().or_else(|| cfg.download_dir.clone()) {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let prompt: Box<dyn DestinationPrompt> = if save_as(cfg, save) {
        Box::new(StdinPrompt)
    } else {
        Box::new(AcceptSuggested)
    };
    Ok(TransferQueue::new(dir, FetchOptions::from(cfg), prompt))
}

pub(crate) fn print_report(report: &TransferReport) {
    for path in &report.completed {
        println!("Saved {}", path.display());
    }
    for (source, err) in &report.failed {
        println!("Failed {source}: {err:#}");
    }
    if report.declined > 0 {
        println!("Skipped {} download(s)", report.declined);
    }
}

#[cfg(test)]
mod tests;
