//! Tests for filters, save-as resolution and interactive line parsing.

use super::parse;
use crate::cli::commands::{parse_line, Line};
use crate::cli::prompt::resolve_answer;
use crate::cli::{initial_filters, load_session, save_as, CliCommand, PageArgs, SaveArgs};
use pagegrab_core::config::PagegrabConfig;
use pagegrab_core::Event;
use std::io::Write;
use std::path::{Path, PathBuf};

fn page_args(args: &[&str]) -> PageArgs {
    match parse(args) {
        CliCommand::Scan { page } => page,
        _ => panic!("expected Scan"),
    }
}

#[test]
fn flags_narrow_config_filters() {
    let cfg = PagegrabConfig::default();
    let f = initial_filters(&cfg, &page_args(&["pagegrab", "scan", "https://x/"]));
    assert!(f.show_images && f.show_files);
    let f = initial_filters(&cfg, &page_args(&["pagegrab", "scan", "https://x/", "--no-files"]));
    assert!(f.show_images && !f.show_files);
}

#[test]
fn yes_disables_save_as() {
    let cfg = PagegrabConfig::default();
    let ask = SaveArgs { dir: None, yes: false };
    let quiet = SaveArgs { dir: None, yes: true };
    assert!(save_as(&cfg, &ask));
    assert!(!save_as(&cfg, &quiet));

    let mut never = PagegrabConfig::default();
    never.save_as = false;
    assert!(!save_as(&never, &ask));
}

#[test]
fn session_from_snapshot_file() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(b"<img src='a.png'><a href='b.pdf'>b</a><a href='c/'>c</a>")
        .unwrap();
    f.flush().unwrap();
    let path = f.path().to_string_lossy().into_owned();
    let page = page_args(&["pagegrab", "scan", "https://ex.com/", "--html", &path, "--no-images"]);
    let session = load_session(&PagegrabConfig::default(), &page, false).unwrap();
    let view = session.render();
    assert_eq!(view.count_label(), "1 resources found");
    assert_eq!(session.all_resources().len(), 2);
}

#[test]
fn answer_empty_accepts_suggestion() {
    let suggested = Path::new("/downloads/a.pdf");
    assert_eq!(resolve_answer("\n", suggested), Some(suggested.to_path_buf()));
}

#[test]
fn answer_skip_declines() {
    assert_eq!(resolve_answer("skip\n", Path::new("/d/a.pdf")), None);
}

#[test]
fn answer_directory_keeps_filename() {
    let dir = tempfile::tempdir().unwrap();
    let answer = format!("{}\n", dir.path().display());
    assert_eq!(
        resolve_answer(&answer, Path::new("/d/a.pdf")),
        Some(dir.path().join("a.pdf"))
    );
    assert_eq!(
        resolve_answer("/elsewhere/b.pdf", Path::new("/d/a.pdf")),
        Some(PathBuf::from("/elsewhere/b.pdf"))
    );
}

#[test]
fn parse_interactive_lines() {
    assert_eq!(parse_line("images off"), Ok(Line::Event(Event::ShowImages(false))));
    assert_eq!(parse_line("FILES On\n"), Ok(Line::Event(Event::ShowFiles(true))));
    assert_eq!(parse_line("get 3"), Ok(Line::Event(Event::DownloadRow(3))));
    assert_eq!(parse_line("all"), Ok(Line::Event(Event::DownloadAll)));
    assert_eq!(parse_line("export"), Ok(Line::Event(Event::Export)));
    assert_eq!(parse_line("list"), Ok(Line::List));
    assert_eq!(parse_line("quit"), Ok(Line::Quit));
    assert_eq!(parse_line("   "), Ok(Line::Blank));
}

#[test]
fn parse_interactive_errors() {
    assert!(parse_line("images maybe").is_err());
    assert!(parse_line("get").is_err());
    assert!(parse_line("get x").is_err());
    assert!(parse_line("fly").is_err());
}
