//! Integration test: serve a page and its resources locally, then drive a
//! session through scan, filter, download and export.

mod common;

use pagegrab_core::downloads::{AcceptSuggested, TransferQueue};
use pagegrab_core::fetch::FetchOptions;
use pagegrab_core::manifest::Manifest;
use pagegrab_core::scanner::RemotePage;
use pagegrab_core::{Event, Filters, Notice, Outcome, ResourceKind, Session};
use tempfile::tempdir;

const PAGE: &str = r#"<!doctype html>
<html>
<head><title>Release Notes</title></head>
<body>
  <img src="/img/logo.png?v=3">
  <img src="data:image/png;base64,AAA">
  <a href="/files/notes.pdf">notes</a>
  <a href="/files/">browse</a>
  <a href="javascript:void(0)">menu</a>
  <a href="/files/tool.tar.gz">tool</a>
  <a href="/files/broken.zip">broken</a>
</body>
</html>"#;

fn serve() -> String {
    common::page_server::start(vec![
        ("/index.html", PAGE.as_bytes().to_vec()),
        ("/img/logo.png?v=3", b"PNGDATA".to_vec()),
        ("/files/notes.pdf", b"%PDF-1.4".to_vec()),
        ("/files/tool.tar.gz", vec![0x1f, 0x8b, 0x08]),
    ])
}

#[test]
fn remote_page_scan_download_and_export() {
    let base = serve();
    let page = RemotePage::new(format!("{base}/index.html"), FetchOptions::default());
    let mut session = Session::new(Filters::default(), false);

    let view = session.load(&page);
    assert_eq!(view.count_label(), "4 resources found");
    let kinds: Vec<_> = session.all_resources().iter().map(|r| r.kind()).collect();
    assert_eq!(
        kinds,
        [ResourceKind::Image, ResourceKind::File, ResourceKind::File, ResourceKind::File]
    );
    assert_eq!(session.title(), Some("Release Notes"));

    let dir = tempdir().unwrap();
    let queue = TransferQueue::new(dir.path(), FetchOptions::default(), Box::new(AcceptSuggested));

    assert!(matches!(
        session.handle(Event::DownloadAll, &queue),
        Outcome::Dispatched(4)
    ));
    let report = queue.wait();
    assert_eq!(report.completed.len(), 3);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].0.ends_with("/files/broken.zip"));
    assert_eq!(std::fs::read(dir.path().join("logo.png")).unwrap(), b"PNGDATA");
    assert_eq!(std::fs::read(dir.path().join("notes.pdf")).unwrap(), b"%PDF-1.4");
    assert!(!dir.path().join("broken.zip").exists());

    session.handle(Event::ShowImages(false), &queue);
    let exported = match session.handle(Event::Export, &queue) {
        Outcome::Exported(e) => e,
        other => panic!("expected export, got {other:?}"),
    };
    assert_eq!(exported.filename, "release-notes-resources.json");
    let report = queue.wait();
    let path = dir.path().join("release-notes-resources.json");
    assert_eq!(report.completed, vec![path.clone()]);

    let written: Manifest = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(written.url, format!("{base}/index.html"));
    assert_eq!(written.total_resources, 3);
    assert_eq!(written.resources.len(), 3);
    assert!(written.resources.iter().all(|r| r.kind == ResourceKind::File));
}

#[test]
fn unreachable_page_is_an_empty_session() {
    let page = RemotePage::new("http://127.0.0.1:1/index.html", FetchOptions::default());
    let mut session = Session::new(Filters::default(), false);
    let view = session.load(&page);
    assert_eq!(view.count_label(), "0 resources found");

    let dir = tempdir().unwrap();
    let queue = TransferQueue::new(dir.path(), FetchOptions::default(), Box::new(AcceptSuggested));
    assert!(matches!(
        session.bulk_download(&queue),
        Err(Notice::NothingToDownload)
    ));
    assert_eq!(queue.pending(), 0);
}
