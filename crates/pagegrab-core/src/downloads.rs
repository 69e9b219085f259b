//! Download dispatch.
//!
//! `Downloads::dispatch` is fire-and-forget: each request runs on its own
//! thread, independent of every other request and of the session that issued
//! it. Nothing is retried and no limit is placed on concurrent transfers. The
//! owner of a `TransferQueue` calls `wait` before exiting so in-flight
//! transfers are not cut short.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread::JoinHandle;

use crate::fetch::{fetch_to_writer, FetchOptions};
use crate::storage::{temp_path, unique_destination, PartFile};
use crate::url_model::local_filename;

/// What to transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadSource {
    /// A remote resource.
    Url(String),
    /// Content produced locally, such as an exported manifest.
    Inline(Vec<u8>),
}

/// One download: a source, a suggested filename, and whether the user should
/// confirm the destination first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub source: DownloadSource,
    pub filename: String,
    pub save_as: bool,
}

impl DownloadRequest {
    pub fn url(url: impl Into<String>, filename: impl Into<String>, save_as: bool) -> Self {
        Self {
            source: DownloadSource::Url(url.into()),
            filename: filename.into(),
            save_as,
        }
    }

    pub fn inline(contents: Vec<u8>, filename: impl Into<String>, save_as: bool) -> Self {
        Self {
            source: DownloadSource::Inline(contents),
            filename: filename.into(),
            save_as,
        }
    }

    fn label(&self) -> String {
        match &self.source {
            DownloadSource::Url(url) => url.clone(),
            DownloadSource::Inline(_) => self.filename.clone(),
        }
    }
}

/// The download interface a session dispatches to. No result is returned.
pub trait Downloads {
    fn dispatch(&self, request: DownloadRequest);
}

/// Asks the user where to save a download.
pub trait DestinationPrompt: Send + Sync {
    /// Returns the chosen path, or `None` to cancel this download.
    fn confirm(&self, suggested: &Path) -> Option<PathBuf>;
}

/// Accepts every suggested destination without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptSuggested;

impl DestinationPrompt for AcceptSuggested {
    fn confirm(&self, suggested: &Path) -> Option<PathBuf> {
        Some(suggested.to_path_buf())
    }
}

/// Outcome of every transfer dispatched so far.
#[derive(Debug, Default)]
pub struct TransferReport {
    pub completed: Vec<PathBuf>,
    /// Source label (URL or filename) and the error.
    pub failed: Vec<(String, anyhow::Error)>,
    /// Requests the user declined at the destination prompt.
    pub declined: usize,
}

struct InFlight {
    label: String,
    handle: JoinHandle<Result<PathBuf>>,
}

/// Runs each dispatched request on a dedicated thread with libcurl.
pub struct TransferQueue {
    dir: PathBuf,
    options: FetchOptions,
    prompt: Box<dyn DestinationPrompt>,
    claimed: Mutex<HashSet<PathBuf>>,
    in_flight: Mutex<Vec<InFlight>>,
    declined: Mutex<usize>,
}

impl TransferQueue {
    pub fn new(dir: impl Into<PathBuf>, options: FetchOptions, prompt: Box<dyn DestinationPrompt>) -> Self {
        Self {
            dir: dir.into(),
            options,
            prompt,
            claimed: Mutex::new(HashSet::new()),
            in_flight: Mutex::new(Vec::new()),
            declined: Mutex::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of transfers dispatched and not yet collected by `wait`.
    pub fn pending(&self) -> usize {
        lock(&self.in_flight).len()
    }

    /// Blocks until every dispatched transfer has finished and reports how
    /// each one ended. Failures are logged here and never affect other
    /// transfers.
    pub fn wait(&self) -> TransferReport {
        let in_flight: Vec<InFlight> = std::mem::take(&mut *lock(&self.in_flight));
        let mut report = TransferReport {
            declined: std::mem::take(&mut *lock(&self.declined)),
            ..Default::default()
        };
        for InFlight { label, handle } in in_flight {
            let outcome = handle
                .join()
                .unwrap_or_else(|_| Err(anyhow::anyhow!("transfer thread panicked")));
            match outcome {
                Ok(path) => report.completed.push(path),
                Err(e) => {
                    tracing::warn!(source = %label, "download failed: {:#}", e);
                    report.failed.push((label, e));
                }
            }
        }
        report
    }

    /// Suggested destination: the sanitized filename in the download
    /// directory, numbered if the name is already used.
    fn suggest(&self, filename: &str) -> PathBuf {
        let claimed = lock(&self.claimed);
        unique_destination(&self.dir, &local_filename(filename), |p| claimed.contains(p))
    }

    /// Reserves `dest` for one transfer. A path already claimed by another
    /// transfer, or with a `.part` file on disk, is numbered in its directory.
    fn claim(&self, dest: PathBuf) -> PathBuf {
        let mut claimed = lock(&self.claimed);
        let busy = claimed.contains(&dest) || temp_path(&dest).exists();
        let renumbered = match dest.file_name().and_then(|n| n.to_str()) {
            Some(name) if busy => {
                let dir = dest.parent().unwrap_or_else(|| Path::new(""));
                Some(unique_destination(dir, name, |p| claimed.contains(p)))
            }
            _ => None,
        };
        let dest = renumbered.unwrap_or(dest);
        claimed.insert(dest.clone());
        dest
    }
}

impl Downloads for TransferQueue {
    fn dispatch(&self, request: DownloadRequest) {
        let label = request.label();
        let suggested = self.suggest(&request.filename);
        let dest = if request.save_as {
            match self.prompt.confirm(&suggested) {
                Some(dest) => dest,
                None => {
                    tracing::info!(source = %label, "download declined at destination prompt");
                    *lock(&self.declined) += 1;
                    return;
                }
            }
        } else {
            suggested
        };
        let dest = self.claim(dest);

        tracing::info!(source = %label, dest = %dest.display(), "download dispatched");
        let options = self.options.clone();
        let source = request.source;
        let handle = std::thread::spawn(move || run_transfer(source, &dest, &options));
        lock(&self.in_flight).push(InFlight { label, handle });
    }
}

fn run_transfer(source: DownloadSource, dest: &Path, options: &FetchOptions) -> Result<PathBuf> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let mut part = PartFile::create(dest)?;
    let written = match &source {
        DownloadSource::Url(url) => fetch_to_writer(url, options, part.writer()),
        DownloadSource::Inline(contents) => part
            .writer()
            .write_all(contents)
            .map(|()| contents.len() as u64)
            .context("failed to write contents"),
    };
    match written {
        Ok(bytes) => {
            let path = part.finalize()?;
            tracing::info!(dest = %path.display(), bytes, "download complete");
            Ok(path)
        }
        Err(e) => {
            part.discard();
            Err(e)
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Decline;

    impl DestinationPrompt for Decline {
        fn confirm(&self, _suggested: &Path) -> Option<PathBuf> {
            None
        }
    }

    struct Redirect(PathBuf);

    impl DestinationPrompt for Redirect {
        fn confirm(&self, suggested: &Path) -> Option<PathBuf> {
            Some(self.0.join(suggested.file_name().unwrap()))
        }
    }

    struct Fixed(PathBuf);

    impl DestinationPrompt for Fixed {
        fn confirm(&self, _suggested: &Path) -> Option<PathBuf> {
            Some(self.0.clone())
        }
    }

    fn queue(dir: &Path, prompt: Box<dyn DestinationPrompt>) -> TransferQueue {
        TransferQueue::new(dir, FetchOptions::default(), prompt)
    }

    #[test]
    fn inline_content_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let q = queue(dir.path(), Box::new(AcceptSuggested));
        q.dispatch(DownloadRequest::inline(b"{}".to_vec(), "m.json", false));
        let report = q.wait();
        assert_eq!(report.completed, vec![dir.path().join("m.json")]);
        assert_eq!(std::fs::read(dir.path().join("m.json")).unwrap(), b"{}");
    }

    #[test]
    fn same_name_twice_gets_numbered() {
        let dir = tempfile::tempdir().unwrap();
        let q = queue(dir.path(), Box::new(AcceptSuggested));
        q.dispatch(DownloadRequest::inline(b"1".to_vec(), "a.txt", false));
        q.dispatch(DownloadRequest::inline(b"2".to_vec(), "a.txt", false));
        let mut done = q.wait().completed;
        done.sort();
        assert_eq!(done, vec![dir.path().join("a (1).txt"), dir.path().join("a.txt")]);
    }

    #[test]
    fn declined_prompt_skips_only_that_request() {
        let dir = tempfile::tempdir().unwrap();
        let q = queue(dir.path(), Box::new(Decline));
        q.dispatch(DownloadRequest::inline(b"x".to_vec(), "asked.txt", true));
        q.dispatch(DownloadRequest::inline(b"y".to_vec(), "direct.txt", false));
        let report = q.wait();
        assert_eq!(report.declined, 1);
        assert_eq!(report.completed, vec![dir.path().join("direct.txt")]);
        assert!(!dir.path().join("asked.txt").exists());
    }

    #[test]
    fn prompt_can_choose_another_directory() {
        let dir = tempfile::tempdir().unwrap();
        let other = dir.path().join("nested");
        let q = queue(dir.path(), Box::new(Redirect(other.clone())));
        q.dispatch(DownloadRequest::inline(b"z".to_vec(), "z.bin", true));
        assert_eq!(q.wait().completed, vec![other.join("z.bin")]);
    }

    #[test]
    fn same_confirmed_path_twice_does_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let chosen = dir.path().join("chosen.txt");
        let q = queue(dir.path(), Box::new(Fixed(chosen.clone())));
        q.dispatch(DownloadRequest::inline(b"first".to_vec(), "a.txt", true));
        q.dispatch(DownloadRequest::inline(b"second".to_vec(), "b.txt", true));
        let report = q.wait();
        assert!(report.failed.is_empty());
        let numbered = dir.path().join("chosen (1).txt");
        let mut done = report.completed;
        done.sort();
        assert_eq!(done, vec![numbered.clone(), chosen.clone()]);
        assert_eq!(std::fs::read(&chosen).unwrap(), b"first");
        assert_eq!(std::fs::read(&numbered).unwrap(), b"second");
    }

    #[test]
    fn failed_transfer_is_reported_and_cleaned_up() {
        let dir = tempfile::tempdir().unwrap();
        let q = queue(dir.path(), Box::new(AcceptSuggested));
        q.dispatch(DownloadRequest::url("http://127.0.0.1:1/missing.zip", "missing.zip", false));
        q.dispatch(DownloadRequest::inline(b"ok".to_vec(), "fine.txt", false));
        let report = q.wait();
        assert_eq!(report.completed, vec![dir.path().join("fine.txt")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "http://127.0.0.1:1/missing.zip");
        assert!(!dir.path().join("missing.zip.part").exists());
        assert_eq!(q.pending(), 0);
    }

    #[test]
    fn unsafe_filename_is_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let q = queue(dir.path(), Box::new(AcceptSuggested));
        q.dispatch(DownloadRequest::inline(b"x".to_vec(), "../../evil.sh", false));
        assert_eq!(q.wait().completed, vec![dir.path().join("evil.sh")]);
    }
}
