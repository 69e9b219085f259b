//! Where a session gets its page from.

use anyhow::{Context, Result};
use std::cell::OnceCell;
use std::path::Path;

use crate::fetch::{fetch_page, FetchOptions};
use crate::resource::Resource;

/// The page a session inspects: run the scanner against it and report its
/// metadata.
///
/// `scan` may fail (page unreachable, file unreadable); callers treat a
/// failure the same as a page with no resources.
pub trait PageSource {
    /// URL of the page; the effective URL once a remote page has been loaded.
    fn page_url(&self) -> String;

    /// Page title, if the page has been loaded and has a non-empty one.
    fn title(&self) -> Option<String>;

    /// Scans the page for resources.
    fn scan(&self) -> Result<Vec<Resource>>;
}

/// A page whose HTML is already in hand, e.g. a saved snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotPage {
    url: String,
    html: String,
}

impl SnapshotPage {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    /// Reads the HTML from `path`; `url` is the address it was saved from.
    pub fn from_file(url: impl Into<String>, path: &Path) -> Result<Self> {
        let html = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Self::new(url, html))
    }
}

impl PageSource for SnapshotPage {
    fn page_url(&self) -> String {
        self.url.clone()
    }

    fn title(&self) -> Option<String> {
        super::page_title(&self.html)
    }

    fn scan(&self) -> Result<Vec<Resource>> {
        Ok(super::scan_document(&self.html, &self.url))
    }
}

/// A page fetched over HTTP the first time it is scanned.
pub struct RemotePage {
    url: String,
    options: FetchOptions,
    loaded: OnceCell<SnapshotPage>,
}

impl RemotePage {
    pub fn new(url: impl Into<String>, options: FetchOptions) -> Self {
        Self {
            url: url.into(),
            options,
            loaded: OnceCell::new(),
        }
    }

    fn load(&self) -> Result<&SnapshotPage> {
        if let Some(page) = self.loaded.get() {
            return Ok(page);
        }
        let doc = fetch_page(&self.url, &self.options)
            .with_context(|| format!("failed to load {}", self.url))?;
        Ok(self.loaded.get_or_init(|| SnapshotPage::new(doc.url, doc.body)))
    }
}

impl PageSource for RemotePage {
    fn page_url(&self) -> String {
        match self.loaded.get() {
            Some(page) => page.page_url(),
            None => self.url.clone(),
        }
    }

    fn title(&self) -> Option<String> {
        self.loaded.get().and_then(|page| page.title())
    }

    fn scan(&self) -> Result<Vec<Resource>> {
        self.load()?.scan()
    }
}
