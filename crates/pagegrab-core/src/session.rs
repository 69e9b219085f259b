//! The popup controller.
//!
//! A `Session` is created when the popup opens and dropped when it closes. It
//! loads the page's resources once, keeps them unchanged, and derives every
//! view from that list and the two filter flags. Downloads go out through a
//! `Downloads` implementation and are not tracked afterwards.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::FilterConfig;
use crate::downloads::{DownloadRequest, Downloads};
use crate::manifest::Manifest;
use crate::resource::{Resource, ResourceKind};
use crate::scanner::PageSource;
use crate::url_model::manifest_filename;
use crate::view::View;

/// Which kinds of resource are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filters {
    pub show_images: bool,
    pub show_files: bool,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            show_images: true,
            show_files: true,
        }
    }
}

impl From<FilterConfig> for Filters {
    fn from(cfg: FilterConfig) -> Self {
        Self {
            show_images: cfg.show_images,
            show_files: cfg.show_files,
        }
    }
}

impl Filters {
    pub fn admits(&self, resource: &Resource) -> bool {
        match resource.kind() {
            ResourceKind::Image => self.show_images,
            ResourceKind::File => self.show_files,
        }
    }
}

/// User-visible notice for an action that could not run. No side effect has
/// happened when one of these is returned.
#[derive(Debug, Error)]
pub enum Notice {
    #[error("No resources to download")]
    NothingToDownload,
    #[error("No resources to export")]
    NothingToExport,
    #[error("No row {0} in the current view")]
    NoSuchRow(usize),
    #[error("Could not build the manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// A user or lifecycle event, one per named handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    ShowImages(bool),
    ShowFiles(bool),
    /// Download one row of the current view (1-based row number).
    DownloadRow(usize),
    DownloadAll,
    Export,
}

/// What handling an event produced.
#[derive(Debug)]
pub enum Outcome {
    Rendered(View),
    /// Number of download requests dispatched.
    Dispatched(usize),
    Exported(ExportedManifest),
    Notice(Notice),
}

/// A manifest handed to the download interface.
#[derive(Debug, Clone)]
pub struct ExportedManifest {
    pub filename: String,
    pub manifest: Manifest,
}

enum Resources {
    Loading,
    Loaded(Vec<Resource>),
}

/// State of one popup.
pub struct Session {
    page_url: String,
    title: Option<String>,
    resources: Resources,
    filters: Filters,
    save_as: bool,
}

impl Session {
    /// A session waiting for its scan. `save_as` asks the download interface
    /// to confirm each destination.
    pub fn new(filters: Filters, save_as: bool) -> Self {
        Self {
            page_url: String::new(),
            title: None,
            resources: Resources::Loading,
            filters,
            save_as,
        }
    }

    /// Runs the page scanner once and renders. A failed scan is shown exactly
    /// like a page without resources. Later calls are ignored.
    pub fn load(&mut self, source: &dyn PageSource) -> View {
        if let Resources::Loaded(_) = self.resources {
            tracing::debug!("session already loaded; ignoring reload");
            return self.render();
        }
        let found = match source.scan() {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("page scan failed: {:#}", e);
                Vec::new()
            }
        };
        self.page_url = source.page_url();
        self.title = source.title();
        tracing::info!(url = %self.page_url, resources = found.len(), "session loaded");
        self.resources = Resources::Loaded(found);
        self.render()
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.resources, Resources::Loaded(_))
    }

    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn filters(&self) -> Filters {
        self.filters
    }

    /// Every resource the scan found, regardless of filters.
    pub fn all_resources(&self) -> &[Resource] {
        match &self.resources {
            Resources::Loaded(found) => found,
            Resources::Loading => &[],
        }
    }

    /// Resources admitted by the current filters, in scan order.
    pub fn filtered(&self) -> Vec<&Resource> {
        self.all_resources()
            .iter()
            .filter(|r| self.filters.admits(r))
            .collect()
    }

    pub fn render(&self) -> View {
        match self.resources {
            Resources::Loading => View::Loading,
            Resources::Loaded(_) => View::from_resources(self.filtered()),
        }
    }

    pub fn set_show_images(&mut self, on: bool) -> View {
        self.filters.show_images = on;
        self.render()
    }

    pub fn set_show_files(&mut self, on: bool) -> View {
        self.filters.show_files = on;
        self.render()
    }

    pub fn download_one(&self, resource: &Resource, downloads: &dyn Downloads) {
        downloads.dispatch(DownloadRequest::url(
            resource.source_url(),
            resource.filename(),
            self.save_as,
        ));
    }

    /// Downloads row `number` (1-based) of the current view.
    pub fn download_row(&self, number: usize, downloads: &dyn Downloads) -> Result<(), Notice> {
        let filtered = self.filtered();
        let resource = number
            .checked_sub(1)
            .and_then(|i| filtered.get(i))
            .ok_or(Notice::NoSuchRow(number))?;
        self.download_one(resource, downloads);
        Ok(())
    }

    /// Dispatches every resource of the current view, in view order, without
    /// waiting between requests. Returns how many were dispatched.
    pub fn bulk_download(&self, downloads: &dyn Downloads) -> Result<usize, Notice> {
        let filtered = self.filtered();
        if filtered.is_empty() {
            return Err(Notice::NothingToDownload);
        }
        for resource in &filtered {
            self.download_one(resource, downloads);
        }
        tracing::info!(count = filtered.len(), "bulk download dispatched");
        Ok(filtered.len())
    }

    /// Builds the manifest of the current view and hands it to the download
    /// interface as `<sanitized-title>-resources.json`.
    pub fn export_manifest(
        &self,
        downloads: &dyn Downloads,
        captured_at: DateTime<Utc>,
    ) -> Result<ExportedManifest, Notice> {
        let filtered = self.filtered();
        if filtered.is_empty() {
            return Err(Notice::NothingToExport);
        }
        let manifest = Manifest::capture(&self.page_url, filtered, captured_at);
        let json = manifest.to_json()?;
        let filename = manifest_filename(self.title());
        downloads.dispatch(DownloadRequest::inline(
            json.into_bytes(),
            filename.clone(),
            self.save_as,
        ));
        tracing::info!(file = %filename, count = manifest.total_resources, "manifest exported");
        Ok(ExportedManifest { filename, manifest })
    }

    /// Dispatches `event` to its handler.
    pub fn handle(&mut self, event: Event, downloads: &dyn Downloads) -> Outcome {
        let result = match event {
            Event::ShowImages(on) => Ok(Outcome::Rendered(self.set_show_images(on))),
            Event::ShowFiles(on) => Ok(Outcome::Rendered(self.set_show_files(on))),
            Event::DownloadRow(n) => self.download_row(n, downloads).map(|()| Outcome::Dispatched(1)),
            Event::DownloadAll => self.bulk_download(downloads).map(Outcome::Dispatched),
            Event::Export => self
                .export_manifest(downloads, Utc::now())
                .map(Outcome::Exported),
        };
        result.unwrap_or_else(Outcome::Notice)
    }
}
