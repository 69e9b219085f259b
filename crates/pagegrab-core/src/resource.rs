//! Discovered resources: the one entity a scan produces.

use crate::url_model::{extension_from_filename, filename_from_url};
use serde::{Deserialize, Serialize};

/// Filename given to an image whose URL has no usable last segment.
pub const DEFAULT_IMAGE_FILENAME: &str = "image.jpg";

/// What kind of element a resource was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// An `<img>` source.
    Image,
    /// An `<a>` target with a recognizable extension.
    File,
}

/// A downloadable item found on a page.
///
/// Fields are private so a `Resource` can only come out of the constructors,
/// which enforce the inclusion rules for each kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    kind: ResourceKind,
    source_url: String,
    filename: String,
    extension: String,
}

impl Resource {
    /// Builds an image resource from a resolved `src`.
    ///
    /// Returns `None` for empty sources and inline `data:` URIs. The extension
    /// may be empty; the filename falls back to `image.jpg`.
    pub fn image(src: &str) -> Option<Self> {
        let src = src.trim();
        if src.is_empty() || src.starts_with("data:") {
            return None;
        }
        let derived = filename_from_url(src);
        let extension = extension_from_filename(derived);
        let filename = if derived.is_empty() {
            DEFAULT_IMAGE_FILENAME
        } else {
            derived
        };
        Some(Self {
            kind: ResourceKind::Image,
            source_url: src.to_string(),
            filename: filename.to_string(),
            extension,
        })
    }

    /// Builds a file resource from a resolved `href`.
    ///
    /// Returns `None` for empty targets, `javascript:` pseudo-URLs,
    /// directory-like targets ending in `/`, and targets without an extension.
    pub fn file(href: &str) -> Option<Self> {
        let href = href.trim();
        if href.is_empty() || href.starts_with("javascript:") || href.ends_with('/') {
            return None;
        }
        let filename = filename_from_url(href);
        let extension = extension_from_filename(filename);
        if extension.is_empty() {
            return None;
        }
        Some(Self {
            kind: ResourceKind::File,
            source_url: href.to_string(),
            filename: filename.to_string(),
            extension,
        })
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Lowercase, dot-prefixed; empty only for images.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn is_image(&self) -> bool {
        self.kind == ResourceKind::Image
    }
}
