//! JSON manifest describing the resources of a filtered view.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::resource::{Resource, ResourceKind};

/// The exported document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// URL of the page the resources were found on.
    pub url: String,
    /// Capture time, ISO-8601 UTC with milliseconds.
    pub timestamp: String,
    pub total_resources: usize,
    pub resources: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub url: String,
    pub filename: String,
    pub extension: String,
}

impl From<&Resource> for ManifestEntry {
    fn from(r: &Resource) -> Self {
        Self {
            kind: r.kind(),
            url: r.source_url().to_string(),
            filename: r.filename().to_string(),
            extension: r.extension().to_string(),
        }
    }
}

impl Manifest {
    pub fn capture<'a>(
        page_url: &str,
        resources: impl IntoIterator<Item = &'a Resource>,
        captured_at: DateTime<Utc>,
    ) -> Self {
        let resources: Vec<ManifestEntry> = resources.into_iter().map(ManifestEntry::from).collect();
        Self {
            url: page_url.to_string(),
            timestamp: captured_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            total_resources: resources.len(),
            resources,
        }
    }

    /// Indented JSON (two spaces).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
