//! What the popup shows for a given filter state.

use std::fmt;

use crate::classify::{classify, Category};
use crate::resource::Resource;

/// Shown in place of the table when the filtered view is empty.
pub const EMPTY_PLACEHOLDER: &str = "No resources found.";

/// `"N resources found"`.
pub fn count_label(count: usize) -> String {
    format!("{count} resources found")
}

/// First column of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeCell {
    /// Images preview their own source.
    Preview { src: String },
    /// Files show their category label.
    Icon(Category),
}

impl fmt::Display for TypeCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeCell::Preview { .. } => f.pad("[img]"),
            TypeCell::Icon(category) => f.pad(category.label()),
        }
    }
}

/// One table row. `number` is 1-based position in the filtered view and
/// addresses the row's download action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub number: usize,
    pub type_cell: TypeCell,
    pub name: String,
    /// Full source URL (the name cell's tooltip).
    pub detail: String,
    pub format: String,
}

impl Row {
    pub fn new(number: usize, resource: &Resource) -> Self {
        let (type_cell, format) = if resource.is_image() {
            (
                TypeCell::Preview {
                    src: resource.source_url().to_string(),
                },
                "Image".to_string(),
            )
        } else {
            (
                TypeCell::Icon(classify(resource.extension())),
                resource.extension().replacen('.', "", 1).to_uppercase(),
            )
        };
        Self {
            number,
            type_cell,
            name: resource.filename().to_string(),
            detail: resource.source_url().to_string(),
            format,
        }
    }
}

/// Rendered popup state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// The scan has not returned yet.
    Loading,
    /// Nothing to show: the scan found nothing, failed, or the filters hide
    /// everything.
    Empty,
    Table { rows: Vec<Row> },
}

impl View {
    pub fn from_resources<'a>(resources: impl IntoIterator<Item = &'a Resource>) -> Self {
        let rows: Vec<Row> = resources
            .into_iter()
            .enumerate()
            .map(|(i, r)| Row::new(i + 1, r))
            .collect();
        if rows.is_empty() {
            View::Empty
        } else {
            View::Table { rows }
        }
    }

    /// Number of visible rows; `None` while loading.
    pub fn count(&self) -> Option<usize> {
        match self {
            View::Loading => None,
            View::Empty => Some(0),
            View::Table { rows } => Some(rows.len()),
        }
    }

    pub fn count_label(&self) -> String {
        match self.count() {
            Some(n) => count_label(n),
            None => "Scanning page...".to_string(),
        }
    }

    pub fn rows(&self) -> &[Row] {
        match self {
            View::Table { rows } => rows,
            View::Loading | View::Empty => &[],
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.count_label())?;
        match self {
            View::Loading => Ok(()),
            View::Empty => writeln!(f, "{EMPTY_PLACEHOLDER}"),
            View::Table { rows } => {
                writeln!(f, "{:<4} {:<6} {:<32} {:<8} {}", "#", "TYPE", "NAME", "FORMAT", "URL")?;
                for row in rows {
                    writeln!(
                        f,
                        "{:<4} {:<6} {:<32} {:<8} {}",
                        row.number, row.type_cell, row.name, row.format, row.detail
                    )?;
                }
                Ok(())
            }
        }
    }
}
