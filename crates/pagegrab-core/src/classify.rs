//! Extension → display category for the table's type column.

use std::fmt;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "svg", "webp", "ico", "tiff"];
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "rtf", "odt"];
const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "rar", "7z", "tar", "gz", "bz2"];
const CODE_EXTENSIONS: &[&str] = &[
    "js", "py", "html", "css", "java", "cpp", "c", "php", "rb", "go", "ts", "jsx", "tsx",
];
const EXECUTABLE_EXTENSIONS: &[&str] = &["exe", "msi", "app", "dmg", "deb", "rpm"];

/// Short label shown in place of an image preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    Image,
    Document,
    Archive,
    Code,
    Executable,
    /// Unrecognized extension: its first three characters, uppercased.
    Other(String),
    /// No extension at all.
    Unknown,
}

impl Category {
    pub fn label(&self) -> &str {
        match self {
            Category::Image => "IMG",
            Category::Document => "DOC",
            Category::Archive => "ZIP",
            Category::Code => "CODE",
            Category::Executable => "EXE",
            Category::Other(label) => label,
            Category::Unknown => "FILE",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies a dot-prefixed (or empty) extension. Total: every input maps to
/// exactly one category.
pub fn classify(extension: &str) -> Category {
    if extension.is_empty() {
        return Category::Unknown;
    }
    let ext = extension.strip_prefix('.').unwrap_or(extension).to_lowercase();
    let ext = ext.as_str();

    if IMAGE_EXTENSIONS.contains(&ext) {
        Category::Image
    } else if DOCUMENT_EXTENSIONS.contains(&ext) {
        Category::Document
    } else if ARCHIVE_EXTENSIONS.contains(&ext) {
        Category::Archive
    } else if CODE_EXTENSIONS.contains(&ext) {
        Category::Code
    } else if EXECUTABLE_EXTENSIONS.contains(&ext) {
        Category::Executable
    } else {
        Category::Other(ext.chars().take(3).collect::<String>().to_uppercase())
    }
}
