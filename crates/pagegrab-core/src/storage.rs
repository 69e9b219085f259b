//! Destination files for transfers.
//!
//! Bodies are written to `<name>.part` and renamed into place once complete,
//! so an interrupted transfer never leaves a truncated file under the final
//! name.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Temporary file suffix used before the final rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `file.iso` → `file.iso.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// A buffered `.part` file that becomes `final_path` on `finalize`.
pub struct PartFile {
    writer: BufWriter<File>,
    temp_path: PathBuf,
    final_path: PathBuf,
}

impl PartFile {
    /// Create (or truncate) the temp file for `final_path`.
    pub fn create(final_path: &Path) -> Result<Self> {
        let temp_path = temp_path(final_path);
        let file = File::create(&temp_path)
            .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;
        Ok(PartFile {
            writer: BufWriter::new(file),
            temp_path,
            final_path: final_path.to_path_buf(),
        })
    }

    pub fn writer(&mut self) -> &mut BufWriter<File> {
        &mut self.writer
    }

    /// Flush, sync and rename to the final path. Returns the final path.
    pub fn finalize(mut self) -> Result<PathBuf> {
        self.writer.flush().context("storage flush failed")?;
        self.writer.get_ref().sync_all().context("storage sync failed")?;
        let PartFile {
            writer,
            temp_path,
            final_path,
        } = self;
        drop(writer);
        std::fs::rename(&temp_path, &final_path).with_context(|| {
            format!(
                "failed to rename {} to {}",
                temp_path.display(),
                final_path.display()
            )
        })?;
        Ok(final_path)
    }

    /// Remove the temp file after a failed transfer.
    pub fn discard(self) {
        let PartFile {
            writer, temp_path, ..
        } = self;
        drop(writer);
        if let Err(e) = std::fs::remove_file(&temp_path) {
            tracing::debug!(path = %temp_path.display(), "could not remove temp file: {}", e);
        }
    }
}

/// First of `name`, `stem (1).ext`, `stem (2).ext`, … in `dir` that does not
/// exist on disk and is not claimed by `taken`.
pub fn unique_destination(dir: &Path, name: &str, taken: impl Fn(&Path) -> bool) -> PathBuf {
    let free = |p: &Path| !p.exists() && !temp_path(p).exists() && !taken(p);
    let first = dir.join(name);
    if free(first.as_path()) {
        return first;
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    (1u32..)
        .map(|n| match ext {
            Some(ext) => dir.join(format!("{stem} ({n}).{ext}")),
            None => dir.join(format!("{stem} ({n})")),
        })
        .find(|p| free(p.as_path()))
        .unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_appends_part() {
        let p = temp_path(Path::new("file.iso"));
        assert_eq!(p.to_string_lossy(), "file.iso.part");
        let p2 = temp_path(Path::new("/tmp/archive.zip"));
        assert_eq!(p2.to_string_lossy(), "/tmp/archive.zip.part");
    }

    #[test]
    fn write_and_finalize() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("output.bin");

        let mut part = PartFile::create(&final_path).unwrap();
        part.writer().write_all(b"hello world").unwrap();
        assert!(temp_path(&final_path).exists());
        let done = part.finalize().unwrap();

        assert_eq!(done, final_path);
        assert!(!temp_path(&final_path).exists());
        assert_eq!(std::fs::read(&final_path).unwrap(), b"hello world");
    }

    #[test]
    fn discard_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("broken.zip");
        let mut part = PartFile::create(&final_path).unwrap();
        part.writer().write_all(b"partial").unwrap();
        part.discard();
        assert!(!temp_path(&final_path).exists());
        assert!(!final_path.exists());
    }

    #[test]
    fn unique_destination_skips_existing_and_taken() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            unique_destination(dir.path(), "a.pdf", |_| false),
            dir.path().join("a.pdf")
        );

        std::fs::write(dir.path().join("a.pdf"), b"x").unwrap();
        let taken = dir.path().join("a (1).pdf");
        assert_eq!(
            unique_destination(dir.path(), "a.pdf", |p| p == taken),
            dir.path().join("a (2).pdf")
        );
    }

    #[test]
    fn unique_destination_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("README"), b"x").unwrap();
        assert_eq!(
            unique_destination(dir.path(), "README", |_| false),
            dir.path().join("README (1)")
        );
    }
}
