//! Materializes downloaded documents on disk.

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use shared::error::SubmitError;
use tempfile::NamedTempFile;
use tracing::info;

const MAX_NAME_COLLISIONS: u32 = 1000;
/// Per-component limit shared by the common desktop filesystems.
const MAX_FILE_NAME_BYTES: usize = 255;

#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Stores `bytes` under `filename` and returns where it ended up.
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, SubmitError>;
}

/// Saves documents into a directory, the way a browser fills its download folder.
#[derive(Debug, Clone)]
pub struct DirectoryDownloadSink {
    dir: PathBuf,
}

impl DirectoryDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn truncate_to_bytes(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// `invoice.pdf` becomes `invoice (n).pdf`, shortening the stem when the
/// suffix would push the name past the filesystem limit.
fn numbered_name(filename: &str, n: u32) -> String {
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(filename);
    let suffix = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!(" ({n}).{ext}"),
        None => format!(" ({n})"),
    };
    let stem = truncate_to_bytes(stem, MAX_FILE_NAME_BYTES.saturating_sub(suffix.len()));
    format!("{stem}{suffix}")
}

/// Moves the finished part file to the first free name; an existing file is never replaced.
fn persist_into_free_name(
    mut part: NamedTempFile,
    dir: &Path,
    filename: &str,
) -> Result<PathBuf, SubmitError> {
    for n in 0..=MAX_NAME_COLLISIONS {
        let target = match n {
            0 => dir.join(filename),
            n => dir.join(numbered_name(filename, n)),
        };
        match part.persist_noclobber(&target) {
            Ok(_) => return Ok(target),
            Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => part = err.file,
            Err(err) => return Err(SubmitError::download(&target, err.error)),
        }
    }

    Err(SubmitError::download(
        dir.join(filename),
        "too many files with the same name",
    ))
}

fn write_document(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, SubmitError> {
    std::fs::create_dir_all(dir).map_err(|err| SubmitError::download(dir, err))?;

    // Dropping the part file on any early return deletes it.
    let mut part = tempfile::Builder::new()
        .prefix(".invoice")
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(|err| SubmitError::download(dir, err))?;
    part.write_all(bytes)
        .and_then(|()| part.as_file().sync_all())
        .map_err(|err| SubmitError::download(dir.join(filename), err))?;

    persist_into_free_name(part, dir, filename)
}

#[async_trait]
impl DownloadSink for DirectoryDownloadSink {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, SubmitError> {
        let dir = self.dir.clone();
        let name = filename.to_string();
        let size = bytes.len();
        let bytes = bytes.to_vec();
        let target = tokio::task::spawn_blocking(move || write_document(&dir, &name, &bytes))
            .await
            .map_err(|err| SubmitError::download(&self.dir, err))??;

        info!(path = %target.display(), size, "document saved");
        Ok(target)
    }
}

#[cfg(test)]
#[path = "tests/download_tests.rs"]
mod tests;
