use std::{
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    time::SystemTime,
};

use crate::{Error, Result};

/// Existence and modification time of a path, captured at construction.
///
/// A missing path is not an error: it reports `exists() == false` and a
/// modification time of [`SystemTime::UNIX_EPOCH`], so it compares older
/// than any real file. Any other stat failure is a [`Error::FileIo`].
#[derive(Debug, Clone)]
pub struct FileInfo {
    path: PathBuf,
    exists: bool,
    last_modified: SystemTime,
}

impl FileInfo {
    /// Stat the given path.
    pub fn stat(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::metadata(path) {
            Ok(meta) => {
                let last_modified = meta.modified().map_err(|e| Error::file_io(path, e))?;
                Ok(Self {
                    path: path.to_path_buf(),
                    exists: true,
                    last_modified,
                })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self {
                path: path.to_path_buf(),
                exists: false,
                last_modified: SystemTime::UNIX_EPOCH,
            }),
            Err(e) => Err(Error::file_io(path, e)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn last_modified(&self) -> SystemTime {
        self.last_modified
    }
}

/// Read a whole file, mapping failures to [`Error::FileIo`].
pub fn read_to_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|e| Error::file_io(path, e))
}

/// Read a whole file as raw bytes, mapping failures to [`Error::FileIo`].
pub fn read_bytes(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    std::fs::read(path).map_err(|e| Error::file_io(path, e))
}

/// Copy `from` to `to` byte for byte, then append `suffix`.
///
/// The copied bytes are never decoded, so sources in any encoding survive.
pub fn copy_with_suffix(
    from: impl AsRef<Path>,
    to: impl AsRef<Path>,
    suffix: &str,
) -> Result<()> {
    let (from, to) = (from.as_ref(), to.as_ref());
    std::fs::copy(from, to).map_err(|e| Error::file_io(from, e))?;
    std::fs::OpenOptions::new()
        .append(true)
        .open(to)
        .and_then(|mut file| file.write_all(suffix.as_bytes()))
        .map_err(|e| Error::file_io(to, e))
}

/// Write a file, creating parent directories as needed.
pub fn write_file(path: impl AsRef<Path>, content: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)?;
    }
    std::fs::write(path, content).map_err(|e| Error::file_io(path, e))
}

/// Remove a file if it exists. Returns whether a file was removed.
pub fn remove_file(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if !FileInfo::stat(path)?.exists() {
        return Ok(false);
    }
    std::fs::remove_file(path).map_err(|e| Error::file_io(path, e))?;
    tracing::debug!(path = %path.display(), "removed file");
    Ok(true)
}

/// Recursively create a directory if it does not exist yet.
pub fn create_dir_all(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::create_dir_all(path).map_err(|e| Error::file_io(path, e))
}
