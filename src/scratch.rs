//! Scoped scratch storage for intermediate compiler files.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::errors::{ConvertError, Result};

/// A uniquely named temporary directory, removed with its contents on drop.
///
/// One instance lives for a whole run; every scratch file of every shader and
/// variant is created beneath it.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Creates `shadercross-<uuid>` under the system temp directory.
    pub fn new() -> Result<Self> {
        Self::new_in(std::env::temp_dir())
    }

    pub fn new_in(parent: impl AsRef<Path>) -> Result<Self> {
        let path = parent
            .as_ref()
            .join(format!("shadercross-{}", Uuid::new_v4().simple()));
        std::fs::create_dir_all(&path).map_err(|e| ConvertError::io(&path, e))?;
        log::debug!("Created scratch directory {}", path.display());
        Ok(Self { path })
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Writes `contents` to `name` inside the directory.
    pub fn write(&self, name: &str, contents: &[u8]) -> Result<ScratchFile> {
        let path = self.join(name);
        std::fs::write(&path, contents).map_err(|e| ConvertError::io(&path, e))?;
        Ok(ScratchFile { path })
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            log::warn!(
                "Failed to remove scratch directory {}: {e}",
                self.path.display()
            );
        }
    }
}

/// A scratch file that is deleted when dropped.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        // The directory may already be gone on an error path.
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Reads `path` and removes it afterwards.
pub(crate) fn take_file(path: &Path) -> Result<Vec<u8>> {
    let data = std::fs::read(path).map_err(|e| ConvertError::io(path, e))?;
    let _ = std::fs::remove_file(path);
    Ok(data)
}
