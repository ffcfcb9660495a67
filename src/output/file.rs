//! File sink.

use crate::internal;

use super::Sink;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Writes log text to a file. Once [`FileSink::close`]d it refuses registration and writes.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl FileSink {
    /// Creates (or truncates) the file at `path`.
    ///
    /// # Errors
    /// I/O errors while creating parent directories or opening the file.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, crate::Error> {
        Self::open(path.as_ref(), false)
    }

    /// Opens the file at `path` for appending, creating it if missing.
    ///
    /// # Errors
    /// I/O errors while creating parent directories or opening the file.
    pub fn append(path: impl AsRef<Path>) -> Result<Self, crate::Error> {
        Self::open(path.as_ref(), true)
    }

    fn open(path: &Path, append: bool) -> Result<Self, crate::Error> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            match std::fs::create_dir_all(parent) {
                Ok(()) => {
                    internal::debug("FILE", &format!("Created directory: {}", parent.display()));
                }
                Err(e) => {
                    internal::error(
                        "FILE",
                        &format!("Failed to create directory {}: {}", parent.display(), e),
                    );
                    return Err(e.into());
                }
            }
        }

        let mut options = OpenOptions::new();
        options.create(true);
        if append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }

        let file = options.open(path).map_err(|e| {
            internal::error(
                "FILE",
                &format!("Failed to open {}: {}", path.display(), e),
            );
            e
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(Some(file)),
        })
    }

    /// Diagnostics report the file by path, not by descriptor.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes and drops the file. Later writes fail and registration is refused.
    ///
    /// # Errors
    /// I/O error from the final flush.
    pub fn close(&self) -> Result<(), crate::Error> {
        let mut guard = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(mut file) = guard.take() {
            file.flush()?;
        }
        Ok(())
    }
}

impl Sink for FileSink {
    fn write_str(&self, text: &str) -> Result<(), crate::Error> {
        let mut guard = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        let file = guard
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "file sink is closed"))?;
        file.write_all(text.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<(), crate::Error> {
        let mut guard = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(file) = guard.as_mut() {
            file.flush()?;
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.file
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
