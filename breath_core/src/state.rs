//! Persistent XP and streak state.
//!
//! `progress.json` is only ever replaced whole: a new document is written to
//! a temp file beside it and renamed over the old one, so a reader sees one
//! version or the other. Writers take an exclusive lock on the sidecar
//! `progress.json.lock` for the entire read-modify-write, which keeps two
//! sessions finishing together from losing each other's XP.

use crate::{Error, Result, UserProgress};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Exclusive hold on a progress file's sidecar lock, released on drop
struct WriterLock {
    file: File,
}

impl WriterLock {
    fn acquire(progress_path: &Path) -> Result<Self> {
        let path = lock_path(progress_path)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;
        file.lock_exclusive()?;
        tracing::trace!("Acquired {:?}", path);
        Ok(Self { file })
    }
}

impl Drop for WriterLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!("Failed to release progress lock: {}", e);
        }
    }
}

fn lock_path(progress_path: &Path) -> Result<PathBuf> {
    let name = progress_path
        .file_name()
        .ok_or_else(|| Error::State(format!("progress path {:?} has no file name", progress_path)))?;
    let mut lock_name = name.to_os_string();
    lock_name.push(".lock");
    Ok(progress_path.with_file_name(lock_name))
}

impl UserProgress {
    /// Read progress from `path`.
    ///
    /// A missing file is a fresh start. An unreadable or corrupt file is
    /// logged and also treated as a fresh start.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No progress file found, starting fresh");
                return Ok(Self::default());
            }
            Err(e) => {
                tracing::warn!("Cannot read progress {:?}: {}. Starting fresh.", path, e);
                return Ok(Self::default());
            }
        };

        serde_json::from_str::<Self>(&contents).or_else(|e| {
            tracing::warn!("Corrupt progress {:?}: {}. Starting fresh.", path, e);
            Ok(Self::default())
        })
    }

    /// Replace the progress file with `self`
    pub fn save(&self, path: &Path) -> Result<()> {
        let _lock = WriterLock::acquire(path)?;
        self.replace(path)
    }

    /// Read, modify and write back progress as one step.
    ///
    /// Concurrent callers, in this process or another, are applied one
    /// after the other. Returns the saved progress and whatever `f` returned.
    pub fn update<F, T>(path: &Path, f: F) -> Result<(Self, T)>
    where
        F: FnOnce(&mut UserProgress) -> T,
    {
        let _lock = WriterLock::acquire(path)?;
        let mut progress = Self::load(path)?;
        let out = f(&mut progress);
        progress.replace(path)?;
        Ok((progress, out))
    }

    // Caller holds the writer lock
    fn replace(&self, path: &Path) -> Result<()> {
        let dir = path
            .parent()
            .ok_or_else(|| Error::State(format!("progress path {:?} has no parent", path)))?;
        std::fs::create_dir_all(dir)?;

        let mut temp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut temp, self)?;
        temp.flush()?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!(
            "Saved progress ({} XP, streak {}) to {:?}",
            self.total_xp,
            self.current_streak,
            path
        );
        Ok(())
    }
}
