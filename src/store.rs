//! Ledger file persistence with atomic rewrites and advisory locking.
//!
//! The file is always rewritten wholesale. New content is rendered into a
//! buffer, written to a sibling temporary file, synced and renamed over the
//! ledger, so a failed write never leaves a half-written document behind.
//!
//! Mutations run under an exclusive `fs2` lock on `<file>.lock`. The lock is
//! advisory: it serializes cooperating processes, not editors or other tools
//! writing the file directly.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, info, warn};

use crate::document::Document;
use crate::error::{IoResultExt, LedgerError, Result};

/// Temporary file suffix for atomic writes.
const TMP_SUFFIX: &str = ".tmp";

/// Lock file suffix for concurrent access prevention.
const LOCK_SUFFIX: &str = ".lock";

/// Exclusive advisory lock, released on drop.
#[derive(Debug)]
pub struct LedgerLock {
    file: File,
    path: PathBuf,
}

impl Drop for LedgerLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!("Failed to release lock {}: {}", self.path.display(), e);
        }
    }
}

/// Reads and writes one ledger file.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
    locking: bool,
}

impl LedgerStore {
    /// Creates a store for the ledger at `path`, with locking enabled.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            locking: true,
        }
    }

    /// Enable or disable the advisory lock.
    #[must_use]
    pub fn with_locking(mut self, locking: bool) -> Self {
        self.locking = locking;
        self
    }

    /// Path of the ledger file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the temporary file used during saves.
    #[must_use]
    pub fn tmp_file_path(&self) -> PathBuf {
        sibling(&self.path, TMP_SUFFIX)
    }

    /// Path of the advisory lock file.
    #[must_use]
    pub fn lock_file_path(&self) -> PathBuf {
        sibling(&self.path, LOCK_SUFFIX)
    }

    /// Checks if the ledger file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read and parse the ledger.
    ///
    /// # Errors
    ///
    /// `MissingDocument` if the file does not exist, `Io` for any other
    /// read failure (including invalid UTF-8).
    pub fn load(&self) -> Result<Document> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                debug!("Loaded {} ({} bytes)", self.path.display(), content.len());
                Ok(Document::parse(&content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(LedgerError::MissingDocument {
                path: self.path.clone(),
            }),
            Err(e) => Err(LedgerError::io(&self.path, e)),
        }
    }

    /// Atomically replace the ledger with `doc`.
    ///
    /// The parent directory must already exist.
    pub fn save(&self, doc: &Document) -> Result<()> {
        let content = doc.render();
        let tmp_path = self.tmp_file_path();

        let written = File::create(&tmp_path).and_then(|mut tmp_file| {
            tmp_file.write_all(content.as_bytes())?;
            tmp_file.sync_all()
        });
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(LedgerError::io(&tmp_path, e));
        }

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(LedgerError::io(&self.path, e));
        }

        info!(
            "Rewrote {} ({} lines)",
            self.path.display(),
            doc.len()
        );
        Ok(())
    }

    /// Acquire the exclusive lock, or `None` when locking is disabled.
    pub fn lock(&self) -> Result<Option<LedgerLock>> {
        if !self.locking {
            return Ok(None);
        }
        let path = self.lock_file_path();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .at_path(&path)?;
        FileExt::lock_exclusive(&file).at_path(&path)?;
        Ok(Some(LedgerLock { file, path }))
    }

    /// Load, mutate and save the ledger under the lock.
    ///
    /// Nothing is written when `mutate` fails.
    pub fn update<T>(&self, mutate: impl FnOnce(&mut Document) -> Result<T>) -> Result<T> {
        let _lock = self.lock()?;
        let mut doc = self.load()?;
        let out = mutate(&mut doc)?;
        self.save(&doc)?;
        Ok(out)
    }

    /// Like [`update`](Self::update), but starts from `seed()` when the
    /// ledger file does not exist yet.
    pub fn update_or_create<T>(
        &self,
        seed: impl FnOnce() -> Document,
        mutate: impl FnOnce(&mut Document) -> Result<T>,
    ) -> Result<T> {
        let _lock = self.lock()?;
        let mut doc = match self.load() {
            Ok(doc) => doc,
            Err(LedgerError::MissingDocument { .. }) => {
                info!("Creating new ledger at {}", self.path.display());
                seed()
            }
            Err(e) => return Err(e),
        };
        let out = mutate(&mut doc)?;
        self.save(&doc)?;
        Ok(out)
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (LedgerStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = LedgerStore::new(temp_dir.path().join("TODO.md"));
        (store, temp_dir)
    }

    #[test]
    fn test_store_paths() {
        let store = LedgerStore::new("/work/TODO.md");
        assert_eq!(store.tmp_file_path(), PathBuf::from("/work/TODO.md.tmp"));
        assert_eq!(store.lock_file_path(), PathBuf::from("/work/TODO.md.lock"));
    }

    #[test]
    fn test_load_missing_file() {
        let (store, _temp_dir) = test_store();
        let err = store.load().unwrap_err();
        assert!(matches!(err, LedgerError::MissingDocument { .. }));
        assert!(err.is_io());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let (store, _temp_dir) = test_store();
        let source = "# TODOs\r\n\r\n---\r\n\r\n## General\r\n";
        store.save(&Document::parse(source)).expect("save");

        assert_eq!(fs::read_to_string(store.path()).unwrap(), source);
        assert_eq!(store.load().expect("load").render(), source);
    }

    #[test]
    fn test_save_leaves_no_tmp_file() {
        let (store, _temp_dir) = test_store();
        store.save(&Document::from_lines(["x"])).expect("save");
        assert!(store.exists());
        assert!(!store.tmp_file_path().exists());
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let store = LedgerStore::new(temp_dir.path().join("nope").join("TODO.md"));
        let err = store.save(&Document::from_lines(["x"])).unwrap_err();
        assert!(matches!(err, LedgerError::Io { .. }));
    }

    #[test]
    fn test_update_failure_leaves_file_untouched() {
        let (store, _temp_dir) = test_store();
        fs::write(store.path(), "original\n").unwrap();

        let result: Result<()> = store.update(|doc| {
            doc.push_lines(["changed"]);
            Err(LedgerError::not_found("x"))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "original\n");
    }

    #[test]
    fn test_update_missing_file_is_error() {
        let (store, _temp_dir) = test_store();
        let result = store.update(|_| Ok(()));
        assert!(matches!(result, Err(LedgerError::MissingDocument { .. })));
        assert!(!store.exists());
    }

    #[test]
    fn test_update_or_create_seeds_document() {
        let (store, _temp_dir) = test_store();
        store
            .update_or_create(
                || Document::from_lines(["# Seed"]),
                |doc| {
                    doc.push_lines(["added"]);
                    Ok(())
                },
            )
            .expect("update");
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "# Seed\nadded\n");
    }

    #[test]
    fn test_lock_released_on_drop() {
        let (store, _temp_dir) = test_store();
        {
            let lock = store.lock().expect("lock");
            assert!(lock.is_some());
            assert!(store.lock_file_path().exists());
        }

        let lock_file = File::open(store.lock_file_path()).expect("open lock file");
        FileExt::try_lock_exclusive(&lock_file).expect("lock should be free");
        FileExt::unlock(&lock_file).expect("release lock");
    }

    #[test]
    fn test_lock_disabled() {
        let (store, _temp_dir) = test_store();
        let store = store.with_locking(false);
        assert!(store.lock().expect("lock").is_none());
        assert!(!store.lock_file_path().exists());
    }
}
