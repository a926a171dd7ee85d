//! File-backed semaphore store.

use super::metadata::HeldLock;
use super::types::Semaphore;
use super::{SemaphoreStore, poll_until_locked};
use crate::error::{ProjlockError, Result};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Extension of lock files inside the store directory.
const LOCK_EXTENSION: &str = "lock";

/// Longest file stem written for a key, leaving room for the extension
/// under the usual 255-byte file name limit.
const MAX_FILE_STEM: usize = 200;

/// Separates the truncated key from its digest in long-key file names.
/// Never produced by `encode_key`, so the two name forms cannot collide.
const DIGEST_SEPARATOR: char = '~';

/// Owner recorded for a lock file whose metadata cannot be read.
const UNKNOWN_OWNER: &str = "unknown";

/// Attempts made when a lock file disappears between the exclusive create
/// and reading its metadata.
const MAX_ATTEMPTS: usize = 3;

/// Semaphore store keeping one lock file per key in a directory.
///
/// The exclusive create (`create_new`) of the lock file is the atomic
/// test-and-set: the filesystem guarantees only one process creates it.
#[derive(Debug, Clone)]
pub struct FileSemaphoreStore {
    dir: PathBuf,
    default_wait_seconds: u64,
}

impl FileSemaphoreStore {
    /// Create a store rooted at `dir`. The directory is created on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            default_wait_seconds: 0,
        }
    }

    /// Set how long a plain `acquire` waits for a held lock to free up.
    pub fn with_default_wait(mut self, seconds: u64) -> Self {
        self.default_wait_seconds = seconds;
        self
    }

    /// The store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the lock file for `key`.
    pub fn lock_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", file_stem(key), LOCK_EXTENSION))
    }

    /// The current claim on `key`, if any.
    ///
    /// A lock file without readable metadata still counts as a claim, dated by
    /// its mtime and owned by `unknown`.
    pub fn claim(&self, key: &str) -> Result<Option<HeldLock>> {
        read_claim(&self.lock_path(key), key)
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            ProjlockError::StoreError(format!(
                "failed to create store directory '{}': {}",
                self.dir.display(),
                e
            ))
        })
    }

    /// One acquisition attempt.
    fn try_acquire(&self, key: &str) -> Result<Semaphore> {
        self.ensure_dir()?;
        let lock_path = self.lock_path(key);

        for _ in 0..MAX_ATTEMPTS {
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&lock_path)
            {
                Ok(mut file) => {
                    let metadata = HeldLock::new(key);
                    let json = metadata.to_json()?;

                    // Undo the create if the body cannot be written.
                    if let Err(e) = file
                        .write_all(json.as_bytes())
                        .and_then(|()| file.sync_all())
                    {
                        let _ = fs::remove_file(&lock_path);
                        return Err(ProjlockError::StoreError(format!(
                            "failed to write lock file '{}': {}",
                            lock_path.display(),
                            e
                        )));
                    }

                    return Ok(Semaphore::claimed(key, metadata.locked_since));
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    match read_claim(&lock_path, key)? {
                        Some(existing) => {
                            return Ok(Semaphore::contended(key, existing.locked_since));
                        }
                        // Released in between; try to claim again.
                        None => continue,
                    }
                }
                Err(e) => {
                    return Err(ProjlockError::StoreError(format!(
                        "failed to create lock file '{}': {}",
                        lock_path.display(),
                        e
                    )));
                }
            }
        }

        Err(ProjlockError::StoreError(format!(
            "lock file '{}' kept changing during acquisition",
            lock_path.display()
        )))
    }
}

impl SemaphoreStore for FileSemaphoreStore {
    fn acquire(&self, key: &str) -> Result<Semaphore> {
        self.acquire_within(key, self.default_wait_seconds)
    }

    fn acquire_within(&self, key: &str, max_wait_seconds: u64) -> Result<Semaphore> {
        poll_until_locked(Duration::from_secs(max_wait_seconds), || {
            self.try_acquire(key)
        })
    }

    fn release(&self, key: &str) -> Result<()> {
        let lock_path = self.lock_path(key);
        match fs::remove_file(&lock_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ProjlockError::StoreError(format!(
                "failed to release lock '{}': {}",
                lock_path.display(),
                e
            ))),
        }
    }

    fn held(&self) -> Result<Vec<HeldLock>> {
        let mut locks = Vec::new();

        if !self.dir.exists() {
            return Ok(locks);
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| {
            ProjlockError::StoreError(format!(
                "failed to read store directory '{}': {}",
                self.dir.display(),
                e
            ))
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                ProjlockError::StoreError(format!("failed to read store directory entry: {}", e))
            })?;

            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(LOCK_EXTENSION) {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let key = decode_key(stem).unwrap_or_else(|| stem.to_string());

            match read_claim(&path, &key) {
                Ok(Some(lock)) => locks.push(lock),
                Ok(None) => {}
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable lock file"),
            }
        }

        locks.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(locks)
    }
}

/// The claim recorded in `lock_path`, or `None` if the file no longer exists.
///
/// A holder that has created the file but not yet written its metadata (or a
/// crashed holder that left it truncated) is reported under `key`, dated by
/// the file's mtime.
fn read_claim(lock_path: &Path, key: &str) -> Result<Option<HeldLock>> {
    if let Ok(existing) = HeldLock::from_file(lock_path) {
        return Ok(Some(existing));
    }

    match fs::metadata(lock_path).and_then(|m| m.modified()) {
        Ok(modified) => {
            tracing::debug!(path = %lock_path.display(), "lock file has no readable metadata");
            Ok(Some(HeldLock {
                key: key.to_string(),
                owner: UNKNOWN_OWNER.to_string(),
                pid: None,
                locked_since: DateTime::<Utc>::from(modified),
            }))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ProjlockError::StoreError(format!(
            "failed to inspect lock file '{}': {}",
            lock_path.display(),
            e
        ))),
    }
}

/// File stem for `key`.
///
/// Short keys use [`encode_key`] as is. When that would exceed
/// [`MAX_FILE_STEM`], the name is a prefix of the encoding followed by the
/// SHA-256 of the full key, so every key maps to a distinct, bounded name.
pub(crate) fn file_stem(key: &str) -> String {
    let encoded = encode_key(key);
    if encoded.len() <= MAX_FILE_STEM {
        return encoded;
    }

    let digest = format!("{:x}", Sha256::digest(key.as_bytes()));
    let prefix_len = MAX_FILE_STEM - digest.len() - DIGEST_SEPARATOR.len_utf8();
    format!("{}{}{}", &encoded[..prefix_len], DIGEST_SEPARATOR, digest)
}

/// Encode a lock key as a file name.
///
/// ASCII alphanumerics and `.`, `_`, `-` pass through; every other byte
/// becomes `%XX`. `%` itself is escaped, so distinct keys never share a file.
pub(crate) fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-') {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}

/// Inverse of [`encode_key`]; `None` for digest names and foreign files.
pub(crate) fn decode_key(stem: &str) -> Option<String> {
    let bytes = stem.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = stem.get(i + 1..i + 3)?;
                decoded.push(u8::from_str_radix(hex, 16).ok()?);
                i += 3;
            }
            b if b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-') => {
                decoded.push(b);
                i += 1;
            }
            _ => return None,
        }
    }
    String::from_utf8(decoded).ok()
}
