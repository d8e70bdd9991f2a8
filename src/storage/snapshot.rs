//! On-disk vault snapshot used by the command-line driver.
//!
//! The snapshot is a single JSON document carrying the ledger height and the
//! state root it was written with. Writes go to a temp file in the same
//! directory and are renamed into place. Read-modify-write cycles hold an
//! exclusive advisory lock on a sibling `.lock` file.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, VaultError};
use crate::ledger::Ledger;
use crate::vault::SkillVault;

/// Current snapshot layout version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub format_version: u32,
    pub height: u64,
    pub state_root: String,
    pub saved_at: DateTime<Utc>,
    pub vault: SkillVault,
}

impl Snapshot {
    pub fn from_ledger(ledger: &Ledger) -> Result<Self> {
        Ok(Self {
            format_version: FORMAT_VERSION,
            height: ledger.height,
            state_root: ledger.vault.state_root()?,
            saved_at: Utc::now(),
            vault: ledger.vault.clone(),
        })
    }

    /// Check version and state root, then unwrap into a ledger.
    pub fn into_ledger(self) -> Result<Ledger> {
        if self.format_version != FORMAT_VERSION {
            return Err(VaultError::StateCorrupted(format!(
                "unsupported snapshot format {} (expected {FORMAT_VERSION})",
                self.format_version
            )));
        }
        let actual = self.vault.state_root()?;
        if actual != self.state_root {
            return Err(VaultError::StateCorrupted(format!(
                "state root mismatch: recorded {} but content hashes to {actual}",
                self.state_root
            )));
        }
        Ok(Ledger {
            vault: self.vault,
            height: self.height,
        })
    }
}

/// Identity of the process holding the state lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LockHolder {
    pid: u32,
    acquired_at: DateTime<Utc>,
}

/// Exclusive advisory lock, released on drop.
#[derive(Debug)]
pub struct StateLock {
    #[allow(dead_code)]
    file: File,
    path: PathBuf,
}

impl StateLock {
    /// Try once without blocking.
    pub fn try_acquire(lock_path: &Path) -> Result<Option<Self>> {
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)?;

        match file.try_lock_exclusive() {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                debug!("State lock held by another process");
                return Ok(None);
            }
            Err(e) => return Err(VaultError::Io(e)),
        }

        let holder = LockHolder {
            pid: std::process::id(),
            acquired_at: Utc::now(),
        };
        let holder_json = serde_json::to_string(&holder).unwrap_or_default();
        fs::write(lock_path, holder_json).ok();

        debug!("Acquired state lock at {:?}", lock_path);
        Ok(Some(Self {
            file,
            path: lock_path.to_path_buf(),
        }))
    }

    /// Poll until acquired or `timeout` elapses.
    pub fn acquire_timeout(lock_path: &Path, timeout: Duration) -> Result<Self> {
        let start = Instant::now();
        let poll_interval = Duration::from_millis(50);

        loop {
            if let Some(lock) = Self::try_acquire(lock_path)? {
                return Ok(lock);
            }
            if start.elapsed() >= timeout {
                warn!("Timeout waiting for state lock after {:?}", timeout);
                return Err(VaultError::LockTimeout(format!(
                    "{} still locked after {timeout:?}",
                    lock_path.display()
                )));
            }
            std::thread::sleep(poll_interval);
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Snapshot file location plus locking parameters.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
    lock_timeout: Duration,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>, lock_timeout: Duration) -> Self {
        Self {
            path: path.into(),
            lock_timeout,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    pub fn lock(&self) -> Result<StateLock> {
        StateLock::acquire_timeout(&self.lock_path(), self.lock_timeout)
    }

    pub fn load(&self) -> Result<Ledger> {
        if !self.exists() {
            return Err(VaultError::StateNotFound(self.path.clone()));
        }
        let raw = fs::read_to_string(&self.path)?;
        let snapshot: Snapshot = serde_json::from_str(&raw).map_err(|err| {
            VaultError::StateCorrupted(format!("parse {}: {err}", self.path.display()))
        })?;
        let ledger = snapshot.into_ledger()?;
        debug!(height = ledger.height, "Loaded state from {:?}", self.path);
        Ok(ledger)
    }

    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        let snapshot = Snapshot::from_ledger(ledger)?;
        let json = serde_json::to_string_pretty(&snapshot)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .map_err(|e| VaultError::StorageWrite(format!("create temp file: {e}")))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| VaultError::StorageWrite(format!("write temp file: {e}")))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| VaultError::StorageWrite(format!("sync temp file: {e}")))?;
        tmp.persist(&self.path)
            .map_err(|e| VaultError::StorageWrite(format!("persist {}: {e}", self.path.display())))?;

        info!(
            height = snapshot.height,
            state_root = %snapshot.state_root,
            "Saved state to {:?}",
            self.path
        );
        Ok(())
    }
}
