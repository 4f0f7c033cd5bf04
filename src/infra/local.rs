//! Device-scoped draft slot backends.
//!
//! The local draft cache is a single named slot with get/set/remove
//! semantics. Backends must treat an absent slot as `None`, never as an
//! error; callers treat every failure as non-fatal.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait LocalSlot: Send + Sync {
    async fn load(&self) -> Result<Option<String>, SlotError>;

    async fn store(&self, payload: &str) -> Result<(), SlotError>;

    async fn clear(&self) -> Result<(), SlotError>;
}

/// File-backed slot. Writes go to a sibling temp file first and rename
/// into place so a crash mid-write cannot leave a torn snapshot.
#[derive(Debug)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        PathBuf::from(staging)
    }
}

#[async_trait]
impl LocalSlot for FileSlot {
    async fn load(&self) -> Result<Option<String>, SlotError> {
        match fs::read_to_string(&self.path).await {
            Ok(payload) => Ok(Some(payload)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn store(&self, payload: &str) -> Result<(), SlotError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let staging = self.staging_path();
        fs::write(&staging, payload).await?;
        fs::rename(&staging, &self.path).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), SlotError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory slot, used in tests and as the fallback when no cache
/// directory is configured.
#[derive(Debug, Default)]
pub struct MemorySlot {
    inner: Mutex<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalSlot for MemorySlot {
    async fn load(&self) -> Result<Option<String>, SlotError> {
        Ok(self.inner.lock().expect("slot lock").clone())
    }

    async fn store(&self, payload: &str) -> Result<(), SlotError> {
        *self.inner.lock().expect("slot lock") = Some(payload.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SlotError> {
        *self.inner.lock().expect("slot lock") = None;
        Ok(())
    }
}
