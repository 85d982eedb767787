use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::alarm::Alarm;

use super::model;

pub const SCHEDULED_ALARM_FILE_NAME: &str = "ScheduledAlarm";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Stored alarm is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Backend for the single scheduled-alarm slot.
#[async_trait]
pub trait AlarmStorage: Send + Sync {
    async fn load(&self) -> anyhow::Result<Option<Alarm>>;
    async fn save(&self, alarm: &Alarm) -> anyhow::Result<()>;
    async fn clear(&self) -> anyhow::Result<()>;
}

pub struct FileAlarmStorage {
    path: PathBuf,
}

impl FileAlarmStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_directory(documents_dir: impl AsRef<Path>) -> Self {
        Self::new(documents_dir.as_ref().join(SCHEDULED_ALARM_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Option<Alarm>, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(model::decode(&bytes)?))
    }

    async fn write(&self, alarm: &Alarm) -> Result<(), StorageError> {
        let bytes = model::encode(alarm)?;
        let tmp_path = self.path.with_extension("tmp");

        tokio::fs::write(&tmp_path, bytes).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        Ok(())
    }

    async fn remove(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl AlarmStorage for FileAlarmStorage {
    async fn load(&self) -> anyhow::Result<Option<Alarm>> {
        Ok(self.read().await?)
    }

    async fn save(&self, alarm: &Alarm) -> anyhow::Result<()> {
        Ok(self.write(alarm).await?)
    }

    async fn clear(&self) -> anyhow::Result<()> {
        Ok(self.remove().await?)
    }
}

#[derive(Default)]
pub struct InMemoryAlarmStorage {
    store: RwLock<Option<Alarm>>,
}

impl InMemoryAlarmStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AlarmStorage for InMemoryAlarmStorage {
    async fn load(&self) -> anyhow::Result<Option<Alarm>> {
        Ok(self.store.read().await.clone())
    }

    async fn save(&self, alarm: &Alarm) -> anyhow::Result<()> {
        *self.store.write().await = Some(alarm.clone());
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        *self.store.write().await = None;
        Ok(())
    }
}
