//! File-backed session persistence
//!
//! The session lives in a single named JSON entry inside a state
//! directory, e.g. `./.mostrador/mostrador-session.json`. Writes go to a
//! temporary file first and are renamed into place.

use super::state::PersistedSession;
use super::store::SessionPersistence;
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Session persistence in a local JSON file
#[derive(Debug, Clone)]
pub struct FileSessionPersistence {
    path: PathBuf,
}

impl FileSessionPersistence {
    /// Store the entry `<dir>/<key>.json`
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self { path: dir.as_ref().join(format!("{}.json", key)) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl SessionPersistence for FileSessionPersistence {
    async fn load(&self) -> Result<Option<PersistedSession>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read session entry {}", self.path.display()))
            }
        };

        match serde_json::from_str::<PersistedSession>(&content) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                log::warn!("Ignoring unreadable session entry {}: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &PersistedSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create state directory {}", parent.display()))?;
        }

        let json = serde_json::to_vec_pretty(session)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("Failed to write session entry {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace session entry {}", self.path.display()))?;
        Ok(())
    }

    async fn erase(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to erase session entry {}", self.path.display())),
        }
    }
}
