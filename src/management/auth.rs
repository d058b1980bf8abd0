use std::{io::ErrorKind, path::PathBuf};

use crate::{config, management::StoreError, types::Credential};

/// Keeps the Spotify credential on disk as JSON.
///
/// The store only reads and writes; deciding when a credential is valid is
/// the authorization flow's job.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        TokenStore { path }
    }

    pub fn default_location() -> Self {
        let mut path = config::data_dir();
        path.push("cache/token.json");
        Self::new(path)
    }

    /// Returns `None` when nothing has been stored yet.
    pub async fn load(&self) -> Result<Option<Credential>, StoreError> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::IoError(e)),
        };

        let credential: Credential = serde_json::from_str(&content)?;
        Ok(Some(credential))
    }

    pub async fn persist(&self, credential: &Credential) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(credential)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::IoError(e)),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
