// Credential store implementations - plain-text file and in-memory
use crate::application::credential_store::CredentialStore;
use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Keeps the credential as a single plain-text document; each save
/// replaces the whole file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> anyhow::Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let trimmed = contents.trim();
                Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", self.path.display())),
        }
    }

    async fn save(&self, credential: &str) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&self.path, credential.trim())
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credential: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn with_credential(credential: &str) -> Self {
        Self {
            credential: RwLock::new(Some(credential.to_string())),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> anyhow::Result<Option<String>> {
        Ok(self.credential.read().await.clone())
    }

    async fn save(&self, credential: &str) -> anyhow::Result<()> {
        *self.credential.write().await = Some(credential.trim().to_string());
        Ok(())
    }
}
