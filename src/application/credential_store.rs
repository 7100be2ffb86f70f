// Store trait for the remembered upstream API credential
use async_trait::async_trait;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the remembered credential, if any
    async fn load(&self) -> anyhow::Result<Option<String>>;

    /// Replace the remembered credential
    async fn save(&self, credential: &str) -> anyhow::Result<()>;
}
