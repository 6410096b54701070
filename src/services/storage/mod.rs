pub mod local;
pub mod supabase;

use async_trait::async_trait;

/// Object storage for gallery images.
#[async_trait]
pub trait ImageStorage: Send + Sync {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> anyhow::Result<()>;

    fn public_url(&self, path: &str) -> String;
}
