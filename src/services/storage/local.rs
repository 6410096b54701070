use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;

use super::ImageStorage;

/// Stores objects on disk under `root`; the router serves them at `/uploads`.
pub struct LocalDiskStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalDiskStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn resolve(&self, path: &str) -> anyhow::Result<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        anyhow::ensure!(!escapes, "invalid storage path: {path}");
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ImageStorage for LocalDiskStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, _content_type: &str) -> anyhow::Result<()> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&target, bytes)
            .await
            .with_context(|| format!("failed to write {}", target.display()))?;
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/uploads/{path}", self.public_base_url)
    }
}
