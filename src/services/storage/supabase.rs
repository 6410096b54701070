use anyhow::Context;
use async_trait::async_trait;

use super::ImageStorage;

pub struct SupabaseStorage {
    base_url: String,
    api_key: String,
    bucket: String,
    client: reqwest::Client,
}

impl SupabaseStorage {
    pub fn new(base_url: String, api_key: String, bucket: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            bucket,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ImageStorage for SupabaseStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> anyhow::Result<()> {
        let url = format!("{}/storage/v1/object/{}/{path}", self.base_url, self.bucket);

        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .context("failed to upload to storage")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("storage upload failed ({status}): {body}");
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{path}",
            self.base_url, self.bucket
        )
    }
}
