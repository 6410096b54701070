use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use super::AuthProvider;
use crate::models::{AdminUser, Session};

pub struct SupabaseAuth {
    base_url: String,
    anon_key: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct RemoteUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: RemoteUser,
}

impl From<RemoteUser> for AdminUser {
    fn from(user: RemoteUser) -> Self {
        AdminUser {
            id: user.id,
            email: user.email.unwrap_or_default(),
        }
    }
}

impl SupabaseAuth {
    pub fn new(base_url: String, anon_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<Option<Session>> {
        let resp = self
            .client
            .post(format!("{}/auth/v1/token", self.base_url))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email.trim(), "password": password }))
            .send()
            .await
            .context("failed to call auth sign-in")?;

        match resp.status() {
            s if s.is_success() => {
                let data: TokenResponse = resp
                    .json()
                    .await
                    .context("failed to parse auth sign-in response")?;
                Ok(Some(Session {
                    token: data.access_token,
                    user: data.user.into(),
                }))
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => Ok(None),
            s => {
                let body = resp.text().await.unwrap_or_default();
                anyhow::bail!("auth sign-in error ({s}): {body}")
            }
        }
    }

    async fn current_user(&self, token: &str) -> anyhow::Result<Option<AdminUser>> {
        let resp = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .context("failed to call auth user lookup")?;

        match resp.status() {
            s if s.is_success() => {
                let user: RemoteUser = resp
                    .json()
                    .await
                    .context("failed to parse auth user response")?;
                Ok(Some(user.into()))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            s => anyhow::bail!("auth user lookup error ({s})"),
        }
    }

    async fn sign_out(&self, token: &str) -> anyhow::Result<()> {
        self.client
            .post(format!("{}/auth/v1/logout", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .context("failed to call auth sign-out")?
            .error_for_status()
            .context("auth sign-out returned error")?;
        Ok(())
    }
}
