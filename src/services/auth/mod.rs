pub mod local;
pub mod supabase;

use async_trait::async_trait;

use crate::models::{AdminUser, Session};

/// Lifetime of an admin session, for both the cookie and server-side tokens.
pub const SESSION_MAX_AGE_SECS: u64 = 8 * 60 * 60;

/// Gates the admin area: a caller is either signed in or not.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Returns `None` when the credentials are rejected.
    async fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<Option<Session>>;

    async fn current_user(&self, token: &str) -> anyhow::Result<Option<AdminUser>>;

    async fn sign_out(&self, token: &str) -> anyhow::Result<()>;
}
