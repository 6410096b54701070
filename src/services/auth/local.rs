use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::{AuthProvider, SESSION_MAX_AGE_SECS};
use crate::models::{AdminUser, Session};

struct LocalSession {
    user: AdminUser,
    issued_at: Instant,
}

/// Single admin account from configuration, sessions kept in memory.
pub struct LocalAuth {
    email: String,
    password: String,
    session_ttl: Duration,
    sessions: Mutex<HashMap<String, LocalSession>>,
}

impl LocalAuth {
    pub fn new(email: String, password: String) -> Self {
        Self {
            email,
            password,
            session_ttl: Duration::from_secs(SESSION_MAX_AGE_SECS),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    fn sessions(&self) -> anyhow::Result<MutexGuard<'_, HashMap<String, LocalSession>>> {
        self.sessions
            .lock()
            .map_err(|_| anyhow::anyhow!("session store lock poisoned"))
    }

    fn is_live(&self, session: &LocalSession) -> bool {
        session.issued_at.elapsed() < self.session_ttl
    }
}

#[async_trait]
impl AuthProvider for LocalAuth {
    async fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<Option<Session>> {
        if self.password.is_empty()
            || !email.trim().eq_ignore_ascii_case(&self.email)
            || password != self.password
        {
            return Ok(None);
        }

        let user = AdminUser {
            id: "local-admin".to_string(),
            email: self.email.clone(),
        };
        let token = uuid::Uuid::new_v4().simple().to_string();

        let mut sessions = self.sessions()?;
        sessions.retain(|_, s| self.is_live(s));
        sessions.insert(
            token.clone(),
            LocalSession {
                user: user.clone(),
                issued_at: Instant::now(),
            },
        );

        Ok(Some(Session { token, user }))
    }

    async fn current_user(&self, token: &str) -> anyhow::Result<Option<AdminUser>> {
        let mut sessions = self.sessions()?;
        let Some(session) = sessions.get(token) else {
            return Ok(None);
        };
        if self.is_live(session) {
            return Ok(Some(session.user.clone()));
        }

        sessions.remove(token);
        tracing::info!("admin session expired");
        Ok(None)
    }

    async fn sign_out(&self, token: &str) -> anyhow::Result<()> {
        self.sessions()?.remove(token);
        Ok(())
    }
}
