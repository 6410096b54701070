use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::AdminUser;
use crate::services::auth::SESSION_MAX_AGE_SECS;
use crate::state::AppState;

static ADMIN_HTML: &str = include_str!("../web/admin.html");
static LOGIN_HTML: &str = include_str!("../web/login.html");

pub const SESSION_COOKIE: &str = "session";

/// Session token from `Authorization: Bearer` or the session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

pub async fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<AdminUser, AppError> {
    let token = session_token(headers).ok_or(AppError::Unauthorized)?;
    state
        .auth
        .current_user(&token)
        .await?
        .ok_or(AppError::Unauthorized)
}

// GET /admin/login
pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_HTML)
}

// GET /admin
pub async fn admin_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    match require_admin(&state, &headers).await {
        Ok(_) => Html(ADMIN_HTML).into_response(),
        Err(AppError::Unauthorized) => Redirect::to("/admin/login").into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to check admin session");
            Redirect::to("/admin/login").into_response()
        }
    }
}

// POST /api/admin/login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let session = state
        .auth
        .sign_in(&body.email, &body.password)
        .await?
        .ok_or(AppError::Unauthorized)?;

    tracing::info!(user = %session.user.email, "admin signed in");

    let cookie = format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={SESSION_MAX_AGE_SECS}",
        session.token
    );
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(serde_json::json!({ "token": session.token, "user": session.user })),
    )
        .into_response())
}

// POST /api/admin/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if let Some(token) = session_token(&headers) {
        state.auth.sign_out(&token).await?;
    }

    let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(serde_json::json!({ "ok": true })),
    )
        .into_response())
}

// GET /api/admin/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<AdminUser>, AppError> {
    Ok(Json(require_admin(&state, &headers).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_token_prefers_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("session=xyz"));
        assert_eq!(session_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn test_session_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=xyz; other=1"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("xyz"));

        let mut empty = HeaderMap::new();
        empty.insert(header::COOKIE, HeaderValue::from_static("session="));
        assert_eq!(session_token(&empty), None);
    }
}
