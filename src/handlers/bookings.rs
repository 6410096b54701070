use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::handlers::auth::require_admin;
use crate::models::{Booking, BookingStatus};
use crate::services::bookings::{self, BookingFilter};
use crate::services::calendar::generate_ics;
use crate::services::intake::BookingForm;
use crate::state::AppState;

// POST /api/bookings
pub async fn submit_booking(
    State(state): State<Arc<AppState>>,
    Json(form): Json<BookingForm>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let today = chrono::Local::now().date_naive();
    let booking = bookings::submit_booking(state.backend.as_ref(), &form, today).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub q: Option<String>,
}

#[derive(Serialize)]
pub struct BookingListResponse {
    total: usize,
    bookings: Vec<Booking>,
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<BookingListResponse>, AppError> {
    require_admin(&state, &headers).await?;

    let filter = BookingFilter::from_params(query.status.as_deref(), query.q.as_deref())?;
    let all = state.backend.list_bookings().await?;
    let total = all.len();

    Ok(Json(BookingListResponse {
        total,
        bookings: bookings::filter_bookings(all, &filter),
    }))
}

// POST /api/admin/bookings/:id/status
#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<Booking>, AppError> {
    require_admin(&state, &headers).await?;

    let target = BookingStatus::from_name(&body.status).ok_or_else(|| {
        AppError::validation("status", format!("unknown status: {}", body.status))
    })?;
    let booking = bookings::transition_booking(state.backend.as_ref(), &id, target).await?;
    Ok(Json(booking))
}

// GET /api/admin/bookings/:id/calendar
pub async fn download_ics(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    require_admin(&state, &headers).await?;

    let booking = state
        .backend
        .get_booking(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;

    let ics = generate_ics(&booking, &state.config.practice_name)
        .map_err(|e| AppError::Export(format!("{e:#}")))?;
    let filename = format!("appointment-{id}.ics");

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        ics,
    )
        .into_response())
}
