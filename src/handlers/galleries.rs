use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::handlers::auth::require_admin;
use crate::models::{Gallery, GalleryImage, GalleryInput};
use crate::services::galleries::{self, UploadFile};
use crate::state::AppState;

// GET /api/galleries
pub async fn public_galleries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Gallery>>, AppError> {
    Ok(Json(state.backend.list_galleries(true).await?))
}

// GET /api/admin/galleries
#[derive(Deserialize)]
pub struct GalleriesQuery {
    pub q: Option<String>,
}

pub async fn list_galleries(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<GalleriesQuery>,
) -> Result<Json<Vec<Gallery>>, AppError> {
    require_admin(&state, &headers).await?;

    let all = state.backend.list_galleries(false).await?;
    Ok(Json(galleries::search_galleries(all, query.q.as_deref())))
}

// POST /api/admin/galleries
pub async fn create_gallery(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(input): Json<GalleryInput>,
) -> Result<(StatusCode, Json<Gallery>), AppError> {
    require_admin(&state, &headers).await?;

    let gallery = galleries::create_gallery(state.backend.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(gallery)))
}

// PUT /api/admin/galleries/:id
pub async fn update_gallery(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<GalleryInput>,
) -> Result<Json<Gallery>, AppError> {
    require_admin(&state, &headers).await?;

    let gallery = galleries::update_gallery(state.backend.as_ref(), &id, input).await?;
    Ok(Json(gallery))
}

// DELETE /api/admin/galleries/:id
pub async fn delete_gallery(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers).await?;

    galleries::delete_gallery(state.backend.as_ref(), &id).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

// POST /api/admin/galleries/:id/publish
pub async fn toggle_publish(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers).await?;

    let published = galleries::toggle_published(state.backend.as_ref(), &id).await?;
    Ok(Json(serde_json::json!({ "id": id, "published": published })))
}

// POST /api/admin/uploads
pub async fn upload_images(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Vec<GalleryImage>>, AppError> {
    require_admin(&state, &headers).await?;

    let mut files = vec![];
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation("files", format!("invalid upload: {e}")))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(AppError::validation(
                "files",
                format!("{file_name} is not an image"),
            ));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::validation("files", format!("invalid upload: {e}")))?;

        files.push(UploadFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    if files.is_empty() {
        return Err(AppError::validation("files", "No images were provided"));
    }

    let images = galleries::upload_images(state.storage.as_ref(), files).await?;
    Ok(Json(images))
}
