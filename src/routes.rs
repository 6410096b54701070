use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Routes reachable without a session: the intake form and the public gallery feed.
fn public_api() -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/api/bookings", post(handlers::bookings::submit_booking))
        .route("/api/galleries", get(handlers::galleries::public_galleries))
        .layer(cors)
}

fn admin_api(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/login", post(handlers::auth::login))
        .route("/api/admin/logout", post(handlers::auth::logout))
        .route("/api/admin/me", get(handlers::auth::me))
        .route("/api/admin/bookings", get(handlers::bookings::list_bookings))
        .route(
            "/api/admin/bookings/:id/status",
            post(handlers::bookings::update_status),
        )
        .route(
            "/api/admin/bookings/:id/calendar",
            get(handlers::bookings::download_ics),
        )
        .route(
            "/api/admin/galleries",
            get(handlers::galleries::list_galleries).post(handlers::galleries::create_gallery),
        )
        .route(
            "/api/admin/galleries/:id",
            put(handlers::galleries::update_gallery).delete(handlers::galleries::delete_gallery),
        )
        .route(
            "/api/admin/galleries/:id/publish",
            post(handlers::galleries::toggle_publish),
        )
        .route(
            "/api/admin/uploads",
            post(handlers::galleries::upload_images)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::site::index_page))
        .route("/health", get(handlers::site::health))
        .route("/gallery/:id", get(handlers::site::gallery_viewer))
        .route("/admin", get(handlers::auth::admin_page))
        .route("/admin/login", get(handlers::auth::login_page))
        .merge(public_api())
        .merge(admin_api(state.config.max_upload_bytes));

    // Uploaded files only live on local disk with the sqlite backend.
    if state.config.backend == "sqlite" {
        app = app.nest_service("/uploads", ServeDir::new(&state.config.upload_dir));
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}
