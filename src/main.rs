use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use dental_site::config::AppConfig;
use dental_site::db;
use dental_site::routes;
use dental_site::services::auth::local::LocalAuth;
use dental_site::services::auth::supabase::SupabaseAuth;
use dental_site::services::auth::AuthProvider;
use dental_site::services::backend::sqlite::SqliteBackend;
use dental_site::services::backend::supabase::SupabaseBackend;
use dental_site::services::backend::Backend;
use dental_site::services::storage::local::LocalDiskStorage;
use dental_site::services::storage::supabase::SupabaseStorage;
use dental_site::services::storage::ImageStorage;
use dental_site::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let (backend, storage, auth): (Box<dyn Backend>, Box<dyn ImageStorage>, Box<dyn AuthProvider>) =
        match config.backend.as_str() {
            "supabase" => {
                anyhow::ensure!(!config.supabase_url.is_empty(), "SUPABASE_URL must be set when BACKEND=supabase");
                anyhow::ensure!(
                    !config.supabase_anon_key.is_empty(),
                    "SUPABASE_ANON_KEY must be set when BACKEND=supabase"
                );
                let data_key = if config.supabase_service_key.is_empty() {
                    config.supabase_anon_key.clone()
                } else {
                    config.supabase_service_key.clone()
                };
                tracing::info!("using Supabase backend ({})", config.supabase_url);
                (
                    Box::new(SupabaseBackend::new(config.supabase_url.clone(), data_key.clone())),
                    Box::new(SupabaseStorage::new(
                        config.supabase_url.clone(),
                        data_key,
                        config.storage_bucket.clone(),
                    )),
                    Box::new(SupabaseAuth::new(
                        config.supabase_url.clone(),
                        config.supabase_anon_key.clone(),
                    )),
                )
            }
            "sqlite" => {
                tracing::info!("using SQLite backend ({})", config.database_url);
                let conn = db::init_db(&config.database_url)?;
                if config.admin_password == "changeme" {
                    tracing::warn!("ADMIN_PASSWORD is the default; set it before exposing the admin area");
                }
                (
                    Box::new(SqliteBackend::new(conn)),
                    Box::new(LocalDiskStorage::new(
                        config.upload_dir.clone(),
                        &config.public_base_url,
                    )),
                    Box::new(LocalAuth::new(
                        config.admin_email.clone(),
                        config.admin_password.clone(),
                    )),
                )
            }
            other => anyhow::bail!("unknown BACKEND: {other} (expected sqlite or supabase)"),
        };

    let state = Arc::new(AppState {
        config: config.clone(),
        backend,
        storage,
        auth,
    });

    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
