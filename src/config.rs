use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub backend: String,
    pub upload_dir: String,
    pub public_base_url: String,
    pub admin_email: String,
    pub admin_password: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_key: String,
    pub storage_bucket: String,
    pub practice_name: String,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);

        Self {
            port,
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "dental.db".to_string()),
            backend: env::var("BACKEND").unwrap_or_else(|_| "sqlite".to_string()),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            admin_email: env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "changeme".to_string()),
            supabase_url: env::var("SUPABASE_URL").unwrap_or_default(),
            supabase_anon_key: env::var("SUPABASE_ANON_KEY").unwrap_or_default(),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY").unwrap_or_default(),
            storage_bucket: env::var("STORAGE_BUCKET").unwrap_or_else(|_| "images".to_string()),
            practice_name: env::var("PRACTICE_NAME")
                .unwrap_or_else(|_| "Dr. Abdu Dental Care".to_string()),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
        }
    }
}
