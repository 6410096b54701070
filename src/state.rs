use crate::config::AppConfig;
use crate::services::auth::AuthProvider;
use crate::services::backend::Backend;
use crate::services::storage::ImageStorage;

pub struct AppState {
    pub config: AppConfig,
    pub backend: Box<dyn Backend>,
    pub storage: Box<dyn ImageStorage>,
    pub auth: Box<dyn AuthProvider>,
}
