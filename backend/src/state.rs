//! Shared application state, injected into handlers as `web::Data<AppState>`.

use std::path::PathBuf;

use crate::config::Config;
use crate::db::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub upload_dir: PathBuf,
    pub jwt_secret: String,
}

impl AppState {
    pub fn from_config(config: &Config) -> AppState {
        AppState {
            db: Database::new(&config.db_path),
            upload_dir: config.upload_dir.clone(),
            jwt_secret: config.jwt_secret.clone(),
        }
    }
}
