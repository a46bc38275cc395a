//! Runtime configuration, read once at startup from the environment.

use std::env;
use std::path::PathBuf;

const DEFAULT_DB_PATH: &str = "agencyops.sqlite";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub upload_dir: PathBuf,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Config {
        let jwt_secret = env::var("CLIENT_JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("CLIENT_JWT_SECRET not set, using an insecure development secret");
            "insecure-dev-secret".to_string()
        });

        Config {
            db_path: env::var("AGENCYOPS_DB")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH)),
            upload_dir: env::var("AGENCYOPS_UPLOADS")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            jwt_secret,
            host: env::var("AGENCYOPS_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("AGENCYOPS_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        }
    }
}
