use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;

/// Default request body cap: room for the largest upload policy (8 MiB)
/// plus a second file and the text fields.
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub upload_dir: PathBuf,
    pub max_body_bytes: usize,
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://training.db?mode=rwc".to_string());

        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw
                .parse::<SocketAddr>()
                .map_err(|e| AppError::Config(format!("BIND_ADDR {:?} is invalid: {}", raw, e)))?,
            None => SocketAddr::from(([127, 0, 0, 1], 3000)),
        };

        let app_root = PathBuf::from(lookup("APP_ROOT").unwrap_or_else(|| ".".to_string()));
        let upload_dir = lookup("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| app_root.join("uploads").join("images"));

        let max_body_bytes = match lookup("MAX_BODY_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|e| AppError::Config(format!("MAX_BODY_BYTES {:?} is invalid: {}", raw, e)))?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self {
            database_url,
            bind_addr,
            upload_dir,
            max_body_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).expect("defaults should load");
        assert_eq!(config.database_url, "sqlite://training.db?mode=rwc");
        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert_eq!(config.upload_dir, PathBuf::from(".").join("uploads").join("images"));
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn test_upload_dir_follows_app_root() {
        let config = config_from(&[("APP_ROOT", "/srv/training")]).unwrap();
        assert_eq!(config.upload_dir, PathBuf::from("/srv/training/uploads/images"));

        let config = config_from(&[("APP_ROOT", "/srv/training"), ("UPLOAD_DIR", "/data/files")]).unwrap();
        assert_eq!(config.upload_dir, PathBuf::from("/data/files"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(config_from(&[("BIND_ADDR", "nowhere")]), Err(AppError::Config(_))));
        assert!(matches!(config_from(&[("MAX_BODY_BYTES", "-1")]), Err(AppError::Config(_))));
    }
}
