use secrecy::{ExposeSecret, SecretString};
use std::env;

use crate::errors::{AppError, AppResult};

const DEFAULT_MONGO_CONN_STRING: &str = "mongodb://localhost:27017";

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: SecretString,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub upload_dir: String,
    pub upload_public_prefix: String,
    pub max_upload_bytes: u64,
    pub app_env: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: SecretString::from(
                env::var("MONGO_CONN_STRING")
                    .unwrap_or_else(|_| DEFAULT_MONGO_CONN_STRING.to_string()),
            ),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "schoolhub-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            upload_public_prefix: env::var("UPLOAD_PUBLIC_PREFIX")
                .unwrap_or_else(|_| "/uploads".to_string()),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    /// Rejects configuration that is only acceptable on a developer machine.
    pub fn validate_for_production(&self) -> AppResult<()> {
        if self.mongo_conn_string.expose_secret() == DEFAULT_MONGO_CONN_STRING {
            return Err(AppError::ValidationError(
                "MONGO_CONN_STRING is using the local default; set it for production".to_string(),
            ));
        }

        if self.max_upload_bytes == 0 {
            return Err(AppError::ValidationError(
                "MAX_UPLOAD_BYTES must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: SecretString::from(DEFAULT_MONGO_CONN_STRING.to_string()),
            mongo_db_name: "schoolhub-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            upload_dir: env::temp_dir()
                .join("schoolhub-test-uploads")
                .to_string_lossy()
                .into_owned(),
            upload_public_prefix: "/uploads".to_string(),
            max_upload_bytes: 1024,
            app_env: "test".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_with_defaults() {
        let config = Config::from_env();

        assert!(!config.mongo_conn_string.expose_secret().is_empty());
        assert!(!config.mongo_db_name.is_empty());
        assert!(!config.upload_public_prefix.is_empty());
    }

    #[test]
    fn test_test_config() {
        let config = Config::test_config();

        assert_eq!(config.mongo_db_name, "schoolhub-test");
        assert_eq!(config.max_upload_bytes, 1024);
        assert!(!config.is_production());
    }

    #[test]
    fn default_connection_string_is_rejected_for_production() {
        let config = Config::test_config();
        assert!(matches!(
            config.validate_for_production(),
            Err(AppError::ValidationError(_))
        ));

        let mut config = Config::test_config();
        config.mongo_conn_string = SecretString::from("mongodb://db.internal:27017".to_string());
        assert!(config.validate_for_production().is_ok());

        config.max_upload_bytes = 0;
        assert!(config.validate_for_production().is_err());
    }
}
