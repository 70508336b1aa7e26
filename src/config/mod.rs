use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Page size used when a list endpoint is asked for pagination.
    pub page_size: usize,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base URL the signed media links are minted against.
    pub media_base_url: String,
    pub signing_secret: String,
    pub download_ttl_secs: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        if let Ok(v) = env::var("API_PAGE_SIZE") {
            self.api.page_size = v.parse().unwrap_or(self.api.page_size);
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        if let Ok(v) = env::var("MEDIA_BASE_URL") {
            self.storage.media_base_url = v;
        }
        if let Ok(v) = env::var("MEDIA_SIGNING_SECRET") {
            self.storage.signing_secret = v;
        }
        if let Ok(v) = env::var("MEDIA_DOWNLOAD_TTL_SECS") {
            self.storage.download_ttl_secs = v.parse().unwrap_or(self.storage.download_ttl_secs);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig { max_connections: 10, connection_timeout: 30 },
            api: ApiConfig { page_size: 15, enable_request_logging: true },
            security: SecurityConfig {
                jwt_secret: "dev-only-secret".to_string(),
                jwt_expiry_hours: 24 * 7,
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
            storage: StorageConfig {
                media_base_url: "http://localhost:9000/media".to_string(),
                signing_secret: "dev-only-media-secret".to_string(),
                download_ttl_secs: 86400,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig { max_connections: 20, connection_timeout: 10 },
            api: ApiConfig { page_size: 15, enable_request_logging: true },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            storage: StorageConfig {
                media_base_url: "https://media-staging.example.com".to_string(),
                signing_secret: String::new(),
                download_ttl_secs: 86400,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig { max_connections: 50, connection_timeout: 5 },
            api: ApiConfig { page_size: 15, enable_request_logging: false },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
            storage: StorageConfig {
                media_base_url: "https://media.example.com".to_string(),
                signing_secret: String::new(),
                download_ttl_secs: 86400,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults() {
        let config = AppConfig::development();
        assert_eq!(config.api.page_size, 15);
        assert!(!config.security.jwt_secret.is_empty());
    }

    #[test]
    fn production_requires_secrets_from_env() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert!(config.storage.signing_secret.is_empty());
    }
}
