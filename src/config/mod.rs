use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// HS256 signing key for access and refresh tokens.
    pub jwt_secret: String,
    /// Passphrase for the reversible password cipher. The AES key is
    /// derived from it with SHA-256.
    pub encryption_key: String,
    pub access_token_expiry_hours: i64,
    pub refresh_token_expiry_days: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("ENCRYPTION_KEY") {
            self.security.encryption_key = v;
        }
        if let Ok(v) = env::var("ACCESS_TOKEN_EXPIRY_HOURS") {
            self.security.access_token_expiry_hours =
                v.parse().unwrap_or(self.security.access_token_expiry_hours);
        }
        if let Ok(v) = env::var("REFRESH_TOKEN_EXPIRY_DAYS") {
            self.security.refresh_token_expiry_days =
                v.parse().unwrap_or(self.security.refresh_token_expiry_days);
        }
        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                url: "postgres://localhost:5432/portal".to_string(),
                max_connections: 10,
            },
            security: SecurityConfig {
                jwt_secret: "dev-jwt-secret".to_string(),
                encryption_key: "dev-encryption-key".to_string(),
                access_token_expiry_hours: 24,
                refresh_token_expiry_days: 7,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 50,
            },
            security: SecurityConfig {
                // Must come from the environment in production; empty values
                // fail closed when tokens are issued or passwords encrypted.
                jwt_secret: String::new(),
                encryption_key: String::new(),
                access_token_expiry_hours: 24,
                refresh_token_expiry_days: 7,
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
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.security.access_token_expiry_hours, 24);
        assert_eq!(config.security.refresh_token_expiry_days, 7);
        assert!(!config.security.jwt_secret.is_empty());
    }

    #[test]
    fn production_requires_secrets_from_env() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert!(config.security.encryption_key.is_empty());
    }
}
