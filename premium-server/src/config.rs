//! Configuration module

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL
    pub database_url: String,

    /// Server port
    pub port: u16,

    /// JWT secret key
    pub jwt_secret: String,

    /// JWT expiration in hours
    pub jwt_expiration_hours: u64,

    /// Model artifact; bundled reference model when unset
    pub model_path: Option<String>,

    /// Environment (development, production)
    pub environment: String,

    /// Emit JSON log lines instead of the human format
    pub log_json: bool,
}

const DEV_JWT_SECRET: &str = "insureai-dev-secret-change-in-production";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://insureai.db".to_string()),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| DEV_JWT_SECRET.to_string()),

            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24),

            model_path: premium_core::constants::get_model_path(),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),

            log_json: env::var("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// The dev secret must never sign production tokens
    pub fn check(&self) -> anyhow::Result<()> {
        if self.is_production() && self.jwt_secret == DEV_JWT_SECRET {
            anyhow::bail!("JWT_SECRET must be set when ENVIRONMENT=production");
        }
        Ok(())
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            port: 0,
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_hours: 1,
            model_path: None,
            environment: "test".to_string(),
            log_json: false,
        }
    }
}
