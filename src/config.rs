//! Configuration module

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Directory holding the trained model artifacts
    pub artifact_dir: String,

    /// Directory with the static GUI (optional at runtime)
    pub frontend_dir: String,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            artifact_dir: env::var("ARTIFACT_DIR").unwrap_or_else(|_| "artifacts".to_string()),

            frontend_dir: env::var("FRONTEND_DIR").unwrap_or_else(|_| "frontend".to_string()),

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
