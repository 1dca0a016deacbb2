//! Configuration module

use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// CORS origin allow-list, only consulted in production
    pub allowed_origins: Vec<String>,

    /// Trained model artifact; the formula scorer serves when unset
    pub model_path: Option<PathBuf>,

    /// Fixed telemetry simulator seed for reproducible demo streams
    pub telemetry_seed: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or_default(),

            model_path: env::var("MODEL_PATH").ok().map(PathBuf::from),

            telemetry_seed: env::var("TELEMETRY_SEED")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            environment: "development".to_string(),
            allowed_origins: Vec::new(),
            model_path: None,
            telemetry_seed: None,
        }
    }
}
