//! Application configuration loaded from environment variables.
//!
//! All upstream endpoints are overridable so tests and local development
//! can point them at stubs without touching the hosted services.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Identity Toolkit web API key
    pub identity_api_key: String,
    /// Identity Toolkit base URL
    pub identity_base_url: String,
    /// Generative-language API key for the study assistant
    pub assistant_api_key: String,
    /// Assistant model name
    pub assistant_model: String,
    /// Assistant API base URL
    pub assistant_base_url: String,
    /// Random-quote endpoint URL
    pub quote_url: String,
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            identity_api_key: env::var("IDENTITY_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("IDENTITY_API_KEY"))?,
            identity_base_url: env::var("IDENTITY_BASE_URL")
                .unwrap_or_else(|_| "https://identitytoolkit.googleapis.com/v1".to_string()),
            assistant_api_key: env::var("ASSISTANT_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("ASSISTANT_API_KEY"))?,
            assistant_model: env::var("ASSISTANT_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-pro".to_string()),
            assistant_base_url: env::var("ASSISTANT_BASE_URL").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta".to_string()
            }),
            quote_url: env::var("QUOTE_URL").unwrap_or_else(|_| {
                "https://api.freeapi.app/api/v1/public/quotes/quote/random".to_string()
            }),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
        })
    }

    /// Config for tests only: no hosted service is reachable through it.
    pub fn test_default() -> Self {
        Self {
            gcp_project_id: "test-project".to_string(),
            identity_api_key: "test_identity_key".to_string(),
            identity_base_url: "http://localhost:9099/identitytoolkit.googleapis.com/v1"
                .to_string(),
            assistant_api_key: "test_assistant_key".to_string(),
            assistant_model: "gemini-1.5-pro".to_string(),
            assistant_base_url: "http://localhost:9100/v1beta".to_string(),
            quote_url: "http://localhost:9101/quote".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("IDENTITY_API_KEY", "test_id_key");
        env::set_var("ASSISTANT_API_KEY", "test_ai_key");
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.identity_api_key, "test_id_key");
        assert_eq!(config.assistant_api_key, "test_ai_key");
        assert_eq!(config.port, 8080);
        assert!(config
            .identity_base_url
            .starts_with("https://identitytoolkit.googleapis.com"));
    }
}
