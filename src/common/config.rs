// src/common/config.rs
//! Environment-backed configuration for the application core.

use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

use dotenv::dotenv;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

/// Everything the core needs to talk to its two external collaborators,
/// plus where the local session mirror lives.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the REST+Auth backend that owns the profile rows.
    pub backend_url: String,
    /// Static API key sent with every backend request; anonymous calls also
    /// use it as the bearer token.
    pub backend_api_key: String,
    /// Emails granted the admin role at sign-up.
    pub admin_emails: HashSet<String>,
    pub generative_base_url: String,
    pub generative_api_key: String,
    pub generative_model: String,
    pub session_cache_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let backend_url =
            env::var("BACKEND_URL").map_err(|_| ConfigError::MissingVar("BACKEND_URL"))?;
        let backend_api_key =
            env::var("BACKEND_API_KEY").map_err(|_| ConfigError::MissingVar("BACKEND_API_KEY"))?;
        let generative_api_key =
            env::var("GEMINI_API_KEY").map_err(|_| ConfigError::MissingVar("GEMINI_API_KEY"))?;

        let generative_base_url = env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string());
        let generative_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-3-flash-preview".to_string());
        let session_cache_path = env::var("SESSION_CACHE_PATH")
            .unwrap_or_else(|_| "./taqdeem_session.json".to_string())
            .into();

        let admin_emails = parse_admin_emails(&env::var("ADMIN_EMAILS").unwrap_or_default());

        Ok(Self {
            backend_url,
            backend_api_key,
            admin_emails,
            generative_base_url,
            generative_api_key,
            generative_model,
            session_cache_path,
        })
    }
}

/// Parse the comma-separated ADMIN_EMAILS variable, lowercased.
fn parse_admin_emails(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Install the global tracing subscriber. Call once from the embedding shell
/// before constructing the app.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_emails() {
        let emails = parse_admin_emails("Admin@Taqdeem.com, ops@taqdeem.com ,,");
        assert_eq!(emails.len(), 2);
        assert!(emails.contains("admin@taqdeem.com"));
        assert!(emails.contains("ops@taqdeem.com"));
    }

    #[test]
    fn test_parse_admin_emails_empty() {
        assert!(parse_admin_emails("").is_empty());
    }
}
