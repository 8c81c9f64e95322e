use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::kernel::DEFAULT_LLM_MODEL;

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup (process env in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            database_url: lookup("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: lookup("PORT")
                .unwrap_or_else(|| "5001".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            llm_api_key: lookup("LLM_API_KEY")
                .or_else(|| lookup("OPENAI_API_KEY"))
                .context("LLM_API_KEY (or OPENAI_API_KEY) must be set")?,
            llm_base_url: lookup("LLM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
            llm_model: lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            allowed_origins,
        })
    }
}
