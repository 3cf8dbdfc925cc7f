use std::env;
use std::fmt;
use std::time::Duration;

use crate::services::ai::gemini;
use crate::services::pipeline::DEFAULT_TIMEOUT;

#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub llm_provider: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub provider_timeout_secs: u64,
    pub cors_allow_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            llm_provider: env::var("LLM_PROVIDER")
                .map(|v| v.trim().to_ascii_lowercase())
                .unwrap_or_else(|_| "gemini".to_string()),
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-3-pro-preview".to_string()),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| gemini::DEFAULT_BASE_URL.to_string()),
            ollama_url: env::var("OLLAMA_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            ollama_model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llava".to_string()),
            provider_timeout_secs: env::var("PROVIDER_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_TIMEOUT.as_secs()),
            cors_allow_origins: env::var("CORS_ALLOW_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }
}

// Hand-written so the API key never reaches logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.gemini_api_key.is_empty() {
            "<unset>"
        } else {
            "<redacted>"
        };
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("llm_provider", &self.llm_provider)
            .field("gemini_api_key", &key)
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("ollama_url", &self.ollama_url)
            .field("ollama_model", &self.ollama_model)
            .field("provider_timeout_secs", &self.provider_timeout_secs)
            .field("cors_allow_origins", &self.cors_allow_origins)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_api_key() {
        let config = AppConfig {
            port: 3000,
            llm_provider: "gemini".to_string(),
            gemini_api_key: "AIza-secret-value".to_string(),
            gemini_model: "gemini-3-pro-preview".to_string(),
            gemini_base_url: gemini::DEFAULT_BASE_URL.to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llava".to_string(),
            provider_timeout_secs: 60,
            cors_allow_origins: vec![],
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("AIza-secret-value"));
        assert!(printed.contains("<redacted>"));
        assert_eq!(config.provider_timeout(), Duration::from_secs(60));
    }
}
