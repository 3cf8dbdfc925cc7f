pub mod extract;
pub mod gemini;
pub mod ollama;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::Photo;
use crate::services::pipeline::truncate;

use gemini::GeminiProvider;
use ollama::OllamaProvider;

/// A generative model that turns a prompt (and optionally one image) into text.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn generate_text(&self, prompt: &str, image: Option<&Photo>) -> anyhow::Result<String>;
}

/// The readable part of a failed provider response. Gemini nests it under
/// `error.message` and Ollama sends `error` as a string. Anything else (a
/// proxy's HTML page) is passed through truncated.
pub(crate) fn error_detail(body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let message = parsed.as_ref().and_then(|data| {
        data["error"]["message"]
            .as_str()
            .or_else(|| data["error"].as_str())
    });
    match message {
        Some(message) => message.to_string(),
        None => truncate(body.trim(), 200).to_string(),
    }
}

/// Builds the provider selected by `LLM_PROVIDER`.
pub fn provider_from_config(config: &AppConfig) -> Result<Arc<dyn LlmProvider>, AppError> {
    match config.llm_provider.as_str() {
        "gemini" => {
            if config.gemini_api_key.trim().is_empty() {
                return Err(AppError::Config(
                    "GEMINI_API_KEY must be set when LLM_PROVIDER=gemini".to_string(),
                ));
            }
            tracing::info!(model = %config.gemini_model, "using Gemini provider");
            Ok(Arc::new(GeminiProvider::new(
                config.gemini_api_key.clone(),
                config.gemini_model.clone(),
                config.gemini_base_url.clone(),
            )))
        }
        "ollama" => {
            tracing::info!(url = %config.ollama_url, model = %config.ollama_model, "using Ollama provider");
            Ok(Arc::new(OllamaProvider::new(
                config.ollama_url.clone(),
                config.ollama_model.clone(),
            )))
        }
        other => Err(AppError::Config(format!(
            "unknown LLM_PROVIDER '{other}' (expected gemini or ollama)"
        ))),
    }
}
