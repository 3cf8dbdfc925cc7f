use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::{error_detail, LlmProvider};
use crate::models::Photo;

pub struct OllamaProvider {
    url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(url: String, model: String) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            model,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate_text(&self, prompt: &str, image: Option<&Photo>) -> anyhow::Result<String> {
        let mut message = json!({
            "role": "user",
            "content": prompt,
        });
        if let Some(photo) = image {
            message["images"] = json!([photo.to_base64()]);
        }

        let body = json!({
            "model": self.model,
            "messages": [message],
            "stream": false,
        });

        let resp = self
            .client
            .post(format!("{}/api/chat", self.url))
            .json(&body)
            .send()
            .await
            .context("failed to call Ollama API")?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .context("failed to read Ollama response")?;

        if !status.is_success() {
            anyhow::bail!("Ollama API error ({}): {}", status, error_detail(&text));
        }

        let data: serde_json::Value =
            serde_json::from_str(&text).context("failed to parse Ollama response")?;

        data["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing content in Ollama response"))
    }
}
