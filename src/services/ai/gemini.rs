use anyhow::Context;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::{error_detail, LlmProvider};
use crate::models::Photo;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_text(&self, prompt: &str, image: Option<&Photo>) -> anyhow::Result<String> {
        let mut parts = vec![json!({ "text": prompt })];
        if let Some(photo) = image {
            parts.push(json!({
                "inline_data": {
                    "mime_type": photo.content_type,
                    "data": photo.to_base64(),
                }
            }));
        }

        let body = json!({
            "contents": [{ "role": "user", "parts": parts }],
        });

        let resp = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("failed to call Gemini API")?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .context("failed to read Gemini response")?;

        if !status.is_success() {
            anyhow::bail!("Gemini API error ({}): {}", status, error_detail(&text));
        }

        let data: Value =
            serde_json::from_str(&text).context("failed to parse Gemini response")?;
        response_text(&data)
    }
}

fn response_text(data: &Value) -> anyhow::Result<String> {
    let candidate = &data["candidates"][0];
    let Some(parts) = candidate["content"]["parts"].as_array() else {
        let reason = candidate["finishReason"]
            .as_str()
            .or_else(|| data["promptFeedback"]["blockReason"].as_str())
            .unwrap_or("no candidates");
        anyhow::bail!("missing content in Gemini response ({reason})");
    };

    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.is_empty() {
        anyhow::bail!("Gemini response contained no text parts");
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_joins_parts() {
        let data = json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] },
                "finishReason": "STOP"
            }]
        });
        assert_eq!(response_text(&data).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_response_text_reports_block_reason() {
        let data = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let err = response_text(&data).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let provider = GeminiProvider::new(
            "key".to_string(),
            "gemini-3-pro-preview".to_string(),
            "http://localhost:9999/".to_string(),
        );
        assert_eq!(provider.base_url, "http://localhost:9999");
    }
}
