use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider call timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("{0:#}")]
    Transport(anyhow::Error),
}

/// Every way an estimate, material or image-analysis request can fail.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("AI provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("unable to parse AI response: {message}")]
    ResponseParse { message: String, raw: String },

    #[error("request cancelled")]
    Cancelled,
}

impl PipelineError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn response_parse(message: impl Into<String>, raw: &str) -> Self {
        Self::ResponseParse {
            message: message.into(),
            raw: raw.to_string(),
        }
    }

    /// The provider's reply text, when the failure happened after one arrived.
    pub fn raw_reply(&self) -> Option<&str> {
        match self {
            Self::ResponseParse { raw, .. } => Some(raw),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Provider(ProviderError::Timeout(_)))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::Provider(ProviderError::Timeout(_)) => "provider_timeout",
            Self::Provider(ProviderError::Transport(_)) => "provider_error",
            Self::ResponseParse { .. } => "response_parse_error",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    /// The request body never became a typed request (bad JSON, wrong
    /// field type, missing content type).
    #[error("invalid request body: {message}")]
    InvalidBody { status: StatusCode, message: String },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidBody { status, .. } => *status,
            AppError::Pipeline(e) => match e {
                PipelineError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                PipelineError::Provider(ProviderError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
                PipelineError::Provider(_) => StatusCode::BAD_GATEWAY,
                PipelineError::ResponseParse { .. } => StatusCode::BAD_GATEWAY,
                PipelineError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            },
        };

        let mut body = serde_json::json!({ "error": self.to_string() });
        match &self {
            AppError::Config(_) => body["kind"] = "config_error".into(),
            AppError::InvalidBody { .. } => body["kind"] = "validation_error".into(),
            AppError::Pipeline(e) => {
                body["kind"] = e.kind().into();
                if let Some(raw) = e.raw_reply() {
                    body["rawResponse"] = raw.into();
                }
            }
        }

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_reply_only_on_parse_errors() {
        let err = PipelineError::response_parse("no JSON object found", "just prose");
        assert_eq!(err.raw_reply(), Some("just prose"));
        assert!(PipelineError::Cancelled.raw_reply().is_none());
    }

    #[test]
    fn test_validation_message_names_field() {
        let err = PipelineError::validation("clientName", "must not be empty");
        assert_eq!(err.to_string(), "invalid client_name: must not be empty");
        assert_eq!(err.kind(), "validation_error");
    }

    #[test]
    fn test_transport_message_includes_context_chain() {
        let source = anyhow::anyhow!("connection refused").context("failed to call Gemini API");
        let err = PipelineError::from(ProviderError::Transport(source));
        let msg = err.to_string();
        assert!(msg.contains("failed to call Gemini API"));
        assert!(msg.contains("connection refused"));
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                AppError::from(PipelineError::validation("description", "empty")),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::from(PipelineError::from(ProviderError::Timeout(
                    Duration::from_secs(60),
                ))),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                AppError::from(PipelineError::response_parse("bad", "raw")),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::InvalidBody {
                    status: StatusCode::BAD_REQUEST,
                    message: "expected value at line 1 column 1".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Config("missing key".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
