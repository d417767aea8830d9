// HTTP generation backend
// Forwards the job payload verbatim to a provider endpoint and hands the JSON
// body back. Non-success responses become BackendError carrying whatever
// message the provider put in its body.

use async_trait::async_trait;
use gengate_core::domain::JobPayload;
use gengate_core::port::{BackendError, GenerationBackend};
use std::time::Duration;
use tracing::debug;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Single-call backend client for one provider endpoint.
pub struct HttpGenerationBackend {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpGenerationBackend {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            url: url.into(),
            api_key,
        }
    }
}

/// Pull a human-readable message out of a provider error body. Providers
/// disagree on shape; fall back to the raw body.
pub(crate) fn error_message(body: &serde_json::Value) -> String {
    body.pointer("/error/message")
        .or_else(|| body.get("message"))
        .or_else(|| body.get("error"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl GenerationBackend for HttpGenerationBackend {
    async fn invoke(&self, payload: &JobPayload) -> Result<serde_json::Value, BackendError> {
        debug!(url = %self.url, "Invoking generation backend");

        let mut request = self.client.post(&self.url).json(payload.as_value());
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        if !status.is_success() {
            return Err(BackendError::Upstream {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_nested_error_message() {
        let body = serde_json::json!({"error": {"message": "quota exceeded"}});
        assert_eq!(error_message(&body), "quota exceeded");
    }

    #[test]
    fn error_message_falls_back_to_flat_fields() {
        assert_eq!(
            error_message(&serde_json::json!({"message": "bad prompt"})),
            "bad prompt"
        );
        assert_eq!(
            error_message(&serde_json::json!({"error": "denied"})),
            "denied"
        );
    }

    #[test]
    fn error_message_falls_back_to_raw_body() {
        let body = serde_json::json!({"code": 42});
        assert_eq!(error_message(&body), "{\"code\":42}");
    }
}
