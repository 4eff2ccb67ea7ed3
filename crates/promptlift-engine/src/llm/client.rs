use super::models::{MAX_TOKENS, MODEL_ID, TEMPERATURE};
use super::parse::parse_reply;
use super::prompts::{optimize_user, OPTIMIZE_SYSTEM};
use crate::error::RemoteError;
use promptlift_core::util::truncate_str;
use promptlift_core::OptimizationResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// NVIDIA's OpenAI-compatible chat completions endpoint
pub const DEFAULT_ENDPOINT: &str = "https://integrate.api.nvidia.com/v1/chat/completions";

pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Maximum length of upstream response body quoted in error messages
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Endpoint and credentials for the remote path.
#[derive(Clone)]
pub struct RemoteSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl RemoteSettings {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for RemoteSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSettings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'static str,
    temperature: f64,
    max_tokens: u32,
    messages: [Message<'a>; 2],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> ChatRequest<'a> {
    fn optimize(user: &'a str) -> Self {
        Self {
            model: MODEL_ID,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            messages: [
                Message {
                    role: "system",
                    content: OPTIMIZE_SYSTEM,
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<MessageContent>,
}

#[derive(Deserialize)]
struct MessageContent {
    /// Kept untyped: some providers send null or non-string content
    #[serde(default)]
    content: Option<serde_json::Value>,
}

/// Delegates prompt rewriting to a chat-completion model.
///
/// One outbound request per call, no retries. Cheap to clone.
#[derive(Clone)]
pub struct RemoteOptimizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for RemoteOptimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteOptimizer")
            .field("endpoint", &self.endpoint)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

impl RemoteOptimizer {
    pub fn new(settings: RemoteSettings) -> Result<Self, RemoteError> {
        let client = create_http_client(settings.timeout)?;
        Ok(Self {
            client,
            endpoint: settings.endpoint,
            api_key: settings.api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn optimize(&self, prompt: &str) -> Result<OptimizationResult, RemoteError> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| RemoteError::Config("no API key configured".to_string()))?;

        let user = optimize_user(prompt);
        let content = self.send(api_key, &ChatRequest::optimize(&user)).await?;
        let draft = parse_reply(&content)?;
        Ok(draft.into_result(prompt))
    }

    async fn send(&self, api_key: &str, request: &ChatRequest<'_>) -> Result<String, RemoteError> {
        tracing::debug!(endpoint = %self.endpoint, model = MODEL_ID, "sending optimize request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(upstream_status_error(status, &body));
        }

        let text = response.text().await.map_err(map_transport_error)?;
        extract_content(&text)
    }
}

/// Pull `choices[0].message.content` out of a chat-completion body.
fn extract_content(body: &str) -> Result<String, RemoteError> {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|_| RemoteError::EmptyReply)?;
    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content);

    match content {
        Some(serde_json::Value::String(text)) if !text.trim().is_empty() => Ok(text),
        _ => Err(RemoteError::EmptyReply),
    }
}

fn upstream_status_error(status: reqwest::StatusCode, body: &str) -> RemoteError {
    let reason = status.canonical_reason().unwrap_or("Unknown Status");
    let body = truncate_str(body.trim(), MAX_ERROR_BODY_CHARS);
    if body.is_empty() {
        RemoteError::Upstream(format!("upstream API error: {} {}", status.as_u16(), reason))
    } else {
        RemoteError::Upstream(format!(
            "upstream API error: {} {} - {}",
            status.as_u16(),
            reason,
            body
        ))
    }
}

fn map_transport_error(err: reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        RemoteError::Upstream("upstream request timed out".to_string())
    } else if err.is_connect() {
        RemoteError::Upstream("could not connect to the upstream API".to_string())
    } else {
        RemoteError::Upstream(format!("upstream request failed: {}", err))
    }
}

/// Create a configured HTTP client for chat-completion requests
fn create_http_client(timeout: Duration) -> Result<reqwest::Client, RemoteError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| RemoteError::Config(format!("failed to create HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_has_pinned_parameters_and_two_messages() {
        let user = optimize_user("An app for runners");
        let value = serde_json::to_value(ChatRequest::optimize(&user)).unwrap();
        assert_eq!(value["model"], MODEL_ID);
        assert_eq!(value["temperature"], TEMPERATURE);
        assert_eq!(value["max_tokens"], MAX_TOKENS);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][0]["content"], OPTIMIZE_SYSTEM);
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(
            value["messages"][1]["content"],
            "User prompt:\nAn app for runners"
        );
    }

    #[test]
    fn extract_content_takes_first_choice() {
        let body = r#"{"choices":[{"message":{"content":"first"}},{"message":{"content":"second"}}]}"#;
        assert_eq!(extract_content(body).unwrap(), "first");
    }

    #[test]
    fn extract_content_rejects_missing_null_or_blank() {
        for body in [
            r#"{"choices":[]}"#,
            r#"{}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
            r#"{"choices":[{"message":{"content":"   "}}]}"#,
            r#"{"choices":[{"message":{"content":17}}]}"#,
            r#"{"choices":[{}]}"#,
            "not json",
        ] {
            assert_eq!(extract_content(body), Err(RemoteError::EmptyReply), "{body}");
        }
    }

    #[test]
    fn status_error_quotes_code_reason_and_bounded_body() {
        let body = "e".repeat(1000);
        let err = upstream_status_error(reqwest::StatusCode::BAD_GATEWAY, &body);
        let RemoteError::Upstream(message) = err else {
            panic!("expected upstream error");
        };
        assert!(message.starts_with("upstream API error: 502 Bad Gateway - eee"));
        assert_eq!(
            message.len(),
            "upstream API error: 502 Bad Gateway - ".len() + MAX_ERROR_BODY_CHARS
        );
    }

    #[test]
    fn status_error_without_body() {
        let err = upstream_status_error(reqwest::StatusCode::UNAUTHORIZED, "");
        assert_eq!(
            err,
            RemoteError::Upstream("upstream API error: 401 Unauthorized".to_string())
        );
    }

    #[test]
    fn settings_debug_redacts_key() {
        let settings = RemoteSettings::new(DEFAULT_ENDPOINT, Some("nvapi-secret".to_string()));
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("nvapi-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
