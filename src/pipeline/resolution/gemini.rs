use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::types::GenerativeClient;
use super::ResolutionError;
use crate::config::GenerativeConfig;

/// Blocking HTTP client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    /// Build a client from explicit configuration. The configured timeout
    /// bounds every call.
    pub fn new(config: &GenerativeConfig) -> Result<Self, ResolutionError> {
        config.validate()?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ResolutionError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.trim().to_string(),
            api_key: config.api_key.clone(),
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// `{endpoint}/{model}:generateContent`. The key travels in a header.
    pub fn generate_url(&self) -> String {
        format!("{}/{}:generateContent", self.endpoint, self.model)
    }
}

/// Request body for `:generateContent`
#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Response envelope from `:generateContent`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerativeClient for GeminiClient {
    fn submit_prompt(&self, prompt: &str) -> Result<String, ResolutionError> {
        let body = GenerateContentRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    ResolutionError::ServiceConnection(self.endpoint.clone())
                } else if e.is_timeout() {
                    ResolutionError::Timeout(self.timeout_secs)
                } else {
                    ResolutionError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ResolutionError::ServiceStatus {
                status: status.as_u16(),
                body,
            });
        }

        response.text().map_err(|e| {
            if e.is_timeout() {
                ResolutionError::Timeout(self.timeout_secs)
            } else {
                ResolutionError::HttpClient(e.to_string())
            }
        })
    }
}

/// Pull the literal answer text out of a `generateContent` envelope:
/// every `text` part of the first candidate, concatenated.
pub fn extract_response_text(envelope: &str) -> Result<String, ResolutionError> {
    let parsed: GenerateContentResponse = serde_json::from_str(envelope)
        .map_err(|e| ResolutionError::MalformedEnvelope(e.to_string()))?;

    let Some(candidate) = parsed.candidates.into_iter().next() else {
        let reason = parsed
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!("prompt blocked: {r}"))
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(ResolutionError::MalformedEnvelope(reason));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate
            .finish_reason
            .map(|r| format!("candidate has no text (finish reason {r})"))
            .unwrap_or_else(|| "candidate has no text".to_string());
        return Err(ResolutionError::MalformedEnvelope(reason));
    }

    Ok(text)
}

/// Wrap answer text in a minimal `generateContent` envelope.
pub fn envelope_for_text(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

/// Mock generative client for testing: returns a canned envelope or a
/// canned error, and counts calls.
pub struct MockGenerativeClient {
    reply: MockReply,
    calls: Arc<AtomicUsize>,
    last_prompt: Arc<Mutex<Option<String>>>,
}

enum MockReply {
    Envelope(String),
    Timeout(u64),
}

impl MockGenerativeClient {
    /// Answers every prompt with `text` wrapped in a valid envelope.
    pub fn with_text(text: &str) -> Self {
        Self::with_envelope(&envelope_for_text(text))
    }

    /// Answers every prompt with the raw envelope body.
    pub fn with_envelope(envelope: &str) -> Self {
        Self {
            reply: MockReply::Envelope(envelope.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
        }
    }

    /// Fails every call as a timed-out request.
    pub fn failing() -> Self {
        Self {
            reply: MockReply::Timeout(30),
            calls: Arc::new(AtomicUsize::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
        }
    }

    /// Shared call counter; stays readable after the mock is boxed away.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// Shared slot holding the most recent prompt.
    pub fn prompt_log(&self) -> Arc<Mutex<Option<String>>> {
        Arc::clone(&self.last_prompt)
    }
}

impl GenerativeClient for MockGenerativeClient {
    fn submit_prompt(&self, prompt: &str) -> Result<String, ResolutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut slot) = self.last_prompt.lock() {
            *slot = Some(prompt.to_string());
        }

        match &self.reply {
            MockReply::Envelope(body) => Ok(body.clone()),
            MockReply::Timeout(secs) => Err(ResolutionError::Timeout(*secs)),
        }
    }
}
