use serde_json::{Map, Value};
use uuid::Uuid;

use super::classify::guess_chart_kind;
use super::payload::normalize_payload;
use super::ResolutionError;
use crate::models::{ChartKind, ChartSpecification};

/// One resolution request: the user's text plus the normalised payload.
#[derive(Debug, Clone)]
pub struct ChartRequest {
    /// Correlates log lines for one resolution.
    pub id: Uuid,
    pub text: String,
    pub payload: Option<Value>,
    /// Kind guessed from the request text by keyword.
    pub kind_hint: ChartKind,
}

impl ChartRequest {
    pub fn new(text: &str, payload: Option<&Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.to_string(),
            payload: payload.and_then(normalize_payload),
            kind_hint: guess_chart_kind(text),
        }
    }

    /// The payload as an object, when it is one.
    pub fn payload_object(&self) -> Option<&Map<String, Value>> {
        self.payload.as_ref().and_then(Value::as_object)
    }

    /// An array field of the payload object.
    pub fn payload_array(&self, key: &str) -> Option<&Vec<Value>> {
        self.payload_object()
            .and_then(|obj| obj.get(key))
            .and_then(Value::as_array)
    }
}

/// One stage of the resolution cascade.
///
/// `Ok(None)` means the request does not have the shape this stage handles;
/// `Err` means the stage tried and failed. Both send the resolver on to the
/// next stage.
pub trait ResolutionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn attempt(
        &self,
        request: &ChartRequest,
    ) -> Result<Option<ChartSpecification>, ResolutionError>;
}

/// Generative service client abstraction (allows mocking).
///
/// Implementations own the time bound on `submit_prompt`: the resolver makes
/// one blocking call and waits for it. Report expiry as
/// `ResolutionError::Timeout` so it is handled like any other service failure.
pub trait GenerativeClient {
    /// Submit one prompt and return the raw response envelope body.
    fn submit_prompt(&self, prompt: &str) -> Result<String, ResolutionError>;
}
