pub mod types;
pub mod classify;
pub mod styling;
pub mod heuristic;
pub mod payload;
pub mod interpret;
pub mod literal;
pub mod parser;
pub mod sanitize;
pub mod prompt;
pub mod validation;
pub mod gemini;
pub mod assist;
pub mod orchestrator;

pub use types::*;
pub use classify::*;
pub use heuristic::*;
pub use interpret::*;
pub use parser::*;
pub use gemini::*;
pub use assist::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolutionError {
    // Service errors: the outbound call failed. Recovered by the resolver.
    #[error("Generative service unreachable at {0}")]
    ServiceConnection(String),

    #[error("Generative service returned error (status {status}): {body}")]
    ServiceStatus { status: u16, body: String },

    #[error("Generative service timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Malformed service envelope: {0}")]
    MalformedEnvelope(String),

    // Parse errors: the response text held no usable object.
    #[error("Response parsing error: {0}")]
    Parse(String),

    // Validation errors: an object was found but is not a usable chart.
    #[error("Chart validation failed: {0}")]
    Validation(String),

    // The only class allowed to reach the caller, and only from constructors.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ResolutionError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Outbound-call failures (transport, status, timeout, envelope).
    pub fn is_service_error(&self) -> bool {
        matches!(
            self,
            Self::ServiceConnection(_)
                | Self::ServiceStatus { .. }
                | Self::Timeout(_)
                | Self::HttpClient(_)
                | Self::MalformedEnvelope(_)
        )
    }
}
