//! Language-model agent capability.
//!
//! The dispatcher talks to an [`Agent`]: given an utterance and a set of
//! callable tools, produce a response. [`OllamaAgent`] is the real one,
//! [`DisabledAgent`] stands in when no model server is around.

pub mod calculator;
pub mod ollama;
pub mod probe;
pub mod tools;

use thiserror::Error;

pub use ollama::OllamaAgent;
pub use probe::AvailabilityProbe;
pub use tools::Toolbox;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent is disabled")]
    Disabled,
    #[error("could not reach model server: {0}")]
    Transport(String),
    #[error("model server returned HTTP {code}: {body}")]
    Status { code: u16, body: String },
    #[error("invalid model response: {0}")]
    InvalidResponse(String),
    #[error("no final answer after {0} tool rounds")]
    TurnLimit(u32),
}

pub trait Agent {
    fn invoke(&self, utterance: &str, tools: &Toolbox<'_>) -> Result<String, AgentError>;
}

/// Always fails, so every query takes the rule-based path.
pub struct DisabledAgent;

impl Agent for DisabledAgent {
    fn invoke(&self, _utterance: &str, _tools: &Toolbox<'_>) -> Result<String, AgentError> {
        Err(AgentError::Disabled)
    }
}
