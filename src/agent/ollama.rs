//! Ollama chat agent with native tool calling.
//!
//! user_query → [LOOP: model replies → run requested tools → feed results back] → final answer

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::tools::Toolbox;
use super::{Agent, AgentError};
use crate::geo::Chain;
use crate::http;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2:latest";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TURNS: u32 = 5;

// ─── Wire types ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_name: Option<String>,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
            ..Default::default()
        }
    }

    fn tool(name: &str, output: String) -> Self {
        Self {
            tool_name: Some(name.to_string()),
            ..Self::new("tool", output)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    tools: &'a Value,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

// ─── System prompt ──────────────────────────────────────────────

/// Persona and output conventions for the model.
pub fn system_prompt(chain: Chain) -> String {
    let coverage = match chain {
        Chain::TableOnly => {
            "For cities not in your database, let the user know which major cities you can calculate distances for."
        }
        Chain::Geocoding => "You can look up the distance for any city in the world.",
    };
    format!(
        "You are a helpful assistant that provides weather information and calculates distances from Giza, Egypt.\n\
         You can get the current weather for any city and calculate how far it is from the Great Pyramids of Giza.\n\
         Always provide both metric and imperial units when discussing distances.\n\
         When you report the weather for a city, also report its distance from Giza.\n\
         Be friendly and informative in your responses.\n\
         {}",
        coverage
    )
}

// ─── Agent ──────────────────────────────────────────────────────

pub struct OllamaAgent {
    http: ureq::Agent,
    base_url: String,
    model: String,
    temperature: f64,
    max_turns: u32,
    system_prompt: String,
}

impl OllamaAgent {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: http::build_agent(timeout),
            base_url: base_url.into(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_turns: DEFAULT_MAX_TURNS,
            system_prompt: system_prompt(Chain::TableOnly),
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns.max(1);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat(&self, messages: &[ChatMessage], tools: &Value) -> Result<ChatMessage, AgentError> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let request = ChatRequest {
            model: &self.model,
            messages,
            tools,
            stream: false,
            options: ChatOptions { temperature: self.temperature },
        };

        debug!(%url, model = %self.model, messages = messages.len(), "chat request");

        let response = self.http.post(&url).send_json(&request).map_err(|e| match e {
            ureq::Error::Status(code, resp) => AgentError::Status {
                code,
                body: resp.into_string().unwrap_or_default(),
            },
            other => AgentError::Transport(http::describe_error(&other)),
        })?;

        let parsed: ChatResponse = response
            .into_json()
            .map_err(|e| AgentError::InvalidResponse(e.to_string()))?;

        Ok(parsed.message)
    }
}

impl Default for OllamaAgent {
    fn default() -> Self {
        Self::new(DEFAULT_OLLAMA_URL, DEFAULT_MODEL, Duration::from_secs(120))
    }
}

impl Agent for OllamaAgent {
    fn invoke(&self, utterance: &str, tools: &Toolbox<'_>) -> Result<String, AgentError> {
        let definitions = tools.definitions();
        let mut messages = vec![
            ChatMessage::new("system", self.system_prompt.as_str()),
            ChatMessage::new("user", utterance),
        ];

        for turn in 1..=self.max_turns {
            let reply = self.chat(&messages, &definitions)?;

            if reply.tool_calls.is_empty() {
                let answer = reply.content.trim();
                if answer.is_empty() {
                    return Err(AgentError::InvalidResponse("empty reply".into()));
                }
                return Ok(answer.to_string());
            }

            debug!(turn, calls = reply.tool_calls.len(), "model requested tools");
            let calls = reply.tool_calls.clone();
            messages.push(reply);
            for call in calls {
                let output = tools.call(&call.function.name, &call.function.arguments);
                messages.push(ChatMessage::tool(&call.function.name, output));
            }
        }

        Err(AgentError::TurnLimit(self.max_turns))
    }
}
