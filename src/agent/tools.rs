//! Tool bindings exposed to the language model.
//!
//! Schemas follow the OpenAI/Ollama function-calling format. Tool failures
//! are returned to the model as text, never raised.

use serde_json::{json, Value};
use tracing::debug;

use super::calculator;
use crate::distance::DistanceEngine;
use crate::weather::WeatherSource;

pub const WEATHER_TOOL: &str = "get_weather";
pub const DISTANCE_TOOL: &str = "distance_from_giza";
pub const CALCULATOR_TOOL: &str = "calculator";

/// The callable tools for one agent invocation.
pub struct Toolbox<'a> {
    weather: &'a dyn WeatherSource,
    distance: &'a DistanceEngine,
}

impl<'a> Toolbox<'a> {
    pub fn new(weather: &'a dyn WeatherSource, distance: &'a DistanceEngine) -> Self {
        Self { weather, distance }
    }

    /// Tool schemas for the chat request.
    pub fn definitions(&self) -> Value {
        json!([
            {
                "type": "function",
                "function": {
                    "name": WEATHER_TOOL,
                    "description": "Get current weather information for a specified city.",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "city": { "type": "string", "description": "The name of the city to get weather for" }
                        },
                        "required": ["city"]
                    }
                }
            },
            {
                "type": "function",
                "function": {
                    "name": DISTANCE_TOOL,
                    "description": "Calculate the distance between a city and Giza, Egypt in kilometers and miles.",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "city": { "type": "string", "description": "The name of the city to measure from Giza" }
                        },
                        "required": ["city"]
                    }
                }
            },
            {
                "type": "function",
                "function": {
                    "name": CALCULATOR_TOOL,
                    "description": "Evaluate an arithmetic expression, e.g. '3511.04 / 1.609' or 'sqrt(2) * 10'.",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "expression": { "type": "string", "description": "The expression to evaluate" }
                        },
                        "required": ["expression"]
                    }
                }
            }
        ])
    }

    /// Run a tool by name. `args` may be an object or a JSON-encoded string of one.
    pub fn call(&self, name: &str, args: &Value) -> String {
        let args = normalize_args(args);
        debug!(tool = name, %args, "tool call");

        match name {
            WEATHER_TOOL => match string_arg(&args, "city") {
                Some(city) => self.weather.fetch(&city),
                None => "Error: missing required argument 'city'".to_string(),
            },
            DISTANCE_TOOL => match string_arg(&args, "city") {
                Some(city) => self.distance.describe(&city),
                None => "Error: missing required argument 'city'".to_string(),
            },
            CALCULATOR_TOOL => match string_arg(&args, "expression") {
                Some(expr) => match calculator::evaluate(&expr) {
                    Ok(value) => format!("Result: {}", calculator::format_number(value)),
                    Err(e) => format!("Error: {}", e),
                },
                None => "Error: missing required argument 'expression'".to_string(),
            },
            other => format!("Error: unknown tool '{}'", other),
        }
    }
}

fn normalize_args(args: &Value) -> Value {
    match args {
        Value::String(s) => serde_json::from_str(s).unwrap_or_else(|_| json!({})),
        other => other.clone(),
    }
}

fn string_arg(args: &Value, key: &str) -> Option<String> {
    match args.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
