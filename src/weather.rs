//! Current-conditions text from wttr.in.
//!
//! Pure pass-through: the response line is returned as-is, never parsed.
//! Failures come back as descriptive text, never as errors.

use crate::http;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_WEATHER_URL: &str = "https://wttr.in";

/// Location, condition, temperature, humidity, wind.
pub const DEFAULT_WEATHER_FORMAT: &str = "%l:+%C+%t+%h+%w";

/// wttr.in serves plain text only to curl-like clients.
pub const WEATHER_USER_AGENT: &str = "curl/7.64.1";

/// Anything that can describe the weather in a city.
pub trait WeatherSource {
    fn fetch(&self, city: &str) -> String;
}

pub struct WeatherClient {
    agent: ureq::Agent,
    base_url: String,
    format: String,
}

impl WeatherClient {
    pub fn new(base_url: impl Into<String>, format: impl Into<String>, timeout: Duration) -> Self {
        Self {
            agent: http::build_agent(timeout),
            base_url: base_url.into(),
            format: format.into(),
        }
    }

    fn url_for(&self, city: &str) -> String {
        // The format string goes in verbatim: wttr.in reads '+' as a space
        // and '%x' as a field placeholder.
        format!(
            "{}/{}?format={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(city),
            self.format
        )
    }
}

impl Default for WeatherClient {
    fn default() -> Self {
        Self::new(DEFAULT_WEATHER_URL, DEFAULT_WEATHER_FORMAT, Duration::from_secs(15))
    }
}

impl WeatherSource for WeatherClient {
    fn fetch(&self, city: &str) -> String {
        let url = self.url_for(city);
        debug!(%url, "weather request");

        match self.agent.get(&url).set("User-Agent", WEATHER_USER_AGENT).call() {
            Ok(response) => match response.into_string() {
                Ok(body) => format!("Weather: {}", body.trim()),
                Err(e) => format!("Error: {}", e),
            },
            Err(ureq::Error::Status(code, _)) => {
                format!("Error getting weather for {}: HTTP status {}", city, code)
            }
            Err(e) => format!("Error: {}", http::describe_error(&e)),
        }
    }
}
