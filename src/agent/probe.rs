//! One-shot check for a local Ollama server.

use crate::http;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_PROBE_URL: &str = "http://localhost:11434/api/version";

pub struct AvailabilityProbe {
    agent: ureq::Agent,
    url: String,
}

impl AvailabilityProbe {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            agent: http::build_agent(timeout),
            url: url.into(),
        }
    }

    /// Probe the `/api/version` endpoint under an Ollama base URL.
    pub fn for_ollama(base_url: &str, timeout: Duration) -> Self {
        Self::new(format!("{}/api/version", base_url.trim_end_matches('/')), timeout)
    }

    /// True iff a single GET returns 2xx. Any error means unavailable.
    pub fn is_available(&self) -> bool {
        match self.agent.get(&self.url).call() {
            Ok(response) => (200..300).contains(&response.status()),
            Err(e) => {
                debug!(url = %self.url, error = %http::describe_error(&e), "model server unreachable");
                false
            }
        }
    }
}

impl Default for AvailabilityProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_URL, Duration::from_secs(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_support::{refused_url, serve_once};

    #[test]
    fn test_available_on_200() {
        let (url, handle) = serve_once("200 OK", r#"{"version":"0.5.7"}"#);
        let probe = AvailabilityProbe::for_ollama(&url, Duration::from_secs(2));
        assert!(probe.is_available());
        let request = &handle.join().unwrap()[0];
        assert!(request.starts_with("GET /api/version "));
    }

    #[test]
    fn test_unavailable_on_error_status() {
        let (url, handle) = serve_once("500 Internal Server Error", "");
        let probe = AvailabilityProbe::for_ollama(&url, Duration::from_secs(2));
        assert!(!probe.is_available());
        handle.join().unwrap();
    }

    #[test]
    fn test_unavailable_when_refused() {
        let probe = AvailabilityProbe::for_ollama(&refused_url(), Duration::from_secs(2));
        assert!(!probe.is_available());
    }

    #[test]
    fn test_default_targets_local_ollama() {
        assert_eq!(AvailabilityProbe::default().url, DEFAULT_PROBE_URL);
    }
}
