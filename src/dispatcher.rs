//! Query dispatcher: AI mode with a per-query rule-based fallback.
//!
//! The mode is picked once per session. In AI mode every utterance goes to
//! the agent verbatim; if the agent fails, that one query is answered by the
//! rule engine and the session stays in AI mode.

use std::fmt;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

use crate::agent::{Agent, AvailabilityProbe, Toolbox};
use crate::distance::DistanceEngine;
use crate::geo::{title_case, Chain};
use crate::intent::{Intent, IntentParser};
use crate::weather::WeatherSource;

/// Session-wide processing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Ai,
    Rule,
}

impl Mode {
    /// Ask the probe once; the answer holds for the whole session.
    pub fn detect(probe: &AvailabilityProbe) -> Self {
        if probe.is_available() {
            Mode::Ai
        } else {
            Mode::Rule
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Ai => write!(f, "AI"),
            Mode::Rule => write!(f, "rule-based"),
        }
    }
}

/// Table key of the reference point, left out of the help listing.
const REFERENCE_KEY: &str = "giza";

const NO_WEATHER_CITY: &str = "Please specify a city for weather information.";
const NO_DISTANCE_CITY: &str = "Please specify a city to calculate distance from Giza.";

const UNKNOWN_REPLY: &str = "I'm not sure what you're asking. I can help with:\n\
1. Weather information (e.g., \"What's the weather in London?\")\n\
2. Distance from Giza (e.g., \"How far is Tokyo from Giza?\")\n\
\n\
Type 'help' for more information.";

pub struct QueryDispatcher {
    mode: Mode,
    agent: Box<dyn Agent>,
    weather: Box<dyn WeatherSource>,
    distance: DistanceEngine,
    courtesy_delay: Duration,
}

impl QueryDispatcher {
    pub fn new(
        mode: Mode,
        agent: Box<dyn Agent>,
        weather: Box<dyn WeatherSource>,
        distance: DistanceEngine,
    ) -> Self {
        info!(%mode, chain = ?distance.chain(), "dispatcher ready");
        Self {
            mode,
            agent,
            weather,
            distance,
            courtesy_delay: Duration::ZERO,
        }
    }

    /// Pause between the weather and distance lookups of a weather query.
    /// Only applied when a live geocoder is in the chain.
    pub fn with_courtesy_delay(mut self, delay: Duration) -> Self {
        self.courtesy_delay = delay;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Answer one utterance. Never fails: every error becomes response text.
    pub fn handle(&self, utterance: &str) -> String {
        match self.mode {
            Mode::Rule => self.process(utterance),
            Mode::Ai => {
                let tools = Toolbox::new(self.weather.as_ref(), &self.distance);
                match self.agent.invoke(utterance, &tools) {
                    Ok(answer) => answer,
                    Err(e) => {
                        warn!(error = %e, "agent failed, falling back to rule-based processing");
                        self.process(utterance)
                    }
                }
            }
        }
    }

    /// Rule-based processing of a single utterance.
    pub fn process(&self, utterance: &str) -> String {
        let parser = IntentParser::new(self.distance.table());
        let query = parser.parse(utterance);

        match (query.intent, query.city) {
            (Intent::Weather, Some(city)) => {
                let weather = self.weather.fetch(&city);
                if self.distance.chain() == Chain::Geocoding && !self.courtesy_delay.is_zero() {
                    thread::sleep(self.courtesy_delay);
                }
                let distance = self.distance.describe(&city);
                format!("{}\n\n{}", weather, distance)
            }
            (Intent::Weather, None) => NO_WEATHER_CITY.to_string(),
            (Intent::Distance, Some(city)) => self.distance.describe(&city),
            (Intent::Distance, None) => NO_DISTANCE_CITY.to_string(),
            (Intent::Help, _) => self.help_text(),
            (Intent::Unknown, _) => UNKNOWN_REPLY.to_string(),
        }
    }

    /// Capability summary. Lists the table's cities only when the table is
    /// the sole coordinate source.
    pub fn help_text(&self) -> String {
        let table = self.distance.table();
        match self.distance.chain() {
            Chain::TableOnly => format!(
                "I can help you with:\n\
                 1. Weather information for major cities (e.g., \"What's the weather in London?\")\n\
                 2. Distance from Giza, Egypt to major cities (e.g., \"How far is Tokyo from Giza?\")\n\
                 \n\
                 Available cities: {}.",
                table
                    .keys()
                    .filter(|key| *key != REFERENCE_KEY)
                    .map(title_case)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Chain::Geocoding => "I can help you with:\n\
                 1. Weather information for any city (e.g., \"What's the weather in London?\")\n\
                 2. Distance from Giza, Egypt to any city (e.g., \"How far is Tokyo from Giza?\")"
                .to_string(),
        }
    }
}
