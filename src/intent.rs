//! Heuristic intent classification and city extraction.
//!
//! Keyword substring tests, no scoring. City extraction takes the words after
//! the first preposition, else the first known table city mentioned. For
//! multi-clause input the first preposition wins: "weather in London for my
//! trip to Paris" yields "london for my trip to paris".

use crate::geo::GeoTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Weather,
    Distance,
    Help,
    Unknown,
}

const WEATHER_KEYWORDS: &[&str] = &["weather", "temp", "temperature"];
const DISTANCE_KEYWORDS: &[&str] = &["distance", "far", "from giza"];
const HELP_KEYWORDS: &[&str] = &["help"];

const PREPOSITIONS: &[&str] = &["in", "at", "for", "from", "to", "of", "about"];
const TRAILING_PUNCTUATION: &[char] = &[',', '.', '!', '?', ';', ':'];

/// One parsed utterance. Lives only for the duration of a single query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub raw: String,
    pub normalized: String,
    pub intent: Intent,
    pub city: Option<String>,
}

/// Parses utterances against the known cities of a table.
pub struct IntentParser<'a> {
    table: &'a GeoTable,
}

impl<'a> IntentParser<'a> {
    pub fn new(table: &'a GeoTable) -> Self {
        Self { table }
    }

    /// First matching rule wins: weather, then distance, then help.
    pub fn classify(utterance: &str) -> Intent {
        let t = utterance.to_lowercase();
        let has_any = |keywords: &[&str]| keywords.iter().any(|k| t.contains(k));

        if has_any(WEATHER_KEYWORDS) {
            Intent::Weather
        } else if has_any(DISTANCE_KEYWORDS) {
            Intent::Distance
        } else if has_any(HELP_KEYWORDS) {
            Intent::Help
        } else {
            Intent::Unknown
        }
    }

    /// Best-effort city name, lowercase.
    pub fn extract_city(&self, utterance: &str) -> Option<String> {
        let t = utterance.to_lowercase();
        after_preposition(&t).or_else(|| self.known_city_in(&t))
    }

    pub fn parse(&self, utterance: &str) -> Query {
        Query {
            raw: utterance.to_string(),
            normalized: utterance.to_lowercase(),
            intent: Self::classify(utterance),
            city: self.extract_city(utterance),
        }
    }

    fn known_city_in(&self, normalized: &str) -> Option<String> {
        self.table
            .keys()
            .find(|key| normalized.contains(key))
            .map(str::to_string)
    }
}

fn after_preposition(normalized: &str) -> Option<String> {
    let words: Vec<&str> = normalized.split_whitespace().collect();
    let idx = words.iter().position(|w| PREPOSITIONS.contains(w))?;

    let candidate = words[idx + 1..].join(" ");
    let candidate = candidate.trim_end_matches(TRAILING_PUNCTUATION).trim_end();
    if candidate.is_empty() {
        None
    } else {
        Some(candidate.to_string())
    }
}
