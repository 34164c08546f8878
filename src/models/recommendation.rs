use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Scoring strategy selected by the client
///
/// Parsed from the transport's `approach` string before any scoring happens;
/// unknown spellings are rejected at the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Content,
    Collaborative,
    Hybrid,
}

impl Strategy {
    /// Parses an approach string, accepting the alias spellings the UI sends
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "content-based" | "content" | "content_based" | "contentbased" => Some(Self::Content),
            "collaborative" | "cf" | "collab" | "collaborative-filtering"
            | "collaborative_filtering" => Some(Self::Collaborative),
            "hybrid" => Some(Self::Hybrid),
            _ => None,
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Strategy::Content => "content-based",
            Strategy::Collaborative => "collaborative",
            Strategy::Hybrid => "hybrid",
        };
        write!(f, "{}", name)
    }
}

/// User profile submitted with a recommendation request
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    /// Comma-separated interests (e.g. "technology, design, mathematics")
    pub interests: String,
    /// Existing user ID, for returning users
    #[serde(default)]
    pub user_id: Option<String>,
    // Grades are accepted but not used by the scoring core; reserved as
    // future signals.
    #[serde(default)]
    pub math_grade: Option<f32>,
    #[serde(default)]
    pub science_grade: Option<f32>,
    #[serde(default)]
    pub language_grade: Option<f32>,
}

/// A scored candidate produced by one of the scorers
///
/// Ephemeral, per request; full program detail is attached by the engine
/// before the response is serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredProgram {
    pub program_id: String,
    pub score: f32,
    pub explanation: String,
}

/// Single program recommendation with full detail and explanation
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub program_id: String,
    pub program_name: String,
    pub description: String,
    pub skills: String,
    pub score: f32,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}
