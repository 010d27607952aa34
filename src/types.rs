//! Core types for the Multi-Agent Failure Educator
//!
//! A `FailureMode` is one named entry in the MASFT taxonomy; everything
//! else here is a row shape for the interaction log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single failure mode in the taxonomy
///
/// All fields except `name` come from the data file and default to empty
/// when a record omits them; an empty string is treated as "not available"
/// by the document renderers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureMode {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub example_scenarios: Vec<String>,
    #[serde(default)]
    pub phd_level_analysis: String,
    #[serde(default)]
    pub tactical_solutions: Vec<String>,
    #[serde(default)]
    pub structural_solutions: Vec<String>,
}

/// Whether a solution addresses the symptom or the architecture
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SolutionType {
    Tactical,
    Structural,
}

impl SolutionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolutionType::Tactical => "tactical",
            SolutionType::Structural => "structural",
        }
    }

    /// Parse the lowercase wire form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tactical" => Some(SolutionType::Tactical),
            "structural" => Some(SolutionType::Structural),
            _ => None,
        }
    }
}

/// A logged user query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryLogEntry {
    pub id: i64,
    pub query: String,
    pub timestamp: DateTime<Utc>,
}

/// View count for one failure mode, as reported by `most_viewed`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewCount {
    pub failure_mode: String,
    pub view_count: i64,
}

/// Aggregate feedback statistics
///
/// `avg_rating_by_type` only contains solution types that have at least
/// one non-null rating; unrated feedback still counts toward
/// `feedback_count_by_mode`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackStats {
    pub avg_rating_by_type: BTreeMap<String, f64>,
    pub feedback_count_by_mode: BTreeMap<String, i64>,
}
