//! State and reading types shared across the workspace

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single accepted meter reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// When the reading was accepted
    pub date: DateTime<Utc>,
    /// Absolute meter value in kWh
    pub value: f64,
    /// Delta against the previous reading; 0 for the season baseline
    pub consumption: f64,
}

/// Whole application state, persisted as a single JSON snapshot.
///
/// The wire shape (camelCase keys, every field optional) matches the backup
/// files of the original web app, so exports and imports interchange in both
/// directions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    /// Whether first-run setup has completed
    pub onboarded: bool,
    /// Credential sent with every extraction request
    pub api_key: String,
    /// Step allowance granted for the season, in kWh
    pub allowed_steps: f64,
    /// `readings[0].value + allowed_steps` once a baseline reading exists
    pub season_limit: f64,
    /// Base64 JPEG of the season's first meter photo
    pub initial_photo: Option<String>,
    /// Append-only, in insertion order
    pub readings: Vec<Reading>,
}

impl AppState {
    /// Latest accepted reading, if any
    pub fn latest(&self) -> Option<&Reading> {
        self.readings.last()
    }

    /// Sum of all consumption deltas
    pub fn total_consumption(&self) -> f64 {
        self.readings.iter().map(|r| r.consumption).sum()
    }

    /// Whether a season reference photo is stored
    pub fn has_photo(&self) -> bool {
        self.initial_photo.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Successful extraction outcome, before it becomes a ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Numeric meter value parsed from the model reply
    pub reading: f64,
    /// Identifier of the model that produced it
    pub model_used: String,
}
