//! Tool names, tool payloads, and the per-invocation `ToolCallRecord`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The closed set of context-gathering tools the agent can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    GetLocation,
    GetWeather,
    GetTime,
    SearchNearby,
}

impl ToolName {
    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::GetLocation => "get_location",
            ToolName::GetWeather => "get_weather",
            ToolName::GetTime => "get_time",
            ToolName::SearchNearby => "search_nearby",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Tool payloads ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    /// Free-form condition label, e.g. "sunny", "light_rain".
    pub condition: String,
    /// Degrees Celsius.
    pub temperature: i32,
    pub is_outdoor_safe: bool,
    /// Relative humidity in percent.
    pub humidity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOfDay {
    /// Local hour, 0–23.
    pub hour: u8,
    pub is_daytime: bool,
    pub is_weekend: bool,
    pub formatted_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    /// Human-readable distance, e.g. "0.3 mi".
    pub distance: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NearbyPlaces {
    pub places: Vec<Place>,
}

// ── Tool call records ────────────────────────────────────────────────────────

/// Lifecycle of a single tool invocation.
///
/// `Pending` exists for wire compatibility; the agent creates records directly
/// in `Running` because it publishes them the moment it dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCallStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl ToolCallStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ToolCallStatus::Completed | ToolCallStatus::Failed)
    }
}

/// One tool invocation as seen by event consumers.
///
/// A record reaches exactly one terminal status. `output` is populated only on
/// `Completed`; `error` only on `Failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub id: String,
    pub name: ToolName,
    pub input: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub status: ToolCallStatus,
    pub timestamp: DateTime<Utc>,
}

impl ToolCallRecord {
    /// Create a record for a call that is being dispatched right now.
    pub fn running(name: ToolName, input: Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            name,
            input,
            output: None,
            error: None,
            status: ToolCallStatus::Running,
            timestamp: Utc::now(),
        }
    }

    /// Mark the call completed with `output`. No-op on an already terminal record.
    pub fn complete(&mut self, output: Value) {
        if self.status.is_terminal() {
            return;
        }
        self.output = Some(output);
        self.status = ToolCallStatus::Completed;
    }

    /// Mark the call failed. No-op on an already terminal record.
    pub fn fail(&mut self, error: impl Into<String>) {
        if self.status.is_terminal() {
            return;
        }
        self.output = None;
        self.error = Some(error.into());
        self.status = ToolCallStatus::Failed;
    }
}
