//! Mission identity, lifecycle state, and the agent's narrative log.
//!
//! `MissionState` is owned by exactly one `MissionAgent`. Consumers only ever
//! see clones of it, handed out by `MissionAgent::snapshot()`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{MissionError, MissionResult},
    tool::{Location, NearbyPlaces, TimeOfDay, ToolCallRecord, WeatherReport},
};

/// Opaque identifier for one mission.
///
/// Assigned once when the agent is constructed and stamped onto every plan
/// the agent accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissionId(pub String);

impl MissionId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create a fresh, unique mission id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Lifecycle ────────────────────────────────────────────────────────────────

/// The mission lifecycle.
///
/// ```text
/// planning ──► executing ◄──► verifying ──► completed
///                  │  ▲           │
///                  ▼  │           ▼
///                 adapting ◄──────┘
///
/// any non-terminal state ──► failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    Planning,
    Executing,
    Verifying,
    Adapting,
    Completed,
    Failed,
}

impl MissionStatus {
    /// `completed` and `failed` accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, MissionStatus::Completed | MissionStatus::Failed)
    }

    /// Return true if `self → next` is an edge of the lifecycle graph.
    pub fn can_transition_to(self, next: MissionStatus) -> bool {
        use MissionStatus::*;

        match (self, next) {
            (Planning, Executing)
            | (Executing, Verifying)
            | (Verifying, Executing)
            | (Verifying, Completed)
            | (Executing, Adapting)
            | (Verifying, Adapting)
            | (Adapting, Executing) => true,
            (from, Failed) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Validate `self → next` and return `next`.
    ///
    /// Returns `MissionError::InvalidTransition` for any edge not in the graph.
    pub fn transition(self, next: MissionStatus) -> MissionResult<MissionStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(MissionError::InvalidTransition { from: self, to: next })
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MissionStatus::Planning => "planning",
            MissionStatus::Executing => "executing",
            MissionStatus::Verifying => "verifying",
            MissionStatus::Adapting => "adapting",
            MissionStatus::Completed => "completed",
            MissionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Thoughts ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThoughtKind {
    Reasoning,
    Planning,
    ToolCall,
    Verification,
    Adaptation,
}

/// One entry in the agent's running narrative.
///
/// Thoughts are never used for control flow; they exist so a consumer can
/// show what the agent is doing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thought {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ThoughtKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Thought {
    pub fn new(kind: ThoughtKind, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            kind,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

// ── Context ──────────────────────────────────────────────────────────────────

/// Environmental facts gathered by the tool pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionContext {
    pub location: Option<Location>,
    pub weather: Option<WeatherReport>,
    pub time: Option<TimeOfDay>,
    pub nearby: Option<NearbyPlaces>,
    pub observations: Vec<String>,
}

impl MissionContext {
    /// Render the human-readable summary handed to the planning service.
    ///
    /// Field order is fixed: location, weather, time, nearby places.
    pub fn summary(&self) -> String {
        let location = match &self.location {
            Some(l) => l.address.clone(),
            None => "unknown".to_string(),
        };
        let weather = match &self.weather {
            Some(w) => format!(
                "{}, {}°C, Outdoor safe: {}",
                w.condition, w.temperature, w.is_outdoor_safe
            ),
            None => "unknown".to_string(),
        };
        let time = match &self.time {
            Some(t) => format!(
                "{}, Daytime: {}, Weekend: {}",
                t.formatted_time, t.is_daytime, t.is_weekend
            ),
            None => "unknown".to_string(),
        };
        let nearby = match &self.nearby {
            Some(n) if !n.places.is_empty() => n
                .places
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            _ => "none".to_string(),
        };

        format!("Location: {location}\nWeather: {weather}\nTime: {time}\nNearby: {nearby}")
    }
}

// ── State snapshot ───────────────────────────────────────────────────────────

/// Everything the agent tracks about one mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionState {
    pub mission_id: MissionId,
    /// Number of steps verified complete. Never decreases.
    pub current_step: u32,
    /// Number of steps in the accepted plan. Never decreases.
    pub total_steps: u32,
    /// Append-only.
    pub thoughts: Vec<Thought>,
    /// Append-only; records are updated in place by id.
    pub tool_calls: Vec<ToolCallRecord>,
    pub context: MissionContext,
    pub status: MissionStatus,
}

impl MissionState {
    pub fn new(mission_id: MissionId) -> Self {
        Self {
            mission_id,
            current_step: 0,
            total_steps: 0,
            thoughts: Vec::new(),
            tool_calls: Vec::new(),
            context: MissionContext::default(),
            status: MissionStatus::Planning,
        }
    }

    /// Look up a tool call record by id.
    pub fn tool_call(&self, id: &str) -> Option<&ToolCallRecord> {
        self.tool_calls.iter().find(|t| t.id == id)
    }
}

// ── Settings ─────────────────────────────────────────────────────────────────

/// Knobs the agent reads during context assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Category query sent to `search_nearby`.
    #[serde(default = "AgentSettings::default_nearby_query")]
    pub nearby_query: String,
    /// Timezone hint passed to `get_time`.
    #[serde(default)]
    pub timezone: Option<String>,
}

impl AgentSettings {
    pub const DEFAULT_NEARBY_QUERY: &'static str = "community spaces";

    fn default_nearby_query() -> String {
        Self::DEFAULT_NEARBY_QUERY.to_string()
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            nearby_query: Self::default_nearby_query(),
            timezone: None,
        }
    }
}
