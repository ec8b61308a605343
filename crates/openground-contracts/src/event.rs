//! The event stream delivered to mission consumers.
//!
//! Events are emitted in exactly the order the underlying state changes
//! happen, one delivery per event. The JSON form is internally tagged with a
//! `type` field, e.g. `{"type":"step_complete","stepId":"step-1"}`.

use serde::{Deserialize, Serialize};

use crate::{
    agent::{MissionId, Thought},
    mission::MissionPlan,
    tool::ToolCallRecord,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum AgentEvent {
    /// The agent appended a thought to its narrative.
    Thought { thought: Thought },
    /// A tool call was dispatched. The record is in `running` status.
    ToolStart { tool: ToolCallRecord },
    /// A tool call reached a terminal status, `completed` or `failed`.
    ToolComplete { tool: ToolCallRecord },
    /// A step passed photo verification.
    StepComplete { step_id: String },
    /// The final step passed verification. Emitted once per mission.
    MissionComplete { mission_id: MissionId },
    /// The plan was re-synthesized; `new_plan` supersedes the previous plan.
    Adaptation { reason: String, new_plan: MissionPlan },
}

impl AgentEvent {
    /// The wire tag of this event.
    pub fn kind(&self) -> &'static str {
        match self {
            AgentEvent::Thought { .. } => "thought",
            AgentEvent::ToolStart { .. } => "tool_start",
            AgentEvent::ToolComplete { .. } => "tool_complete",
            AgentEvent::StepComplete { .. } => "step_complete",
            AgentEvent::MissionComplete { .. } => "mission_complete",
            AgentEvent::Adaptation { .. } => "adaptation",
        }
    }
}
