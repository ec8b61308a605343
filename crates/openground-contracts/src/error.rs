//! Error types for the mission runtime.
//!
//! Every fallible operation returns `MissionResult<T>`. Variants carry enough
//! context for a consumer to decide whether to retry with a fresh agent.

use thiserror::Error;

use crate::{agent::MissionStatus, tool::ToolName};

/// The unified error type for the Open Ground mission runtime.
#[derive(Debug, Error)]
pub enum MissionError {
    /// A context-gathering tool rejected its call.
    #[error("tool '{tool}' failed: {reason}")]
    ToolFailed { tool: ToolName, reason: String },

    /// The planning service could not produce a plan or judgment.
    #[error("planning service failed: {reason}")]
    PlanningFailed { reason: String },

    /// The planning service answered, but the answer is unusable.
    #[error("malformed planning response: {reason}")]
    MalformedResponse { reason: String },

    /// The requested operation is not allowed from the current status.
    #[error("invalid mission transition: {from} -> {to}")]
    InvalidTransition { from: MissionStatus, to: MissionStatus },

    /// The step id does not belong to the active plan.
    #[error("step '{step_id}' is not part of the active plan")]
    UnknownStep { step_id: String },

    /// The step was already verified; verifying it again would double count it.
    #[error("step '{step_id}' has already been completed")]
    StepAlreadyCompleted { step_id: String },

    /// An earlier call on this agent was dropped before it finished.
    #[error("a previous {operation} call was abandoned before it finished")]
    Abandoned { operation: String },

    /// A configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A validation schema could not be applied outside of the normal path.
    #[error("schema validation error: {reason}")]
    SchemaValidation { reason: String },
}

/// Convenience alias used throughout the Open Ground crates.
pub type MissionResult<T> = Result<T, MissionError>;
