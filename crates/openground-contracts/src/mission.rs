//! Mission plans, their steps, and photo verification results.
//!
//! Plans are produced by the planning service and treated as immutable values.
//! Adaptation never edits a plan in place; it yields a new `MissionPlan` that
//! carries the same `id`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    agent::MissionId,
    error::{MissionError, MissionResult},
    image::EncodedImage,
};

/// Which participant performs a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepRole {
    /// The person who reported the observation and starts the mission.
    Initiator,
    /// The stranger who completes the shared moment.
    Resonator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
    Skipped,
}

/// One independently verifiable unit of a mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionStep {
    pub id: String,
    pub role: StepRole,
    pub action: String,
    /// What a completion photo must show.
    pub verification_criteria: String,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_photo: Option<EncodedImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_result: Option<VerificationResult>,
}

impl MissionStep {
    pub fn new(
        id: impl Into<String>,
        role: StepRole,
        action: impl Into<String>,
        verification_criteria: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            action: action.into(),
            verification_criteria: verification_criteria.into(),
            status: StepStatus::Pending,
            completion_photo: None,
            verification_result: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == StepStatus::Completed
    }
}

/// A structured, multi-step mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionPlan {
    /// Always equal to the owning mission's id once accepted by the agent.
    pub id: MissionId,
    pub title: String,
    pub problem: String,
    pub steps: Vec<MissionStep>,
    /// A playful phrase or gesture the two participants exchange.
    pub secret_code: String,
    /// Conditions the plan already anticipates, e.g. "rain".
    #[serde(default)]
    pub adaptations: Vec<String>,
    pub estimated_duration: String,
}

impl MissionPlan {
    pub fn step(&self, step_id: &str) -> Option<&MissionStep> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    pub fn step_mut(&mut self, step_id: &str) -> Option<&mut MissionStep> {
        self.steps.iter_mut().find(|s| s.id == step_id)
    }

    pub fn completed_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.is_completed()).count()
    }

    /// Minimal structural checks every accepted plan must pass.
    ///
    /// The plan needs at least one step, and step ids must be non-empty and
    /// unique so verification can address them.
    pub fn check_shape(&self) -> MissionResult<()> {
        if self.steps.is_empty() {
            return Err(MissionError::MalformedResponse {
                reason: "plan contains no steps".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for step in &self.steps {
            if step.id.trim().is_empty() {
                return Err(MissionError::MalformedResponse {
                    reason: "plan contains a step with an empty id".to_string(),
                });
            }
            if !seen.insert(step.id.as_str()) {
                return Err(MissionError::MalformedResponse {
                    reason: format!("plan contains duplicate step id '{}'", step.id),
                });
            }
        }

        Ok(())
    }
}

/// The planning service's judgment of a completion photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub is_complete: bool,
    /// 0–100.
    pub confidence: f64,
    pub feedback: String,
    #[serde(default)]
    pub detected_elements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_next_action: Option<String>,
}

impl VerificationResult {
    /// Reject judgments whose confidence falls outside `[0, 100]`.
    pub fn check_shape(&self) -> MissionResult<()> {
        if !self.confidence.is_finite() || !(0.0..=100.0).contains(&self.confidence) {
            return Err(MissionError::MalformedResponse {
                reason: format!(
                    "verification confidence {} is outside [0, 100]",
                    self.confidence
                ),
            });
        }
        Ok(())
    }
}
