//! A scripted planning service.
//!
//! `ScriptedPlanner` stands in for the generative model. It reads the same
//! context summary the model would see and applies the city's context-aware
//! rules:
//!
//! - unsafe weather → anchor the mission indoors;
//! - night → keep to well-lit places;
//! - weekend → add a step that uses the extra foot traffic;
//! - otherwise → anchor the mission at the first nearby place.
//!
//! Photos are judged by looking for [`COMPLETION_MARKER`] in the decoded
//! image payload. [`photo`] builds images with or without it.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, info};

use openground_contracts::{
    agent::{MissionContext, MissionId},
    error::MissionResult,
    image::EncodedImage,
    mission::{MissionPlan, MissionStep, StepRole, VerificationResult},
};
use openground_core::traits::PlanningService;

/// Bytes a completion photo must contain to pass verification.
pub const COMPLETION_MARKER: &str = "open-ground:done";

const INDOOR_ANCHOR: &str = "the nearest library or café";
const WELL_LIT_ANCHOR: &str = "a well-lit storefront";
const FALLBACK_ANCHOR: &str = "the closest public bench";

/// Build a JPEG data URL whose payload does or does not carry the marker.
pub fn photo(completed: bool) -> EncodedImage {
    let body = if completed {
        format!("jpeg-bytes {COMPLETION_MARKER}")
    } else {
        "jpeg-bytes blurry".to_string()
    };
    EncodedImage::from_parts("image/jpeg", &STANDARD.encode(body))
}

// ── Context parsing ──────────────────────────────────────────────────────────

/// What the planner reads out of a context summary.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Conditions {
    outdoor_safe: bool,
    daytime: bool,
    weekend: bool,
    anchor: Option<String>,
}

impl Conditions {
    /// Flags are read only from the `Weather:` and `Time:` lines. The
    /// `Location:` line can echo free text, and so can a multi-line address,
    /// so the last line with each prefix wins.
    fn from_summary(summary: &str) -> Self {
        let line = |prefix: &str| {
            summary
                .lines()
                .rev()
                .find_map(|line| line.trim().strip_prefix(prefix))
                .unwrap_or("")
        };
        let flag = |section: &str, name: &str, default: bool| {
            section
                .split(',')
                .filter_map(|part| part.trim().strip_prefix(name))
                .map(|value| value.trim() == "true")
                .last()
                .unwrap_or(default)
        };

        let weather = line("Weather:");
        let time = line("Time:");
        let anchor = line("Nearby:")
            .split(',')
            .next()
            .map(str::trim)
            .filter(|name| !name.is_empty() && *name != "none")
            .map(str::to_string);

        Self {
            outdoor_safe: flag(weather, "Outdoor safe:", true),
            daytime: flag(time, "Daytime:", true),
            weekend: flag(time, "Weekend:", false),
            anchor,
        }
    }

    fn from_context(context: &MissionContext) -> Self {
        Self {
            outdoor_safe: context.weather.as_ref().map_or(true, |w| w.is_outdoor_safe),
            daytime: context.time.as_ref().map_or(true, |t| t.is_daytime),
            weekend: context.time.as_ref().map_or(false, |t| t.is_weekend),
            anchor: context
                .nearby
                .as_ref()
                .and_then(|n| n.places.first())
                .map(|p| p.name.clone()),
        }
    }

    fn meeting_point(&self) -> String {
        if !self.outdoor_safe {
            INDOOR_ANCHOR.to_string()
        } else if !self.daytime {
            WELL_LIT_ANCHOR.to_string()
        } else {
            self.anchor.clone().unwrap_or_else(|| FALLBACK_ANCHOR.to_string())
        }
    }
}

// ── Planner ──────────────────────────────────────────────────────────────────

/// Deterministic `PlanningService` for demos and tests.
#[derive(Debug, Default, Clone)]
pub struct ScriptedPlanner;

impl ScriptedPlanner {
    pub fn new() -> Self {
        Self
    }

    fn build_plan(&self, observation: &str, conditions: &Conditions) -> MissionPlan {
        let spot = conditions.meeting_point();

        let mut steps = vec![
            MissionStep::new(
                "step-1",
                StepRole::Initiator,
                format!("Take the concern \"{observation}\" to {spot} and leave a chalk heart or a paper note where the fix should happen"),
                "Photo shows the chalk heart or note in place",
            ),
            MissionStep::new(
                "step-2",
                StepRole::Resonator,
                format!("Find the heart at {spot} and add a second mark beside it"),
                "Photo shows two marks side by side",
            ),
        ];
        if conditions.weekend {
            steps.push(MissionStep::new(
                "step-3",
                StepRole::Initiator,
                "Weekend foot traffic is high: invite one passer-by to sign the note",
                "Photo shows a third signature on the note",
            ));
        }

        let mut adaptations = vec!["rain".to_string(), "nightfall".to_string()];
        if conditions.weekend {
            adaptations.push("crowding".to_string());
        }

        MissionPlan {
            // Replaced by the agent with the mission id.
            id: MissionId::new("scripted"),
            title: format!("Shared moment at {spot}"),
            problem: observation.to_string(),
            estimated_duration: format!("{} min", steps.len() * 15),
            steps,
            secret_code: "Two taps on the shoulder, then a wave".to_string(),
            adaptations,
        }
    }
}

#[async_trait]
impl PlanningService for ScriptedPlanner {
    async fn propose(
        &self,
        observation: &str,
        context_summary: &str,
        image: Option<&EncodedImage>,
    ) -> MissionResult<MissionPlan> {
        let conditions = Conditions::from_summary(context_summary);
        debug!(?conditions, has_image = image.is_some(), "scripted planner proposing");
        Ok(self.build_plan(observation, &conditions))
    }

    async fn judge(
        &self,
        criteria: &str,
        photo: &EncodedImage,
    ) -> MissionResult<VerificationResult> {
        let decoded = STANDARD.decode(photo.payload()).ok();
        let Some(bytes) = decoded else {
            return Ok(VerificationResult {
                is_complete: false,
                confidence: 0.0,
                feedback: "The photo could not be read.".to_string(),
                detected_elements: vec![],
                suggested_next_action: Some("Take the photo again".to_string()),
            });
        };

        let marked = String::from_utf8_lossy(&bytes).contains(COMPLETION_MARKER);
        let result = if marked {
            VerificationResult {
                is_complete: true,
                confidence: 92.0,
                feedback: format!("Clear match for: {criteria}"),
                detected_elements: vec!["completion marker".to_string()],
                suggested_next_action: None,
            }
        } else {
            VerificationResult {
                is_complete: false,
                confidence: 35.0,
                feedback: format!("Could not confirm: {criteria}"),
                detected_elements: vec![],
                suggested_next_action: Some("Move closer so the marks fill the frame".to_string()),
            }
        };

        debug!(is_complete = result.is_complete, "scripted planner judged photo");
        Ok(result)
    }

    async fn adapt(
        &self,
        current_plan: &MissionPlan,
        reason: &str,
        new_context: &MissionContext,
    ) -> MissionResult<MissionPlan> {
        let spot = Conditions::from_context(new_context).meeting_point();
        info!(%reason, %spot, "scripted planner adapting plan");

        let mut plan = current_plan.clone();
        for step in plan.steps.iter_mut().filter(|s| !s.is_completed()) {
            step.action = format!("{} (moved to {spot})", step.action);
        }
        plan.title = format!("{} (adapted)", current_plan.title);
        if !plan.adaptations.iter().any(|a| a == reason) {
            plan.adaptations.push(reason.to_string());
        }
        Ok(plan)
    }
}
