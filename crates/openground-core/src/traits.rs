//! Capability traits the mission agent depends on.
//!
//! - `ToolRegistry`: context-gathering tools (location, weather, time, nearby)
//! - `PlanningService`: the generative model that proposes, judges, and adapts plans
//! - `ResponseValidator`: optional checker applied to planning-service answers
//!
//! All three are injected into `MissionAgent::new()`; the agent holds no
//! global client and never constructs its own collaborators.

use async_trait::async_trait;

use openground_contracts::{
    agent::MissionContext,
    error::MissionResult,
    image::EncodedImage,
    mission::{MissionPlan, VerificationResult},
    tool::{Location, NearbyPlaces, TimeOfDay, WeatherReport},
    validate::ValidationReport,
};

/// The four context-gathering tools, one typed method per tool.
///
/// Every method is independently failable and independently latent.
/// Implementations should degrade non-critical lookups to deterministic
/// fallback values rather than fail; the agent itself never substitutes a
/// fallback and treats any `Err` as fatal for the current operation.
#[async_trait]
pub trait ToolRegistry: Send + Sync {
    /// Resolve a location, optionally seeded by free text.
    async fn get_location(&self, query: Option<&str>) -> MissionResult<Location>;

    /// Current weather at the given coordinates.
    async fn get_weather(&self, lat: f64, lng: f64) -> MissionResult<WeatherReport>;

    /// Local time, optionally in a named timezone.
    async fn get_time(&self, timezone: Option<&str>) -> MissionResult<TimeOfDay>;

    /// Places near the coordinates matching a category query.
    async fn search_nearby(&self, lat: f64, lng: f64, query: &str)
        -> MissionResult<NearbyPlaces>;
}

/// The generative planning service.
///
/// Each call is single-shot and stateless from the agent's perspective: the
/// agent supplies everything the service needs on every call.
#[async_trait]
pub trait PlanningService: Send + Sync {
    /// Turn an observation and its environmental context into a plan.
    ///
    /// The agent overwrites the returned plan's `id` with the mission id.
    async fn propose(
        &self,
        observation: &str,
        context_summary: &str,
        image: Option<&EncodedImage>,
    ) -> MissionResult<MissionPlan>;

    /// Decide whether `photo` shows a step meeting `criteria`.
    async fn judge(&self, criteria: &str, photo: &EncodedImage)
        -> MissionResult<VerificationResult>;

    /// Re-synthesize `current_plan` after a change described by `reason`.
    ///
    /// Must not assume the agent will reuse `current_plan`; the agent treats
    /// the returned value as a brand-new plan.
    async fn adapt(
        &self,
        current_plan: &MissionPlan,
        reason: &str,
        new_context: &MissionContext,
    ) -> MissionResult<MissionPlan>;
}

/// Checks planning-service answers before the agent accepts them.
///
/// A report with `passed = false` makes the agent reject the answer as
/// `MissionError::MalformedResponse`.
pub trait ResponseValidator: Send + Sync {
    fn validate_plan(&self, plan: &MissionPlan) -> MissionResult<ValidationReport>;

    fn validate_judgment(&self, result: &VerificationResult) -> MissionResult<ValidationReport>;
}
