//! The mission agent: owns one mission's lifecycle.
//!
//! The agent drives the mission state machine:
//!
//!   planning → executing ⇄ verifying → completed
//!                  ⇅
//!               adapting            (any non-terminal → failed)
//!
//! Every state change is published to the event sink before the method that
//! caused it returns. The agent suspends only at tool and planning-service
//! calls, and every mutating method takes `&mut self`, so one instance never
//! runs two operations at once.

use std::{collections::HashSet, future::Future, sync::Arc};

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use openground_contracts::{
    agent::{AgentSettings, MissionId, MissionState, MissionStatus, Thought, ThoughtKind},
    error::{MissionError, MissionResult},
    event::AgentEvent,
    image::EncodedImage,
    mission::{MissionPlan, StepStatus, VerificationResult},
    tool::{ToolCallRecord, ToolName},
};

use crate::{
    sink::EventSink,
    traits::{PlanningService, ResponseValidator, ToolRegistry},
};

/// Orchestrates tool calls and planning-service calls for a single mission.
///
/// Construct one agent per mission. Agents share no mutable state, so many
/// may run concurrently on the same runtime.
pub struct MissionAgent {
    state: MissionState,
    /// The plan the consumer is currently executing.
    plan: Option<MissionPlan>,
    /// Step ids that have passed verification, across adaptations.
    completed_steps: HashSet<String>,
    settings: AgentSettings,
    tools: Arc<dyn ToolRegistry>,
    planner: Arc<dyn PlanningService>,
    validator: Option<Arc<dyn ResponseValidator>>,
    events: Arc<dyn EventSink>,
    /// Set while an operation is suspended; still set if its future was dropped.
    in_flight: Option<&'static str>,
}

impl MissionAgent {
    /// Create an agent in the `planning` state.
    pub fn new(
        mission_id: MissionId,
        tools: Arc<dyn ToolRegistry>,
        planner: Arc<dyn PlanningService>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        debug!(mission_id = %mission_id, "mission agent created");
        Self {
            state: MissionState::new(mission_id),
            plan: None,
            completed_steps: HashSet::new(),
            settings: AgentSettings::default(),
            tools,
            planner,
            validator: None,
            events,
            in_flight: None,
        }
    }

    pub fn with_settings(mut self, settings: AgentSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Check every planning-service answer with `validator` before accepting it.
    pub fn with_validator(mut self, validator: Arc<dyn ResponseValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn mission_id(&self) -> &MissionId {
        &self.state.mission_id
    }

    pub fn status(&self) -> MissionStatus {
        self.state.status
    }

    /// The plan most recently accepted, with step statuses tracked by the agent.
    pub fn active_plan(&self) -> Option<&MissionPlan> {
        self.plan.as_ref()
    }

    /// A copy of the current mission state.
    pub fn snapshot(&self) -> MissionState {
        self.state.clone()
    }

    // ── planMission ──────────────────────────────────────────────────────────

    /// Gather environmental context and obtain a plan.
    ///
    /// Calls location, weather, time, and nearby search in dependency order,
    /// then hands the context summary to `PlanningService::propose`.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if the mission is past planning (state unchanged).
    /// - `Abandoned` if an earlier call was dropped mid-flight. The mission
    ///   moves to `failed`.
    /// - Any tool or planning-service error. The mission moves to `failed`
    ///   and no partial plan is returned.
    pub async fn plan_mission(
        &mut self,
        observation: &str,
        image: Option<&EncodedImage>,
    ) -> MissionResult<MissionPlan> {
        self.settle_abandoned()?;
        if self.state.status != MissionStatus::Planning {
            return Err(MissionError::InvalidTransition {
                from: self.state.status,
                to: MissionStatus::Planning,
            });
        }

        info!(
            mission_id = %self.state.mission_id,
            has_image = image.is_some(),
            "planning mission"
        );

        self.in_flight = Some("plan_mission");
        let outcome = self.assemble_and_propose(observation, image).await;
        self.in_flight = None;

        match outcome {
            Ok(plan) => Ok(plan),
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    async fn assemble_and_propose(
        &mut self,
        observation: &str,
        image: Option<&EncodedImage>,
    ) -> MissionResult<MissionPlan> {
        self.think(
            ThoughtKind::Reasoning,
            "Analyzing observation and gathering environmental context...",
        );
        self.state.context.observations.push(observation.to_string());

        let tools = Arc::clone(&self.tools);
        let timezone = self.settings.timezone.clone();
        let nearby_query = self.settings.nearby_query.clone();

        // ── Location ─────────────────────────────────────────────────────────
        self.think(ThoughtKind::ToolCall, "Checking location context...");
        let location = self
            .run_tool(
                ToolName::GetLocation,
                json!({ "query": observation }),
                tools.get_location(Some(observation)),
            )
            .await?;
        self.state.context.location = Some(location.clone());

        // ── Weather (needs location) ─────────────────────────────────────────
        self.think(ThoughtKind::ToolCall, "Checking weather conditions...");
        let weather = self
            .run_tool(
                ToolName::GetWeather,
                json!({ "lat": location.lat, "lng": location.lng }),
                tools.get_weather(location.lat, location.lng),
            )
            .await?;
        self.state.context.weather = Some(weather);

        // ── Time ─────────────────────────────────────────────────────────────
        self.think(ThoughtKind::ToolCall, "Analyzing optimal timing...");
        let time = self
            .run_tool(
                ToolName::GetTime,
                json!({ "timezone": timezone }),
                tools.get_time(timezone.as_deref()),
            )
            .await?;
        self.state.context.time = Some(time);

        // ── Nearby places (needs location) ───────────────────────────────────
        self.think(ThoughtKind::ToolCall, "Searching for nearby resources...");
        let nearby = self
            .run_tool(
                ToolName::SearchNearby,
                json!({ "lat": location.lat, "lng": location.lng, "query": nearby_query }),
                tools.search_nearby(location.lat, location.lng, &nearby_query),
            )
            .await?;
        self.state.context.nearby = Some(nearby);

        // ── Proposal ─────────────────────────────────────────────────────────
        self.think(
            ThoughtKind::Planning,
            "Synthesizing context and generating adaptive mission plan...",
        );
        let summary = self.state.context.summary();
        debug!(mission_id = %self.state.mission_id, %summary, "context assembled");

        let planner = Arc::clone(&self.planner);
        let proposed = planner.propose(observation, &summary, image).await?;
        let plan = self.accept_plan(proposed)?;

        self.state.status = self.state.status.transition(MissionStatus::Executing)?;
        self.install_plan(plan.clone());

        let anticipated = if plan.adaptations.is_empty() {
            "none".to_string()
        } else {
            plan.adaptations.join(", ")
        };
        self.think(
            ThoughtKind::Reasoning,
            format!(
                "Mission planned with {} steps. Adaptations ready for: {}",
                plan.steps.len(),
                anticipated
            ),
        );

        info!(
            mission_id = %self.state.mission_id,
            total_steps = self.state.total_steps,
            title = %plan.title,
            "mission planned"
        );

        Ok(plan)
    }

    // ── verifyStepCompletion ─────────────────────────────────────────────────

    /// Ask the planning service whether `photo` shows step `step_id` done.
    ///
    /// A complete judgment advances `current_step`, emits `step_complete`,
    /// and, on the final step, moves the mission to `completed` and emits
    /// `mission_complete`. An incomplete judgment leaves the counters alone
    /// and returns the mission to `executing`.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` unless the mission is `executing`.
    /// - `UnknownStep` if `step_id` is not in the active plan.
    /// - `StepAlreadyCompleted` if the step already passed verification.
    ///
    /// These three leave the mission untouched. A planning-service error, a
    /// malformed judgment, or an earlier call abandoned mid-flight
    /// (`Abandoned`) moves the mission to `failed`.
    pub async fn verify_step_completion(
        &mut self,
        step_id: &str,
        photo: &EncodedImage,
    ) -> MissionResult<VerificationResult> {
        self.settle_abandoned()?;
        let verifying = self.state.status.transition(MissionStatus::Verifying)?;

        let criteria = {
            let step = self
                .plan
                .as_ref()
                .and_then(|p| p.step(step_id))
                .ok_or_else(|| MissionError::UnknownStep {
                    step_id: step_id.to_string(),
                })?;
            if step.is_completed() || self.completed_steps.contains(step_id) {
                warn!(
                    mission_id = %self.state.mission_id,
                    step_id,
                    "rejecting verification of an already completed step"
                );
                return Err(MissionError::StepAlreadyCompleted {
                    step_id: step_id.to_string(),
                });
            }
            step.verification_criteria.clone()
        };

        self.state.status = verifying;
        self.think(
            ThoughtKind::Verification,
            format!("Analyzing completion photo for step {step_id}..."),
        );

        let planner = Arc::clone(&self.planner);
        self.in_flight = Some("verify_step_completion");
        let judged = planner.judge(&criteria, photo).await;
        self.in_flight = None;
        let judged = judged.and_then(|result| self.accept_judgment(result));
        let result = match judged {
            Ok(result) => result,
            Err(err) => {
                self.fail(&err);
                return Err(err);
            }
        };

        if result.is_complete {
            self.record_completion(step_id, photo, &result)?;
        } else {
            if let Some(step) = self.plan.as_mut().and_then(|p| p.step_mut(step_id)) {
                step.status = StepStatus::InProgress;
                step.verification_result = Some(result.clone());
            }
            self.think(
                ThoughtKind::Verification,
                format!("Step not yet complete. {}", result.feedback),
            );
            self.state.status = self.state.status.transition(MissionStatus::Executing)?;

            debug!(
                mission_id = %self.state.mission_id,
                step_id,
                confidence = result.confidence,
                "step verification incomplete"
            );
        }

        Ok(result)
    }

    fn record_completion(
        &mut self,
        step_id: &str,
        photo: &EncodedImage,
        result: &VerificationResult,
    ) -> MissionResult<()> {
        self.think(
            ThoughtKind::Verification,
            format!(
                "✓ Step verified! Confidence: {}%. {}",
                result.confidence, result.feedback
            ),
        );

        self.state.current_step += 1;
        self.completed_steps.insert(step_id.to_string());
        if let Some(step) = self.plan.as_mut().and_then(|p| p.step_mut(step_id)) {
            step.status = StepStatus::Completed;
            step.completion_photo = Some(photo.clone());
            step.verification_result = Some(result.clone());
        }
        self.emit(AgentEvent::StepComplete {
            step_id: step_id.to_string(),
        });

        info!(
            mission_id = %self.state.mission_id,
            step_id,
            current_step = self.state.current_step,
            total_steps = self.state.total_steps,
            "step completed"
        );

        if self.state.current_step >= self.state.total_steps {
            self.state.status = self.state.status.transition(MissionStatus::Completed)?;
            self.emit(AgentEvent::MissionComplete {
                mission_id: self.state.mission_id.clone(),
            });
            info!(mission_id = %self.state.mission_id, "mission completed");
        } else {
            self.state.status = self.state.status.transition(MissionStatus::Executing)?;
        }

        Ok(())
    }

    // ── adaptMission ─────────────────────────────────────────────────────────

    /// Re-plan after an environmental change.
    ///
    /// Re-checks the weather only; the other context fields are kept. The
    /// caller's `current_plan` is never modified: the adapted plan is a new
    /// value with the same id, and it replaces the agent's active plan.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` unless the mission is `executing` or `verifying`.
    /// - Any tool or planning-service error, an adapted plan that drops
    ///   steps the mission still needs, or `Abandoned`. The mission moves to
    ///   `failed`.
    pub async fn adapt_mission(
        &mut self,
        reason: &str,
        current_plan: &MissionPlan,
    ) -> MissionResult<MissionPlan> {
        self.settle_abandoned()?;
        self.state.status = self.state.status.transition(MissionStatus::Adapting)?;

        info!(mission_id = %self.state.mission_id, %reason, "adapting mission");
        self.think(
            ThoughtKind::Adaptation,
            format!("Conditions changed: {reason}. Adapting mission..."),
        );

        self.in_flight = Some("adapt_mission");
        let outcome = self.readapt(reason, current_plan).await;
        self.in_flight = None;

        match outcome {
            Ok(plan) => Ok(plan),
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    async fn readapt(
        &mut self,
        reason: &str,
        current_plan: &MissionPlan,
    ) -> MissionResult<MissionPlan> {
        let (lat, lng) = self
            .state
            .context
            .location
            .as_ref()
            .map(|l| (l.lat, l.lng))
            .unwrap_or((0.0, 0.0));

        let tools = Arc::clone(&self.tools);
        let weather = self
            .run_tool(
                ToolName::GetWeather,
                json!({ "lat": lat, "lng": lng }),
                tools.get_weather(lat, lng),
            )
            .await?;
        self.state.context.weather = Some(weather);

        let planner = Arc::clone(&self.planner);
        let adapted = planner
            .adapt(current_plan, reason, &self.state.context)
            .await?;
        let plan = self.accept_plan(adapted)?;

        self.think(
            ThoughtKind::Adaptation,
            format!("Mission adapted successfully. New approach: {}", plan.title),
        );
        self.install_plan(plan.clone());
        self.emit(AgentEvent::Adaptation {
            reason: reason.to_string(),
            new_plan: plan.clone(),
        });
        self.state.status = self.state.status.transition(MissionStatus::Executing)?;

        info!(
            mission_id = %self.state.mission_id,
            total_steps = self.state.total_steps,
            title = %plan.title,
            "mission adapted"
        );

        Ok(plan)
    }

    // ── Plan acceptance ──────────────────────────────────────────────────────

    /// Stamp, check, and normalize a plan from the planning service.
    ///
    /// The agent, not the planner, decides which steps are complete: steps
    /// verified earlier are marked completed and any other step claiming
    /// completion is reset to pending. A plan must keep at least as many open
    /// steps as the mission has left.
    fn accept_plan(&self, mut plan: MissionPlan) -> MissionResult<MissionPlan> {
        plan.id = self.state.mission_id.clone();
        plan.check_shape()?;

        if let Some(validator) = &self.validator {
            let report = validator.validate_plan(&plan)?;
            if !report.passed {
                return Err(MissionError::MalformedResponse {
                    reason: report.summary(),
                });
            }
        }

        for step in &mut plan.steps {
            if self.completed_steps.contains(&step.id) {
                step.status = StepStatus::Completed;
            } else if step.status == StepStatus::Completed {
                step.status = StepStatus::Pending;
            }
        }

        let open = open_steps(&plan);
        let remaining = self.state.total_steps.saturating_sub(self.state.current_step);
        if open < remaining {
            return Err(MissionError::MalformedResponse {
                reason: format!(
                    "plan leaves {open} open steps but the mission still needs {remaining}"
                ),
            });
        }

        Ok(plan)
    }

    fn accept_judgment(&self, result: VerificationResult) -> MissionResult<VerificationResult> {
        result.check_shape()?;

        if let Some(validator) = &self.validator {
            let report = validator.validate_judgment(&result)?;
            if !report.passed {
                return Err(MissionError::MalformedResponse {
                    reason: report.summary(),
                });
            }
        }

        Ok(result)
    }

    /// Make `plan` the active plan. `total_steps` only ever grows.
    fn install_plan(&mut self, plan: MissionPlan) {
        let needed = self.state.current_step + open_steps(&plan);
        self.state.total_steps = self.state.total_steps.max(needed);
        self.plan = Some(plan);
    }

    // ── Tool dispatch ────────────────────────────────────────────────────────

    /// Run one tool call, bracketing it with `tool_start` / `tool_complete`.
    ///
    /// The record is published as `running` before `call` is polled and is
    /// always finished, `completed` or `failed`, before this returns.
    async fn run_tool<T, F>(&mut self, name: ToolName, input: Value, call: F) -> MissionResult<T>
    where
        T: Serialize,
        F: Future<Output = MissionResult<T>>,
    {
        let record = ToolCallRecord::running(name, input);
        let index = self.state.tool_calls.len();
        self.state.tool_calls.push(record.clone());
        self.emit(AgentEvent::ToolStart { tool: record });

        debug!(mission_id = %self.state.mission_id, tool = %name, "tool call started");

        let outcome = call.await.and_then(|value| {
            serde_json::to_value(&value)
                .map(|json| (value, json))
                .map_err(|e| MissionError::ToolFailed {
                    tool: name,
                    reason: format!("tool output is not serializable: {e}"),
                })
        });

        let record = &mut self.state.tool_calls[index];
        let result = match outcome {
            Ok((value, json)) => {
                record.complete(json);
                Ok(value)
            }
            Err(err) => {
                warn!(
                    mission_id = %self.state.mission_id,
                    tool = %name,
                    error = %err,
                    "tool call failed"
                );
                record.fail(err.to_string());
                Err(err)
            }
        };

        let finished = record.clone();
        self.emit(AgentEvent::ToolComplete { tool: finished });
        result
    }

    // ── Helpers ──────────────────────────────────────────────────────────────

    /// Fail the mission if an earlier call was dropped while suspended.
    ///
    /// Tool records left `running` by the dropped call are finished as
    /// `failed` and their `tool_complete` events are published.
    fn settle_abandoned(&mut self) -> MissionResult<()> {
        let Some(operation) = self.in_flight.take() else {
            return Ok(());
        };

        let mut orphaned = vec![];
        for record in self
            .state
            .tool_calls
            .iter_mut()
            .filter(|r| !r.status.is_terminal())
        {
            record.fail(format!("abandoned: {operation} was dropped mid-call"));
            orphaned.push(record.clone());
        }
        for tool in orphaned {
            self.emit(AgentEvent::ToolComplete { tool });
        }

        let err = MissionError::Abandoned {
            operation: operation.to_string(),
        };
        self.fail(&err);
        Err(err)
    }

    fn think(&mut self, kind: ThoughtKind, content: impl Into<String>) {
        let thought = Thought::new(kind, content);
        self.state.thoughts.push(thought.clone());
        self.emit(AgentEvent::Thought { thought });
    }

    fn emit(&self, event: AgentEvent) {
        self.events.emit(event);
    }

    fn fail(&mut self, err: &MissionError) {
        if self.state.status.is_terminal() {
            return;
        }
        warn!(
            mission_id = %self.state.mission_id,
            from = %self.state.status,
            error = %err,
            "mission failed"
        );
        self.state.status = MissionStatus::Failed;
    }
}

fn open_steps(plan: &MissionPlan) -> u32 {
    (plan.steps.len() - plan.completed_steps()) as u32
}

// ── Tests ────────────────────────────────────────────────────────────────────
