//! Scenario 1: Full Completion
//!
//! A resident reports a broken bench on a sunny weekday afternoon. The agent
//! gathers context, the planner proposes a two-step mission, and both steps
//! are verified with marked photos.
//!
//! Walk-through:
//!   1. Four tool calls: location, weather, time, nearby places
//!   2. Plan accepted by the schema validator; status → executing
//!   3. Each step verified → step_complete
//!   4. Final step → mission_complete; status → completed
//!   5. Journal chain verified

use openground_contracts::{agent::MissionStatus, error::MissionResult};
use openground_policy::TomlMissionPolicy;

use crate::{
    fixtures::{TimeFixture, WeatherFixture},
    planner::photo,
    scenarios::MissionRig,
    tools::StubToolRegistry,
};

pub const OBSERVATION: &str = "Broken bench by the Valencia Street mural";

pub async fn run_scenario(policy: &TomlMissionPolicy) -> MissionResult<()> {
    println!("=== Scenario 1: Full Completion ===");
    println!();

    let tools = StubToolRegistry::new()
        .with_weather(WeatherFixture::sunny())
        .with_time(TimeFixture::new(15, 30, false));
    let mut rig = MissionRig::new(tools, policy);

    println!("  Observation: {OBSERVATION}");
    let plan = rig.agent.plan_mission(OBSERVATION, None).await?;
    rig.print_events();

    println!();
    println!("  Plan:         {}", plan.title);
    println!("  Secret code:  {}", plan.secret_code);
    for step in &plan.steps {
        println!("    {} [{:?}] {}", step.id, step.role, step.action);
    }
    println!();

    for step in &plan.steps {
        let result = rig.agent.verify_step_completion(&step.id, &photo(true)).await?;
        println!(
            "  Verify {:<8} complete={} confidence={}%",
            step.id, result.is_complete, result.confidence
        );
    }
    rig.print_events();

    let state = rig.agent.snapshot();
    println!();
    println!("  Progress:               {}/{}", state.current_step, state.total_steps);
    println!("  Final status:           {}", state.status);
    if state.status != MissionStatus::Completed {
        println!("  UNEXPECTED: mission did not complete");
    }
    rig.report_journal();
    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}
