//! Scenario 5: Weather Adaptation
//!
//! The mission starts in sunshine. After the first step is verified, rain
//! starts. The consumer re-checks the weather, the mission policy turns the
//! report into an adaptation reason, and the agent re-plans the remaining
//! steps under cover. Completed steps stay completed.

use openground_contracts::{
    agent::MissionStatus,
    error::{MissionError, MissionResult},
};
use openground_core::traits::ToolRegistry;
use openground_policy::TomlMissionPolicy;

use crate::{
    fixtures::WeatherFixture, planner::photo, scenarios::MissionRig, tools::StubToolRegistry,
};

pub async fn run_scenario(policy: &TomlMissionPolicy) -> MissionResult<()> {
    println!("=== Scenario 5: Weather Adaptation ===");
    println!();

    let tools = StubToolRegistry::new().with_weather(WeatherFixture::sunny());
    let mut rig = MissionRig::new(tools, policy);

    let plan = rig
        .agent
        .plan_mission("Wilted flowers in the Community Garden", None)
        .await?;
    println!("  Original plan:          {}", plan.title);

    let first = plan.steps[0].id.clone();
    rig.agent.verify_step_completion(&first, &photo(true)).await?;
    println!("  Verified:               {first}");

    // ── Conditions change ─────────────────────────────────────────────────────

    rig.tools.set_weather(WeatherFixture::light_rain());
    let location = rig.agent.snapshot().context.location.ok_or_else(|| {
        MissionError::ConfigError {
            reason: "mission has no location to re-check weather at".to_string(),
        }
    })?;
    let weather = rig.tools.get_weather(location.lat, location.lng).await?;
    println!(
        "  Weather now:            {}, {}°C, outdoor safe: {}",
        weather.condition, weather.temperature, weather.is_outdoor_safe
    );

    let Some(reason) = policy.adaptation_reason(&weather) else {
        println!("  No trigger matched; mission continues unchanged.");
        println!();
        return Ok(());
    };
    println!("  Trigger reason:         {reason}");

    let current = rig.agent.active_plan().cloned().unwrap_or(plan);
    let adapted = rig.agent.adapt_mission(&reason, &current).await?;
    println!("  Adapted plan:           {}", adapted.title);
    for step in &adapted.steps {
        println!("    {} [{:?}] {}", step.id, step.status, step.action);
    }

    for step in adapted.steps.iter().filter(|s| !s.is_completed()) {
        rig.agent.verify_step_completion(&step.id, &photo(true)).await?;
    }

    println!();
    rig.print_events();
    println!();

    let state = rig.agent.snapshot();
    println!("  Progress:               {}/{}", state.current_step, state.total_steps);
    println!("  Final status:           {}", state.status);
    if state.status != MissionStatus::Completed {
        println!("  UNEXPECTED: mission did not complete after adaptation");
    }
    rig.report_journal();
    println!();
    println!("  Scenario 5 complete.");
    println!();

    Ok(())
}
