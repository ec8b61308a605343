//! Scenario 2: Incomplete Verification
//!
//! The first photo for step one is blurry. The judgment comes back
//! incomplete, counters stay put, and the mission returns to executing. A
//! second, clear photo completes the step.

use openground_contracts::error::MissionResult;
use openground_policy::TomlMissionPolicy;

use crate::{planner::photo, scenarios::MissionRig, tools::StubToolRegistry};

pub async fn run_scenario(policy: &TomlMissionPolicy) -> MissionResult<()> {
    println!("=== Scenario 2: Incomplete Verification ===");
    println!();

    let mut rig = MissionRig::new(StubToolRegistry::new(), policy);
    let plan = rig
        .agent
        .plan_mission("Overflowing planter outside the laundromat", None)
        .await?;
    let first = &plan.steps[0].id;

    let blurry = rig.agent.verify_step_completion(first, &photo(false)).await?;
    println!("  Blurry photo:   complete={} ({})", blurry.is_complete, blurry.feedback);
    if let Some(next) = &blurry.suggested_next_action {
        println!("  Suggested:      {next}");
    }
    let state = rig.agent.snapshot();
    println!(
        "  After retry needed: step {}/{}, status {}",
        state.current_step, state.total_steps, state.status
    );

    let clear = rig.agent.verify_step_completion(first, &photo(true)).await?;
    println!("  Clear photo:    complete={} ({})", clear.is_complete, clear.feedback);
    let state = rig.agent.snapshot();
    println!(
        "  After clear photo:  step {}/{}, status {}",
        state.current_step, state.total_steps, state.status
    );

    println!();
    rig.print_events();
    println!();
    rig.report_journal();
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}
