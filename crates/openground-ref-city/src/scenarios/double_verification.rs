//! Scenario 3: Double Verification
//!
//! A participant submits the same step twice. The second call is rejected
//! with `StepAlreadyCompleted`: nothing is emitted, the counters do not move,
//! and the mission keeps running.

use openground_contracts::error::{MissionError, MissionResult};
use openground_policy::TomlMissionPolicy;

use crate::{planner::photo, scenarios::MissionRig, tools::StubToolRegistry};

pub async fn run_scenario(policy: &TomlMissionPolicy) -> MissionResult<()> {
    println!("=== Scenario 3: Double Verification ===");
    println!();

    let mut rig = MissionRig::new(StubToolRegistry::new(), policy);
    let plan = rig
        .agent
        .plan_mission("Graffiti over the bus stop map", None)
        .await?;
    let first = &plan.steps[0].id;

    rig.agent.verify_step_completion(first, &photo(true)).await?;
    let entries_before = rig.journal.len();
    let progress_before = rig.agent.snapshot().current_step;

    match rig.agent.verify_step_completion(first, &photo(true)).await {
        Err(MissionError::StepAlreadyCompleted { step_id }) => {
            println!("  Second submission for {step_id}: REJECTED (already completed)");
        }
        Err(other) => return Err(other),
        Ok(_) => println!("  UNEXPECTED: second submission was accepted"),
    }

    let state = rig.agent.snapshot();
    println!(
        "  Progress unchanged:     {} ({} before)",
        state.current_step, progress_before
    );
    println!(
        "  Journal entries:        {} ({} before)",
        rig.journal.len(),
        entries_before
    );
    println!("  Status:                 {}", state.status);
    rig.report_journal();
    println!();
    println!("  Scenario 3 complete.");
    println!();

    Ok(())
}
