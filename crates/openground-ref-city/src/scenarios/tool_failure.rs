//! Scenario 4: Tool Failure
//!
//! The weather service rejects its call. Planning aborts before the time and
//! places lookups, the failed call is still published with a terminal
//! status, and the mission moves to failed. A second mission runs with the
//! clock and places services down; both degrade to fallback values and the
//! mission plans normally.

use openground_contracts::{
    error::{MissionError, MissionResult},
    tool::{ToolCallStatus, ToolName},
};
use openground_policy::TomlMissionPolicy;

use crate::{scenarios::MissionRig, tools::StubToolRegistry};

pub async fn run_scenario(policy: &TomlMissionPolicy) -> MissionResult<()> {
    println!("=== Scenario 4: Tool Failure ===");
    println!();

    // ── 4a: weather rejects ───────────────────────────────────────────────────

    println!("  4a: weather service fault");
    let tools = StubToolRegistry::new().with_fault(ToolName::GetWeather);
    let mut rig = MissionRig::new(tools, policy);

    match rig.agent.plan_mission("Flooded crosswalk on 24th", None).await {
        Err(err @ MissionError::ToolFailed { .. }) => println!("  Planning error:         {err}"),
        Err(other) => return Err(other),
        Ok(_) => println!("  UNEXPECTED: planning succeeded"),
    }
    rig.print_events();

    let state = rig.agent.snapshot();
    let failed = state
        .tool_calls
        .iter()
        .filter(|t| t.status == ToolCallStatus::Failed)
        .count();
    println!("  Tools called:           {:?}", rig.tools.calls());
    println!("  Failed tool records:    {failed}");
    println!("  Status:                 {}", state.status);
    rig.report_journal();
    println!();

    // ── 4b: clock and places degrade ──────────────────────────────────────────

    println!("  4b: clock and places outage");
    let tools = StubToolRegistry::new()
        .with_outage(ToolName::GetTime)
        .with_outage(ToolName::SearchNearby);
    let mut rig = MissionRig::new(tools, policy);

    let plan = rig.agent.plan_mission("Loose paving stone", None).await?;
    let state = rig.agent.snapshot();
    println!("  Plan:                   {}", plan.title);
    println!(
        "  Fallback time:          {}",
        state.context.time.as_ref().map_or("-", |t| t.formatted_time.as_str())
    );
    println!(
        "  Nearby anchors:         {}",
        state.context.nearby.as_ref().map_or(0, |n| n.places.len())
    );
    println!("  Status:                 {}", state.status);
    rig.report_journal();
    println!();
    println!("  Scenario 4 complete.");
    println!();

    Ok(())
}
