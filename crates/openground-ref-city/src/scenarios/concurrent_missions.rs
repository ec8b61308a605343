//! Scenario 6: Concurrent Missions
//!
//! Several agents run at once on the same runtime, sharing one tool registry
//! but nothing else. Tool latency makes their calls interleave. Each mission
//! keeps its own counters, event stream, and journal.

use std::time::Duration;

use tokio::task::JoinSet;

use openground_contracts::{
    agent::{MissionId, MissionStatus},
    error::{MissionError, MissionResult},
};
use openground_policy::TomlMissionPolicy;

use crate::{planner::photo, scenarios::MissionRig, tools::StubToolRegistry};

const OBSERVATIONS: [&str; 3] = [
    "Broken swing at Dolores Park",
    "Litter piling up by the mural",
    "Faded crosswalk paint on Guerrero",
];

/// One finished mission, as seen from outside the agent.
#[derive(Debug, Clone)]
pub struct MissionSummary {
    pub mission_id: MissionId,
    pub status: MissionStatus,
    pub steps: u32,
    pub journal_entries: usize,
    pub journal_intact: bool,
    pub terminal_hash: String,
}

/// Run every observation as its own mission and collect the summaries.
pub async fn run_missions(policy: &TomlMissionPolicy) -> MissionResult<Vec<MissionSummary>> {
    let mut set = JoinSet::new();

    for observation in OBSERVATIONS {
        let tools = StubToolRegistry::new().with_latency(Duration::from_millis(5));
        let mut rig = MissionRig::new(tools, policy);

        set.spawn(async move {
            let plan = rig.agent.plan_mission(observation, None).await?;
            for step in &plan.steps {
                rig.agent.verify_step_completion(&step.id, &photo(true)).await?;
            }

            let state = rig.agent.snapshot();
            let log = rig.journal.export_log();
            Ok::<_, MissionError>(MissionSummary {
                mission_id: state.mission_id,
                status: state.status,
                steps: state.total_steps,
                journal_entries: log.entries.len(),
                journal_intact: rig.journal.verify_integrity(),
                terminal_hash: log.terminal_hash,
            })
        });
    }

    let mut summaries = Vec::with_capacity(OBSERVATIONS.len());
    while let Some(joined) = set.join_next().await {
        let summary = joined.map_err(|e| MissionError::PlanningFailed {
            reason: format!("mission task aborted: {e}"),
        })??;
        summaries.push(summary);
    }
    Ok(summaries)
}

pub async fn run_scenario(policy: &TomlMissionPolicy) -> MissionResult<()> {
    println!("=== Scenario 6: Concurrent Missions ===");
    println!();

    let summaries = run_missions(policy).await?;
    for summary in &summaries {
        println!(
            "  {}  {:<9}  {} steps  {} journal entries  chain {}",
            summary.mission_id,
            summary.status.as_str(),
            summary.steps,
            summary.journal_entries,
            if summary.journal_intact { "VERIFIED" } else { "FAILED" }
        );
    }

    println!();
    println!("  Scenario 6 complete.");
    println!();

    Ok(())
}
