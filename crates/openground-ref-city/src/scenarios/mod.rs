//! City reference runtime demo scenarios.
//!
//! Each scenario wires a real `MissionAgent` to the stub tools, the scripted
//! planner, the schema validator and a hash-chained journal, then walks one
//! mission through a distinct path of the lifecycle.

pub mod concurrent_missions;
pub mod double_verification;
pub mod full_completion;
pub mod incomplete_verification;
pub mod tool_failure;
pub mod weather_adaptation;

use std::sync::Arc;

use tokio::sync::mpsc;

use openground_contracts::{agent::MissionId, event::AgentEvent};
use openground_core::{sink::FanoutSink, MissionAgent};
use openground_journal::InMemoryJournal;
use openground_policy::TomlMissionPolicy;
use openground_validate::SchemaValidator;

use crate::{planner::ScriptedPlanner, tools::StubToolRegistry};

/// Everything one scenario mission needs, with handles kept for inspection.
pub struct MissionRig {
    pub tools: Arc<StubToolRegistry>,
    pub journal: InMemoryJournal,
    pub events: mpsc::UnboundedReceiver<AgentEvent>,
    pub agent: MissionAgent,
}

impl MissionRig {
    /// Wire an agent whose events reach both the journal and `events`.
    pub fn new(tools: StubToolRegistry, policy: &TomlMissionPolicy) -> Self {
        let mission_id = MissionId::generate();
        let tools = Arc::new(tools);
        let journal = InMemoryJournal::new(mission_id.clone());
        let (tx, events) = mpsc::unbounded_channel::<AgentEvent>();

        let sink = FanoutSink::new()
            .with(Arc::new(journal.clone()))
            .with(Arc::new(tx));

        let agent = MissionAgent::new(
            mission_id,
            tools.clone(),
            Arc::new(ScriptedPlanner::new()),
            Arc::new(sink),
        )
        .with_settings(policy.settings())
        .with_validator(Arc::new(SchemaValidator::new()));

        Self {
            tools,
            journal,
            events,
            agent,
        }
    }

    /// Drain and print every event delivered so far.
    pub fn print_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            println!("    {}", describe(&event));
        }
    }

    /// Print the journal verdict and return whether the chain is intact.
    pub fn report_journal(&self) -> bool {
        let intact = self.journal.verify_integrity();
        let log = self.journal.export_log();
        println!(
            "  Journal integrity:      {} ({} entr{} in chain)",
            if intact { "VERIFIED" } else { "FAILED" },
            log.entries.len(),
            if log.entries.len() == 1 { "y" } else { "ies" }
        );
        intact
    }
}

/// One-line human description of an event.
pub fn describe(event: &AgentEvent) -> String {
    match event {
        AgentEvent::Thought { thought } => format!("[{:?}] {}", thought.kind, thought.content),
        AgentEvent::ToolStart { tool } => format!("→ {} started", tool.name),
        AgentEvent::ToolComplete { tool } => match &tool.error {
            Some(err) => format!("✗ {} failed: {}", tool.name, err),
            None => format!("✓ {} completed", tool.name),
        },
        AgentEvent::StepComplete { step_id } => format!("step {step_id} complete"),
        AgentEvent::MissionComplete { mission_id } => format!("mission {mission_id} complete"),
        AgentEvent::Adaptation { reason, new_plan } => {
            format!("adapted ({reason}): {}", new_plan.title)
        }
    }
}
