//! In-memory journal.
//!
//! `InMemoryJournal` is an `EventSink`: hand it to a `MissionAgent` (alone or
//! inside a `FanoutSink`) and every emitted event is appended to the chain.
//! Use `export_log()` once the mission ends and `verify_integrity()` at any
//! time to confirm nothing was altered in memory.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::info;

use openground_contracts::{agent::MissionId, event::AgentEvent};
use openground_core::sink::EventSink;

use crate::{
    chain::{hash_entry, verify_chain},
    entry::{JournalEntry, MissionLog},
};

// ── Internal mutable state ────────────────────────────────────────────────────

pub(crate) struct JournalState {
    pub(crate) entries: Vec<JournalEntry>,
    pub(crate) sequence: u64,
    pub(crate) last_hash: String,
}

// ── Public journal ────────────────────────────────────────────────────────────

/// An append-only journal of one mission's events.
///
/// Cloning is cheap and every clone appends to the same chain.
#[derive(Clone)]
pub struct InMemoryJournal {
    mission_id: MissionId,
    pub(crate) state: Arc<Mutex<JournalState>>,
}

impl InMemoryJournal {
    pub fn new(mission_id: MissionId) -> Self {
        let state = JournalState {
            entries: Vec::new(),
            sequence: 0,
            last_hash: JournalEntry::GENESIS_HASH.to_string(),
        };
        Self {
            mission_id,
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn mission_id(&self) -> &MissionId {
        &self.mission_id
    }

    /// Append one event to the chain.
    pub fn record(&self, event: AgentEvent) {
        let mut state = self.lock();

        let prev_hash = state.last_hash.clone();
        let sequence = state.sequence;
        let this_hash = hash_entry(self.mission_id.as_str(), sequence, &event, &prev_hash);

        if let AgentEvent::MissionComplete { .. } = event {
            info!(
                mission_id = %self.mission_id,
                entries = sequence + 1,
                terminal_hash = %this_hash,
                "mission journal sealed"
            );
        }

        state.entries.push(JournalEntry {
            sequence,
            mission_id: self.mission_id.clone(),
            event,
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.sequence += 1;
        state.last_hash = this_hash;
    }

    /// The recorded events in order, without chain metadata.
    pub fn events(&self) -> Vec<AgentEvent> {
        self.lock().entries.iter().map(|e| e.event.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Export a sealed `MissionLog` of everything recorded so far.
    pub fn export_log(&self) -> MissionLog {
        let state = self.lock();
        let terminal_hash = state
            .entries
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_default();

        MissionLog {
            mission_id: self.mission_id.clone(),
            entries: state.entries.clone(),
            sealed_at: Utc::now(),
            terminal_hash,
        }
    }

    pub fn verify_integrity(&self) -> bool {
        verify_chain(&self.lock().entries)
    }

    // A panic while appending leaves the chain consistent up to the last
    // completed push, so a poisoned lock is still safe to read.
    fn lock(&self) -> MutexGuard<'_, JournalState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// ── EventSink impl ────────────────────────────────────────────────────────────

impl EventSink for InMemoryJournal {
    fn emit(&self, event: AgentEvent) {
        self.record(event);
    }
}
