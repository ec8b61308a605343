//! # openground-journal
//!
//! Append-only, SHA-256 hash-chained journal of a mission's event stream.
//!
//! ## Overview
//!
//! Every event a `MissionAgent` emits is wrapped in a `JournalEntry` that
//! links to the previous entry through its hash. Changing any recorded event,
//! even by one byte, breaks the chain and `verify_chain` reports it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use openground_journal::InMemoryJournal;
//!
//! let journal = InMemoryJournal::new(mission_id.clone());
//! let events = FanoutSink::new().with(Arc::new(journal.clone())).with(Arc::new(tx));
//! let mut agent = MissionAgent::new(mission_id, tools, planner, Arc::new(events));
//! // ... run the mission ...
//! assert!(journal.verify_integrity());
//! let log = journal.export_log();
//! ```

pub mod chain;
pub mod entry;
pub mod memory;

pub use chain::{hash_entry, verify_chain};
pub use entry::{JournalEntry, MissionLog};
pub use memory::InMemoryJournal;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use openground_contracts::{
        agent::{MissionId, Thought, ThoughtKind},
        event::AgentEvent,
    };
    use openground_core::sink::{EventSink, FanoutSink};
    use serde_json::json;

    use super::{chain::canonical_bytes, hash_entry, verify_chain, InMemoryJournal, JournalEntry};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn thought(content: &str) -> AgentEvent {
        AgentEvent::Thought {
            thought: Thought::new(ThoughtKind::Reasoning, content),
        }
    }

    fn journal_with(events: &[&str]) -> InMemoryJournal {
        let journal = InMemoryJournal::new(MissionId::new("mission-journal"));
        for content in events {
            journal.emit(thought(content));
        }
        journal
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    #[test]
    fn sequential_events_form_a_valid_chain() {
        let journal = journal_with(&["first", "second", "third"]);
        assert_eq!(journal.len(), 3);
        assert!(journal.verify_integrity());
    }

    #[test]
    fn tampering_with_an_event_breaks_the_chain() {
        let journal = journal_with(&["step-a", "step-b", "step-c"]);

        {
            let mut state = journal.state.lock().unwrap();
            state.entries[0].event = thought("TAMPERED");
        }

        assert!(!journal.verify_integrity());
    }

    #[test]
    fn removing_an_entry_breaks_the_chain() {
        let journal = journal_with(&["a", "b", "c"]);
        let mut log = journal.export_log();
        log.entries.remove(1);
        assert!(!verify_chain(&log.entries));
    }

    #[test]
    fn first_entry_links_to_genesis() {
        let journal = journal_with(&["first"]);
        let log = journal.export_log();
        assert_eq!(log.entries[0].prev_hash, JournalEntry::GENESIS_HASH);
    }

    #[test]
    fn sequence_numbers_have_no_gaps() {
        let log = journal_with(&["a", "b", "c"]).export_log();
        for (idx, entry) in log.entries.iter().enumerate() {
            assert_eq!(entry.sequence, idx as u64);
        }
    }

    #[test]
    fn export_log_seals_with_terminal_hash() {
        let journal = journal_with(&["alpha", "beta"]);
        journal.emit(AgentEvent::MissionComplete {
            mission_id: MissionId::new("mission-journal"),
        });

        let log = journal.export_log();
        assert_eq!(log.mission_id, MissionId::new("mission-journal"));
        assert_eq!(log.entries.len(), 3);
        assert_eq!(log.terminal_hash, log.entries.last().unwrap().this_hash);
        assert!(verify_chain(&log.entries));
        assert_eq!(journal.events().last().unwrap().kind(), "mission_complete");
    }

    #[test]
    fn empty_journal_is_valid() {
        let journal = InMemoryJournal::new(MissionId::new("empty"));
        assert!(journal.is_empty());
        assert!(journal.verify_integrity());
        assert!(verify_chain(&[]));
        assert_eq!(journal.export_log().terminal_hash, "");
    }

    #[test]
    fn journal_behind_fanout_records_every_event() {
        let journal = InMemoryJournal::new(MissionId::new("fanout"));
        let fanout = FanoutSink::new()
            .with(Arc::new(journal.clone()))
            .with(Arc::new(InMemoryJournal::new(MissionId::new("other"))));

        fanout.emit(thought("one"));
        fanout.emit(AgentEvent::StepComplete {
            step_id: "s1".to_string(),
        });

        let kinds: Vec<_> = journal.events().iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["thought", "step_complete"]);
        assert!(journal.verify_integrity());
    }

    #[test]
    fn same_events_in_different_missions_hash_differently() {
        let a = InMemoryJournal::new(MissionId::new("mission-a"));
        let b = InMemoryJournal::new(MissionId::new("mission-b"));
        let event = AgentEvent::StepComplete {
            step_id: "s1".to_string(),
        };
        a.emit(event.clone());
        b.emit(event);

        assert_ne!(a.export_log().terminal_hash, b.export_log().terminal_hash);
    }

    struct Unserializable;

    impl serde::Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("no wire form"))
        }
    }

    #[test]
    fn unserializable_payload_hashes_as_a_marker() {
        let bytes = canonical_bytes("thought", &Unserializable);
        let marker: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(marker, json!({ "type": "thought", "unserializable": true }));
        assert_eq!(bytes, canonical_bytes("thought", &Unserializable));
    }

    #[test]
    fn every_recorded_event_gets_an_entry() {
        let journal = journal_with(&["a", "b"]);
        journal.emit(AgentEvent::MissionComplete {
            mission_id: MissionId::new("mission-journal"),
        });

        let log = journal.export_log();
        assert_eq!(log.entries.len(), 3);
        let last = &log.entries[2];
        assert_eq!(
            hash_entry(last.mission_id.as_str(), 2, &last.event, &last.prev_hash),
            log.terminal_hash
        );
    }
}
