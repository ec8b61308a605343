//! Journal entry and sealed log types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use openground_contracts::{agent::MissionId, event::AgentEvent};

/// One agent event, linked to the previous entry by its SHA-256 hash.
///
/// Modifying any field, including the embedded event, invalidates
/// `this_hash` and every later `prev_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Position in the chain, starting at 0.
    pub sequence: u64,

    pub mission_id: MissionId,

    pub event: AgentEvent,

    /// Hash of the previous entry, or `GENESIS_HASH` for the first.
    pub prev_hash: String,

    /// Hash over (mission_id, sequence, prev_hash, event JSON).
    pub this_hash: String,
}

impl JournalEntry {
    /// The `prev_hash` of the first entry in every chain: 64 hex zeros.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// A sealed copy of a mission's journal.
///
/// `terminal_hash` is the last entry's `this_hash` and commits to the whole
/// log. It is empty when nothing was recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionLog {
    pub mission_id: MissionId,
    pub entries: Vec<JournalEntry>,
    pub sealed_at: DateTime<Utc>,
    pub terminal_hash: String,
}
