//! Hash-chain primitives: hashing and chain integrity verification.
//!
//! Hash input layout (bytes, in order):
//!   1. mission_id as UTF-8 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. compact JSON of the event
//!
//! An event that cannot be serialized is hashed as the marker object
//! `{"type":<kind>,"unserializable":true}`, so every event still gets an entry.

use serde::Serialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::warn;

use openground_contracts::event::AgentEvent;

use crate::entry::JournalEntry;

/// Compute the SHA-256 hash for one journal entry.
///
/// Returns a lowercase 64-character hex string.
pub fn hash_entry(mission_id: &str, sequence: u64, event: &AgentEvent, prev_hash: &str) -> String {
    let event_json = canonical_bytes(event.kind(), event);

    let mut hasher = Sha256::new();
    hasher.update(mission_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&event_json);

    hex::encode(hasher.finalize())
}

/// Compact JSON of `value`, or the unserializable marker for `kind`.
pub(crate) fn canonical_bytes<T: Serialize>(kind: &str, value: &T) -> Vec<u8> {
    match serde_json::to_vec(value) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(kind, error = %err, "event not serializable; hashing marker instead");
            json!({ "type": kind, "unserializable": true }).to_string().into_bytes()
        }
    }
}

/// Verify the integrity of a journal.
///
/// Valid when every entry's `prev_hash` equals the previous entry's
/// `this_hash` (`GENESIS_HASH` for the first), every `this_hash` matches the
/// value recomputed from the entry's fields, and sequence numbers run
/// 0, 1, 2, … without gaps. An empty chain is valid.
pub fn verify_chain(entries: &[JournalEntry]) -> bool {
    let mut expected_prev = JournalEntry::GENESIS_HASH.to_string();

    for (position, entry) in entries.iter().enumerate() {
        if entry.sequence != position as u64 || entry.prev_hash != expected_prev {
            return false;
        }

        let recomputed = hash_entry(
            entry.mission_id.as_str(),
            entry.sequence,
            &entry.event,
            &entry.prev_hash,
        );
        if recomputed != entry.this_hash {
            return false;
        }

        expected_prev = entry.this_hash.clone();
    }

    true
}
