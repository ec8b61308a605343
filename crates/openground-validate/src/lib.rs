//! # openground-validate
//!
//! Validation of planning-service responses for Open Ground.
//!
//! [`SchemaValidator`] implements
//! [`ResponseValidator`](openground_core::traits::ResponseValidator): it
//! checks a serialized plan or photo judgment against a JSON Schema and then
//! against semantic rules. Attach it with `MissionAgent::with_validator` and
//! the agent rejects any response whose report does not pass.

pub mod engine;
pub mod schemas;

pub use engine::{CustomRuleFn, SchemaValidator};
pub use schemas::{judgment_schema, plan_schema};

// ── Tests ─────────────────────────────────────────────────────────────────────
