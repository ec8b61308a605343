//! # openground-core
//!
//! The mission orchestration runtime for Open Ground.
//!
//! This crate provides:
//! - The collaborator traits (`ToolRegistry`, `PlanningService`, `ResponseValidator`)
//! - The `EventSink` boundary and its channel, callback, and fan-out sinks
//! - The `MissionAgent` that sequences tool calls, planning calls, and the
//!   mission lifecycle, emitting one ordered event stream per mission
//!
//! ## Usage
//!
//! ```rust,ignore
//! use openground_core::{MissionAgent, sink::EventSink, traits::{PlanningService, ToolRegistry}};
//! ```

pub mod agent;
pub mod sink;
pub mod traits;

pub use agent::MissionAgent;
pub use sink::{CallbackSink, EventSink, FanoutSink};
