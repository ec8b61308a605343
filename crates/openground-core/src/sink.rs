//! Event delivery from the agent to its consumers.
//!
//! The agent calls `EventSink::emit` once per event, in state-change order.
//! Sinks must not block: a consumer that needs to do slow work should sit
//! behind the unbounded channel sink and drain it on its own task.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use openground_contracts::event::AgentEvent;

/// Receives every event the agent emits.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: AgentEvent);
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn emit(&self, event: AgentEvent) {
        (**self).emit(event)
    }
}

/// Channel boundary between the agent and a consumer task.
///
/// Sending never blocks and never drops while the receiver is alive. Once
/// the receiver is gone the mission has no audience and events are discarded.
impl EventSink for mpsc::UnboundedSender<AgentEvent> {
    fn emit(&self, event: AgentEvent) {
        if let Err(err) = self.send(event) {
            debug!(event = err.0.kind(), "event receiver dropped; discarding event");
        }
    }
}

/// Adapts a plain callback into a sink.
pub struct CallbackSink<F>(F);

impl<F> CallbackSink<F>
where
    F: Fn(AgentEvent) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self(callback)
    }
}

impl<F> EventSink for CallbackSink<F>
where
    F: Fn(AgentEvent) + Send + Sync,
{
    fn emit(&self, event: AgentEvent) {
        (self.0)(event)
    }
}

/// Delivers each event to several sinks, in registration order.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for FanoutSink {
    fn emit(&self, event: AgentEvent) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.emit(event.clone());
            }
            last.emit(event);
        }
    }
}
