//! A `tracing`-based stand-in for the source's `Logger` listener, which
//! prints one formatted line per event to stdout. Here the same per-kind
//! formatting goes through `tracing::info!` instead, so it composes with
//! whatever subscriber and filter the host process has installed.

use crate::bus::Listener;
use crate::events::{Event, EventKind};

/// Logs every event it receives at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct Logger;

impl Logger {
    pub fn new() -> Self {
        Self
    }
}

impl Listener for Logger {
    fn on_event(&mut self, event: Event) {
        let kind = match event.kind {
            EventKind::OrderAdded { .. } => "order added",
            EventKind::OrderUpdated { .. } => "order updated",
            EventKind::OrderRemoved { .. } => "order removed",
            EventKind::Fill { .. } => "fill",
            EventKind::LevelAgg { .. } => "level aggregate",
        };
        tracing::info!(
            "[seq {} tick {}] {}: {}",
            event.seq,
            event.tick,
            kind,
            event.kind
        );
    }
}
