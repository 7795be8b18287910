//! Errors surfaced by the engine's public API.

use thiserror::Error;

/// Failures the engine can report back to a caller.
///
/// Malformed orders are deliberately absent from this enum: per spec an
/// invalid order (zero id, non-positive price on a limit order, zero
/// quantity) is a silent ingest no-op logged at `warn!`, not an `Err` —
/// there is no caller left to hand an `Err` to once an order has crossed the
/// ingress queue into the matching loop.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The event bus has already been shut down; further publication is
    /// impossible.
    #[error("event bus has already shut down")]
    BusShutDown,

    /// A lifecycle method was called out of order (e.g. `stop` before
    /// `start`, or `start` twice).
    #[error("invalid lifecycle transition: {0}")]
    InvalidLifecycleTransition(&'static str),
}
