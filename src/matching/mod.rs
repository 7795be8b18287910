//! Matching strategies: pure functions from "incoming order + opposite book
//! side" to a fill plan. A strategy never mutates the book — the engine is
//! the sole mutator (spec §4.6) — it only decides *what* should happen; the
//! engine applies the plan and emits events from it.

mod price_time;

pub use price_time::PriceTimePriorityStrategy;

use crate::book::{OppositeView, Position};
use crate::core::Order;
use crate::events::Price;

/// One proposed trade against a single resting order.
#[derive(Debug, Clone, Copy)]
pub struct FillOp {
    pub maker_id: u64,
    pub maker_price: Price,
    pub maker_position: Position,
    pub qty: u32,
}

/// The outcome of matching an incoming order against the opposite side.
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// Proposed trades, in the order they should be applied (best price,
    /// then FIFO within a price).
    pub fills: Vec<FillOp>,
    /// Quantity of the incoming order left over once every fill in `fills`
    /// is applied.
    pub taker_remaining: u32,
}

impl MatchResult {
    fn no_match(qty: u32) -> Self {
        MatchResult {
            fills: Vec::new(),
            taker_remaining: qty,
        }
    }
}

/// A pluggable price-crossing and allocation policy.
///
/// Implementations read the opposite book side and the incoming order and
/// return the trades that should happen; they must never mutate `opposite`.
pub trait MatchingStrategy: Send + Sync {
    fn matches(&self, opposite: &dyn OppositeView, incoming: &Order) -> MatchResult;
}

/// Whether `incoming` is willing to trade at `maker_price`.
///
/// Market orders cross at any price. Limit orders (including IOC/FOK limit
/// orders) cross only while the maker's price is at least as good for the
/// taker as the taker's own limit.
fn crosses(incoming: &Order, maker_price: Price) -> bool {
    if incoming.is_market() {
        return true;
    }
    if incoming.is_buy() {
        maker_price.value() <= incoming.price
    } else {
        maker_price.value() >= incoming.price
    }
}
