//! The event schema published by the engine and fanned out by the
//! [`crate::bus::EventBus`].

use crate::core::Side;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Monotonically increasing publication sequence number.
pub type Seq = u32;
/// Engine-internal tick counter, attached to every published event.
pub type Tick = u32;

/// A price level key.
///
/// The book uses exact floating-point equality as its level discriminator
/// (spec'd intentionally — no epsilon snapping). `Ord`/`Eq` are implemented
/// over the bit pattern (`f64::to_bits`, via `total_cmp`) rather than IEEE
/// comparison operators, so `Price` has a total order and can key an ordered
/// map even though bare `f64` cannot implement `Ord`. For every finite price
/// a real producer would generate, this coincides exactly with numeric
/// equality/ordering.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Price(pub f64);

impl Price {
    pub fn new(value: f64) -> Self {
        Price(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Price {}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::hash::Hash for Price {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<f64> for Price {
    fn from(value: f64) -> Self {
        Price(value)
    }
}

/// The tagged union of event payloads.
///
/// `OrderUpdated` is reserved per spec: no code path in the core currently
/// emits it (partial maker fills are communicated via `LevelAgg` instead),
/// but it stays part of the schema so a maker-facing listener can be added
/// later without breaking it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// A residual was enqueued as a resting order.
    OrderAdded {
        id: u64,
        side: Side,
        price: Price,
        qty: u32,
    },
    /// Reserved: a resting order's visible quantity changed.
    OrderUpdated { id: u64, price: Price, qty: u32 },
    /// A resting order left the book (full fill or cancel).
    OrderRemoved { id: u64 },
    /// An executed trade.
    Fill {
        maker_id: u64,
        taker_id: u64,
        price: Price,
        qty: u32,
    },
    /// Aggregate live quantity at a level. `aggregate_qty == 0` means the
    /// level no longer exists.
    LevelAgg {
        side: Side,
        price: Price,
        aggregate_qty: u64,
    },
}

/// One published event: a header (`seq`, `tick`) plus a payload.
///
/// POD by construction (every field is `Copy`) so it can be transported by
/// value through an [`crate::ring::Spsc`] ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub seq: Seq,
    pub tick: Tick,
    pub kind: EventKind,
}

impl Event {
    pub fn new(seq: Seq, tick: Tick, kind: EventKind) -> Self {
        Event { seq, tick, kind }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::OrderAdded {
                id,
                side,
                price,
                qty,
            } => write!(f, "ID:{id} Side:{side} Price:{price} Qty:{qty}"),
            EventKind::OrderUpdated { id, price, qty } => {
                write!(f, "ID:{id} Price:{price} Qty:{qty}")
            }
            EventKind::OrderRemoved { id } => write!(f, "ID:{id}"),
            EventKind::Fill {
                maker_id,
                taker_id,
                price,
                qty,
            } => write!(f, "Maker:{maker_id} Taker:{taker_id} Price:{price} Qty:{qty}"),
            EventKind::LevelAgg {
                side,
                price,
                aggregate_qty,
            } => write!(f, "Side:{side} Price:{price} AggQty:{aggregate_qty}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_equality_is_exact_bit_pattern() {
        assert_eq!(Price::new(100.0), Price::new(100.0));
        assert_ne!(Price::new(100.0), Price::new(100.00000001));
    }

    #[test]
    fn price_orders_descending_and_ascending_consistently() {
        let mut prices = vec![Price::new(101.0), Price::new(99.5), Price::new(100.0)];
        prices.sort();
        assert_eq!(
            prices,
            vec![Price::new(99.5), Price::new(100.0), Price::new(101.0)]
        );
    }
}
