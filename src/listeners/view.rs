//! Maintains a read-only depth snapshot purely from the published event
//! stream, the way an out-of-process dashboard would — it never touches the
//! engine's own book, only what it broadcasts.

use crate::bus::Listener;
use crate::core::Side;
use crate::events::{Event, EventKind, Price};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// A depth-of-book view reconstructed from `LevelAgg` events.
///
/// `LevelAgg { aggregate_qty: 0, .. }` means the level no longer exists and
/// is removed from the view rather than kept around at zero.
#[derive(Debug, Default)]
pub struct OrderBookView {
    bids: BTreeMap<Price, u64>,
    asks: BTreeMap<Price, u64>,
}

impl OrderBookView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.keys().next_back().copied()
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.keys().next().copied()
    }

    pub fn bid_depth(&self, price: Price) -> Option<u64> {
        self.bids.get(&price).copied()
    }

    pub fn ask_depth(&self, price: Price) -> Option<u64> {
        self.asks.get(&price).copied()
    }

    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    pub fn ask_levels(&self) -> usize {
        self.asks.len()
    }
}

impl Listener for OrderBookView {
    fn on_event(&mut self, event: Event) {
        if let EventKind::LevelAgg {
            side,
            price,
            aggregate_qty,
        } = event.kind
        {
            let book = match side {
                Side::Buy => &mut self.bids,
                Side::Sell => &mut self.asks,
            };
            if aggregate_qty == 0 {
                book.remove(&price);
            } else {
                book.insert(price, aggregate_qty);
            }
        }
    }
}

/// Lets a shared `OrderBookView` be registered directly with the bus while
/// the registering caller keeps its own handle to read it back — used by
/// [`crate::simulator::Simulator::enable_live_view`] to hand the bus a
/// listener while keeping a read side for callers.
impl Listener for Arc<Mutex<OrderBookView>> {
    fn on_event(&mut self, event: Event) {
        self.lock()
            .expect("order book view mutex poisoned")
            .on_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_best_price_per_side_and_clears_on_zero() {
        let mut view = OrderBookView::new();
        view.on_event(Event::new(
            1,
            0,
            EventKind::LevelAgg {
                side: Side::Buy,
                price: Price::new(100.0),
                aggregate_qty: 10,
            },
        ));
        view.on_event(Event::new(
            2,
            0,
            EventKind::LevelAgg {
                side: Side::Buy,
                price: Price::new(101.0),
                aggregate_qty: 5,
            },
        ));
        assert_eq!(view.best_bid(), Some(Price::new(101.0)));

        view.on_event(Event::new(
            3,
            0,
            EventKind::LevelAgg {
                side: Side::Buy,
                price: Price::new(101.0),
                aggregate_qty: 0,
            },
        ));
        assert_eq!(view.best_bid(), Some(Price::new(100.0)));
        assert_eq!(view.bid_levels(), 1);
    }

    #[test]
    fn shared_view_is_readable_back_through_its_arc_after_on_event() {
        let shared = Arc::new(Mutex::new(OrderBookView::new()));
        let mut listener = shared.clone();
        listener.on_event(Event::new(
            1,
            0,
            EventKind::LevelAgg {
                side: Side::Sell,
                price: Price::new(102.0),
                aggregate_qty: 20,
            },
        ));
        assert_eq!(
            shared.lock().unwrap().best_ask(),
            Some(Price::new(102.0))
        );
    }
}
