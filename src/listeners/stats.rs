//! A minimal running-statistics listener: trade count, traded volume, and
//! the last trade price. Grounded in the kind of rollup a terminal
//! dashboard's data feed would maintain, without any of the rendering.

use crate::bus::Listener;
use crate::events::{Event, EventKind, Price};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Counters {
    fills: AtomicU64,
    volume: AtomicU64,
    last_price_bits: AtomicU64,
}

/// Accumulates trade statistics as events arrive.
///
/// Cloneable and cheap: every clone shares the same counters, so the
/// collector half can be registered with the bus while a handle is kept by
/// the caller to read it back.
#[derive(Debug, Default, Clone)]
pub struct StatsCollector {
    counters: Arc<Counters>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill_count(&self) -> u64 {
        self.counters.fills.load(Ordering::Relaxed)
    }

    pub fn total_volume(&self) -> u64 {
        self.counters.volume.load(Ordering::Relaxed)
    }

    pub fn last_price(&self) -> Option<Price> {
        let bits = self.counters.last_price_bits.load(Ordering::Relaxed);
        if bits == 0 {
            None
        } else {
            Some(Price::new(f64::from_bits(bits)))
        }
    }
}

impl Listener for StatsCollector {
    fn on_event(&mut self, event: Event) {
        if let EventKind::Fill { price, qty, .. } = event.kind {
            self.counters.fills.fetch_add(1, Ordering::Relaxed);
            self.counters.volume.fetch_add(qty as u64, Ordering::Relaxed);
            self.counters
                .last_price_bits
                .store(price.value().to_bits(), Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Side;

    #[test]
    fn accumulates_fills_and_tracks_last_price() {
        let mut stats = StatsCollector::new();
        stats.on_event(Event::new(
            1,
            0,
            EventKind::Fill {
                maker_id: 1,
                taker_id: 2,
                price: Price::new(100.0),
                qty: 5,
            },
        ));
        stats.on_event(Event::new(
            2,
            0,
            EventKind::Fill {
                maker_id: 3,
                taker_id: 4,
                price: Price::new(101.0),
                qty: 7,
            },
        ));
        stats.on_event(Event::new(
            3,
            0,
            EventKind::OrderAdded {
                id: 5,
                side: Side::Buy,
                price: Price::new(99.0),
                qty: 1,
            },
        ));

        assert_eq!(stats.fill_count(), 2);
        assert_eq!(stats.total_volume(), 12);
        assert_eq!(stats.last_price(), Some(Price::new(101.0)));
    }
}
