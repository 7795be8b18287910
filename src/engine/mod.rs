//! The order book engine: owns both book sides, the id index, and the
//! matching strategy, and is the sole mutator of all three. Runs on a
//! single thread (see spec §5) — nothing here is synchronized internally.

mod error;

pub use error::EngineError;

use crate::book::{AskSide, BidSide, OppositeView, Position};
use crate::bus::EventBus;
use crate::core::{Order, Side};
use crate::events::{Event, EventKind, Price, Seq, Tick};
use crate::matching::MatchingStrategy;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

/// Where a live order currently rests, for O(1) cancel lookup.
#[derive(Debug, Clone, Copy)]
struct Location {
    side: Side,
    price: Price,
    position: Position,
}

/// Owns the book and publishes every state change through an [`EventBus`].
pub struct OrderBookEngine {
    bids: BidSide,
    asks: AskSide,
    id_index: HashMap<u64, Location>,
    strategy: Box<dyn MatchingStrategy>,
    bus: Arc<EventBus>,
    tick: Tick,
    seq: Seq,
    /// Wall-clock sample taken each time `tick` advances, indexed by
    /// `tick - 1` — the parallel array the glossary describes ("Tick: ...
    /// maps to wall-clock via a parallel array captured by the engine"), for
    /// downstream listeners that want to render a human timestamp alongside
    /// a purely logical tick.
    tick_wallclock: Vec<SystemTime>,
}

impl OrderBookEngine {
    pub fn new(strategy: Box<dyn MatchingStrategy>, bus: Arc<EventBus>) -> Self {
        OrderBookEngine {
            bids: BidSide::new(),
            asks: AskSide::new(),
            id_index: HashMap::new(),
            strategy,
            bus,
            tick: 0,
            seq: 0,
            tick_wallclock: Vec::new(),
        }
    }

    /// Current tick counter, advanced once per `add_order`/`cancel_order`
    /// call.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Wall-clock time captured when `tick` was reached, or `None` if `tick`
    /// is `0` (no operation has run yet) or out of range.
    pub fn wall_clock_at(&self, tick: Tick) -> Option<SystemTime> {
        if tick == 0 {
            return None;
        }
        self.tick_wallclock.get((tick - 1) as usize).copied()
    }

    /// Advances the tick counter and records the wall-clock time it was
    /// reached at, returning the new tick.
    fn advance_tick(&mut self) -> Tick {
        self.tick += 1;
        self.tick_wallclock.push(SystemTime::now());
        self.tick
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    pub fn order_count(&self) -> usize {
        self.id_index.len()
    }

    /// Live aggregate quantity resting on the bid side at `price`, or
    /// `None` if no level exists there.
    pub fn bid_level_qty(&self, price: Price) -> Option<u64> {
        self.bids.get_level(price).map(|l| l.aggregate_qty())
    }

    /// Live aggregate quantity resting on the ask side at `price`, or
    /// `None` if no level exists there.
    pub fn ask_level_qty(&self, price: Price) -> Option<u64> {
        self.asks.get_level(price).map(|l| l.aggregate_qty())
    }

    /// Ingests one order: validates it, matches it against the opposite
    /// side, applies every resulting fill, and either discards or rests the
    /// remainder per the order's control flags.
    ///
    /// Malformed orders (zero id, zero quantity, or a non-positive limit
    /// price on a non-market order) are a silent no-op, logged at `warn!` —
    /// there is no caller-visible error channel past the ingress queue.
    pub fn add_order(&mut self, order: Order) {
        self.advance_tick();

        if !is_well_formed(&order) {
            tracing::warn!(id = order.id, "discarding malformed order");
            return;
        }
        if self.id_index.contains_key(&order.id) {
            tracing::warn!(id = order.id, "discarding order with duplicate id");
            return;
        }

        let mut incoming = order;
        let fills = match incoming.side() {
            Side::Buy => self.strategy.matches(&self.asks as &dyn OppositeView, &incoming),
            Side::Sell => self.strategy.matches(&self.bids as &dyn OppositeView, &incoming),
        };

        // Per spec §4.7: a Fill is published for every FillOp first, then a
        // second pass applies each fill to its maker and publishes
        // OrderRemoved/LevelAgg — never interleaved with the Fill events.
        let applied: Vec<(crate::matching::FillOp, Option<u32>)> = fills
            .fills
            .into_iter()
            .map(|fill| {
                let remaining = match incoming.side() {
                    Side::Buy => self.asks.deduct(fill.maker_price, fill.maker_position, fill.qty),
                    Side::Sell => self.bids.deduct(fill.maker_price, fill.maker_position, fill.qty),
                };
                (fill, remaining)
            })
            .collect();

        for (fill, remaining) in &applied {
            if remaining.is_some() {
                self.emit(EventKind::Fill {
                    maker_id: fill.maker_id,
                    taker_id: incoming.id,
                    price: fill.maker_price,
                    qty: fill.qty,
                });
            }
        }

        for (fill, remaining) in &applied {
            // A `None` here means the maker vanished from the book between
            // the strategy's read-only pass and application — cannot happen
            // in this single-threaded engine (see spec §4.7/§7), guarded
            // defensively rather than assumed.
            let Some(remaining) = remaining else {
                continue;
            };
            if *remaining == 0 {
                self.id_index.remove(&fill.maker_id);
                tracing::debug!(maker_id = fill.maker_id, "maker fully filled, removed from book");
                self.emit(EventKind::OrderRemoved { id: fill.maker_id });
            }
            let aggregate_qty = match incoming.side() {
                Side::Buy => self.asks.get_level(fill.maker_price).map_or(0, |l| l.aggregate_qty()),
                Side::Sell => self.bids.get_level(fill.maker_price).map_or(0, |l| l.aggregate_qty()),
            };
            tracing::debug!(price = ?fill.maker_price, aggregate_qty, "level updated by fill");
            self.emit(EventKind::LevelAgg {
                side: incoming.side().opposite(),
                price: fill.maker_price,
                aggregate_qty,
            });
        }

        incoming.quantity = fills.taker_remaining;

        let should_rest = incoming.quantity > 0 && !incoming.is_ioc() && !incoming.is_fok() && !incoming.is_market();
        if !should_rest {
            return;
        }

        let price = Price::new(incoming.price);
        let position = match incoming.side() {
            Side::Buy => self.bids.add(incoming),
            Side::Sell => self.asks.add(incoming),
        };
        self.id_index.insert(
            incoming.id,
            Location {
                side: incoming.side(),
                price,
                position,
            },
        );
        self.emit(EventKind::OrderAdded {
            id: incoming.id,
            side: incoming.side(),
            price,
            qty: incoming.quantity,
        });
        let aggregate_qty = match incoming.side() {
            Side::Buy => self.bids.get_level(price).map_or(0, |l| l.aggregate_qty()),
            Side::Sell => self.asks.get_level(price).map_or(0, |l| l.aggregate_qty()),
        };
        self.emit(EventKind::LevelAgg {
            side: incoming.side(),
            price,
            aggregate_qty,
        });
    }

    /// Removes a resting order in O(1). A no-op (not an error) if `id` is
    /// unknown or already filled/cancelled.
    pub fn cancel_order(&mut self, id: u64) {
        self.advance_tick();
        let Some(location) = self.id_index.remove(&id) else {
            tracing::debug!(id, "cancel of unknown or already-removed order ignored");
            return;
        };
        let removed = match location.side {
            Side::Buy => self.bids.erase(location.price, location.position),
            Side::Sell => self.asks.erase(location.price, location.position),
        };
        if removed.is_some() {
            self.emit(EventKind::OrderRemoved { id });
            let aggregate_qty = match location.side {
                Side::Buy => self.bids.get_level(location.price).map_or(0, |l| l.aggregate_qty()),
                Side::Sell => self.asks.get_level(location.price).map_or(0, |l| l.aggregate_qty()),
            };
            self.emit(EventKind::LevelAgg {
                side: location.side,
                price: location.price,
                aggregate_qty,
            });
        }
    }

    fn emit(&mut self, kind: EventKind) {
        let seq = self.seq;
        self.seq += 1;
        self.bus.publish(Event::new(seq, self.tick, kind));
    }
}

impl Side {
    fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

fn is_well_formed(order: &Order) -> bool {
    if order.quantity == 0 {
        return false;
    }
    if !order.is_market() && order.price <= 0.0 {
        return false;
    }
    true
}
