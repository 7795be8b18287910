//! The concrete scenario table: each test pins down one pre-state and
//! action sequence to an exact expected set of fills/events/book state.

use lob_engine::bus::{Backpressure, EventBus};
use lob_engine::core::{ControlFlags, Order, Side};
use lob_engine::engine::OrderBookEngine;
use lob_engine::events::{Event, EventKind, Price};
use lob_engine::matching::PriceTimePriorityStrategy;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

fn limit(id: u64, price: f64, qty: u32, side: Side) -> Order {
    Order::limit(id, price, qty, side)
}

fn engine_with_events() -> (OrderBookEngine, mpsc::Receiver<Event>) {
    let bus = Arc::new(EventBus::new());
    let (tx, rx) = mpsc::channel();
    bus.add_listener(
        move |event: Event| {
            let _ = tx.send(event);
        },
        256,
        Backpressure::Block,
    )
    .unwrap();
    let engine = OrderBookEngine::new(Box::new(PriceTimePriorityStrategy::new()), bus);
    (engine, rx)
}

/// Drains every event the bus's consumer thread has forwarded (or is about
/// to), rather than `try_iter`'s single snapshot — publishing and delivery
/// happen on the engine/consumer threads respectively, so a `Block`-backed
/// listener's sends can still be in flight when the test thread looks.
fn drain(rx: &mpsc::Receiver<Event>) -> Vec<EventKind> {
    let mut events = Vec::new();
    while let Ok(event) = rx.recv_timeout(Duration::from_millis(100)) {
        events.push(event.kind);
    }
    events
}

/// Scenario 1: a full cross leaves the book empty.
#[test]
fn scenario_1_full_cross_empties_the_book() {
    let (mut engine, rx) = engine_with_events();
    engine.add_order(limit(1, 100.0, 10, Side::Sell));
    engine.add_order(limit(2, 100.0, 10, Side::Buy));

    assert!(engine.best_bid().is_none());
    assert!(engine.best_ask().is_none());
    assert_eq!(engine.order_count(), 0);

    let events = drain(&rx);
    let fills: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, EventKind::Fill { .. }))
        .collect();
    assert_eq!(fills.len(), 1);
    assert!(matches!(
        fills[0],
        EventKind::Fill { maker_id: 1, taker_id: 2, qty: 10, price } if *price == Price::new(100.0)
    ));
    let zero_aggs = events
        .iter()
        .filter(|e| matches!(e, EventKind::LevelAgg { aggregate_qty: 0, .. }))
        .count();
    assert_eq!(zero_aggs, 2);
}

/// Scenario 2: FIFO priority within one level, partial fill of the second
/// maker.
#[test]
fn scenario_2_fifo_priority_partial_fill_of_second_maker() {
    let (mut engine, rx) = engine_with_events();
    engine.add_order(limit(1, 100.0, 5, Side::Sell));
    engine.add_order(limit(2, 100.0, 5, Side::Sell));
    engine.add_order(limit(99, 100.0, 8, Side::Buy));

    let events = drain(&rx);
    let fills: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            EventKind::Fill { maker_id, qty, .. } => Some((*maker_id, *qty)),
            _ => None,
        })
        .collect();
    assert_eq!(fills, vec![(1, 5), (2, 3)]);

    assert_eq!(engine.ask_level_qty(Price::new(100.0)), Some(2));
}

/// Scenario 3: a non-crossing add simply rests on both sides.
#[test]
fn scenario_3_non_crossing_orders_both_rest() {
    let (mut engine, rx) = engine_with_events();
    engine.add_order(limit(1, 102.0, 10, Side::Sell));
    engine.add_order(limit(2, 100.0, 5, Side::Buy));

    let fills = drain(&rx)
        .into_iter()
        .filter(|e| matches!(e, EventKind::Fill { .. }))
        .count();
    assert_eq!(fills, 0);
    assert_eq!(engine.best_bid(), Some(Price::new(100.0)));
    assert_eq!(engine.best_ask(), Some(Price::new(102.0)));
}

/// Scenario 4: crossing walks two price levels in best-first order.
#[test]
fn scenario_4_crosses_two_levels_best_first() {
    let (mut engine, rx) = engine_with_events();
    engine.add_order(limit(1, 100.0, 5, Side::Sell));
    engine.add_order(limit(2, 101.0, 10, Side::Sell));
    engine.add_order(limit(99, 101.0, 12, Side::Buy));

    let fills: Vec<_> = drain(&rx)
        .into_iter()
        .filter_map(|e| match e {
            EventKind::Fill { maker_id, qty, .. } => Some((maker_id, qty)),
            _ => None,
        })
        .collect();
    assert_eq!(fills, vec![(1, 5), (2, 7)]);
    assert_eq!(engine.ask_level_qty(Price::new(101.0)), Some(3));
}

/// Scenario 5: FOK against an empty book rejects with no fills.
#[test]
fn scenario_5_fok_against_empty_book_rejects() {
    let (mut engine, rx) = engine_with_events();
    let mut order = limit(1, 101.0, 5, Side::Buy);
    order.control |= ControlFlags::FOK;
    engine.add_order(order);

    let events = drain(&rx);
    assert!(events.iter().all(|e| !matches!(e, EventKind::Fill { .. })));
    assert!(events.iter().all(|e| !matches!(e, EventKind::OrderAdded { .. })));
    assert_eq!(engine.order_count(), 0);
}

/// Scenario 6: IOC fills what it can and discards the residual silently.
#[test]
fn scenario_6_ioc_fills_then_discards_residual() {
    let (mut engine, rx) = engine_with_events();
    engine.add_order(limit(1, 100.0, 10, Side::Sell));
    let mut taker = limit(2, 100.0, 15, Side::Buy);
    taker.control |= ControlFlags::IOC;
    engine.add_order(taker);

    let events = drain(&rx);
    let fills: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            EventKind::Fill { maker_id, qty, .. } => Some((*maker_id, *qty)),
            _ => None,
        })
        .collect();
    assert_eq!(fills, vec![(1, 10)]);
    assert!(events.iter().all(|e| !matches!(e, EventKind::OrderAdded { id: 2, .. })));
    assert_eq!(engine.order_count(), 0);
}

/// Scenario 7: cancel of a resting order empties the book and emits the
/// expected pair of events.
#[test]
fn scenario_7_cancel_removes_resting_order() {
    let (mut engine, rx) = engine_with_events();
    engine.add_order(limit(1, 100.0, 10, Side::Buy));
    let _ = drain(&rx);

    engine.cancel_order(1);

    assert!(engine.best_bid().is_none());
    let events = drain(&rx);
    assert!(events
        .iter()
        .any(|e| matches!(e, EventKind::OrderRemoved { id: 1 })));
    assert!(events
        .iter()
        .any(|e| matches!(e, EventKind::LevelAgg { side: Side::Buy, aggregate_qty: 0, price } if *price == Price::new(100.0))));
}
