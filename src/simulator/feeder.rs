//! Order producers: generate synthetic orders and push them onto the
//! shared ingress queue. Multiple feeders can run concurrently; they share
//! one atomic id counter so "monotonically unique ids" holds across the
//! whole producer pool, not just within a single thread.

use super::config::SimulatorConfig;
use crate::core::{ControlFlags, Order, Side};
use crate::ingress::IngressMessage;
use crate::ring::IngressQueue;
use crate::rng::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generates one synthetic order using `rng` and the next id from
/// `id_generator`.
pub fn generate_order(
    config: &SimulatorConfig,
    rng: &mut dyn Rng,
    id_generator: &AtomicU64,
    feeder_id: u8,
    tick: u32,
) -> Order {
    let id = id_generator.fetch_add(1, Ordering::Relaxed);
    let side = if rng.next_bool(0.5) { Side::Buy } else { Side::Sell };
    let price = rng.next_price(config.mid_price, config.price_spread);
    let qty = rng.next_qty(config.min_qty, config.max_qty);

    let mut control = ControlFlags::empty();
    if rng.next_bool(config.market_fraction) {
        control |= ControlFlags::MARKET;
    } else if rng.next_bool(config.fok_fraction) {
        control |= ControlFlags::FOK;
    } else if rng.next_bool(config.ioc_fraction) {
        control |= ControlFlags::IOC;
    }

    Order::new(id, price, qty, side, feeder_id, tick, control)
}

/// Runs one producer to completion: generates `orders_per_producer` orders
/// and pushes each onto `queue`, never blocking (the queue is unbounded).
pub fn run_feeder(
    config: &SimulatorConfig,
    mut rng: Box<dyn Rng>,
    id_generator: Arc<AtomicU64>,
    feeder_id: u8,
    queue: Arc<IngressQueue<IngressMessage>>,
) {
    for tick in 0..config.orders_per_producer as u32 {
        let order = generate_order(config, rng.as_mut(), &id_generator, feeder_id, tick);
        queue.push(IngressMessage::Add(order));
    }
}
