//! The ingress pipeline: a bounded-producer/single-consumer message queue
//! feeding the matching loop that owns the [`OrderBookEngine`].
//!
//! Producers (feeders, or anything else submitting work) never touch the
//! engine directly — they push a message onto the [`IngressQueue`] and the
//! single matching-loop thread drains it, so every mutation of the book
//! happens on one thread as spec'd.

use crate::core::Order;
use crate::engine::OrderBookEngine;
use crate::ring::IngressQueue;
use std::sync::Arc;

/// One unit of work for the matching loop.
#[derive(Debug, Clone, Copy)]
pub enum IngressMessage {
    Add(Order),
    Cancel(u64),
}

/// Drains `queue` until it is closed, applying each message to `engine` in
/// arrival order. Returns once [`IngressQueue::close`] has been called and
/// every already-enqueued message has been processed.
pub fn run_matching_loop(engine: &mut OrderBookEngine, queue: &Arc<IngressQueue<IngressMessage>>) {
    while let Some(message) = queue.wait_and_pop() {
        match message {
            IngressMessage::Add(order) => engine.add_order(order),
            IngressMessage::Cancel(id) => engine.cancel_order(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{Backpressure, EventBus};
    use crate::core::Side;
    use crate::matching::PriceTimePriorityStrategy;
    use std::thread;

    #[test]
    fn matching_loop_processes_messages_in_order_then_exits_on_close() {
        let bus = Arc::new(EventBus::new());
        bus.add_listener(|_e| {}, 64, Backpressure::Drop).unwrap();
        let mut engine = OrderBookEngine::new(Box::new(PriceTimePriorityStrategy::new()), bus);
        let queue = Arc::new(IngressQueue::new());

        queue.push(IngressMessage::Add(Order::limit(1, 100.0, 10, Side::Buy)));
        queue.push(IngressMessage::Cancel(1));
        queue.close();

        run_matching_loop(&mut engine, &queue);
        assert_eq!(engine.order_count(), 0);
    }

    #[test]
    fn matching_loop_blocks_until_message_then_drains_on_close() {
        let bus = Arc::new(EventBus::new());
        bus.add_listener(|_e| {}, 64, Backpressure::Drop).unwrap();
        let mut engine = OrderBookEngine::new(Box::new(PriceTimePriorityStrategy::new()), bus);
        let queue = Arc::new(IngressQueue::new());
        let queue2 = queue.clone();

        let handle = thread::spawn(move || {
            queue2.push(IngressMessage::Add(Order::limit(1, 100.0, 10, Side::Buy)));
            queue2.close();
        });
        run_matching_loop(&mut engine, &queue);
        handle.join().unwrap();
        assert_eq!(engine.order_count(), 1);
    }
}
