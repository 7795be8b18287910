//! Standard price-time priority: best price first, FIFO within a price.
//!
//! Grounded in the source's main matching loop — walk the opposite side
//! best-first, and within a level oldest-first, allocating the incoming
//! order's quantity until either the incoming order or the resting order is
//! exhausted.

use super::{crosses, FillOp, MatchResult, MatchingStrategy};
use crate::book::OppositeView;
use crate::core::Order;

#[derive(Debug, Default, Clone, Copy)]
pub struct PriceTimePriorityStrategy;

impl PriceTimePriorityStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Walks the opposite side best-first / FIFO-first, calling `visit` for
    /// each resting order that crosses `incoming`'s price, until either the
    /// book runs out of crossing liquidity or `budget` quantity has been
    /// allocated. Returns the total quantity `visit` was offered.
    fn walk_crossing<F>(opposite: &dyn OppositeView, incoming: &Order, budget: u32, mut visit: F) -> u32
    where
        F: FnMut(FillOp),
    {
        let mut remaining = budget;
        let mut price = opposite.best_price();
        while remaining > 0 {
            let Some(p) = price else { break };
            if !crosses(incoming, p) {
                break;
            }
            for (position, resting) in opposite.orders_at(p) {
                if remaining == 0 {
                    break;
                }
                let take = remaining.min(resting.quantity);
                if take == 0 {
                    continue;
                }
                visit(FillOp {
                    maker_id: resting.id,
                    maker_price: p,
                    maker_position: position,
                    qty: take,
                });
                remaining -= take;
            }
            price = opposite.next_worse_price(p);
        }
        budget - remaining
    }
}

impl MatchingStrategy for PriceTimePriorityStrategy {
    fn matches(&self, opposite: &dyn OppositeView, incoming: &Order) -> MatchResult {
        if incoming.quantity == 0 {
            return MatchResult::no_match(0);
        }

        if incoming.is_fok() {
            let mut available: u64 = 0;
            let mut price = opposite.best_price();
            while available < incoming.quantity as u64 {
                let Some(p) = price else { break };
                if !crosses(incoming, p) {
                    break;
                }
                available += opposite.level_qty(p);
                price = opposite.next_worse_price(p);
            }
            if available < incoming.quantity as u64 {
                return MatchResult::no_match(incoming.quantity);
            }
        }

        let mut fills = Vec::new();
        let filled = Self::walk_crossing(opposite, incoming, incoming.quantity, |f| fills.push(f));

        MatchResult {
            fills,
            taker_remaining: incoming.quantity - filled,
        }
    }
}
