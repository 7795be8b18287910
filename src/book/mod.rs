//! The two-sided order book: a bid side and an ask side, each a price-keyed
//! FIFO structure (see [`level`] and [`side`]).

mod level;
mod side;

pub use level::{LevelIter, Position, PriceLevel};
pub use side::{Ascending, AskSide, BestFirstIter, BidSide, BookSide, Descending, LevelOrder};

use crate::core::Order;
use crate::events::Price;

/// A read-only view of "the other side" of the book, as seen by a matching
/// strategy walking it to fill an incoming order.
///
/// Exists so [`crate::matching::MatchingStrategy`] can be written once
/// against a trait object instead of being generic over both possible
/// concrete [`BookSide`] instantiations (a buy taker matches against
/// [`AskSide`], a sell taker against [`BidSide`]) — mirroring how the source
/// decouples its matching routine from which side the incoming order
/// belongs to.
pub trait OppositeView {
    /// Best resting price on this side, if any.
    fn best_price(&self) -> Option<Price>;

    /// The next-best price strictly worse than `price`, or `None` if `price`
    /// was the worst level. Lets a matching strategy walk the book
    /// level-by-level without mutating it (matching is read-only per the
    /// strategy contract — only the engine mutates resting orders).
    fn next_worse_price(&self, price: Price) -> Option<Price>;

    /// Whether any orders rest at `price`.
    fn has_level(&self, price: Price) -> bool;

    /// Total resting quantity at `price` (0 if absent).
    fn level_qty(&self, price: Price) -> u64;

    /// FIFO-ordered `(position, order)` pairs resting at `price`.
    fn orders_at<'a>(&'a self, price: Price) -> Box<dyn Iterator<Item = (Position, &'a Order)> + 'a>;
}

impl<C: LevelOrder> OppositeView for BookSide<C> {
    fn best_price(&self) -> Option<Price> {
        BookSide::best_price(self)
    }

    fn next_worse_price(&self, price: Price) -> Option<Price> {
        BookSide::next_worse_price(self, price)
    }

    fn has_level(&self, price: Price) -> bool {
        self.get_level(price).is_some()
    }

    fn level_qty(&self, price: Price) -> u64 {
        self.get_level(price).map(PriceLevel::aggregate_qty).unwrap_or(0)
    }

    fn orders_at<'a>(&'a self, price: Price) -> Box<dyn Iterator<Item = (Position, &'a Order)> + 'a> {
        Box::new(self.for_each_order_at_price(price))
    }
}
