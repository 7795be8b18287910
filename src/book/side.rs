//! One side of the book: an ordered price -> FIFO-level map.
//!
//! Parametric over a comparator marker, mirroring the source's
//! `OrderBookSide<Comparator>` template (`utils::comparator::Descending` /
//! `Ascending`). The book's sides are mutated exclusively by the single
//! engine thread (see spec §5), so the ordered map itself needs no internal
//! synchronization — a plain `BTreeMap` keyed on [`Price`] is the idiomatic
//! single-writer equivalent of the source's `std::map<double, OrderQueue>`.

use super::level::{Position, PriceLevel};
use crate::core::Order;
use crate::events::Price;
use std::collections::BTreeMap;
use std::marker::PhantomData;

/// Selects best-first iteration direction for a book side.
pub trait LevelOrder {
    const DESCENDING: bool;
}

/// Bid-side ordering: best price is the greatest.
#[derive(Debug, Clone, Copy, Default)]
pub struct Descending;
impl LevelOrder for Descending {
    const DESCENDING: bool = true;
}

/// Ask-side ordering: best price is the least.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ascending;
impl LevelOrder for Ascending {
    const DESCENDING: bool = false;
}

/// Iterates `(Price, &PriceLevel)` pairs best-first, regardless of the
/// side's underlying comparator.
pub enum BestFirstIter<'a> {
    Asc(std::collections::btree_map::Iter<'a, Price, PriceLevel>),
    Desc(std::iter::Rev<std::collections::btree_map::Iter<'a, Price, PriceLevel>>),
}

impl<'a> Iterator for BestFirstIter<'a> {
    type Item = (Price, &'a PriceLevel);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            BestFirstIter::Asc(it) => it.next().map(|(p, l)| (*p, l)),
            BestFirstIter::Desc(it) => it.next().map(|(p, l)| (*p, l)),
        }
    }
}

/// One side (bid or ask) of the book.
pub struct BookSide<C: LevelOrder> {
    levels: BTreeMap<Price, PriceLevel>,
    _marker: PhantomData<C>,
}

impl<C: LevelOrder> Default for BookSide<C> {
    fn default() -> Self {
        BookSide {
            levels: BTreeMap::new(),
            _marker: PhantomData,
        }
    }
}

impl<C: LevelOrder> BookSide<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `order` to the level at its price (creating the level if
    /// absent) and returns the resulting position handle.
    pub fn add(&mut self, order: Order) -> Position {
        let price = Price::new(order.price);
        let level = self
            .levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price));
        level.push_back(order)
    }

    pub fn get_level(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    pub fn get_level_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    /// Removes the order at `(price, position)`, removing the level too if
    /// it becomes empty. No-op (returns `None`) if the key or position is
    /// absent/stale.
    pub fn erase(&mut self, price: Price, position: Position) -> Option<Order> {
        let level = self.levels.get_mut(&price)?;
        let removed = level.erase(position);
        if level.is_empty() {
            self.levels.remove(&price);
        }
        removed
    }

    /// Deducts `qty` from the order at `(price, position)`, removing the
    /// order and, if it becomes empty, the level. Returns the order's
    /// remaining quantity after deduction, or `None` if the handle was
    /// stale.
    pub fn deduct(&mut self, price: Price, position: Position, qty: u32) -> Option<u32> {
        let level = self.levels.get_mut(&price)?;
        let remaining = level.deduct(position, qty)?;
        if remaining == 0 {
            level.erase(position);
            if level.is_empty() {
                self.levels.remove(&price);
            }
        }
        Some(remaining)
    }

    pub fn remove_level_if_empty(&mut self, price: Price) {
        if self.levels.get(&price).is_some_and(PriceLevel::is_empty) {
            self.levels.remove(&price);
        }
    }

    /// The best price on this side, or `None` if the side is empty.
    pub fn best_price(&self) -> Option<Price> {
        if C::DESCENDING {
            self.levels.keys().next_back().copied()
        } else {
            self.levels.keys().next().copied()
        }
    }

    /// The next-best price strictly worse than `price` on this side, or
    /// `None` if `price` was the worst (or absent) level. Used to walk the
    /// book level-by-level without mutating it — unlike re-reading
    /// `best_price()` after each level, this doesn't depend on the caller
    /// having removed `price`'s level first.
    pub fn next_worse_price(&self, price: Price) -> Option<Price> {
        use std::ops::Bound::Excluded;
        if C::DESCENDING {
            self.levels
                .range((std::ops::Bound::Unbounded, Excluded(price)))
                .next_back()
                .map(|(p, _)| *p)
        } else {
            self.levels
                .range((Excluded(price), std::ops::Bound::Unbounded))
                .next()
                .map(|(p, _)| *p)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Iterates levels best-first.
    pub fn for_each_level(&self) -> BestFirstIter<'_> {
        if C::DESCENDING {
            BestFirstIter::Desc(self.levels.iter().rev())
        } else {
            BestFirstIter::Asc(self.levels.iter())
        }
    }

    /// Iterates the FIFO at one level, head-to-tail. Empty iterator if the
    /// level is absent.
    pub fn for_each_order_at_price(
        &self,
        price: Price,
    ) -> impl Iterator<Item = (Position, &Order)> {
        self.levels.get(&price).into_iter().flat_map(|l| l.iter())
    }

    /// Total live quantity across every level on this side.
    pub fn total_qty(&self) -> u64 {
        self.levels.values().map(PriceLevel::aggregate_qty).sum()
    }
}

pub type BidSide = BookSide<Descending>;
pub type AskSide = BookSide<Ascending>;
