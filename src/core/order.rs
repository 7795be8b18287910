//! The `Order` value type: the unit of work ingested by the engine.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which book side an order rests on or trades against.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy = 0,
    Sell = 1,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        })
    }
}

bitflags! {
    /// Control flags drawn from the source's `Order::Control` bitset.
    ///
    /// Only [`ControlFlags::IOC`], [`ControlFlags::FOK`] and
    /// [`ControlFlags::MARKET`] are honored by the core matching algorithm;
    /// the rest round-trip through the struct for producers/listeners that
    /// care about provenance, but the engine does not special-case them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ControlFlags: u8 {
        const ICEBERG  = 1 << 0;
        const HIDDEN   = 1 << 1;
        const WEIGHTED = 1 << 2;
        const AUCTION  = 1 << 3;
        const IOC      = 1 << 4;
        const FOK      = 1 << 5;
        const MARKET   = 1 << 6;
        const RESERVED = 1 << 7;
    }
}

/// A fixed 8-byte auxiliary payload, re-architected from the source's
/// `union { visibleQty/hiddenQty | weight | auctionMeta | customData }`.
///
/// The union's purpose in the source is footprint, not aliasing: exactly
/// one interpretation is live at a time, selected by [`ControlFlags`]
/// (`ICEBERG` selects the split-quantity reading, `WEIGHTED`/`AUCTION`
/// select the scalar reading). Rather than a Rust enum with its own
/// discriminant — which would grow the struct past 64 bytes — `Aux` stores
/// the raw bits and the control flags already present on `Order` serve as
/// the tag.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aux(pub u64);

impl Aux {
    pub const NONE: Aux = Aux(0);

    pub fn iceberg(visible_qty: u32, hidden_qty: u32) -> Self {
        Aux(((visible_qty as u64) << 32) | hidden_qty as u64)
    }

    pub fn visible_qty(&self) -> u32 {
        (self.0 >> 32) as u32
    }

    pub fn hidden_qty(&self) -> u32 {
        self.0 as u32
    }

    pub fn weight(value: u64) -> Self {
        Aux(value)
    }

    pub fn auction_meta(value: u64) -> Self {
        Aux(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for Aux {
    fn default() -> Self {
        Aux::NONE
    }
}

impl fmt::Debug for Aux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Aux(0x{:016x})", self.0)
    }
}

/// A single order, cache-line sized and cache-line aligned so producer and
/// engine threads handing it off through the ingress queue never false-share
/// a cache line.
///
/// Field order mirrors the source's layout: 8-byte aux payload, id, price,
/// quantity/timestamp pair, then the single-byte flags, with explicit
/// padding to reach exactly 64 bytes.
#[repr(C, align(64))]
#[derive(Clone, Copy, Debug)]
pub struct Order {
    /// Auxiliary payload, interpreted according to `control`. See [`Aux`].
    pub aux: Aux,
    /// Unique, producer-assigned identifier.
    pub id: u64,
    /// Limit price. Ignored by matching when `control` has `MARKET` set,
    /// but still carried for reference/logging.
    pub price: f64,
    /// Live quantity. Mutated downward by partial fills; removed entirely
    /// (from its side and the id index) when it reaches zero.
    pub quantity: u32,
    /// Producer-assigned tick counter, for provenance only.
    pub timestamp: u32,
    side: u8,
    /// Control flag set. See [`ControlFlags`].
    pub control: ControlFlags,
    /// Provenance only; not interpreted by the core.
    pub feeder_id: u8,
    _reserved: u8,
    _padding: [u8; 28],
}

const _: () = assert!(std::mem::size_of::<Order>() == 64);
const _: () = assert!(std::mem::align_of::<Order>() == 64);

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u64,
        price: f64,
        quantity: u32,
        side: Side,
        feeder_id: u8,
        timestamp: u32,
        control: ControlFlags,
    ) -> Self {
        Order {
            aux: Aux::NONE,
            id,
            price,
            quantity,
            timestamp,
            side: side as u8,
            control,
            feeder_id,
            _reserved: 0,
            _padding: [0; 28],
        }
    }

    pub fn limit(id: u64, price: f64, quantity: u32, side: Side) -> Self {
        Self::new(id, price, quantity, side, 0, 0, ControlFlags::empty())
    }

    pub fn side(&self) -> Side {
        if self.side & 1 == 1 { Side::Sell } else { Side::Buy }
    }

    pub fn set_side(&mut self, side: Side) {
        self.side = side as u8;
    }

    pub fn is_buy(&self) -> bool {
        self.side() == Side::Buy
    }

    pub fn is_sell(&self) -> bool {
        self.side() == Side::Sell
    }

    pub fn is_ioc(&self) -> bool {
        self.control.contains(ControlFlags::IOC)
    }

    pub fn is_fok(&self) -> bool {
        self.control.contains(ControlFlags::FOK)
    }

    pub fn is_market(&self) -> bool {
        self.control.contains(ControlFlags::MARKET)
    }

    pub fn is_iceberg(&self) -> bool {
        self.control.contains(ControlFlags::ICEBERG)
    }

    /// Deduct `qty` from the live quantity, saturating at zero.
    pub fn deduct(&mut self, qty: u32) {
        self.quantity = self.quantity.saturating_sub(qty);
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID:{} Side:{} Price:{:.2} Qty:{} Time:{}",
            self.id,
            self.side(),
            self.price,
            self.quantity,
            self.timestamp
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_cache_line_sized() {
        assert_eq!(std::mem::size_of::<Order>(), 64);
        assert_eq!(std::mem::align_of::<Order>(), 64);
    }

    #[test]
    fn side_round_trips_through_the_packed_byte() {
        let mut o = Order::limit(1, 100.0, 10, Side::Buy);
        assert_eq!(o.side(), Side::Buy);
        assert!(o.is_buy());
        o.set_side(Side::Sell);
        assert_eq!(o.side(), Side::Sell);
        assert!(o.is_sell());
    }

    #[test]
    fn control_flags_not_honored_by_core_still_round_trip() {
        let o = Order::new(
            1,
            100.0,
            10,
            Side::Buy,
            0,
            0,
            ControlFlags::ICEBERG | ControlFlags::HIDDEN,
        );
        assert!(o.is_iceberg());
        assert!(!o.is_ioc());
    }

    #[test]
    fn deduct_saturates_at_zero() {
        let mut o = Order::limit(1, 100.0, 5, Side::Buy);
        o.deduct(10);
        assert_eq!(o.quantity, 0);
    }
}
