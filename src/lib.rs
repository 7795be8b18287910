//! # lob-engine
//!
//! A simulated limit-order-book matching engine: price-time priority
//! matching over two book sides, a single-threaded matching loop fed by a
//! bounded ingress queue, and a lock-free, multi-listener event bus for
//! fanning out book state changes.
//!
//! ## Architecture
//!
//! - [`core`] — the `Order` value type and its control flags.
//! - [`ring`] — the lock-free SPSC ring used by the event bus, and the
//!   blocking MPSC ingress queue feeding the matching loop.
//! - [`book`] — the two-sided book: a generational-arena FIFO price level
//!   ([`book::PriceLevel`]) keyed by price in an ordered map
//!   ([`book::BookSide`]).
//! - [`matching`] — pluggable matching strategies, decoupled from which
//!   book side is on the taking end via [`book::OppositeView`].
//! - [`engine`] — [`engine::OrderBookEngine`], the sole mutator of the book
//!   and the id index, and the only thing allowed to publish events.
//! - [`bus`] — [`bus::EventBus`], one ring per listener, backpressure
//!   chosen per listener, listener panics isolated to their own endpoint.
//! - [`ingress`] — the message queue and matching-loop driver tying
//!   producers to the engine.
//! - [`listeners`] — ready-made listeners: a depth-of-book view, a stats
//!   collector, and a `tracing`-based logger.
//! - [`simulator`] — wires everything into a runnable simulation with a
//!   producer pool.
//!
//! Everything that mutates book state runs on a single thread (the
//! matching loop); everything downstream of it runs concurrently but reads
//! only from its own private ring.

pub mod book;
pub mod bus;
pub mod core;
pub mod engine;
pub mod events;
pub mod ingress;
pub mod listeners;
pub mod matching;
pub mod prelude;
pub mod ring;
pub mod rng;
pub mod simulator;
