//! Ready-made [`crate::bus::Listener`] implementations. The terminal
//! dashboard itself is out of scope (see spec §1) — these are the
//! in-process listeners that stand in for it and for simple monitoring.

mod logger;
mod stats;
mod view;

pub use logger::Logger;
pub use stats::StatsCollector;
pub use view::OrderBookView;
