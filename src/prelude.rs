//! Commonly used types, re-exported for `use lob_engine::prelude::*;`.

pub use crate::book::{AskSide, BidSide, OppositeView, Position};
pub use crate::bus::{Backpressure, EventBus, Listener, ListenerHandle};
pub use crate::core::{Aux, ControlFlags, Order, Side};
pub use crate::engine::{EngineError, OrderBookEngine};
pub use crate::events::{Event, EventKind, Price, Seq, Tick};
pub use crate::ingress::{run_matching_loop, IngressMessage};
pub use crate::listeners::{Logger, OrderBookView, StatsCollector};
pub use crate::matching::{MatchingStrategy, PriceTimePriorityStrategy};
pub use crate::ring::{IngressQueue, Spsc};
pub use crate::simulator::{Simulator, SimulatorConfig, SimulatorConfigBuilder};
