//! Core order value type shared by producers, the ingress queue, and the
//! matching engine.

mod order;

pub use order::{Aux, ControlFlags, Order, Side};
