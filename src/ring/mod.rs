//! Bounded transports that move data between threads without the matching
//! engine or event bus ever holding a lock on the hot path.

mod mpsc;
mod spsc;

pub use mpsc::IngressQueue;
pub use spsc::Spsc;
