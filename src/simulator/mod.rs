//! Ties the engine, the event bus, the ingress pipeline, and a pool of
//! producer threads into a runnable simulation with start/stop lifecycle
//! methods, mirroring the source's top-level `Simulator` driver.

mod config;
mod feeder;

pub use config::{SimulatorConfig, SimulatorConfigBuilder};

use crate::bus::{Backpressure, EventBus, Listener, ListenerHandle};
use crate::engine::{EngineError, OrderBookEngine};
use crate::events::Price;
use crate::ingress::{run_matching_loop, IngressMessage};
use crate::listeners::{Logger, OrderBookView, StatsCollector};
use crate::matching::PriceTimePriorityStrategy;
use crate::rng::{RealRng, Rng};
use crate::ring::IngressQueue;
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

/// Read-only side of the listener bundle [`Simulator::enable_live_view`]
/// registers: a reconstructed depth-of-book view and running trade
/// statistics, shared with the bus-facing listeners via `Arc`/`Clone` rather
/// than polled.
#[derive(Clone)]
pub struct LiveView {
    book: Arc<Mutex<OrderBookView>>,
    stats: StatsCollector,
}

impl LiveView {
    pub fn best_bid(&self) -> Option<Price> {
        self.book.lock().expect("order book view mutex poisoned").best_bid()
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.book.lock().expect("order book view mutex poisoned").best_ask()
    }

    pub fn stats(&self) -> &StatsCollector {
        &self.stats
    }
}

/// The registered handles backing an enabled [`LiveView`], so
/// `enable_live_view(false)` can tear the bundle down symmetrically.
struct LiveViewHandles {
    view: LiveView,
    handles: Vec<ListenerHandle>,
}

/// Owns every moving part of a simulation run: the engine thread, the
/// producer pool, and the event bus they publish through.
pub struct Simulator {
    config: SimulatorConfig,
    bus: Arc<EventBus>,
    queue: Arc<IngressQueue<IngressMessage>>,
    id_generator: Arc<AtomicU64>,
    engine_thread: Option<JoinHandle<()>>,
    producer_threads: Vec<JoinHandle<()>>,
    live_view: Option<LiveViewHandles>,
}

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Simulator {
            config,
            bus: Arc::new(EventBus::new()),
            queue: Arc::new(IngressQueue::new()),
            id_generator: Arc::new(AtomicU64::new(1)),
            engine_thread: None,
            producer_threads: Vec::new(),
            live_view: None,
        }
    }

    /// Registers a listener on the underlying bus. Must be called before
    /// [`start`](Self::start) — listeners hooked up afterward miss every
    /// event published before they subscribe. Fails with
    /// [`EngineError::BusShutDown`] if the simulator has already been
    /// stopped once.
    pub fn add_listener<L: Listener>(
        &self,
        listener: L,
        backpressure: Backpressure,
    ) -> Result<ListenerHandle, EngineError> {
        self.bus
            .add_listener(listener, self.config.listener_ring_capacity, backpressure)
    }

    /// Submits an order directly, bypassing the producer pool. Useful for
    /// scripted scenarios and tests.
    pub fn submit(&self, order: crate::core::Order) {
        self.queue.push(IngressMessage::Add(order));
    }

    /// Submits a cancel request, bypassing the producer pool.
    pub fn cancel(&self, id: u64) {
        self.queue.push(IngressMessage::Cancel(id));
    }

    /// Atomically registers or tears down the live-view listener bundle: an
    /// [`OrderBookView`], a [`StatsCollector`], and a [`Logger`] standing in
    /// for the source's data publisher. Enabling twice or disabling twice is
    /// a no-op, so callers (and [`start`](Self::start), via
    /// [`SimulatorConfig::live_view`]) can call this unconditionally.
    pub fn enable_live_view(&mut self, enable: bool) -> Result<(), EngineError> {
        if !enable {
            if let Some(bundle) = self.live_view.take() {
                for handle in bundle.handles {
                    self.bus.remove_listener(handle);
                }
            }
            return Ok(());
        }

        if self.live_view.is_some() {
            return Ok(());
        }

        let book = Arc::new(Mutex::new(OrderBookView::new()));
        let stats = StatsCollector::new();

        let book_handle = self.add_listener(book.clone(), Backpressure::Drop)?;
        let stats_handle = self.add_listener(stats.clone(), Backpressure::Drop).map_err(|err| {
            self.bus.remove_listener(book_handle);
            err
        })?;
        let publisher_handle = self.add_listener(Logger::new(), Backpressure::Drop).map_err(|err| {
            self.bus.remove_listener(book_handle);
            self.bus.remove_listener(stats_handle);
            err
        })?;

        self.live_view = Some(LiveViewHandles {
            view: LiveView { book, stats },
            handles: vec![book_handle, stats_handle, publisher_handle],
        });
        Ok(())
    }

    /// The live-view bundle's read side, if currently enabled via
    /// [`enable_live_view`](Self::enable_live_view) or
    /// [`SimulatorConfig::live_view`].
    pub fn live_view(&self) -> Option<&LiveView> {
        self.live_view.as_ref().map(|bundle| &bundle.view)
    }

    /// Spawns the matching-loop thread and every configured producer
    /// thread. Returns an error if already running.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.engine_thread.is_some() {
            return Err(EngineError::InvalidLifecycleTransition("start called while already running"));
        }

        let bus = self.bus.clone();
        let queue = self.queue.clone();
        self.engine_thread = Some(std::thread::spawn(move || {
            let mut engine = OrderBookEngine::new(Box::new(PriceTimePriorityStrategy::new()), bus);
            run_matching_loop(&mut engine, &queue);
        }));

        for feeder_id in 0..self.config.producer_count {
            let config = self.config.clone();
            let queue = self.queue.clone();
            let id_generator = self.id_generator.clone();
            let rng: Box<dyn Rng> = match self.config.seed {
                Some(seed) => Box::new(RealRng::from_seed(seed.wrapping_add(feeder_id as u64))),
                None => Box::new(RealRng::from_entropy()),
            };
            self.producer_threads.push(std::thread::spawn(move || {
                feeder::run_feeder(&config, rng, id_generator, feeder_id as u8, queue);
            }));
        }

        if self.config.live_view {
            self.enable_live_view(true)?;
        }

        Ok(())
    }

    /// Joins every producer thread, closes the ingress queue so the
    /// matching loop drains and exits, joins it, then stops every listener
    /// endpoint on the bus.
    pub fn stop(&mut self) -> Result<(), EngineError> {
        if self.engine_thread.is_none() {
            return Err(EngineError::InvalidLifecycleTransition("stop called before start"));
        }

        for handle in self.producer_threads.drain(..) {
            let _ = handle.join();
        }
        self.queue.close();
        if let Some(handle) = self.engine_thread.take() {
            let _ = handle.join();
        }
        self.bus.stop_all();
        Ok(())
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        if self.engine_thread.is_some() {
            let _ = self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Order, Side};
    use crate::listeners::StatsCollector;
    use std::time::Duration;

    #[test]
    fn simulator_runs_producers_to_completion_and_stops_cleanly() {
        let config = SimulatorConfig::builder()
            .producer_count(2)
            .orders_per_producer(50)
            .seed(7)
            .build();
        let mut sim = Simulator::new(config);
        let stats = StatsCollector::new();
        sim.add_listener(stats.clone(), Backpressure::Block).unwrap();
        sim.start().unwrap();
        std::thread::sleep(Duration::from_millis(50));
        sim.stop().unwrap();
        // Volume traded must be consistent with the fill count regardless of
        // how many of the 100 random orders happened to cross.
        assert_eq!(stats.fill_count() == 0, stats.total_volume() == 0);
    }

    #[test]
    fn scripted_submit_and_cancel_reach_the_engine() {
        let config = SimulatorConfig::builder().producer_count(0).build();
        let mut sim = Simulator::new(config);
        sim.start().unwrap();
        sim.submit(Order::limit(1, 100.0, 10, Side::Buy));
        sim.cancel(1);
        sim.stop().unwrap();
    }

    #[test]
    fn double_start_is_rejected() {
        let config = SimulatorConfig::builder().producer_count(0).build();
        let mut sim = Simulator::new(config);
        sim.start().unwrap();
        assert!(sim.start().is_err());
        sim.stop().unwrap();
    }

    #[test]
    fn enable_live_view_tracks_fills_and_disable_removes_it() {
        let config = SimulatorConfig::builder().producer_count(0).build();
        let mut sim = Simulator::new(config);
        sim.start().unwrap();
        sim.enable_live_view(true).unwrap();
        assert!(sim.live_view().is_some());

        sim.submit(Order::limit(1, 100.0, 10, Side::Sell));
        sim.submit(Order::limit(2, 100.0, 10, Side::Buy));
        std::thread::sleep(Duration::from_millis(50));

        let view = sim.live_view().unwrap();
        assert_eq!(view.stats().fill_count(), 1);
        assert_eq!(view.best_bid(), None);
        assert_eq!(view.best_ask(), None);

        sim.enable_live_view(false).unwrap();
        assert!(sim.live_view().is_none());
        sim.stop().unwrap();
    }

    #[test]
    fn enable_live_view_is_idempotent() {
        let config = SimulatorConfig::builder().producer_count(0).build();
        let mut sim = Simulator::new(config);
        sim.start().unwrap();
        sim.enable_live_view(true).unwrap();
        sim.enable_live_view(true).unwrap();
        assert!(sim.live_view().is_some());
        sim.enable_live_view(false).unwrap();
        sim.enable_live_view(false).unwrap();
        assert!(sim.live_view().is_none());
        sim.stop().unwrap();
    }

    #[test]
    fn config_live_view_is_enabled_automatically_on_start() {
        let config = SimulatorConfig::builder().producer_count(0).live_view(true).build();
        let mut sim = Simulator::new(config);
        sim.start().unwrap();
        assert!(sim.live_view().is_some());
        sim.stop().unwrap();
    }
}
