//! The multi-listener event bus: one producer (the engine thread), many
//! independent consumers, each fed through its own [`Spsc`] ring so a slow
//! or stalled listener cannot block the others or the matching loop.
//!
//! Mirrors the source's `EventBus`: listeners register with a stable handle
//! (a slab slot, so handles stay valid across removal of unrelated
//! listeners), each gets its own consumer thread, and a listener panic is
//! caught at that thread's boundary and only ever takes down its own
//! endpoint.

use crate::engine::EngineError;
use crate::events::Event;
use crate::ring::Spsc;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// What `publish` should do when a listener's ring is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backpressure {
    /// Drop the event for this listener and move on. A single non-blocking
    /// retry, nothing more — codified per spec, not a retry loop.
    Drop,
    /// Block the publishing (engine) thread until there is room.
    Block,
    /// Spin-yield until there is room, without parking the thread.
    SpinYield,
}

/// Anything that can consume published events.
///
/// `on_event` runs on the endpoint's private consumer thread; a panic
/// inside it is caught by the bus and ends only that endpoint.
pub trait Listener: Send + 'static {
    fn on_event(&mut self, event: Event);
}

impl<F: FnMut(Event) + Send + 'static> Listener for F {
    fn on_event(&mut self, event: Event) {
        self(event)
    }
}

/// A stable reference to a registered listener, valid until
/// [`EventBus::remove_listener`] is called with it.
pub type ListenerHandle = u32;

struct Endpoint {
    ring: Arc<Spsc<Event>>,
    running: Arc<AtomicBool>,
    backpressure: Backpressure,
    consumer: Option<JoinHandle<()>>,
}

/// Single-producer, multi-consumer event fan-out.
///
/// `publish` is intended to be called by exactly one thread (the matching
/// engine); nothing here prevents multiple publishers, but the per-listener
/// rings are SPSC and a second concurrent publisher would corrupt them.
pub struct EventBus {
    endpoints: Mutex<Vec<Option<Endpoint>>>,
    shut_down: AtomicBool,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus {
            endpoints: Mutex::new(Vec::new()),
            shut_down: AtomicBool::new(false),
        }
    }

    /// Registers `listener`, spawning its dedicated consumer thread. The
    /// returned handle stays valid (and the slot it names stays reserved)
    /// until [`remove_listener`](Self::remove_listener) is called.
    ///
    /// Fails with [`EngineError::BusShutDown`] if [`stop_all`](Self::stop_all)
    /// has already run — there is no consumer thread left to drive a new
    /// endpoint once the bus has torn everything down.
    pub fn add_listener<L: Listener>(
        &self,
        mut listener: L,
        ring_capacity: usize,
        backpressure: Backpressure,
    ) -> Result<ListenerHandle, EngineError> {
        if self.shut_down.load(Ordering::Acquire) {
            return Err(EngineError::BusShutDown);
        }
        let ring = Arc::new(Spsc::new(ring_capacity));
        let running = Arc::new(AtomicBool::new(true));

        let consumer_ring = ring.clone();
        let consumer_running = running.clone();
        let consumer = thread::spawn(move || {
            loop {
                match consumer_ring.pop() {
                    Some(event) => {
                        let result = panic::catch_unwind(AssertUnwindSafe(|| {
                            listener.on_event(event);
                        }));
                        if result.is_err() {
                            tracing::warn!("event listener panicked; endpoint shutting down");
                            consumer_running.store(false, Ordering::Release);
                            break;
                        }
                    }
                    None => {
                        if !consumer_running.load(Ordering::Acquire) {
                            break;
                        }
                        thread::yield_now();
                    }
                }
            }
        });

        let endpoint = Endpoint {
            ring,
            running,
            backpressure,
            consumer: Some(consumer),
        };

        let mut endpoints = self.endpoints.lock().expect("event bus mutex poisoned");
        for (idx, slot) in endpoints.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = Some(endpoint);
                return Ok(idx as ListenerHandle);
            }
        }
        endpoints.push(Some(endpoint));
        Ok((endpoints.len() - 1) as ListenerHandle)
    }

    /// Stops and joins the listener's consumer thread and frees its slot.
    pub fn remove_listener(&self, handle: ListenerHandle) {
        let endpoint = {
            let mut endpoints = self.endpoints.lock().expect("event bus mutex poisoned");
            endpoints
                .get_mut(handle as usize)
                .and_then(|slot| slot.take())
        };
        if let Some(mut endpoint) = endpoint {
            endpoint.running.store(false, Ordering::Release);
            if let Some(handle) = endpoint.consumer.take() {
                let _ = handle.join();
            }
        }
    }

    /// Fans `event` out to every live listener, honoring each endpoint's own
    /// backpressure policy independently.
    pub fn publish(&self, event: Event) {
        let endpoints = self.endpoints.lock().expect("event bus mutex poisoned");
        for endpoint in endpoints.iter().flatten() {
            deliver(endpoint, event);
        }
    }

    /// Stops and joins every registered listener's consumer thread, then
    /// marks the bus permanently shut down: subsequent `add_listener` calls
    /// fail rather than spawn an endpoint nothing will ever drive.
    pub fn stop_all(&self) {
        self.shut_down.store(true, Ordering::Release);
        let mut endpoints = self.endpoints.lock().expect("event bus mutex poisoned");
        for slot in endpoints.iter_mut() {
            if let Some(mut endpoint) = slot.take() {
                endpoint.running.store(false, Ordering::Release);
                if let Some(handle) = endpoint.consumer.take() {
                    let _ = handle.join();
                }
            }
        }
    }

    /// Whether [`stop_all`](Self::stop_all) has already run.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    pub fn listener_count(&self) -> usize {
        self.endpoints
            .lock()
            .expect("event bus mutex poisoned")
            .iter()
            .filter(|s| s.is_some())
            .count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EventBus {
    fn drop(&mut self) {
        self.stop_all();
    }
}

fn deliver(endpoint: &Endpoint, event: Event) {
    match endpoint.backpressure {
        Backpressure::Drop => {
            if !endpoint.ring.push(event) {
                tracing::trace!("listener ring full; dropping event");
            }
        }
        Backpressure::Block => {
            while !endpoint.ring.push(event) {
                if !endpoint.running.load(Ordering::Acquire) {
                    tracing::trace!("listener endpoint gone; dropping event instead of blocking forever");
                    break;
                }
                thread::sleep(Duration::from_micros(50));
            }
        }
        Backpressure::SpinYield => {
            while !endpoint.ring.push(event) {
                if !endpoint.running.load(Ordering::Acquire) {
                    tracing::trace!("listener endpoint gone; dropping event instead of spinning forever");
                    break;
                }
                thread::yield_now();
            }
        }
    }
}
