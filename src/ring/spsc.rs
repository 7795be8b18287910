//! Lock-free single-producer, single-consumer ring buffer.
//!
//! One thread pushes, one thread pops. Capacity is a fixed power of two
//! chosen at construction. `push` returns `false` when full; `pop` returns
//! `None` when empty. No locks, no allocation after construction.

use crossbeam::utils::CachePadded;
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicU64, Ordering};

/// A bounded lock-free ring transporting `T` by value.
///
/// `T` is required to be `Copy` because the ring is built for POD payloads
/// (see [`crate::events::Event`]) — slots are overwritten and read by value,
/// never dropped explicitly.
pub struct Spsc<T: Copy> {
    buf: Box<[UnsafeCell<MaybeUninit<T>>]>,
    mask: u64,
    // `head` is only ever written by the producer, `tail` only by the
    // consumer; each is padded to its own cache line so producer and
    // consumer progress don't false-share.
    head: CachePadded<AtomicU64>,
    tail: CachePadded<AtomicU64>,
}

// SAFETY: a `Spsc<T>` is shared between exactly one producer and one
// consumer thread; `T: Send` is all that's required for that hand-off.
unsafe impl<T: Copy + Send> Send for Spsc<T> {}
unsafe impl<T: Copy + Send> Sync for Spsc<T> {}

impl<T: Copy> Spsc<T> {
    /// Constructs a ring with the given power-of-two capacity.
    ///
    /// # Panics
    /// Panics if `capacity` is zero or not a power of two.
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity > 0 && capacity.is_power_of_two(),
            "Spsc capacity must be a non-zero power of two, got {capacity}"
        );
        let buf = (0..capacity)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Spsc {
            buf,
            mask: (capacity - 1) as u64,
            head: CachePadded::new(AtomicU64::new(0)),
            tail: CachePadded::new(AtomicU64::new(0)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Pushes a value. Returns `false` without blocking if the ring is full.
    pub fn push(&self, value: T) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        if head.wrapping_sub(tail) >= self.buf.len() as u64 {
            return false;
        }
        let idx = (head & self.mask) as usize;
        // SAFETY: this slot is owned by the producer until `head` is
        // published below; the consumer cannot be reading it because
        // `head - tail < capacity` guarantees it was already consumed.
        unsafe {
            (*self.buf[idx].get()).write(value);
        }
        self.head.store(head.wrapping_add(1), Ordering::Release);
        true
    }

    /// Pops a value. Returns `None` without blocking if the ring is empty.
    pub fn pop(&self) -> Option<T> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        if head == tail {
            return None;
        }
        let idx = (tail & self.mask) as usize;
        // SAFETY: `head != tail` guarantees the producer has published this
        // slot (via its Release store) and the consumer is the sole reader.
        let value = unsafe { (*self.buf[idx].get()).assume_init_read() };
        self.tail.store(tail.wrapping_add(1), Ordering::Release);
        Some(value)
    }

    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_round_trip() {
        let ring: Spsc<u64> = Spsc::new(4);
        assert!(ring.push(1));
        assert!(ring.push(2));
        assert_eq!(ring.pop(), Some(1));
        assert_eq!(ring.pop(), Some(2));
        assert_eq!(ring.pop(), None);
    }

    #[test]
    fn push_fails_when_full() {
        let ring: Spsc<u64> = Spsc::new(2);
        assert!(ring.push(1));
        assert!(ring.push(2));
        assert!(!ring.push(3));
        assert_eq!(ring.pop(), Some(1));
        assert!(ring.push(3));
        assert_eq!(ring.pop(), Some(2));
        assert_eq!(ring.pop(), Some(3));
    }

    #[test]
    #[should_panic]
    fn capacity_must_be_power_of_two() {
        let _ring: Spsc<u64> = Spsc::new(3);
    }

    #[test]
    fn concurrent_producer_consumer() {
        use std::sync::Arc;
        use std::thread;

        let ring: Arc<Spsc<u64>> = Arc::new(Spsc::new(1024));
        let producer_ring = ring.clone();
        const N: u64 = 200_000;

        let producer = thread::spawn(move || {
            let mut i = 0u64;
            while i < N {
                if producer_ring.push(i) {
                    i += 1;
                }
            }
        });

        let mut received = 0u64;
        while received < N {
            if let Some(v) = ring.pop() {
                assert_eq!(v, received);
                received += 1;
            }
        }
        producer.join().unwrap();
    }
}
