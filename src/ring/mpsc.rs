//! Bounded-producer-count, single-consumer blocking ingress queue.
//!
//! Mirrors the source's `ThreadSafeQueue<Order>`: a mutex-and-condvar FIFO
//! that never rejects a push (unbounded for this core) and offers both a
//! non-blocking `pop` and a blocking `wait_and_pop`. On [`IngressQueue::close`]
//! every waiter wakes up and `wait_and_pop` starts returning `None`, which is
//! how the engine thread is told to exit its drain loop.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};

pub struct IngressQueue<T> {
    queue: Mutex<VecDeque<T>>,
    not_empty: Condvar,
    closed: AtomicBool,
}

impl<T> IngressQueue<T> {
    pub fn new() -> Self {
        IngressQueue {
            queue: Mutex::new(VecDeque::new()),
            not_empty: Condvar::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Enqueues an item. Never blocks, never rejects.
    pub fn push(&self, item: T) {
        let mut guard = self.queue.lock().expect("ingress queue mutex poisoned");
        guard.push_back(item);
        drop(guard);
        self.not_empty.notify_one();
    }

    /// Non-blocking pop; `None` if currently empty.
    pub fn pop(&self) -> Option<T> {
        let mut guard = self.queue.lock().expect("ingress queue mutex poisoned");
        guard.pop_front()
    }

    /// Blocks until an item is available or the queue is closed.
    ///
    /// Returns `None` only once the queue has been closed and drained.
    pub fn wait_and_pop(&self) -> Option<T> {
        let mut guard = self.queue.lock().expect("ingress queue mutex poisoned");
        loop {
            if let Some(item) = guard.pop_front() {
                return Some(item);
            }
            if self.closed.load(Ordering::Acquire) {
                return None;
            }
            guard = self
                .not_empty
                .wait(guard)
                .expect("ingress queue mutex poisoned");
        }
    }

    /// Wakes every blocked waiter; subsequent `wait_and_pop` calls return the
    /// remaining items and then `None`.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.not_empty.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.queue.lock().expect("ingress queue mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for IngressQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn fifo_order_preserved() {
        let q = IngressQueue::new();
        q.push(1);
        q.push(2);
        q.push(3);
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.pop(), Some(2));
        assert_eq!(q.pop(), Some(3));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn wait_and_pop_blocks_until_pushed() {
        let q = Arc::new(IngressQueue::new());
        let q2 = q.clone();
        let handle = thread::spawn(move || q2.wait_and_pop());
        thread::sleep(Duration::from_millis(20));
        q.push(42);
        assert_eq!(handle.join().unwrap(), Some(42));
    }

    #[test]
    fn close_wakes_all_waiters() {
        let q = Arc::new(IngressQueue::<u64>::new());
        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let q = q.clone();
                thread::spawn(move || q.wait_and_pop())
            })
            .collect();
        thread::sleep(Duration::from_millis(20));
        q.close();
        for w in waiters {
            assert_eq!(w.join().unwrap(), None);
        }
    }

    #[test]
    fn close_still_drains_pending_items_first() {
        let q = IngressQueue::new();
        q.push(1);
        q.close();
        assert_eq!(q.wait_and_pop(), Some(1));
        assert_eq!(q.wait_and_pop(), None);
    }
}
