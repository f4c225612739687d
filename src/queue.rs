//! Bounded, drop-oldest FIFO queue (§4.E) shared by the outbound command
//! queue and the inbound message queue.
//!
//! Generalizes the teacher's `VecDeque`-based `pending_messages` buffer
//! (previously a client-private stash for out-of-order nonce responses)
//! into a first-class queue type both queues build on.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

/// `0` means unbounded.
pub type Bound = usize;

pub struct BoundedQueue<T> {
    bound: Bound,
    inner: Mutex<VecDeque<T>>,
    not_empty: Condvar,
}

/// Outcome of a [`BoundedQueue::push`] call.
pub enum PushOutcome<T> {
    /// Pushed with room to spare.
    Accepted,
    /// Pushed, but the oldest entry had to be evicted to make room.
    AcceptedEvicting(T),
}

impl<T> BoundedQueue<T> {
    pub fn new(bound: Bound) -> Self {
        Self {
            bound,
            inner: Mutex::new(VecDeque::new()),
            not_empty: Condvar::new(),
        }
    }

    /// Push `value` to the back. If the queue is at capacity, the oldest
    /// entry is dropped first and returned via `AcceptedEvicting`, never
    /// blocking the caller (§4.E: "the engine must never block the
    /// client's thread").
    pub fn push(&self, value: T) -> PushOutcome<T> {
        let mut guard = self.inner.lock().unwrap();
        let evicted = if self.bound != 0 && guard.len() >= self.bound {
            guard.pop_front()
        } else {
            None
        };
        guard.push_back(value);
        drop(guard);
        self.not_empty.notify_one();

        match evicted {
            Some(old) => PushOutcome::AcceptedEvicting(old),
            None => PushOutcome::Accepted,
        }
    }

    /// Pop the oldest entry, if any, without blocking.
    pub fn pop(&self) -> Option<T> {
        self.inner.lock().unwrap().pop_front()
    }

    /// Pop up to `n` entries without blocking.
    pub fn pop_up_to(&self, n: usize) -> Vec<T> {
        let mut guard = self.inner.lock().unwrap();
        let take = n.min(guard.len());
        guard.drain(..take).collect()
    }

    /// Drain everything currently queued, in FIFO order.
    pub fn drain_all(&self) -> Vec<T> {
        self.inner.lock().unwrap().drain(..).collect()
    }

    /// Block until an entry is available or `timeout` elapses, then pop it.
    pub fn pop_wait(&self, timeout: Duration) -> Option<T> {
        let guard = self.inner.lock().unwrap();
        let (mut guard, _) = self
            .not_empty
            .wait_timeout_while(guard, timeout, |q| q.is_empty())
            .unwrap();
        guard.pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_preserves_fifo_order() {
        let queue: BoundedQueue<u32> = BoundedQueue::new(0);
        queue.push(1);
        queue.push(2);
        queue.push(3);

        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn bounded_queue_drops_oldest_when_full() {
        let queue: BoundedQueue<u32> = BoundedQueue::new(2);
        queue.push(1);
        queue.push(2);

        match queue.push(3) {
            PushOutcome::AcceptedEvicting(evicted) => assert_eq!(evicted, 1),
            PushOutcome::Accepted => panic!("expected eviction"),
        }

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(3));
    }

    #[test]
    fn zero_bound_is_unbounded() {
        let queue: BoundedQueue<u32> = BoundedQueue::new(0);
        for i in 0..1000 {
            queue.push(i);
        }
        assert_eq!(queue.len(), 1000);
    }

    #[test]
    fn pop_up_to_respects_n_and_availability() {
        let queue: BoundedQueue<u32> = BoundedQueue::new(0);
        queue.push(1);
        queue.push(2);
        queue.push(3);

        let popped = queue.pop_up_to(2);
        assert_eq!(popped, vec![1, 2]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn pop_wait_times_out_on_empty_queue() {
        let queue: BoundedQueue<u32> = BoundedQueue::new(0);
        let start = std::time::Instant::now();
        assert!(queue.pop_wait(Duration::from_millis(20)).is_none());
        assert!(start.elapsed() >= Duration::from_millis(15));
    }

    #[test]
    fn pop_wait_wakes_on_push() {
        use std::sync::Arc;
        use std::thread;

        let queue: Arc<BoundedQueue<u32>> = Arc::new(BoundedQueue::new(0));
        let producer = Arc::clone(&queue);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            producer.push(42);
        });

        let value = queue.pop_wait(Duration::from_secs(1));
        handle.join().unwrap();
        assert_eq!(value, Some(42));
    }
}
