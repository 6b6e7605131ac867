//! Per-display-refresh scheduling.
//!
//! The field never owns a clock. The host hands it a [`FrameScheduler`]: a
//! "call me once on the next display refresh" primitive plus a way to take the
//! request back. Browsers call this `requestAnimationFrame`; in this crate the
//! window host and the tests both use [`FrameQueue`], which runs its pending
//! callbacks whenever the owner calls [`FrameQueue::fire`].

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Callback run once on the next frame.
pub type FrameCallback = Box<dyn FnOnce()>;

/// Identifies one outstanding frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Host capability for running a callback on the next display refresh.
///
/// Both methods take `&self`: the scheduler is shared between the owner of
/// the loop and the callback that re-arms it.
pub trait FrameScheduler {
    /// Run `callback` once on the next frame.
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;

    /// Withdraw a request. Unknown or already-run handles are ignored.
    fn cancel(&self, handle: FrameHandle);
}

impl<F: FrameScheduler + ?Sized> FrameScheduler for Rc<F> {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        (**self).request_frame(callback)
    }

    fn cancel(&self, handle: FrameHandle) {
        (**self).cancel(handle)
    }
}

#[derive(Default)]
struct Queue {
    next_id: u64,
    pending: VecDeque<(FrameHandle, FrameCallback)>,
}

/// A frame scheduler driven by hand.
///
/// Cloning gives another handle to the same queue.
#[derive(Clone, Default)]
pub struct FrameQueue {
    queue: Rc<RefCell<Queue>>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests waiting for the next [`fire`](Self::fire).
    pub fn pending(&self) -> usize {
        self.queue.borrow().pending.len()
    }

    /// Signal one display refresh.
    ///
    /// Runs every callback that was pending when `fire` was called, in request
    /// order. Callbacks requested while firing wait for the next call; ones
    /// cancelled while firing are skipped. Returns how many callbacks ran.
    pub fn fire(&self) -> usize {
        let due: Vec<FrameHandle> = self
            .queue
            .borrow()
            .pending
            .iter()
            .map(|(handle, _)| *handle)
            .collect();

        let mut ran = 0;
        for handle in due {
            // The queue borrow must end before the callback runs; it will
            // usually request the next frame.
            let callback = {
                let mut queue = self.queue.borrow_mut();
                let index = queue.pending.iter().position(|(h, _)| *h == handle);
                index.and_then(|i| queue.pending.remove(i))
            };
            if let Some((_, callback)) = callback {
                callback();
                ran += 1;
            }
        }
        ran
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let mut queue = self.queue.borrow_mut();
        let handle = FrameHandle(queue.next_id);
        queue.next_id += 1;
        queue.pending.push_back((handle, callback));
        handle
    }

    fn cancel(&self, handle: FrameHandle) {
        self.queue.borrow_mut().pending.retain(|(h, _)| *h != handle);
    }
}

impl fmt::Debug for FrameQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameQueue")
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_fire_runs_pending_once() {
        let queue = FrameQueue::new();
        let hits = Rc::new(Cell::new(0));

        let h = hits.clone();
        queue.request_frame(Box::new(move || h.set(h.get() + 1)));
        assert_eq!(queue.pending(), 1);

        assert_eq!(queue.fire(), 1);
        assert_eq!(queue.fire(), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_cancel_skips_callback() {
        let queue = FrameQueue::new();
        let hits = Rc::new(Cell::new(0));

        let h = hits.clone();
        let handle = queue.request_frame(Box::new(move || h.set(h.get() + 1)));
        queue.cancel(handle);
        queue.cancel(handle);

        assert_eq!(queue.fire(), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_requests_during_fire_wait() {
        let queue = FrameQueue::new();
        let hits = Rc::new(Cell::new(0));

        let q = queue.clone();
        let h = hits.clone();
        queue.request_frame(Box::new(move || {
            h.set(h.get() + 1);
            let h2 = h.clone();
            q.request_frame(Box::new(move || h2.set(h2.get() + 10)));
        }));

        assert_eq!(queue.fire(), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.fire(), 1);
        assert_eq!(hits.get(), 11);
    }

    #[test]
    fn test_cancel_during_fire() {
        let queue = FrameQueue::new();
        let hits = Rc::new(Cell::new(0));
        let victim = Rc::new(Cell::new(None));

        let q = queue.clone();
        let v = victim.clone();
        queue.request_frame(Box::new(move || {
            if let Some(handle) = v.get() {
                q.cancel(handle);
            }
        }));
        let h = hits.clone();
        victim.set(Some(queue.request_frame(Box::new(move || h.set(1)))));

        assert_eq!(queue.fire(), 1);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_handles_are_unique() {
        let queue = FrameQueue::new();
        let a = queue.request_frame(Box::new(|| {}));
        let b = queue.request_frame(Box::new(|| {}));
        assert_ne!(a, b);
    }
}
