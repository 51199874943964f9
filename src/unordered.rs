// unordered.rs
//
// FIFO of suspended handles used as an edge-triggered signal, typically
// raised from an ISR and drained from the main loop. Grounded on
// `original_source/include/coro/scheduler.hpp`'s `scheduler_unordered`.

use core::task::Waker;

use heapless::Vec as HVec;

use crate::log;
use crate::shared::Shared;
use crate::static_list::StaticList;

/// Holds handles suspended on `co_await scheduler` and releases all of them,
/// in FIFO order, on the next call to [`Self::resume`].
///
/// `insert` may be called from an interrupt context while `resume` runs on
/// the main loop; the caller is responsible for masking interrupts around
/// the `StaticList` mutation for the duration of each call (§5 of the
/// design: "the source assumes interrupt-masking implicitly").
pub struct UnorderedScheduler<const N: usize> {
    waiting: StaticList<Waker, N>,
}

impl<const N: usize> UnorderedScheduler<N> {
    pub fn new() -> Self {
        UnorderedScheduler {
            waiting: StaticList::new(),
        }
    }

    pub fn empty(&self) -> bool {
        self.waiting.empty()
    }

    /// Append `handle` at the tail. A no-op (handle dropped, never resumed)
    /// if `waiting` is already at capacity.
    pub fn insert(&mut self, handle: Waker) {
        self.waiting.emplace_back(handle);
        log::log_info("unordered", "insert: signal waiter queued");
    }

    /// Pop exactly one lap through the handles queued at the moment of
    /// this call into a batch, without waking any of them — waking must
    /// happen only after the caller's exclusive access to `self` has
    /// ended, since a woken coroutine's next `.await` may re-insert into
    /// this very scheduler. A woken coroutine that immediately re-inserts
    /// itself lands at the tail *after* this drain has already popped
    /// past that point, so it's picked up by the next call instead of
    /// this one. See `Shared<UnorderedScheduler<_>>::resume`.
    pub fn step(&mut self) -> HVec<Waker, N> {
        let mut batch = HVec::new();
        let mut remaining = self.count_at_entry();
        while remaining > 0 {
            let handle = self.waiting.front().clone();
            self.waiting.pop_front();
            let _ = batch.push(handle);
            remaining -= 1;
        }
        if !batch.is_empty() {
            log::log_info("unordered", "resume: draining one lap");
        }
        batch
    }

    /// Convenience wrapper over [`Self::step`] for callers that aren't
    /// behind a [`Shared`] cell. Wakes inline.
    pub fn resume(&mut self) {
        for handle in self.step() {
            handle.wake_by_ref();
        }
    }

    fn count_at_entry(&self) -> usize {
        self.waiting.iter().count()
    }
}

impl<const N: usize> Shared<UnorderedScheduler<N>> {
    /// Reentrancy-safe driver: collects the batch of handles to wake
    /// under exclusive access, then wakes them only after that access has
    /// ended, so a coroutine re-signalling this same scheduler from its
    /// own wakeup reenters a cell that's no longer borrowed instead of
    /// aliasing a live `&mut` of the same `UnorderedScheduler`.
    pub fn resume(&self) {
        let batch = self.with_mut(|s| s.step());
        for handle in batch {
            handle.wake_by_ref();
        }
    }
}

impl<const N: usize> Default for UnorderedScheduler<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::noop_waker;

    #[test]
    fn resume_drains_exactly_one_lap() {
        let mut sched: UnorderedScheduler<8> = UnorderedScheduler::new();
        for _ in 0..3 {
            sched.insert(noop_waker());
        }
        sched.resume();
        assert!(sched.empty());
    }

    #[test]
    fn resume_on_empty_is_a_no_op() {
        let mut sched: UnorderedScheduler<8> = UnorderedScheduler::new();
        sched.resume();
        assert!(sched.empty());
    }
}
