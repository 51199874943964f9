// ordered.rs
//
// Scheduler whose waiters are kept sorted by wake condition: used for both
// delay-based and priority-based waits. Grounded on
// `original_source/include/coro/scheduler.hpp`'s `scheduler_ordered`.

use core::task::Waker;

use crate::log;
use crate::schedule_entry::ScheduleEntry;
use crate::shared::Shared;
use crate::static_list::StaticList;
use crate::wake::WakeCondition;

/// Keeps suspended coroutines sorted by `ready_to_wake` ordering so the
/// entry most likely to fire first sits at the front.
///
/// Intended to be instantiated once per schedule domain (one delay
/// scheduler, one priority scheduler); not `Clone`, not `Copy`.
pub struct OrderedScheduler<W, const N: usize> {
    waiting: StaticList<ScheduleEntry<W>, N>,
}

impl<W: WakeCondition, const N: usize> OrderedScheduler<W, N> {
    pub fn new() -> Self {
        OrderedScheduler {
            waiting: StaticList::new(),
        }
    }

    pub fn empty(&self) -> bool {
        self.waiting.empty()
    }

    /// Insert `handle` to be resumed once `wake_condition` is satisfied,
    /// maintaining sort order. A no-op (handle is simply dropped and never
    /// resumed) if `waiting` is already at capacity — see
    /// `StaticList::emplace`'s debug-build escalation.
    pub fn insert(&mut self, handle: Waker, wake_condition: W) {
        let mut cursor = self.waiting.begin();
        while cursor != self.waiting.end() {
            if wake_condition.ready_to_wake(self.waiting.get(cursor).wake_condition()) {
                break;
            }
            cursor = self.waiting.advance(cursor);
        }
        self.waiting
            .emplace(cursor, ScheduleEntry::new(handle, wake_condition));
        log::log_info("ordered", "insert: waiter queued");
    }

    /// Walk `waiting` front to back looking for the first entry ready
    /// against `observed`; erase it and hand its handle back to the
    /// caller instead of waking it here. Stops at the first match: the
    /// coroutine the handle belongs to may re-suspend on this very
    /// scheduler as soon as it's woken, so a second step within the same
    /// call would be walking a list that wake has already changed
    /// underneath it.
    ///
    /// Returns `(pending, next, wake)`: `pending` is true iff any entry
    /// was seen at all; `next` is the wake condition of the soonest
    /// still-waiting entry; `wake` is the handle the caller must resume —
    /// only after releasing whatever exclusive access got it this far, so
    /// that handle's own re-suspend can't alias it. See
    /// `Shared<OrderedScheduler<_, _>>::resume`.
    pub fn step(&mut self, observed: &W) -> (bool, Option<W>, Option<Waker>)
    where
        W: Clone,
    {
        let mut next: Option<W> = None;
        let mut pending = false;
        let mut cursor = self.waiting.begin();
        while cursor != self.waiting.end() {
            pending = true;
            let entry = self.waiting.get(cursor);
            if entry.ready_to_wake(observed) {
                let snapshot = entry.wake_condition().clone();
                let handle = entry.handle();
                self.waiting.erase(cursor);
                log::log_info("ordered", "resume: waking entry");
                return (true, Some(snapshot), Some(handle));
            }
            let cond = entry.wake_condition();
            match &next {
                Some(soonest) if !soonest.ready_to_wake(cond) => {}
                _ => next = Some(cond.clone()),
            }
            cursor = self.waiting.advance(cursor);
        }
        (pending, next, None)
    }

    /// Convenience wrapper over [`Self::step`] for callers that aren't
    /// behind a [`Shared`] cell (plain, non-reentrant ownership — e.g. a
    /// scheduler owned outright by its driver loop). Wakes inline.
    pub fn resume(&mut self, observed: &W) -> (bool, Option<W>)
    where
        W: Clone,
    {
        let (pending, next, wake) = self.step(observed);
        if let Some(handle) = wake {
            handle.wake_by_ref();
        }
        (pending, next)
    }
}

impl<W: WakeCondition + Clone, const N: usize> Shared<OrderedScheduler<W, N>> {
    /// Reentrancy-safe driver for a scheduler shared with the coroutines
    /// suspended on it. Runs one [`OrderedScheduler::step`] under
    /// exclusive access, then wakes the resumed handle only once that
    /// access has ended — so a coroutine that re-awaits this same
    /// scheduler from inside its own wakeup calls `insert` against a cell
    /// that is no longer borrowed, rather than aliasing a live `&mut` of
    /// the same `OrderedScheduler`.
    pub fn resume(&self, observed: &W) -> (bool, Option<W>) {
        let (pending, next, wake) = self.with_mut(|s| s.step(observed));
        if let Some(handle) = wake {
            handle.wake_by_ref();
        }
        (pending, next)
    }
}

impl<W: WakeCondition, const N: usize> Default for OrderedScheduler<W, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::noop_waker;
    use crate::wake::ByPriority;

    #[test]
    fn insert_keeps_sort_order() {
        let mut sched: OrderedScheduler<ByPriority, 8> = OrderedScheduler::new();
        sched.insert(noop_waker(), ByPriority(3));
        sched.insert(noop_waker(), ByPriority(7));
        sched.insert(noop_waker(), ByPriority(1));
        sched.insert(noop_waker(), ByPriority(5));

        let order: Vec<ByPriority> = sched.waiting.iter().map(|e| *e.wake_condition()).collect();
        for pair in order.windows(2) {
            assert!(
                pair[0].ready_to_wake(&pair[1]),
                "entries out of order: {:?}",
                order
            );
        }
    }

    #[test]
    fn drains_every_waiter_exactly_once() {
        let mut sched: OrderedScheduler<ByPriority, 8> = OrderedScheduler::new();
        for p in 0..5 {
            sched.insert(noop_waker(), ByPriority(p));
        }
        let max = ByPriority(i32::MAX);
        let mut resumed = 0;
        loop {
            let (pending, _) = sched.resume(&max);
            if !pending {
                break;
            }
            resumed += 1;
        }
        assert_eq!(resumed, 5);
        assert!(sched.empty());
    }

    #[test]
    fn resume_returns_soonest_still_waiting() {
        let mut sched: OrderedScheduler<ByPriority, 8> = OrderedScheduler::new();
        sched.insert(noop_waker(), ByPriority(1));
        sched.insert(noop_waker(), ByPriority(9));
        let (pending, next) = sched.resume(&ByPriority(0));
        assert!(pending);
        assert!(next.is_some());
    }
}
