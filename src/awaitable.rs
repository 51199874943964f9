// awaitable.rs
//
// The three adapters that bridge a coroutine's suspension point to
// scheduler insertion. Grounded on `original_source/include/coro/
// awaitable_timer.hpp`, `awaitable_priority.hpp`, `awaitable_unordered.hpp`.
//
// Each scheduler is shared behind `Shared<T>` (see `shared.rs`) rather than
// a lock: resuming a handle happens *inside* the same call that's driving
// the scheduler (the woken coroutine's next `.await` re-enters `insert`
// before the driver's `resume()` call returns), so a guard spanning that
// reentrant call would deadlock against itself.

use core::future::{Future, IntoFuture};
use core::pin::Pin;
use core::task::{Context, Poll};
use core::time::Duration;

use crate::clock::Clock;
use crate::ordered::OrderedScheduler;
use crate::shared::Shared;
use crate::unordered::UnorderedScheduler;
use crate::wake::{ByDelay, ByPriority};

/// Suspends until `delay` has elapsed, per `ByDelay<C>`. `ready()` iff the
/// requested delay is zero — mirrors `awaitable_timer::await_ready`.
pub struct Delay<'s, C: Clock, const N: usize> {
    scheduler: &'s Shared<OrderedScheduler<ByDelay<C>, N>>,
    delay: Duration,
    inserted: bool,
}

impl<'s, C: Clock, const N: usize> Delay<'s, C, N> {
    pub fn new(scheduler: &'s Shared<OrderedScheduler<ByDelay<C>, N>>, delay: Duration) -> Self {
        Delay {
            scheduler,
            delay,
            inserted: false,
        }
    }
}

impl<'s, C: Clock, const N: usize> Future for Delay<'s, C, N> {
    type Output = ();
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.inserted {
            // We already suspended once and have been woken: `resume()` is
            // a no-op, so there's nothing left to do but report completion.
            return Poll::Ready(());
        }
        if self.delay.is_zero() {
            return Poll::Ready(());
        }
        self.inserted = true;
        let condition = ByDelay::<C>::from_delay(self.delay);
        let waker = cx.waker().clone();
        self.scheduler.with_mut(|s| s.insert(waker, condition));
        Poll::Pending
    }
}

/// Pairs a delay scheduler with a relative delay so `(scheduler, delay)` can
/// be awaited directly — the idiomatic stand-in for the original's
/// `operator co_await(scheduled_delay&&)`.
pub struct ScheduledDelay<'s, C: Clock, const N: usize> {
    pub scheduler: &'s Shared<OrderedScheduler<ByDelay<C>, N>>,
    pub delay: Duration,
}

impl<'s, C: Clock, const N: usize> IntoFuture for ScheduledDelay<'s, C, N> {
    type Output = ();
    type IntoFuture = Delay<'s, C, N>;
    fn into_future(self) -> Delay<'s, C, N> {
        Delay::new(self.scheduler, self.delay)
    }
}

/// Suspends until an observed priority is at or above `priority`. Always
/// suspends once: `ready()` is unconditionally `false`, matching
/// spec.md's awaitable table.
pub struct Priority<'s, const N: usize> {
    scheduler: &'s Shared<OrderedScheduler<ByPriority, N>>,
    priority: i32,
    inserted: bool,
}

impl<'s, const N: usize> Priority<'s, N> {
    pub fn new(scheduler: &'s Shared<OrderedScheduler<ByPriority, N>>, priority: i32) -> Self {
        Priority {
            scheduler,
            priority,
            inserted: false,
        }
    }
}

impl<'s, const N: usize> Future for Priority<'s, N> {
    type Output = ();
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.inserted {
            return Poll::Ready(());
        }
        self.inserted = true;
        let waker = cx.waker().clone();
        let priority = self.priority;
        self.scheduler
            .with_mut(|s| s.insert(waker, ByPriority(priority)));
        Poll::Pending
    }
}

pub struct ScheduledPriority<'s, const N: usize> {
    pub scheduler: &'s Shared<OrderedScheduler<ByPriority, N>>,
    pub priority: i32,
}

impl<'s, const N: usize> IntoFuture for ScheduledPriority<'s, N> {
    type Output = ();
    type IntoFuture = Priority<'s, N>;
    fn into_future(self) -> Priority<'s, N> {
        Priority::new(self.scheduler, self.priority)
    }
}

/// Suspends on an edge-triggered signal. Always suspends once.
pub struct Unordered<'s, const N: usize> {
    scheduler: &'s Shared<UnorderedScheduler<N>>,
    inserted: bool,
}

impl<'s, const N: usize> Unordered<'s, N> {
    pub fn new(scheduler: &'s Shared<UnorderedScheduler<N>>) -> Self {
        Unordered {
            scheduler,
            inserted: false,
        }
    }
}

impl<'s, const N: usize> Future for Unordered<'s, N> {
    type Output = ();
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.inserted {
            return Poll::Ready(());
        }
        self.inserted = true;
        let waker = cx.waker().clone();
        self.scheduler.with_mut(|s| s.insert(waker));
        Poll::Pending
    }
}

impl<'s, const N: usize> IntoFuture for &'s Shared<UnorderedScheduler<N>> {
    type Output = ();
    type IntoFuture = Unordered<'s, N>;
    fn into_future(self) -> Unordered<'s, N> {
        Unordered::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MonotonicClock;
    use crate::task::Task;
    use core::sync::atomic::{AtomicU32, Ordering};

    lazy_static::lazy_static! {
        static ref DELAY_SCHED: Shared<OrderedScheduler<ByDelay<MonotonicClock>, 8>> =
            Shared::new(OrderedScheduler::new());
        static ref PRIORITY_SCHED: Shared<OrderedScheduler<ByPriority, 8>> =
            Shared::new(OrderedScheduler::new());
        static ref SIGNAL: Shared<UnorderedScheduler<8>> = Shared::new(UnorderedScheduler::new());
        static ref INTERLEAVED_SCHED: Shared<OrderedScheduler<ByDelay<MonotonicClock>, 8>> =
            Shared::new(OrderedScheduler::new());
        static ref NESTED_SCHED: Shared<OrderedScheduler<ByDelay<MonotonicClock>, 8>> =
            Shared::new(OrderedScheduler::new());
        static ref BLOCKING_A: Shared<UnorderedScheduler<1>> = Shared::new(UnorderedScheduler::new());
        static ref BLOCKING_B: Shared<UnorderedScheduler<1>> = Shared::new(UnorderedScheduler::new());
    }

    fn drain_delay_scheduler<const N: usize>(
        scheduler: &Shared<OrderedScheduler<ByDelay<MonotonicClock>, N>>,
        done: impl Fn() -> bool,
    ) {
        while !done() {
            let now = ByDelay::<MonotonicClock>::now();
            let (pending, next_wake) = scheduler.resume(&now);
            if pending {
                if let Some(next) = next_wake {
                    std::thread::sleep(next.delay());
                }
            }
        }
    }

    #[test]
    fn single_delay_coroutine_runs_ten_times() {
        static COUNT: AtomicU32 = AtomicU32::new(0);
        let task = Task::spawn_default(async {
            for _ in 0..10 {
                Delay::new(&*DELAY_SCHED, Duration::from_millis(1)).await;
                COUNT.fetch_add(1, Ordering::SeqCst);
            }
        });
        // Drive the scheduler until `task` reports done.
        while !task.is_done() {
            let observed = ByDelay::<MonotonicClock>::now();
            DELAY_SCHED.resume(&observed);
        }
        assert_eq!(COUNT.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn priority_scheduler_drains_in_sequence() {
        static COUNT: AtomicU32 = AtomicU32::new(0);
        let task = Task::spawn_default(async {
            for p in 0..10 {
                Priority::new(&*PRIORITY_SCHED, p).await;
                COUNT.fetch_add(1, Ordering::SeqCst);
            }
        });
        while !task.is_done() {
            PRIORITY_SCHED.resume(&ByPriority(0));
        }
        assert_eq!(COUNT.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn unordered_single_signal_runs_ten_times() {
        static COUNT: AtomicU32 = AtomicU32::new(0);
        let task = Task::spawn_default(async {
            for _ in 0..10 {
                Unordered::new(&*SIGNAL).await;
                COUNT.fetch_add(1, Ordering::SeqCst);
            }
        });
        while !task.is_done() {
            SIGNAL.resume();
        }
        assert_eq!(COUNT.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn three_interleaved_delay_coroutines_finish_with_expected_counts() {
        static COUNT_121: AtomicU32 = AtomicU32::new(0);
        static COUNT_133: AtomicU32 = AtomicU32::new(0);
        static COUNT_145: AtomicU32 = AtomicU32::new(0);

        let a = Task::spawn_default(async {
            for _ in 0..11 {
                Delay::new(&*INTERLEAVED_SCHED, Duration::from_millis(121)).await;
                COUNT_121.fetch_add(1, Ordering::SeqCst);
            }
        });
        let b = Task::spawn_default(async {
            for _ in 0..12 {
                Delay::new(&*INTERLEAVED_SCHED, Duration::from_millis(133)).await;
                COUNT_133.fetch_add(1, Ordering::SeqCst);
            }
        });
        let c = Task::spawn_default(async {
            for _ in 0..13 {
                Delay::new(&*INTERLEAVED_SCHED, Duration::from_millis(145)).await;
                COUNT_145.fetch_add(1, Ordering::SeqCst);
            }
        });

        drain_delay_scheduler(&*INTERLEAVED_SCHED, || {
            a.is_done() && b.is_done() && c.is_done()
        });

        assert_eq!(COUNT_121.load(Ordering::SeqCst), 11);
        assert_eq!(COUNT_133.load(Ordering::SeqCst), 12);
        assert_eq!(COUNT_145.load(Ordering::SeqCst), 13);
    }

    #[test]
    fn nested_spawn_accumulates_expected_bitmask() {
        static BITMASK: AtomicU32 = AtomicU32::new(0);

        let _outer = Task::spawn_default(async {
            BITMASK.fetch_or(0x1, Ordering::SeqCst);
            Delay::new(&*NESTED_SCHED, Duration::from_millis(24)).await;
            BITMASK.fetch_or(0x2, Ordering::SeqCst);

            let _inner = Task::spawn_default(async {
                BITMASK.fetch_or(0x10, Ordering::SeqCst);
                Delay::new(&*NESTED_SCHED, Duration::from_millis(124)).await;
                BITMASK.fetch_or(0x20, Ordering::SeqCst);
                Delay::new(&*NESTED_SCHED, Duration::from_millis(33)).await;
                BITMASK.fetch_or(0x40, Ordering::SeqCst);
            });

            BITMASK.fetch_or(0x4, Ordering::SeqCst);
        });

        drain_delay_scheduler(&*NESTED_SCHED, || BITMASK.load(Ordering::SeqCst) == 0x77);

        assert_eq!(BITMASK.load(Ordering::SeqCst), 0x77);
    }

    #[test]
    fn unordered_blocking_pattern_matches_literal_resume_sequence() {
        static COUNT_A: AtomicU32 = AtomicU32::new(0);
        static COUNT_B: AtomicU32 = AtomicU32::new(0);

        let task = Task::spawn_default(async {
            for _ in 0..10 {
                Unordered::new(&*BLOCKING_A).await;
                COUNT_A.fetch_add(1, Ordering::SeqCst);
                Unordered::new(&*BLOCKING_B).await;
                COUNT_B.fetch_add(1, Ordering::SeqCst);
            }
        });

        for _ in 0..10 {
            BLOCKING_A.resume();
        }
        assert_eq!(COUNT_A.load(Ordering::SeqCst), 1);
        assert_eq!(COUNT_B.load(Ordering::SeqCst), 0);

        for _ in 0..10 {
            BLOCKING_B.resume();
        }
        assert_eq!(COUNT_A.load(Ordering::SeqCst), 1);
        assert_eq!(COUNT_B.load(Ordering::SeqCst), 1);

        for _ in 0..4 {
            BLOCKING_A.resume();
            BLOCKING_A.resume();
            BLOCKING_B.resume();
            BLOCKING_B.resume();
        }
        assert_eq!(COUNT_A.load(Ordering::SeqCst), 5);
        assert_eq!(COUNT_B.load(Ordering::SeqCst), 5);

        BLOCKING_A.resume();
        BLOCKING_A.resume();
        BLOCKING_B.resume();
        BLOCKING_B.resume();
        assert_eq!(COUNT_A.load(Ordering::SeqCst), 6);
        assert_eq!(COUNT_B.load(Ordering::SeqCst), 6);

        while !task.is_done() {
            BLOCKING_A.resume();
            BLOCKING_A.resume();
            BLOCKING_B.resume();
            BLOCKING_B.resume();
        }
        assert_eq!(COUNT_A.load(Ordering::SeqCst), 10);
        assert_eq!(COUNT_B.load(Ordering::SeqCst), 10);
    }
}
