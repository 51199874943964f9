// wake.rs
//
// The wake-condition protocol generalizes "what must be true for a suspended
// coroutine to resume": elapsed time (`ByDelay`), priority level
// (`ByPriority`). Grounded on `original_source/include/coro/scheduler.hpp`'s
// `schedule_by_delay`/`schedule_by_priority` and the `HasWakeUpTest` concept.

use core::marker::PhantomData;
use core::time::Duration;

use crate::clock::Clock;

/// `observed.ready_to_wake(self)` answers: "if `observed` is the current
/// state of the world, has the event I'm waiting for already happened?"
pub trait WakeCondition {
    fn ready_to_wake(&self, observed: &Self) -> bool;
}

/// Wakes once a clock's `now()` passes a fixed instant.
pub struct ByDelay<C: Clock> {
    expires: C::Instant,
    _clock: PhantomData<C>,
}

impl<C: Clock> ByDelay<C> {
    /// Wake `delay` from now.
    pub fn from_delay(delay: Duration) -> Self {
        ByDelay {
            expires: C::add(C::now(), delay),
            _clock: PhantomData,
        }
    }

    /// Wake immediately.
    pub fn now() -> Self {
        ByDelay {
            expires: C::now(),
            _clock: PhantomData,
        }
    }

    /// Remaining time until this condition fires, zero if already elapsed.
    pub fn delay(&self) -> Duration {
        let now = C::now();
        if self.expires > now {
            C::saturating_sub(self.expires, now)
        } else {
            Duration::ZERO
        }
    }
}

impl<C: Clock> Clone for ByDelay<C> {
    fn clone(&self) -> Self {
        ByDelay {
            expires: self.expires,
            _clock: PhantomData,
        }
    }
}
impl<C: Clock> Copy for ByDelay<C> {}

impl<C: Clock> WakeCondition for ByDelay<C> {
    fn ready_to_wake(&self, observed: &Self) -> bool {
        observed.expires > self.expires
    }
}

/// Wakes when an observed priority is at or above this one. Higher
/// priorities are "more ready"; ties resolve as ready.
#[derive(Clone, Copy, Debug)]
pub struct ByPriority(pub i32);

impl Default for ByPriority {
    fn default() -> Self {
        ByPriority(0)
    }
}

impl WakeCondition for ByPriority {
    fn ready_to_wake(&self, observed: &Self) -> bool {
        self.0 >= observed.0
    }
}
