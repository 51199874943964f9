// schedule_entry.rs
//
// Pairs a coroutine handle with the wake condition it is waiting on.
// Grounded on `original_source/include/coro/scheduler.hpp`'s
// `schedule_entry<WAKE_CONDITION_T>`.

use core::task::Waker;

use crate::wake::WakeCondition;

/// One suspended coroutine, parked in a scheduler's `StaticList`.
///
/// Move-only by convention (no `Clone`/`Copy` derive): a `Waker` is owned by
/// at most one entry while suspended, and ownership transfers back out (via
/// `into_parts`) the moment the entry is erased, just before the handle is
/// woken.
pub struct ScheduleEntry<W> {
    handle: Waker,
    wake_condition: W,
}

impl<W: WakeCondition> ScheduleEntry<W> {
    pub fn new(handle: Waker, wake_condition: W) -> Self {
        ScheduleEntry {
            handle,
            wake_condition,
        }
    }

    pub fn wake_condition(&self) -> &W {
        &self.wake_condition
    }

    /// Is this entry ready to wake given the observed condition?
    pub fn ready_to_wake(&self, observed: &W) -> bool {
        self.wake_condition.ready_to_wake(observed)
    }

    /// A cloned copy of the handle — mirrors `schedule_entry::handle()` in
    /// the original, which hands back a copy of the (trivially-copyable)
    /// `coroutine_handle<>`. Cloning a `Waker` is cheap (a vtable-dispatched
    /// refcount bump), so callers snapshot the handle before erasing the
    /// entry rather than trying to move it out of a live list node.
    pub fn handle(&self) -> Waker {
        self.handle.clone()
    }
}
