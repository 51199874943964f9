// shared.rs
//
// Interior-mutability wrapper for the ordered/unordered scheduler
// singletons. Grounded on the `UnsafeCell<Vec<&'static Task, N>>` pattern in
// `async-on-embedded`'s executor ("`UnsafeCell` is used to minimize the span
// of references"): each access takes a fresh `&mut` for exactly the
// duration of one call, never held across a suspension point.
//
// A `spin::Mutex` was the first cut here, but it's the wrong tool: resuming
// a handle happens *inside* the same call that holds the scheduler's
// exclusive access (the woken coroutine's next `.await` re-enters `insert`
// before the driver's call to `resume` returns), so a guard spanning that
// reentrant call would deadlock against itself. `Shared<T>` instead hands
// out a short-lived `&mut T` per call.
//
// `with_mut` alone doesn't make a reentrant wake safe — calling
// `wake_by_ref()` from inside the closure it's passed can reenter
// `with_mut` on the same cell while the outer `&mut T` is still live,
// producing two aliasing `&mut T` to the same object. `OrderedScheduler`
// and `UnorderedScheduler` close that hole themselves rather than leaving
// it to caller discipline: their `step()` does the find/drain work and
// returns the `Waker`(s) without invoking them, and the inherent
// `resume()` on `Shared<OrderedScheduler<W, N>>` /
// `Shared<UnorderedScheduler<N>>` (see `ordered.rs`/`unordered.rs`) calls
// `with_mut(|s| s.step(..))`, lets that borrow end, and only then calls
// `wake_by_ref()`. A reentrant wake from the resumed coroutine's next
// `.await` then reaches `with_mut` after the prior borrow has gone out of
// scope, so it can never alias it.
use core::cell::UnsafeCell;

pub struct Shared<T> {
    inner: UnsafeCell<T>,
}

unsafe impl<T> Sync for Shared<T> {}

impl<T> Shared<T> {
    pub const fn new(value: T) -> Self {
        Shared {
            inner: UnsafeCell::new(value),
        }
    }

    /// Run `f` with exclusive access to the wrapped value. `f` must not
    /// stash the `&mut T` it's given anywhere that outlives the call, and
    /// must not trigger a reentrant call to `with_mut` on this same cell
    /// while that `&mut T` is still in scope — callers that need to wake a
    /// handle as a result of this access should return it from `f` and wake
    /// it after `with_mut` returns, as `OrderedScheduler`'s and
    /// `UnorderedScheduler`'s own `resume()` do.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(unsafe { &mut *self.inner.get() })
    }
}
