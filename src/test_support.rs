// test_support.rs
//
// A `Waker` that does nothing when woken, shared by the scheduler test
// modules that need a handle but don't care about observing a real resume
// (that's covered end-to-end by `task.rs`'s tests, which exercise real
// `async fn` coroutines). Vtable pattern grounded on the no-op waker in
// `async-on-embedded`'s executor.

use core::task::{RawWaker, RawWakerVTable, Waker};

static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, wake, wake, drop);

unsafe fn clone(_: *const ()) -> RawWaker {
    RawWaker::new(core::ptr::null(), &VTABLE)
}
unsafe fn wake(_: *const ()) {}
unsafe fn drop(_: *const ()) {}

pub fn noop_waker() -> Waker {
    unsafe { Waker::from_raw(RawWaker::new(core::ptr::null(), &VTABLE)) }
}
