// task.rs
//
// The coroutine-return-type and its bump-pointer frame allocator. Grounded
// on `original_source/include/coro/nop_task.hpp` (the promise's placement
// `operator new` over a static byte array) for the arena, and on the
// Waker/RawWakerVTable pattern in `async-on-embedded`'s executor for how a
// `'static`, thin-pointer-compatible handle is built around a `dyn Future`.

use core::cell::UnsafeCell;
use core::future::Future;
use core::mem::{align_of, size_of, MaybeUninit};
use core::pin::Pin;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

use crate::config::TASK_ARENA_SIZE;

/// Bump-pointer allocator over a fixed byte array. Allocation is
/// process-lifetime and monotonic: nothing is ever freed, matching
/// `nop_task.hpp`'s `operator new`/`operator delete` pair (delete is a
/// deliberate no-op there too).
pub struct Arena<const CAPACITY: usize> {
    storage: UnsafeCell<MaybeUninit<[u8; CAPACITY]>>,
    index: AtomicUsize,
}

unsafe impl<const CAPACITY: usize> Sync for Arena<CAPACITY> {}

impl<const CAPACITY: usize> Arena<CAPACITY> {
    pub const fn new() -> Self {
        Arena {
            storage: UnsafeCell::new(MaybeUninit::uninit()),
            index: AtomicUsize::new(0),
        }
    }

    /// Allocate room for one `F`, write `value` into it, and return a
    /// `'static` reference. `None` if the arena has no room left — the
    /// allocation never partially succeeds and the cursor never moves
    /// unless the whole write commits.
    pub fn alloc<F>(&self, value: F) -> Option<&'static mut F> {
        let size = size_of::<F>();
        let align = align_of::<F>();
        loop {
            let start = self.index.load(Ordering::Relaxed);
            let base = unsafe { (*self.storage.get()).as_mut_ptr() as *mut u8 };
            let aligned = align_up(base as usize + start, align) - base as usize;
            let end = match aligned.checked_add(size) {
                Some(end) => end,
                None => return None,
            };
            if end > CAPACITY {
                debug_assert!(false, "Arena::alloc: capacity exhausted");
                crate::log::log_warn("arena", "alloc: capacity exhausted");
                return None;
            }
            if self
                .index
                .compare_exchange(start, end, Ordering::AcqRel, Ordering::Relaxed)
                .is_err()
            {
                continue;
            }
            unsafe {
                let ptr = base.add(aligned) as *mut F;
                ptr.write(value);
                return Some(&mut *ptr);
            }
        }
    }

    /// Total bytes allocated so far — never decreases.
    pub fn bytes_allocated(&self) -> usize {
        self.index.load(Ordering::Relaxed)
    }
}

impl<const CAPACITY: usize> Default for Arena<CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

fn align_up(addr: usize, align: usize) -> usize {
    (addr + align - 1) & !(align - 1)
}

/// The process-wide default task arena, sized per `TASK_ARENA_SIZE`
/// (512 bytes on target, 4096 under `host-emulation`).
pub static DEFAULT_ARENA: Arena<TASK_ARENA_SIZE> = Arena::new();

/// A concrete, non-generic cell wrapping a type-erased, pinned future.
/// Concrete and `Sized` — unlike `dyn Future` itself — so `&'static
/// TaskCell` is a thin pointer and can serve as a `Waker`'s opaque data
/// pointer without any nightly API.
struct TaskCell {
    future: UnsafeCell<Pin<&'static mut (dyn Future<Output = ()> + 'static)>>,
    done: AtomicBool,
}

unsafe impl Sync for TaskCell {}

impl TaskCell {
    /// Poll the wrapped future once. Marks `done` on `Poll::Ready`.
    fn resume(&self) {
        if self.done.load(Ordering::Acquire) {
            return;
        }
        let waker = self.waker();
        let mut cx = Context::from_waker(&waker);
        let future = unsafe { &mut *self.future.get() };
        if future.as_mut().poll(&mut cx).is_ready() {
            self.done.store(true, Ordering::Release);
        }
    }

    fn waker(&self) -> Waker {
        let ptr = self as *const TaskCell as *const ();
        unsafe { Waker::from_raw(RawWaker::new(ptr, &TASK_CELL_VTABLE)) }
    }
}

static TASK_CELL_VTABLE: RawWakerVTable =
    RawWakerVTable::new(tc_clone, tc_wake, tc_wake_by_ref, tc_drop);

unsafe fn tc_clone(ptr: *const ()) -> RawWaker {
    RawWaker::new(ptr, &TASK_CELL_VTABLE)
}

unsafe fn tc_wake(ptr: *const ()) {
    tc_wake_by_ref(ptr)
}

unsafe fn tc_wake_by_ref(ptr: *const ()) {
    (*(ptr as *const TaskCell)).resume();
}

unsafe fn tc_drop(_ptr: *const ()) {
    // TaskCell is arena-resident and never freed — nothing to do.
}

/// The value returned by a coroutine function. Start-eager (polled once
/// immediately on construction), end-detached (no destructor chain runs
/// against the arena when the future completes).
///
/// `Task` is a thin observer over an arena-resident `TaskCell`: it carries
/// no handle of its own besides the ability to ask "is this done yet".
/// `None` means the arena had no room — spec.md's "null task": `is_done()`
/// reports `false` forever, matching "never ran."
pub struct Task {
    cell: Option<&'static TaskCell>,
}

impl Task {
    /// Allocate `future` in `arena`, poll it once, and return the handle.
    pub fn spawn<F, const CAPACITY: usize>(arena: &'static Arena<CAPACITY>, future: F) -> Task
    where
        F: Future<Output = ()> + 'static,
    {
        let Some(future_ref) = arena.alloc(future) else {
            return Task { cell: None };
        };
        // SAFETY: `future_ref` is arena-resident, 'static storage that is
        // never moved or reclaimed — exactly the contract `Pin` enforces.
        let pinned: Pin<&'static mut (dyn Future<Output = ()> + 'static)> =
            unsafe { Pin::new_unchecked(future_ref) };
        let Some(cell_ref) = arena.alloc(TaskCell {
            future: UnsafeCell::new(pinned),
            done: AtomicBool::new(false),
        }) else {
            return Task { cell: None };
        };
        let cell_ref: &'static TaskCell = cell_ref;
        cell_ref.resume();
        Task { cell: Some(cell_ref) }
    }

    /// Allocate from the crate-wide default arena.
    pub fn spawn_default<F>(future: F) -> Task
    where
        F: Future<Output = ()> + 'static,
    {
        Task::spawn(&DEFAULT_ARENA, future)
    }

    /// Has the wrapped coroutine run to completion? Always `false` for a
    /// null task — there is no handle through which it could ever resume.
    pub fn is_done(&self) -> bool {
        match self.cell {
            Some(cell) => cell.done.load(Ordering::Acquire),
            None => false,
        }
    }
}
