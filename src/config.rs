// config.rs
//
// Compile-time knobs for the scheduler core. Both are plain `pub const`s
// rather than environment variables or runtime switches — the crate has no
// notion of either (spec: "No environment variables. No persisted state.").

cfg_if::cfg_if! {
    if #[cfg(feature = "host-emulation")] {
        /// Bytes available to the task arena under host emulation (tests,
        /// the `demos/` binaries). Generous, since host tests routinely
        /// spawn more concurrent tasks than a real target would.
        pub const TASK_ARENA_SIZE: usize = 4096;
    } else {
        /// Bytes available to the task arena on the bare-metal target.
        pub const TASK_ARENA_SIZE: usize = 512;
    }
}

/// Default fixed capacity for a scheduler's waiting list, used by the demo
/// programs. Application code is free to instantiate `OrderedScheduler`/
/// `UnorderedScheduler` with a different `N`.
pub const DEFAULT_SCHEDULER_CAPACITY: usize = 10;
