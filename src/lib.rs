//! baremetal_coro — cooperative coroutine scheduler core
//!
//! A small runtime that lets `async fn`s suspend on named wake conditions
//! (elapsed time, priority level, an edge-triggered signal) and be resumed
//! later by a driver loop or an interrupt service routine. No allocator, no
//! thread library, no unwinding required by the core itself.
//!
//! Zero-state: everything here is either `const`-constructed or
//! bump-allocated once; nothing is persisted across a reset.

#![cfg_attr(not(feature = "host-emulation"), no_std)]
#![allow(dead_code)]

pub mod clock;
pub mod config;
pub mod log;
pub mod wake;
pub mod schedule_entry;
pub mod static_list;
pub mod ordered;
pub mod unordered;
pub mod shared;
pub mod task;
pub mod awaitable;

#[cfg(test)]
mod test_support;

pub use awaitable::{Delay, Priority, ScheduledDelay, ScheduledPriority, Unordered};
pub use clock::Clock;
#[cfg(feature = "host-emulation")]
pub use clock::MonotonicClock;
pub use config::{DEFAULT_SCHEDULER_CAPACITY, TASK_ARENA_SIZE};
pub use ordered::OrderedScheduler;
pub use schedule_entry::ScheduleEntry;
pub use shared::Shared;
pub use static_list::StaticList;
pub use task::{Arena, Task};
pub use unordered::UnorderedScheduler;
pub use wake::{ByDelay, ByPriority, WakeCondition};
