// clock.rs
//
// The scheduler core never reads a hardware timer directly — it consumes
// whatever implements `Clock`. On target that's a wrapper around a CSR/APIC
// timebase; under `host-emulation` it's `MonotonicClock`, backed by
// `std::time::Instant`, so the ordered-scheduler delay tests don't need real
// hardware.

use core::time::Duration;

/// A monotonic time source. `Instant` only needs to support addition of a
/// `Duration` and ordering — exactly what `ByDelay` requires.
pub trait Clock {
    type Instant: Copy + Ord;

    fn now() -> Self::Instant;
    fn add(instant: Self::Instant, delta: Duration) -> Self::Instant;
    fn saturating_sub(later: Self::Instant, earlier: Self::Instant) -> Duration;
}

cfg_if::cfg_if! {
    if #[cfg(feature = "host-emulation")] {
        /// Host clock for tests and the `demos/` binaries. Wraps
        /// `std::time::Instant`; monotonic by construction.
        pub struct MonotonicClock;

        impl Clock for MonotonicClock {
            type Instant = std::time::Instant;

            fn now() -> Self::Instant {
                std::time::Instant::now()
            }

            fn add(instant: Self::Instant, delta: Duration) -> Self::Instant {
                instant + delta
            }

            fn saturating_sub(later: Self::Instant, earlier: Self::Instant) -> Duration {
                later.saturating_duration_since(earlier)
            }
        }
    }
}
