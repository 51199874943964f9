// demos/example_simple.rs
//
// Host-emulation port of `example_simple.cpp`: one coroutine that wakes on
// a fixed delay, ten times, driven by a busy loop standing in for the
// timer-interrupt/WFI pair the bare-metal original uses.

use std::time::Duration;

use baremetal_coro::{ByDelay, Delay, MonotonicClock, OrderedScheduler, Shared, Task};

lazy_static::lazy_static! {
    static ref SCHEDULER: Shared<OrderedScheduler<ByDelay<MonotonicClock>, 4>> =
        Shared::new(OrderedScheduler::new());
}

fn main() {
    let period = Duration::from_millis(100);

    let task = Task::spawn_default(async move {
        for i in 0..10 {
            Delay::new(&*SCHEDULER, period).await;
            println!("resuming_on_delay: wake {}", i + 1);
        }
    });

    while !task.is_done() {
        let now = ByDelay::<MonotonicClock>::now();
        let (pending, next_wake) = SCHEDULER.resume(&now);
        if pending {
            if let Some(next) = next_wake {
                std::thread::sleep(next.delay().min(period));
            }
        }
    }

    println!("example_simple: done");
}
