// demos/example_timer.rs
//
// Host-emulation port of `example_timer.cpp`: two coroutines sharing one
// delay scheduler, woken on different periods. The shorter-period loop
// finishes well before the longer one — both are driven from the same
// busy loop standing in for the original's timer-IRQ/WFI pair.

use std::time::Duration;

use baremetal_coro::{ByDelay, Delay, MonotonicClock, OrderedScheduler, Shared, Task};

lazy_static::lazy_static! {
    static ref SCHEDULER: Shared<OrderedScheduler<ByDelay<MonotonicClock>, 8>> =
        Shared::new(OrderedScheduler::new());
}

fn main() {
    let short_period = Duration::from_millis(50);
    let long_period = Duration::from_millis(100);

    let fast = Task::spawn_default(async move {
        for i in 0..10 {
            Delay::new(&*SCHEDULER, short_period).await;
            println!("resuming_on_delay(short): wake {}", i + 1);
        }
    });
    let slow = Task::spawn_default(async move {
        for i in 0..10 {
            Delay::new(&*SCHEDULER, long_period).await;
            println!("resuming_on_delay(long): wake {}", i + 1);
        }
    });

    while !fast.is_done() || !slow.is_done() {
        let now = ByDelay::<MonotonicClock>::now();
        let (pending, next_wake) = SCHEDULER.resume(&now);
        if pending {
            if let Some(next) = next_wake {
                std::thread::sleep(next.delay().min(short_period));
            }
        }
    }

    println!("example_timer: done");
}
