// demos/example_irq.rs
//
// Host-emulation port of `example_irq.cpp`: three coroutines that each
// ping-pong between an ISR-local signal and a shared main-thread signal.
// In place of real interrupt lines, each loop iteration below plays the
// role of one ISR firing followed by one main-thread dispatch pass.

use baremetal_coro::{Shared, Task, Unordered, UnorderedScheduler};

lazy_static::lazy_static! {
    static ref ISR_CTX: Shared<UnorderedScheduler<1>> = Shared::new(UnorderedScheduler::new());
    static ref ISR_MTI: Shared<UnorderedScheduler<1>> = Shared::new(UnorderedScheduler::new());
    static ref ISR_MEI: Shared<UnorderedScheduler<1>> = Shared::new(UnorderedScheduler::new());
    static ref MAIN_THREAD: Shared<UnorderedScheduler<3>> = Shared::new(UnorderedScheduler::new());
}

const ROUNDS: u32 = 5;

fn main() {
    let t3 = Task::spawn_default(async move {
        for i in 1..=ROUNDS {
            Unordered::new(&*ISR_CTX).await;
            println!("t3 isr wake {}", i);
            Unordered::new(&*MAIN_THREAD).await;
            println!("t3 main wake {}", i);
        }
    });
    let t4 = Task::spawn_default(async move {
        for i in 1..=ROUNDS {
            Unordered::new(&*ISR_MTI).await;
            println!("t4 isr wake {}", i);
            Unordered::new(&*MAIN_THREAD).await;
            println!("t4 main wake {}", i);
        }
    });
    let t5 = Task::spawn_default(async move {
        for i in 1..=ROUNDS {
            Unordered::new(&*ISR_MEI).await;
            println!("t5 isr wake {}", i);
            Unordered::new(&*MAIN_THREAD).await;
            println!("t5 main wake {}", i);
        }
    });

    while !t3.is_done() || !t4.is_done() || !t5.is_done() {
        // One simulated timer ISR: wakes the generic ISR context and the
        // timer-specific one, same as the real handler's `mti` branch.
        ISR_CTX.resume();
        ISR_MTI.resume();
        // One simulated external-interrupt ISR.
        ISR_MEI.resume();
        // Main-thread dispatch pass.
        MAIN_THREAD.resume();
    }

    println!("example_irq: done");
}
