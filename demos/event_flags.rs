//! Event-flag signaling between two tasks (spec.md §8, scenario S2).
//!
//! A producer wakes periodically and sets a flag; a consumer blocks in
//! `event_wait` until that flag arrives.

#![no_std]
#![no_main]

// tickkernel's own lang_items module supplies the panic handler; linking
// panic-halt here too would collide with it.
use cortex_m_rt::{entry, exception};

use tickkernel::types::{StackElement, TaskId};

const PRODUCER_ID: TaskId = 1;
const CONSUMER_ID: TaskId = 2;
const FLAG_DATA_READY: u32 = 0b0001;

static mut STACK_IDLE: [StackElement; 128] = [0; 128];
static mut STACK_PRODUCER: [StackElement; 256] = [0; 256];
static mut STACK_CONSUMER: [StackElement; 256] = [0; 256];

fn idle_task() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}

fn producer_task() -> ! {
    loop {
        tickkernel::sleep(200);
        tickkernel::event_set(CONSUMER_ID, FLAG_DATA_READY);
    }
}

fn consumer_task() -> ! {
    loop {
        let flags = tickkernel::event_wait(FLAG_DATA_READY);
        if flags & FLAG_DATA_READY != 0 {
            tickkernel::info!("consumer: data ready");
        }
    }
}

#[entry]
fn main() -> ! {
    tickkernel::init();

    #[allow(static_mut_refs)]
    unsafe {
        tickkernel::add_task(0, idle_task, &mut STACK_IDLE);
        tickkernel::add_task(PRODUCER_ID, producer_task, &mut STACK_PRODUCER);
        tickkernel::add_task(CONSUMER_ID, consumer_task, &mut STACK_CONSUMER);
    }

    tickkernel::port::systick_init(16_000);

    tickkernel::join();

    loop {
        cortex_m::asm::nop();
    }
}

#[exception]
fn SysTick() {
    tickkernel::systick_handler();
}
