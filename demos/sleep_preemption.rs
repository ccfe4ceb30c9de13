//! Strict priority preemption via `sleep` (spec.md §8, scenario S1).
//!
//! A low-priority task spins a counter; a higher-priority task wakes
//! once a second and preempts it immediately.

#![no_std]
#![no_main]

// tickkernel's own lang_items module supplies the panic handler; linking
// panic-halt here too would collide with it.
use cortex_m_rt::{entry, exception};

use tickkernel::types::StackElement;

static mut STACK_IDLE: [StackElement; 128] = [0; 128];
static mut STACK_LOW: [StackElement; 256] = [0; 256];
static mut STACK_HIGH: [StackElement; 256] = [0; 256];

fn idle_task() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}

fn low_priority_task() -> ! {
    let mut counter: u32 = 0;
    loop {
        counter = counter.wrapping_add(1);
        tickkernel::info!("low: counter = {}", counter);
    }
}

fn high_priority_task() -> ! {
    loop {
        tickkernel::sleep(1000);
        tickkernel::info!("high: woke up, preempting low");
    }
}

#[entry]
fn main() -> ! {
    tickkernel::init();

    #[allow(static_mut_refs)]
    unsafe {
        tickkernel::add_task(0, idle_task, &mut STACK_IDLE);
        tickkernel::add_task(1, low_priority_task, &mut STACK_LOW);
        tickkernel::add_task(2, high_priority_task, &mut STACK_HIGH);
    }

    // 16 MHz core clock assumed; adjust the reload value to match the
    // board's actual clock for a true 1 ms tick.
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
