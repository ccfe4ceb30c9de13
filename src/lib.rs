//! tickkernel, a minimal preemptible-on-tick cooperative real-time
//! kernel core for single-core Cortex-M0+/M4F.
//!
//! Fixed-priority task table, a 1 ms tick, two blocking primitives
//! (timed sleep, event-flag wait with optional timeout), and a
//! PendSV-driven context switch. See `README.md` for a usage sketch.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

// ============ Critical Section ============

#[cfg(target_arch = "arm")]
mod cs_impl {
    use cortex_m::interrupt;
    use cortex_m::register::primask;
    use critical_section::{set_impl, Impl, RawRestoreState};

    struct SingleCoreCriticalSection;
    set_impl!(SingleCoreCriticalSection);

    unsafe impl Impl for SingleCoreCriticalSection {
        unsafe fn acquire() -> RawRestoreState {
            let was_active = primask::read().is_active();
            interrupt::disable();
            was_active
        }

        unsafe fn release(was_active: RawRestoreState) {
            if was_active {
                unsafe { interrupt::enable() }
            }
        }
    }
}

// ============ Modules ============

pub mod log;
mod lang_items;

pub mod core;
pub mod port;

// ============ Re-exports ============

pub use core::config;
pub use core::critical;
pub use core::error;
pub use core::error::{KernelError, KernelResult};
pub use core::kernel;
pub use core::kernel::{init, join};
pub use core::sched;
pub use core::sched::{event_clear, event_set, event_wait, event_wait_timeout, sleep};
pub use core::task;
pub use core::task::{add_task, TaskFn};
pub use core::time;
pub use core::time::systick_handler;
pub use core::types;

pub use port::PendSV as pendsv_handler;
