//! Task registration
//!
//! `add_task` is the only way a slot in the task table is ever populated;
//! slots are never destroyed (spec.md §3 "Lifecycle").

mod tcb;

pub use tcb::Tcb;

use crate::config::{MAX_TASKS, STACK_SIZE_MIN};
use crate::critical::critical_section;
use crate::kernel;
use crate::types::{StackElement, TaskId, TaskState};

/// Task entry point. Tasks never return; if one does, it traps
/// (spec.md §9, open question on the M0+ `LR` sentinel).
pub type TaskFn = fn() -> !;

/// Register a task at priority `id`.
///
/// # Arguments
/// * `id`, task table index / static priority. `id < MAX_TASKS`, and
///   `id` must not already be in use (re-registering an id silently
///   rebuilds its initial frame, which is only safe before `join`).
/// * `entry`, task entry point.
/// * `stack`, the task's stack buffer, stacks grow downward from its end.
///
/// Traps in an infinite loop on misuse, an out-of-range `id` or a
/// misaligned stack buffer is an unrecoverable configuration error caught
/// at bring-up, not a runtime condition a caller can react to.
pub fn add_task(id: TaskId, entry: TaskFn, stack: &'static mut [StackElement]) {
    if id as usize >= MAX_TASKS {
        kernel_trap_bad_task_id();
    }

    let stack_base = stack.as_mut_ptr();
    if (stack_base as usize) & 0x3 != 0 {
        kernel_trap_bad_stack_align();
    }

    debug_assert!(
        stack.len() >= STACK_SIZE_MIN,
        "task stack smaller than config::STACK_SIZE_MIN"
    );
    debug_assert!(
        !crate::critical::is_isr_context(),
        "add_task called from ISR context"
    );

    let stack_len = stack.len();

    critical_section(|cs| {
        let stack_pointer = unsafe { crate::port::build_initial_frame(entry, stack_base, stack_len) };

        let tcb = kernel::task_mut(cs, id);
        tcb.stack_pointer = stack_pointer;
        tcb.stack_base = stack_base;
        tcb.stack_size = stack_len;
        tcb.state = TaskState::Ready;
        tcb.timeout = 0;
        tcb.event_flags = 0;
        tcb.event_mask = 0;

        kernel::raise_highest_task(cs, id);
    });

    crate::info!("task registered at id {}", id);
}

/// Trap for an out-of-range task id. Named distinctly so a debugger
/// landing here points straight at the misconfiguration.
#[inline(never)]
pub fn kernel_trap_bad_task_id() -> ! {
    crate::error!("add_task: id out of range");
    loop {
        #[cfg(target_arch = "arm")]
        cortex_m::asm::nop();
    }
}

/// Trap for a stack buffer that is not 4-byte aligned.
#[inline(never)]
pub fn kernel_trap_bad_stack_align() -> ! {
    crate::error!("add_task: stack buffer is not 4-byte aligned");
    loop {
        #[cfg(target_arch = "arm")]
        cortex_m::asm::nop();
    }
}

/// Trap reached if a task entry point ever returns. Tasks are not
/// expected to return; this exists so a misbehaving task fails loudly
/// instead of executing whatever garbage follows its `LR` slot.
#[inline(never)]
pub fn kernel_trap_task_returned() -> ! {
    crate::error!("task entry point returned");
    loop {
        #[cfg(target_arch = "arm")]
        cortex_m::asm::nop();
    }
}
