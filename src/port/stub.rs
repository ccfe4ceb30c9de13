//! Host stub port
//!
//! No assembly, no hardware registers, just enough to let the task
//! table, selector, and tick bookkeeping run under `cargo test` on the
//! host (spec.md §9, grounded in the teacher's own non-ARM stub module).

use crate::task::TaskFn;
use crate::types::StackElement;

/// Build an "initial frame" that is really just the raw `entry` pointer
/// stashed where the real ports would put their hardware-restored `PC`.
/// Nothing ever pops this on the host; it exists so `add_task` has a
/// stack pointer value to store.
///
/// # Safety
/// `stack_base` must point to a valid buffer of at least `stack_size`
/// elements; the returned pointer is never dereferenced on this port.
pub unsafe fn build_initial_frame(
    _entry: TaskFn,
    stack_base: *mut StackElement,
    stack_size: usize,
) -> *mut StackElement {
    unsafe { stack_base.add(stack_size) }
}

/// There is no asynchronous exception to pend on the host, so this
/// performs the switch the real PendSV handler would perform eagerly:
/// `CPU_STATE.current = CPU_STATE.next`. Single-threaded host tests have
/// no real preemption to race against, so this keeps the scheduler's
/// public API (`sleep`, `event_wait`, ...) exercisable end to end without
/// any ARM assembly.
#[allow(static_mut_refs)]
pub fn request_context_switch() {
    unsafe {
        crate::kernel::CPU_STATE.current = crate::kernel::CPU_STATE.next;
    }
}

/// No-op: there is no PendSV priority register on the host.
pub fn init_pendsv_priority() {}

/// No-op: there is no SysTick peripheral on the host.
pub fn systick_init(_reload: u32) {}

/// No-op stand-in for the real ports' naked PendSV handler, so the
/// crate root can re-export `pendsv_handler` under one name regardless
/// of which port is active.
#[allow(non_snake_case)]
pub fn PendSV() {}
