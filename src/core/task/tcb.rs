//! Task Control Block (TCB) definition
//!
//! One TCB per task-table slot; see spec.md §3 for the field semantics.

use crate::types::{EventFlags, StackElement, TaskState, Tick};

/// Task Control Block.
#[repr(C)]
pub struct Tcb {
    /// Saved stack pointer. Valid whenever this task is not currently
    /// executing; only the PendSV handler reads or writes it after the
    /// task has started (invariant 6/7).
    pub stack_pointer: *mut StackElement,

    /// Base of the stack buffer, kept for diagnostics only, the kernel
    /// performs no stack-overflow detection (non-goal).
    pub stack_base: *mut StackElement,
    /// Stack size in words.
    pub stack_size: usize,

    /// Current task state.
    pub state: TaskState,
    /// Remaining ticks until auto-wake. 0 means "no timer".
    pub timeout: Tick,
    /// Bitfield of set-but-unconsumed events for this task.
    pub event_flags: EventFlags,
    /// Bitfield the task is currently waiting for (meaningful in `WaitFlag`).
    pub event_mask: EventFlags,
}

impl Tcb {
    /// Create an empty, unregistered TCB. Call sites use this as a
    /// `'static mut` before handing the slot to `add_task`.
    pub const fn new() -> Self {
        Tcb {
            stack_pointer: core::ptr::null_mut(),
            stack_base: core::ptr::null_mut(),
            stack_size: 0,
            state: TaskState::Ready,
            timeout: 0,
            event_flags: 0,
            event_mask: 0,
        }
    }
}

impl Default for Tcb {
    fn default() -> Self {
        Self::new()
    }
}

// The task table is only ever mutated from task code with interrupts
// disabled, or from an ISR (spec.md invariant 5); sharing raw pointers to
// it across "threads" is sound under that discipline, not under general
// concurrent access.
unsafe impl Send for Tcb {}
unsafe impl Sync for Tcb {}
