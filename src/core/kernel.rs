//! Global kernel state
//!
//! The fixed task table, the highest-registered-index cursor, and the
//! current/next task pointers the PendSV handler exchanges, all the
//! state spec.md §3 names, held as module-scoped singletons guarded by
//! [`CriticalSection`](crate::critical::CriticalSection) (task code) or
//! hardware exception priority (ISRs), per invariant 5.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::config::MAX_TASKS;
use crate::core::cs_cell::CsCell;
use crate::critical::{critical_section, CriticalSection};
use crate::task::Tcb;
use crate::types::{TaskId, Tick};

/// Task table plus its highest-used-index cursor, behind one cell so a
/// single critical section covers both (spec.md §3 "Global state").
struct TaskTable {
    tasks: [Tcb; MAX_TASKS],
    highest_task: TaskId,
}

impl TaskTable {
    const fn new() -> Self {
        TaskTable {
            tasks: [const { Tcb::new() }; MAX_TASKS],
            highest_task: 0,
        }
    }
}

static TABLE: CsCell<TaskTable> = CsCell::new(TaskTable::new());

/// Current/next task pointers exchanged by the PendSV handler.
///
/// `current` doubles as the "none" sentinel (null) used before the first
/// context switch (spec.md §9): the handler's save branch keys off it
/// being non-null. `current` is the first field so the naked-asm ports
/// could address it at offset 0 if they ever need to; in practice the
/// Rust-side switch helper does the dereferencing.
#[repr(C)]
pub struct CpuState {
    pub current: *mut Tcb,
    pub next: *mut Tcb,
}

/// Global CPU state instance; referenced by name from the naked PendSV
/// bodies (`port::cortex_m0plus`, `port::cortex_m4f`).
#[no_mangle]
#[used]
pub static mut CPU_STATE: CpuState = CpuState {
    current: core::ptr::null_mut(),
    next: core::ptr::null_mut(),
};

static TICK_COUNT: AtomicU32 = AtomicU32::new(0);

/// Get a mutable reference to a task slot.
///
/// Takes the caller's `cs` as the type-level proof of invariant 5
/// ("mutations outside ISR context happen with interrupts disabled"),
/// so task-context callers route through `CsCell::get` instead of the
/// unchecked path.
#[inline]
pub(crate) fn task_mut(cs: &CriticalSection, id: TaskId) -> &'static mut Tcb {
    &mut TABLE.get(cs).tasks[id as usize]
}

/// ISR-context counterpart of [`task_mut`].
///
/// The scheduler's scan (`sched::work_from_isr`) is shared with the 1 ms
/// tick handler, which runs at interrupt priority with no
/// `CriticalSection` value of its own to offer, invariant 5's ISR
/// exemption, not caller sloppiness.
///
/// # Safety
/// Caller must be running in ISR context (already serialized by hardware
/// exception priority).
#[inline]
pub(crate) unsafe fn task_mut_isr(id: TaskId) -> &'static mut Tcb {
    unsafe { &mut TABLE.get_unchecked().tasks[id as usize] }
}

/// Highest task-table index ever registered; the scheduler scan's upper bound.
#[inline]
pub(crate) fn highest_task(cs: &CriticalSection) -> TaskId {
    TABLE.get(cs).highest_task
}

/// ISR-context counterpart of [`highest_task`]; see [`task_mut_isr`].
///
/// # Safety
/// Caller must be running in ISR context.
#[inline]
pub(crate) unsafe fn highest_task_isr() -> TaskId {
    unsafe { TABLE.get_unchecked().highest_task }
}

/// Extend `highest_task` to include `id` if it's new. Only ever called
/// from `add_task`, which never runs from ISR context, so this has no
/// unchecked sibling.
pub(crate) fn raise_highest_task(cs: &CriticalSection, id: TaskId) {
    let table = TABLE.get(cs);
    if id > table.highest_task {
        table.highest_task = id;
    }
}

/// Current tick count (wraps naturally, spec.md §4.3).
#[inline]
pub fn tick_get() -> Tick {
    TICK_COUNT.load(Ordering::Relaxed)
}

/// Advance the tick counter by one and return the new value.
#[inline]
pub(crate) fn tick_increment() -> Tick {
    TICK_COUNT.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
}

/// Initialize the kernel: set PendSV to the lowest exception priority
/// (spec.md §6). Must be called before registering tasks or calling
/// `join`.
pub fn init() {
    crate::port::init_pendsv_priority();
    crate::info!("kernel initialized");
}

/// Hand control to the scheduler for the first time.
///
/// Disables interrupts, runs the ready selector once, and re-enables
/// them (spec.md §6). The selector's choice pends PendSV; as soon as
/// interrupts are back on, PendSV tail-chains in and the CPU resumes
/// execution inside whichever task was chosen, at its `entry` point.
/// Does not return from the caller's perspective once scheduling starts.
pub fn join() {
    critical_section(|cs| {
        debug_assert!(
            highest_task(cs) > 0,
            "join() called with no application task registered"
        );
        crate::sched::work(cs);
    });
}
