//! Ready selector and blocking primitives
//!
//! `work` is the scheduling decision point (spec.md §4.2); the five
//! blocking primitives (spec.md §4.4) mutate task state and then invoke
//! it. Every blocking primitive opens its own `critical_section` and
//! threads the resulting token all the way down into the task-table
//! accessors, so the type system — not just caller discipline — proves
//! invariant 5 at every mutation site. `work` itself is also the tick
//! handler's scheduling decision point, and the tick handler runs in ISR
//! context with no `CriticalSection` value of its own to offer; that
//! path goes through `work_from_isr`, a thin sibling sharing the same
//! scan logic against the unchecked accessors, justified by invariant
//! 5's ISR exemption rather than by discarding a token nobody checks.

use crate::config::IDLE_TASK_ID;
use crate::critical::{critical_section, CriticalSection};
use crate::kernel;
use crate::task::Tcb;
use crate::types::{EventFlags, TaskId, TaskState, Tick};

/// Select the highest-priority runnable task, assign it to `next`, and
/// pend PendSV if it differs from `current`.
///
/// Called from task context by `join` and every blocking primitive, each
/// of which already holds `cs` from its own `critical_section` call.
pub(crate) fn work(cs: &CriticalSection) {
    let highest = kernel::highest_task(cs);

    let mut chosen_id: TaskId = IDLE_TASK_ID as TaskId;

    // Scan from the highest-registered index down to (but not including)
    // idle: idle needs no promotion check since invariant 1 guarantees
    // it is always READY, so falling through the loop already selects it.
    for id in (1..=highest).rev() {
        let task = kernel::task_mut(cs, id);

        if task.state == TaskState::WaitFlag && task.event_flags & task.event_mask != 0 {
            task.state = TaskState::Ready;
        }

        if task.state == TaskState::Ready {
            chosen_id = id;
            break;
        }
    }

    let chosen: *mut Tcb = kernel::task_mut(cs, chosen_id);
    dispatch(chosen);
}

/// ISR-context counterpart of [`work`], called only from
/// `time::systick_handler`. Identical selection logic, against the
/// unchecked task-table accessors since the 1 ms tick ISR runs at
/// interrupt priority with no `CriticalSection` of its own (invariant
/// 5's ISR exemption).
///
/// # Safety
/// Caller must be running in ISR context.
pub(crate) unsafe fn work_from_isr() {
    let highest = unsafe { kernel::highest_task_isr() };

    let mut chosen_id: TaskId = IDLE_TASK_ID as TaskId;

    for id in (1..=highest).rev() {
        let task = unsafe { kernel::task_mut_isr(id) };

        if task.state == TaskState::WaitFlag && task.event_flags & task.event_mask != 0 {
            task.state = TaskState::Ready;
        }

        if task.state == TaskState::Ready {
            chosen_id = id;
            break;
        }
    }

    let chosen: *mut Tcb = unsafe { kernel::task_mut_isr(chosen_id) };
    dispatch(chosen);
}

/// Assign `next` and pend PendSV if it differs from `current`. Shared by
/// both `work` and `work_from_isr`: `CPU_STATE` is exchanged solely by
/// the PendSV handler itself (invariant 6), so reading/writing it here
/// needs no task-table critical section, only the same ISR-or-disabled-
/// interrupts discipline the caller already observes.
#[allow(static_mut_refs)]
fn dispatch(chosen: *mut Tcb) {
    unsafe {
        kernel::CPU_STATE.next = chosen;
        if kernel::CPU_STATE.current != chosen {
            crate::port::request_context_switch();
        }
    }
}

/// Reference to the TCB of the task currently executing.
///
/// Takes `cs` as the proof that the caller holds a critical section;
/// only sound to call from task code, by the time any task code runs,
/// PendSV has already assigned `CPU_STATE.current`.
#[allow(static_mut_refs)]
fn current_mut(_cs: &CriticalSection) -> &'static mut Tcb {
    unsafe {
        let ptr = kernel::CPU_STATE.current;
        debug_assert!(!ptr.is_null(), "no current task, sched fn called before join()");
        &mut *ptr
    }
}

/// Block the calling task for `ticks` system ticks (spec.md §4.4).
///
/// `ticks == 0` returns immediately without blocking, "0 means no timer"
/// is the data model's own convention (spec.md §3) for `timeout`; parking
/// the caller in `WaitTime` with a zero timeout would violate invariants
/// 2/3 and nothing would ever wake it (the tick handler only decrements
/// `timeout > 0`).
///
/// Otherwise returns once the tick handler has decremented `timeout` to
/// zero and the selector has rescheduled this task, no earlier than
/// `ticks` ticks, no later than `ticks + 1` (tick granularity, testable
/// property 6).
pub fn sleep(ticks: Tick) {
    if ticks == 0 {
        return;
    }

    critical_section(|cs| {
        let task = current_mut(cs);
        task.timeout = ticks;
        task.state = TaskState::WaitTime;
        work(cs);
    });
}

/// Wait (forever) for any bit in `mask` to be set in this task's event
/// flags, then clear those bits and return the full pre-clear snapshot.
pub fn event_wait(mask: EventFlags) -> EventFlags {
    critical_section(|cs| {
        let task = current_mut(cs);
        task.event_mask = mask;
        task.timeout = 0;
        task.state = TaskState::WaitFlag;
        work(cs);
    });

    critical_section(|cs| {
        let task = current_mut(cs);
        let observed = task.event_flags;
        task.event_flags &= !mask;
        observed
    })
}

/// As `event_wait`, but also arms a timeout. A returned value with zero
/// intersection with `mask` signals the wait timed out rather than
/// observing an event (spec.md §4.4). `ticks == 0` arms no timer at all
/// (consistent with `timeout == 0` meaning "no timer" throughout the
/// data model), so the wait behaves exactly like `event_wait`.
pub fn event_wait_timeout(mask: EventFlags, ticks: Tick) -> EventFlags {
    critical_section(|cs| {
        let task = current_mut(cs);
        task.event_mask = mask;
        task.timeout = ticks;
        task.state = TaskState::WaitFlag;
        work(cs);
    });

    critical_section(|cs| {
        let task = current_mut(cs);
        let observed = task.event_flags;
        task.event_flags &= !mask;
        observed
    })
}

/// OR `mask` into `target`'s event flags and invoke the selector.
///
/// The only cross-task mutation in the kernel (spec.md §4.4); safe to
/// call from either an ISR or a task, since the single core serializes
/// every other mutator through the same critical-section discipline.
pub fn event_set(target: TaskId, mask: EventFlags) {
    critical_section(|cs| {
        let task = kernel::task_mut(cs, target);
        task.event_flags |= mask;
        work(cs);
    });
}

/// Clear bits in the calling task's own event flags. No reschedule.
pub fn event_clear(mask: EventFlags) {
    critical_section(|cs| {
        let task = current_mut(cs);
        task.event_flags &= !mask;
    });
}
