//! Tick service
//!
//! Drives timeout bookkeeping from the 1 ms system tick (spec.md §4.3).

use crate::kernel;
use crate::sched;
use crate::types::{TaskId, TaskState};

/// Advance every armed timeout by one tick, wake whoever expires, bump
/// the tick counter, and let the selector act on the result.
///
/// Wired to the 1 ms tick ISR (spec.md §6); runs in ISR context, so it
/// walks the task table through the unchecked accessors and drives
/// `sched::work_from_isr` rather than opening a `critical_section` of
/// its own — invariant 5's ISR exemption, not a shortcut.
pub fn systick_handler() {
    // Safety: this function only ever runs as the 1 ms tick ISR.
    unsafe {
        let highest = kernel::highest_task_isr();

        // Idle (id 0) owns no timer and is excluded by this loop's bound,
        // matching spec.md §4.3's "while id > 0" scan.
        for id in (1..=highest).rev() {
            let task = kernel::task_mut_isr(id as TaskId);

            if task.timeout > 0 {
                task.timeout -= 1;
                if task.timeout == 0 {
                    task.state = TaskState::Ready;
                }
            }
        }

        kernel::tick_increment();
        sched::work_from_isr();
    }
}
