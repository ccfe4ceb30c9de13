//! Compile-time configuration for the kernel core
//!
//! These constants control the size and timing of the fixed task table.

/// Maximum number of task slots, including the idle task at index 0.
///
/// Index doubles as static priority: a higher index is a higher priority.
/// Raise this if more tasks are registered than it allows; `add_task` traps
/// rather than silently dropping a task.
pub const MAX_TASKS: usize = 16;

/// System tick rate in Hz. The tick handler must be wired to a timer that
/// actually fires at this rate for `sleep`/`event_wait_timeout` tick counts
/// to correspond to real time.
pub const TICK_RATE_HZ: u32 = 1000;

/// Minimum task stack size in words, checked with a debug assertion only.
/// The kernel performs no stack-overflow detection at runtime.
pub const STACK_SIZE_MIN: usize = 32;

/// Index reserved for the idle task. Must always be `READY` (spec invariant 1).
pub const IDLE_TASK_ID: usize = 0;
