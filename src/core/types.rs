//! Core type definitions
//!
//! Strong typing for the handful of primitives the scheduler operates on.

/// Task priority / task table index (0 = idle, higher = higher priority).
pub type TaskId = u8;

/// Tick counter type, wraps naturally.
pub type Tick = u32;

/// Bitfield of event flags.
pub type EventFlags = u32;

/// Raw stack element; tasks' stacks are arrays of this type.
pub type StackElement = u32;

/// Task state, following the state machine in spec.md §4.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TaskState {
    /// Runnable; eligible to be picked by the selector.
    Ready = 0,
    /// Blocked in `sleep`, waiting for `timeout` to expire.
    WaitTime = 1,
    /// Blocked in `event_wait`/`event_wait_timeout`, waiting for
    /// `event_flags & event_mask != 0` or (if armed) `timeout` to expire.
    WaitFlag = 2,
}
