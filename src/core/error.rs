//! Error types for the kernel core
//!
//! Configuration misuse (bad task id, misaligned stack) traps per
//! spec.md §7 rather than returning an error, there is no caller to
//! hand a `Result` back to at bring-up time. `KernelError` exists for the
//! remaining runtime-observable outcomes, and so host-side tests can
//! assert on the trap condition without actually looping forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum KernelError {
    /// Task id is >= MAX_TASKS.
    TaskIdInvalid = 1,
    /// Stack base pointer is not 4-byte aligned.
    StackMisaligned = 2,
    /// Stack is smaller than `config::STACK_SIZE_MIN`.
    StackTooSmall = 3,
    /// `add_task`/`join` called from ISR context.
    IsrContext = 4,
    /// `join` called before any non-idle task was registered.
    NoAppTask = 5,
}

/// Result type alias for kernel operations.
pub type KernelResult<T> = Result<T, KernelError>;
