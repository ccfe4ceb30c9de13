//! Critical section handling
//!
//! All task-code mutation of the task table must happen with interrupts
//! disabled (spec.md invariant 5); ISRs are already serialized by hardware
//! priority and skip this guard.

use core::sync::atomic::{AtomicBool, Ordering};

/// Global flag indicating whether we are inside a critical section.
static IN_CRITICAL: AtomicBool = AtomicBool::new(false);

/// RAII guard for critical sections.
///
/// When this guard is created, interrupts are disabled. When it is
/// dropped, interrupts are unconditionally re-enabled, the guard is
/// never held across a context switch, so nesting is not needed.
pub struct CriticalSection {
    _private: (),
}

impl CriticalSection {
    /// Enter a critical section by disabling interrupts.
    #[inline(always)]
    pub fn enter() -> Self {
        #[cfg(target_arch = "arm")]
        cortex_m::interrupt::disable();

        IN_CRITICAL.store(true, Ordering::Release);
        CriticalSection { _private: () }
    }

    /// Check if we're currently in a critical section.
    #[inline(always)]
    pub fn is_active() -> bool {
        IN_CRITICAL.load(Ordering::Acquire)
    }
}

impl Drop for CriticalSection {
    #[inline(always)]
    fn drop(&mut self) {
        IN_CRITICAL.store(false, Ordering::Release);

        #[cfg(target_arch = "arm")]
        unsafe {
            cortex_m::interrupt::enable()
        };
    }
}

/// Execute a closure with interrupts disabled.
#[inline]
pub fn critical_section<F, R>(f: F) -> R
where
    F: FnOnce(&CriticalSection) -> R,
{
    let cs = CriticalSection::enter();
    f(&cs)
}

/// Check if currently executing in an ISR context (`IPSR != 0`).
#[inline]
pub fn is_isr_context() -> bool {
    #[cfg(target_arch = "arm")]
    {
        let ipsr: u32;
        unsafe {
            core::arch::asm!(
                "mrs {}, IPSR",
                out(reg) ipsr,
                options(nomem, nostack, preserves_flags)
            );
        }
        ipsr != 0
    }

    #[cfg(not(target_arch = "arm"))]
    {
        false
    }
}
