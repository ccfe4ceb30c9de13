//! Cortex-M0+ port: PendSV context switch and initial stack frame.
//!
//! Armv6-M can't address `r8..r11` with `push`/`pop` directly, so the
//! handler shuttles them through a low register one at a time. The order
//! here (closest to the new stack pointer first: `r11, r10, r9, r8`,
//! then the `push {r4-r7}` block) is the single canonical layout shared
//! by this handler and `build_initial_frame` below, the two disagreeing
//! was the silent-corruption bug this port is written to avoid.

#![allow(named_asm_labels)]

use core::arch::naked_asm;

use cortex_m::peripheral::scb::SystemHandler;

use crate::kernel::CPU_STATE;
use crate::task::{kernel_trap_task_returned, TaskFn};
use crate::types::StackElement;

/// Software-saved integer bank, ascending address from the post-switch
/// stack pointer. Mirrors the push/pop sequence in `pendsv_handler`.
#[repr(C)]
struct SoftFrame {
    r11: u32,
    r10: u32,
    r9: u32,
    r8: u32,
    r4: u32,
    r5: u32,
    r6: u32,
    r7: u32,
}

/// Hardware-restored frame; the exception return mechanism consumes this
/// automatically once `pendsv_handler` branches to `lr`.
#[repr(C)]
struct HwFrame {
    r0: u32,
    r1: u32,
    r2: u32,
    r3: u32,
    r12: u32,
    lr: u32,
    pc: u32,
    xpsr: u32,
}

#[repr(C)]
struct InitialFrame {
    soft: SoftFrame,
    hw: HwFrame,
}

/// Lay down a synthetic exception frame so the first PendSV restore into
/// this task behaves exactly like returning from an interrupt into
/// `entry` (spec.md §4.1).
///
/// # Safety
/// `stack_base` must point to a buffer of at least `stack_size` valid,
/// writable `StackElement`s, not currently in use by any other task.
pub unsafe fn build_initial_frame(
    entry: TaskFn,
    stack_base: *mut StackElement,
    stack_size: usize,
) -> *mut StackElement {
    unsafe {
        let stack_top = stack_base.add(stack_size) as usize;
        let aligned_top = stack_top & !0x7;
        let frame_ptr = (aligned_top - core::mem::size_of::<InitialFrame>()) as *mut InitialFrame;

        core::ptr::write(
            frame_ptr,
            InitialFrame {
                soft: SoftFrame {
                    r11: 0x0000_0B0B,
                    r10: 0x0000_0A0A,
                    r9: 0x0000_0909,
                    r8: 0x0000_0808,
                    r4: 0x0000_0404,
                    r5: 0x0000_0505,
                    r6: 0x0000_0606,
                    r7: 0x0000_0707,
                },
                hw: HwFrame {
                    r0: 0,
                    r1: 0,
                    r2: 0,
                    r3: 0,
                    r12: 0,
                    // A task is never supposed to return; if it does, this
                    // branches into the trap instead of executing garbage.
                    lr: (kernel_trap_task_returned as usize as u32) | 1,
                    pc: (entry as usize as u32) | 1,
                    xpsr: 0x0100_0000,
                },
            },
        );

        frame_ptr as *mut StackElement
    }
}

/// Set PendSV to the lowest exception priority (spec.md §6): only Armv6-M's
/// top two priority bits are implemented, but writing `0xFF` sets them all
/// regardless of how many the silicon actually honors.
pub fn init_pendsv_priority() {
    unsafe {
        let mut scb = cortex_m::Peripherals::steal().SCB;
        scb.set_priority(SystemHandler::PendSV, 0xFF);
    }
}

/// Set the PendSV-pending bit in the Interrupt Control and State Register.
#[inline(always)]
pub fn request_context_switch() {
    cortex_m::peripheral::SCB::set_pendsv();
}

/// Convenience SysTick setup. Out of the scheduler's own scope (spec.md
/// §1 names the 1 ms tick source an external collaborator) but provided
/// for callers that want it, in the teacher's style.
pub fn systick_init(reload: u32) {
    let mut p = unsafe { cortex_m::Peripherals::steal() };
    p.SYST.set_reload(reload - 1);
    p.SYST.clear_current();
    p.SYST.set_clock_source(cortex_m::peripheral::syst::SystClkSource::Core);
    p.SYST.enable_interrupt();
    p.SYST.enable_counter();
}

/// PendSV exception handler: exchanges `CPU_STATE.current` for
/// `CPU_STATE.next`, saving/restoring the software register bank around
/// the swap (spec.md §4.5). Named `PendSV` (not `pendsv_handler`) because
/// this symbol occupies the vector table slot directly, re-exported as
/// `pendsv_handler` at the crate root for the spec's naming.
#[no_mangle]
#[unsafe(naked)]
pub unsafe extern "C" fn PendSV() {
    naked_asm!(
        "cpsid i",
        "isb",
        "ldr r0, ={cpu_state}",
        "ldr r1, [r0]",
        "cbz r1, 1f",
        "push {{r4-r7}}",
        "mov r3, r8",
        "push {{r3}}",
        "mov r3, r9",
        "push {{r3}}",
        "mov r3, r10",
        "push {{r3}}",
        "mov r3, r11",
        "push {{r3}}",
        "dsb",
        "isb",
        "mov r2, sp",
        "str r2, [r1]",
        "1:",
        "ldr r1, [r0, #4]",
        "ldr r2, [r1]",
        "mov sp, r2",
        "pop {{r3}}",
        "mov r11, r3",
        "pop {{r3}}",
        "mov r10, r3",
        "pop {{r3}}",
        "mov r9, r3",
        "pop {{r3}}",
        "mov r8, r3",
        "pop {{r4-r7}}",
        "str r1, [r0]",
        "cpsie i",
        "dsb",
        "isb",
        "bx lr",
        cpu_state = sym CPU_STATE,
    );
}
