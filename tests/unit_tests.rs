//! Host-side tests for the scheduler core
//!
//! Run on the host stub port (no `m0plus`/`m4f` feature, no ARM target),
//! against the public API only. The stub's `request_context_switch`
//! performs the register exchange eagerly (`CPU_STATE.current =
//! CPU_STATE.next`) since there is no real preemption on the host, which
//! makes most of the scheduler observable end to end without any
//! assembly. `sleep`'s full wake-and-resume round trip still can't be
//! observed this way (nothing ever actually suspends and resumes a host
//! call stack), so that test only checks the outgoing task's TCB, not a
//! synchronous return.

use tickkernel::error::{KernelError, KernelResult};
use tickkernel::types::{EventFlags, TaskState, Tick};
use tickkernel::{
    add_task, config, event_clear, event_set, event_wait, event_wait_timeout, join, kernel, sleep, systick_handler,
};

static mut STACK_IDLE: [u32; 64] = [0; 64];
static mut STACK_A: [u32; 64] = [0; 64];
static mut STACK_B: [u32; 64] = [0; 64];

fn task_idle() -> ! {
    loop {}
}
fn task_a() -> ! {
    loop {}
}
fn task_b() -> ! {
    loop {}
}

/// Every scheduler-touching assertion lives in one test: `CPU_STATE` and
/// the task table are process-wide singletons (spec.md §3 "Global
/// state"), so splitting this across parallel `#[test]` functions would
/// just race on shared state the kernel assumes a single core owns.
#[test]
#[allow(static_mut_refs)]
fn scheduling_scenario() {
    // id 0 is the idle task by convention (config::IDLE_TASK_ID); the
    // kernel never schedules it itself, registering it is the caller's
    // job, matching spec.md's "out of scope: the idle task body".
    add_task(0, task_idle, unsafe { &mut STACK_IDLE });
    add_task(1, task_b, unsafe { &mut STACK_B });
    add_task(2, task_a, unsafe { &mut STACK_A });

    join();

    // Both id 1 and id 2 are READY; descending scan picks the higher index.
    let task2_ptr = unsafe { kernel::CPU_STATE.current };
    assert!(!task2_ptr.is_null());
    assert_eq!(unsafe { (*task2_ptr).state }, TaskState::Ready);

    // --- event_set / event_wait round trip, flag already pending ---
    //
    // Set task 2's flag before it waits on it: spec.md §5's ordering
    // guarantee ("a flag set before a waiter begins waiting is observed
    // on its first selector pass") means `event_wait` resolves inside
    // the same call, without ever deselecting task 2, the one round
    // trip this host stub can observe synchronously end to end.
    event_set(2, 0b0011);
    assert_eq!(unsafe { kernel::CPU_STATE.current }, task2_ptr);

    let observed: EventFlags = event_wait(0b0010);
    assert_eq!(observed, 0b0011, "must observe the full pre-clear snapshot");
    assert_eq!(unsafe { (*task2_ptr).event_flags }, 0b0001, "only the masked bit is consumed");
    assert_eq!(unsafe { (*task2_ptr).state }, TaskState::Ready);

    event_clear(0b0001);
    assert_eq!(unsafe { (*task2_ptr).event_flags }, 0, "event_clear drops the remaining bit");

    // --- sleep deselects the sleeper in favor of the next-highest ready task ---
    let ticks: Tick = 3;
    sleep(ticks);
    assert_eq!(unsafe { (*task2_ptr).state }, TaskState::WaitTime);
    assert_eq!(unsafe { (*task2_ptr).timeout }, ticks);

    let task1_ptr = unsafe { kernel::CPU_STATE.current };
    assert_ne!(task1_ptr, task2_ptr, "selector must switch away from the sleeper");
    assert_eq!(unsafe { (*task1_ptr).state }, TaskState::Ready);

    // --- tick service counts down and re-readies on expiry ---
    for _ in 0..(ticks - 1) {
        systick_handler();
        assert_eq!(unsafe { kernel::CPU_STATE.current }, task1_ptr, "not due yet");
    }
    systick_handler();
    assert_eq!(unsafe { (*task2_ptr).state }, TaskState::Ready);
    assert_eq!(unsafe { (*task2_ptr).timeout }, 0);
    assert_eq!(
        unsafe { kernel::CPU_STATE.current },
        task2_ptr,
        "task 2 outranks task 1 once ready again"
    );

    // --- event_wait_timeout: timer expires with the flag never set (S3) ---
    //
    // task 2 is current. Nobody ever sets `mask`, so unlike the
    // event_wait case above the first critical section's promotion
    // check never fires and the selector deselects task 2 immediately,
    // in the same call that armed the wait. The call's own return value
    // is therefore a read of whatever task happens to be current at that
    // instant (task 1), not task 2's eventual wakeup — the same
    // synchronous-return limitation the module doc above notes for
    // `sleep`. What's observable end to end on this stub is the TCB:
    // task 2 parks in WAIT_FLAG with the timer armed, gets deselected,
    // and the tick service promotes it back to READY with a zero
    // intersection against `mask` once the timer runs out.
    let mask: EventFlags = 0b0100;
    let timeout_ticks: Tick = 4;
    let _ = event_wait_timeout(mask, timeout_ticks);

    assert_eq!(unsafe { (*task2_ptr).state }, TaskState::WaitFlag);
    assert_eq!(unsafe { (*task2_ptr).timeout }, timeout_ticks);
    assert_eq!(unsafe { (*task2_ptr).event_mask }, mask);
    assert_eq!(
        unsafe { kernel::CPU_STATE.current },
        task1_ptr,
        "task 1 regains the CPU while task 2 waits on a timeout"
    );

    for _ in 0..(timeout_ticks - 1) {
        systick_handler();
        assert_eq!(unsafe { kernel::CPU_STATE.current }, task1_ptr, "not due yet");
    }
    systick_handler();
    assert_eq!(unsafe { (*task2_ptr).state }, TaskState::Ready);
    assert_eq!(unsafe { (*task2_ptr).timeout }, 0);
    assert_eq!(
        unsafe { (*task2_ptr).event_flags } & mask,
        0,
        "timed-out wait observes zero intersection with the requested mask"
    );
    assert_eq!(
        unsafe { kernel::CPU_STATE.current },
        task2_ptr,
        "task 2 outranks task 1 once ready again"
    );

    // --- idle fallback: every non-idle task WAIT_TIME at once (S5) ---
    //
    // task 2 is current; park it, then park whoever becomes current next
    // (task 1), leaving idle (always READY, invariant 1) as the only
    // runnable task. task 2 sleeps for fewer ticks than task 1, so the
    // tick that wakes it must preempt idle even though task 1 is still
    // waiting.
    sleep(2);
    assert_eq!(unsafe { (*task2_ptr).state }, TaskState::WaitTime);
    assert_eq!(
        unsafe { kernel::CPU_STATE.current },
        task1_ptr,
        "task 1 is the only other ready task"
    );

    sleep(5);
    assert_eq!(unsafe { (*task1_ptr).state }, TaskState::WaitTime);

    let idle_ptr = unsafe { kernel::CPU_STATE.current };
    assert_ne!(idle_ptr, task1_ptr);
    assert_ne!(idle_ptr, task2_ptr, "idle runs when every other task is WAIT_TIME");

    systick_handler();
    assert_eq!(unsafe { kernel::CPU_STATE.current }, idle_ptr, "neither timer is due yet");
    assert_eq!(unsafe { (*task2_ptr).timeout }, 1);
    assert_eq!(unsafe { (*task1_ptr).timeout }, 4);

    systick_handler();
    assert_eq!(unsafe { (*task2_ptr).state }, TaskState::Ready);
    assert_eq!(unsafe { (*task1_ptr).state }, TaskState::WaitTime);
    assert_eq!(unsafe { (*task1_ptr).timeout }, 3);
    assert_eq!(
        unsafe { kernel::CPU_STATE.current },
        task2_ptr,
        "idle is preempted once the higher-priority waiter is ready again, even though task 1 still waits"
    );
}

#[test]
fn config_constants_are_sane() {
    assert!(config::MAX_TASKS > config::IDLE_TASK_ID);
    assert!(config::TICK_RATE_HZ > 0);
    assert!(config::STACK_SIZE_MIN > 0);
}

#[test]
fn kernel_error_is_a_plain_value_type() {
    let errs: [KernelError; 5] = [
        KernelError::TaskIdInvalid,
        KernelError::StackMisaligned,
        KernelError::StackTooSmall,
        KernelError::IsrContext,
        KernelError::NoAppTask,
    ];
    for e in errs {
        let r: KernelResult<()> = Err(e);
        assert_eq!(r.unwrap_err(), e);
    }
}

#[test]
fn task_state_defaults_to_ready() {
    // A freshly built TCB (before add_task ever touches it) starts in
    // READY with no timer or flags armed, the all-zero bit pattern a
    // `[const { Tcb::new() }; MAX_TASKS]` table is initialized with.
    let tcb = tickkernel::task::Tcb::new();
    assert_eq!(tcb.state, TaskState::Ready);
    assert_eq!(tcb.timeout, 0);
    assert_eq!(tcb.event_flags, 0);
    assert_eq!(tcb.event_mask, 0);
}
