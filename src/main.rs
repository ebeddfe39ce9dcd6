//! # ticksched Demo Firmware
//!
//! Registers three periodic tasks on the SysTick-driven kernel:
//!
//! | Slot | Task | Period | Behavior |
//! |------|------|--------|----------|
//! | 0 | `heartbeat_task` | 500 ms | Counts heartbeats |
//! | 1 | `sample_task` | 10 ms | Accumulates a fake sensor reading |
//! | 2 | `supervisor_task` | 1000 ms | Pauses and resumes the sampler |
//!
//! The supervisor drives the sampler through the same control API the
//! application uses; the change applies from the next tick on.

#![no_std]
#![no_main]

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use cortex_m_rt::entry;
use panic_halt as _;

use ticksched::arch::cortex_m4::{self, KERNEL};

const HEARTBEAT_SLOT: usize = 0;
const SAMPLE_SLOT: usize = 1;
const SUPERVISOR_SLOT: usize = 2;

static HEARTBEATS: AtomicU32 = AtomicU32::new(0);
static SAMPLE_SUM: AtomicU32 = AtomicU32::new(0);
static SAMPLING: AtomicBool = AtomicBool::new(false);

// ---------------------------------------------------------------------------
// Task callbacks
// ---------------------------------------------------------------------------

fn heartbeat_task() {
    HEARTBEATS.fetch_add(1, Ordering::Relaxed);
}

fn sample_task() {
    let reading = HEARTBEATS.load(Ordering::Relaxed) & 0xFF;
    SAMPLE_SUM.fetch_add(reading, Ordering::Relaxed);
}

fn supervisor_task() {
    // Toggle the sampler every second.
    let result = if SAMPLING.fetch_xor(true, Ordering::Relaxed) {
        KERNEL.stop(SAMPLE_SLOT)
    } else {
        KERNEL.start(SAMPLE_SLOT)
    };
    // Slot indices are constants below capacity.
    debug_assert!(result.is_ok());
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

/// Firmware entry point. Registers the tasks, starts the tick, and sleeps
/// between interrupts. Does not return.
#[entry]
fn main() -> ! {
    let mut cp = cortex_m::Peripherals::take().unwrap();

    KERNEL
        .create(HEARTBEAT_SLOT, &heartbeat_task, 500)
        .expect("heartbeat slot");
    KERNEL
        .create(SAMPLE_SLOT, &sample_task, 10)
        .expect("sample slot");
    KERNEL
        .create(SUPERVISOR_SLOT, &supervisor_task, 1000)
        .expect("supervisor slot");

    KERNEL.start(HEARTBEAT_SLOT).expect("heartbeat start");
    KERNEL.start(SUPERVISOR_SLOT).expect("supervisor start");

    cortex_m4::start(cp.SYST, &mut cp.SCB).expect("SysTick start");

    loop {
        cortex_m::asm::wfi();
    }
}
