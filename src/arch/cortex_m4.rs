//! # Cortex-M4 Port Layer
//!
//! Drives the scheduler tick from SysTick and owns the system-wide
//! [`Kernel`] instance.
//!
//! SysTick is a 24-bit down-counter with an auto-reload register rather than
//! a compare unit. [`SysTickTimer`] presents it as one: the reload register
//! holds the distance between consecutive deadlines and the hardware reloads
//! at the exact moment the counter wraps, so the phase stays anchored to the
//! previous deadline regardless of handler latency.
//!
//! ## Interrupt Priority
//!
//! The SysTick priority must be installed before the first deadline is armed;
//! [`start`] does both in that order.

use cortex_m::peripheral::scb::SystemHandler;
use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::{SCB, SYST};

use crate::config::{BASE_PERIOD_MS, CAPACITY, SYSTEM_CLOCK_HZ, TICK_PRIORITY};
use crate::error::{SchedResult, TimerFault};
use crate::kernel::Kernel;
use crate::tick::CompareTimer;

/// Largest distance SysTick can count in one reload.
const MAX_RELOAD_SPAN: u32 = 1 << 24;

/// System-wide scheduler driven by SysTick.
pub static KERNEL: Kernel<SysTickTimer, CAPACITY> = Kernel::new();

// ---------------------------------------------------------------------------
// SysTick compare timer
// ---------------------------------------------------------------------------

/// SysTick clocked from the processor core, seen as a compare timer.
pub struct SysTickTimer {
    syst: SYST,
    /// Next deadline in core cycles since the first arm.
    compare: u32,
    /// Current reload span; zero until the first deadline is armed.
    span: u32,
}

impl SysTickTimer {
    /// Take the SysTick peripheral. The counter stays stopped until the first
    /// deadline is armed.
    pub fn new(mut syst: SYST) -> Self {
        syst.disable_counter();
        syst.disable_interrupt();
        syst.set_clock_source(SystClkSource::Core);
        Self {
            syst,
            compare: 0,
            span: 0,
        }
    }
}

impl CompareTimer for SysTickTimer {
    fn ticks_for_duration(&self, period_ms: u32) -> u32 {
        (SYSTEM_CLOCK_HZ / 1000).saturating_mul(period_ms)
    }

    /// Valid outside the tick handler, or inside it after the re-arm.
    ///
    /// Between the hardware wrap and the re-arm, `compare` still holds the
    /// deadline that just expired and the result lags by one period.
    fn counter(&self) -> u32 {
        if self.span == 0 {
            return self.compare;
        }
        // The down-counter holds the cycles left until the next deadline.
        self.compare.wrapping_sub(SYST::get_current())
    }

    fn compare(&self) -> u32 {
        self.compare
    }

    fn arm(&mut self, deadline: u32) -> Result<(), TimerFault> {
        let span = deadline.wrapping_sub(self.compare);
        if span == 0 || span > MAX_RELOAD_SPAN {
            return Err(TimerFault::DeadlineOutOfRange);
        }

        if self.span == 0 {
            self.syst.set_reload(span - 1);
            self.syst.clear_current();
            self.syst.enable_interrupt();
            self.syst.enable_counter();
        } else {
            if !self.syst.is_counter_enabled() {
                return Err(TimerFault::CounterStopped);
            }
            // A changed span takes effect at the next wrap.
            if span != self.span {
                self.syst.set_reload(span - 1);
            }
        }

        self.span = span;
        self.compare = deadline;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

/// Install the SysTick priority and hand the timer to [`KERNEL`].
///
/// Ticks begin one base period later; tasks may be created before or after.
pub fn start(syst: SYST, scb: &mut SCB) -> SchedResult<()> {
    set_tick_priority(scb, TICK_PRIORITY);
    KERNEL.init(SysTickTimer::new(syst), BASE_PERIOD_MS)
}

/// Set the SysTick exception priority.
pub fn set_tick_priority(scb: &mut SCB, priority: u8) {
    // Safety: changing the priority of SysTick cannot break a priority-based
    // critical section; the scheduler only uses interrupt masking.
    unsafe {
        scb.set_priority(SystemHandler::SysTick, priority);
    }
}

// ---------------------------------------------------------------------------
// SysTick handler
// ---------------------------------------------------------------------------

/// SysTick exception handler — scheduler tick entry point.
///
/// Called once per base period. Re-arms first, then dispatches due tasks.
#[no_mangle]
pub extern "C" fn SysTick() {
    KERNEL.on_tick();
}
