//! # Tick Source
//!
//! Produces one tick per base period from a free-running hardware counter and
//! a compare register.
//!
//! Every deadline is the previous *scheduled* deadline plus the period, never
//! "now" plus the period. Interrupt latency on one tick therefore does not
//! shift the phase of later ticks: after `n` interrupts the comparator holds
//! exactly `first_deadline + n * period_ticks` (wrapping).

use crate::error::TimerFault;

/// Hardware timer driver seen by the tick source.
///
/// Counter and compare values are in hardware ticks and wrap at `u32::MAX`.
pub trait CompareTimer {
    /// Convert a millisecond interval to hardware ticks.
    fn ticks_for_duration(&self, period_ms: u32) -> u32;

    /// Current value of the free-running counter.
    fn counter(&self) -> u32;

    /// Deadline currently held by the compare register.
    fn compare(&self) -> u32;

    /// Program the next compare deadline.
    fn arm(&mut self, deadline: u32) -> Result<(), TimerFault>;
}

/// Self re-arming periodic tick generator.
///
/// The driver is only readable once installed; deadlines change through
/// [`rearm`](Self::rearm) alone.
///
/// ```compile_fail
/// fn tamper<T: ticksched::CompareTimer>(source: &mut ticksched::TickSource<T>) {
///     source.timer_mut().arm(0).ok();
/// }
/// ```
pub struct TickSource<T> {
    timer: T,
    period_ticks: u32,
}

impl<T: CompareTimer> TickSource<T> {
    /// Compute the period in hardware ticks and arm the first deadline one
    /// period from now.
    ///
    /// The tick interrupt itself is enabled by the platform once the handler
    /// is installed.
    pub fn initialize(mut timer: T, base_period_ms: u32) -> Result<Self, TimerFault> {
        let period_ticks = timer.ticks_for_duration(base_period_ms);
        if period_ticks == 0 {
            return Err(TimerFault::ZeroPeriod);
        }

        let first = timer.counter().wrapping_add(period_ticks);
        timer.arm(first)?;

        Ok(Self {
            timer,
            period_ticks,
        })
    }

    /// Program the next deadline relative to the current one.
    ///
    /// Must run first thing in the tick interrupt. Returns the new deadline.
    ///
    /// # Panics
    /// If the driver refuses the deadline: the timer would never fire again.
    pub fn rearm(&mut self) -> u32 {
        let next = self.timer.compare().wrapping_add(self.period_ticks);
        if let Err(fault) = self.timer.arm(next) {
            panic!("tick re-arm failed: {}", fault);
        }
        next
    }

    /// Hardware ticks per base period.
    #[inline]
    pub fn period_ticks(&self) -> u32 {
        self.period_ticks
    }

    /// Currently programmed deadline.
    #[inline]
    pub fn deadline(&self) -> u32 {
        self.timer.compare()
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    #[cfg(test)]
    pub(crate) fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}

// ---------------------------------------------------------------------------
// Test timer
// ---------------------------------------------------------------------------


// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------
