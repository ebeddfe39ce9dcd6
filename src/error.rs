//! Error types for the scheduler control plane and the tick hardware.

use core::fmt;

/// Result type returned by the control-plane API.
pub type SchedResult<T> = Result<T, SchedError>;

/// Failures reported by a [`CompareTimer`](crate::tick::CompareTimer) driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerFault {
    /// The base period converts to zero hardware ticks.
    ZeroPeriod,
    /// The requested deadline cannot be represented by the comparator.
    DeadlineOutOfRange,
    /// The counter is not running, so the deadline would never be reached.
    CounterStopped,
}

impl fmt::Display for TimerFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerFault::ZeroPeriod => write!(f, "base period is shorter than one hardware tick"),
            TimerFault::DeadlineOutOfRange => write!(f, "deadline out of comparator range"),
            TimerFault::CounterStopped => write!(f, "hardware counter is stopped"),
        }
    }
}

/// Errors surfaced by the scheduler.
///
/// Lifecycle calls on a valid slot never fail: misuse such as starting a
/// free slot is absorbed as a no-op. Only contract violations are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedError {
    /// Slot index beyond the table capacity.
    SlotOutOfRange {
        /// Offending index.
        index: usize,
        /// Number of slots in the table.
        capacity: usize,
    },
    /// The timer driver refused the first deadline.
    Timer(TimerFault),
    /// The kernel already owns a tick source.
    AlreadyInitialized,
}

impl fmt::Display for SchedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedError::SlotOutOfRange { index, capacity } => {
                write!(f, "slot {} out of range (capacity {})", index, capacity)
            }
            SchedError::Timer(fault) => write!(f, "tick timer fault: {}", fault),
            SchedError::AlreadyInitialized => write!(f, "scheduler already initialized"),
        }
    }
}

impl From<TimerFault> for SchedError {
    fn from(fault: TimerFault) -> Self {
        SchedError::Timer(fault)
    }
}
