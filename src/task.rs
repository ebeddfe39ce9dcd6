//! # Task Slots
//!
//! Defines the per-slot state of the task table and the callback capability
//! a slot invokes when its period elapses.
//!
//! ## Slot Lifecycle
//!
//! ```text
//!   ┌──────┐  create()  ┌─────────┐  start()  ┌─────────┐
//!   │ Free │ ─────────► │ Stopped │ ────────► │ Running │
//!   └──────┘            └─────────┘ ◄──────── └─────────┘
//!      ▲                     │        stop()       │
//!      │      delete()       │                     │
//!      └─────────────────────┴─────────────────────┘
//! ```
//!
//! There is no implicit transition: the tick path never creates or frees a
//! slot.
//!
//! Slots are private to the crate, so the lifecycle above is only reachable
//! through the task table:
//!
//! ```compile_fail
//! let mut slot = ticksched::task::Slot::FREE;
//! slot.running = true;
//! ```

// ---------------------------------------------------------------------------
// Callback capability
// ---------------------------------------------------------------------------

/// A zero-argument periodic job.
///
/// Implemented for every `Fn() + Sync`, so plain `fn()` items and closures
/// capturing shared state (atomics, `critical_section::Mutex`) both qualify.
/// Callbacks run in the tick interrupt and should return quickly.
pub trait Task: Sync {
    fn run(&self);
}

impl<F> Task for F
where
    F: Fn() + Sync,
{
    #[inline]
    fn run(&self) {
        self()
    }
}

// ---------------------------------------------------------------------------
// Slot state
// ---------------------------------------------------------------------------

/// Observable lifecycle state of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlotState {
    /// Unregistered; the index is available to `create`.
    Free,
    /// Registered but not taking part in tick advancement.
    Stopped,
    /// Registered and counting ticks.
    Running,
}

/// One entry of the task table.
///
/// Invariant: `running` implies `active`.
///
/// Only the task table mutates slots; outside code observes them through
/// [`SlotState`].
#[derive(Clone, Copy)]
pub(crate) struct Slot<'a> {
    /// Ticks since the last firing, start, or stop.
    pub(crate) elapsed: u32,
    /// Interval in ticks. A zero-period slot can never be started.
    pub(crate) period: u32,
    /// Non-owning reference to the job.
    pub(crate) callback: Option<&'a dyn Task>,
    /// Slot occupies its index.
    pub(crate) active: bool,
    /// Slot takes part in tick advancement.
    pub(crate) running: bool,
}

impl<'a> Slot<'a> {
    /// A free slot. Used to initialize the table.
    pub const FREE: Self = Self {
        elapsed: 0,
        period: 0,
        callback: None,
        active: false,
        running: false,
    };

    /// Register `callback` with the given period. Stopped, counter cleared.
    pub fn register(&mut self, callback: &'a dyn Task, period: u32) {
        self.elapsed = 0;
        self.period = period;
        self.callback = Some(callback);
        self.active = true;
        self.running = false;
    }

    /// Return the slot to the free state.
    pub fn clear(&mut self) {
        *self = Self::FREE;
    }

    /// Whether `start`/`stop` may act on this slot.
    #[inline]
    pub fn is_controllable(&self) -> bool {
        self.active && self.period > 0
    }

    #[inline]
    pub fn state(&self) -> SlotState {
        match (self.active, self.running) {
            (false, _) => SlotState::Free,
            (true, false) => SlotState::Stopped,
            (true, true) => SlotState::Running,
        }
    }

    /// Count one tick. Returns the callback if the period has elapsed, in
    /// which case the counter is already reset.
    ///
    /// Fires at most once per call: an overshoot of several periods is
    /// dropped, not queued.
    pub fn advance(&mut self) -> Option<&'a dyn Task> {
        if !self.active || !self.running {
            return None;
        }

        self.elapsed = self.elapsed.saturating_add(1);
        if self.elapsed >= self.period {
            self.elapsed = 0;
            return self.callback;
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------
