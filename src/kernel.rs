//! # Kernel
//!
//! Binds a [`TickSource`] to a [`TaskTable`] and exposes the interrupt-safe
//! control plane.
//!
//! A `Kernel` is an ordinary value: the platform port keeps one in a `static`
//! and calls [`Kernel::on_tick`] from its timer interrupt, while application
//! code calls `create`/`delete`/`start`/`stop` from normal context. Tests
//! build as many independent instances as they need.
//!
//! ## Startup Sequence
//!
//! ```text
//! main()
//!   ├─► Kernel::init(timer, BASE_PERIOD_MS) ← Compute period, arm first deadline
//!   ├─► Kernel::create() / start()          ← Register tasks (×N)
//!   └─► enable the tick interrupt           ← Platform installs the handler first
//! ```
//!
//! ## Tick Handling
//!
//! Inside one critical section the handler re-arms the comparator, counts the
//! tick, and collects the due callbacks. The critical section is released
//! before the callbacks run, so callbacks may use the control plane; their
//! changes apply from the next tick on.

use crate::error::{SchedError, SchedResult};
use crate::scheduler::TaskTable;
use crate::sync::Shared;
use crate::task::{SlotState, Task};
use crate::tick::{CompareTimer, TickSource};

struct TickState<T> {
    source: Option<TickSource<T>>,
    ticks: u32,
}

/// Scheduler instance: one tick source and one task table of `N` slots.
pub struct Kernel<T, const N: usize> {
    tick: Shared<TickState<T>>,
    table: Shared<TaskTable<'static, N>>,
}

impl<T: CompareTimer, const N: usize> Kernel<T, N> {
    pub const fn new() -> Self {
        Self {
            tick: Shared::new(TickState {
                source: None,
                ticks: 0,
            }),
            table: Shared::new(TaskTable::new()),
        }
    }

    /// Take ownership of the timer and arm the first deadline.
    ///
    /// Must be called once, before the tick interrupt is enabled.
    pub fn init(&self, timer: T, base_period_ms: u32) -> SchedResult<()> {
        self.tick.lock(|state| {
            if state.source.is_some() {
                return Err(SchedError::AlreadyInitialized);
            }

            let source = TickSource::initialize(timer, base_period_ms)?;
            info!(
                "tick source armed: {} ms = {} hw ticks",
                base_period_ms,
                source.period_ticks()
            );
            state.source = Some(source);
            state.ticks = 0;
            Ok(())
        })
    }

    /// Tick interrupt entry point.
    ///
    /// # Panics
    /// If no tick source is installed, or if re-arming the comparator fails.
    pub fn on_tick(&self) {
        let due = self.tick.lock(|state| {
            match state.source.as_mut() {
                Some(source) => source.rearm(),
                None => panic!("tick delivered before kernel init"),
            };
            state.ticks = state.ticks.wrapping_add(1);
            self.table.lock(|table| table.collect_due())
        });

        for callback in due {
            callback.run();
        }
    }

    /// See [`TaskTable::create`].
    pub fn create(&self, index: usize, callback: &'static dyn Task, period: u32) -> SchedResult<()> {
        self.table.lock(|table| table.create(index, callback, period))
    }

    /// See [`TaskTable::delete`].
    pub fn delete(&self, index: usize) -> SchedResult<()> {
        self.table.lock(|table| table.delete(index))
    }

    /// See [`TaskTable::start`].
    pub fn start(&self, index: usize) -> SchedResult<()> {
        self.table.lock(|table| table.start(index))
    }

    /// See [`TaskTable::stop`].
    pub fn stop(&self, index: usize) -> SchedResult<()> {
        self.table.lock(|table| table.stop(index))
    }

    pub fn state(&self, index: usize) -> SchedResult<SlotState> {
        self.table.lock(|table| table.state(index))
    }

    pub fn elapsed(&self, index: usize) -> SchedResult<u32> {
        self.table.lock(|table| table.elapsed(index))
    }

    /// Ticks delivered since `init`, wrapping.
    pub fn ticks(&self) -> u32 {
        self.tick.lock(|state| state.ticks)
    }

    /// Programmed compare deadline, or `None` before `init`.
    pub fn deadline(&self) -> Option<u32> {
        self.tick
            .lock(|state| state.source.as_ref().map(TickSource::deadline))
    }
}

impl<T: CompareTimer, const N: usize> Default for Kernel<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------
