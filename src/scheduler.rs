//! # Task Table
//!
//! Fixed-capacity slot table and the tick-advancement algorithm.
//!
//! ## Advancement
//!
//! On every tick, slots are visited in ascending index order. Each active and
//! running slot counts one tick; once its counter reaches the period the slot's
//! callback becomes due and the counter is reset to zero.
//!
//! Due callbacks are collected first and invoked afterwards, so the set of
//! slots firing on a tick is fixed before any callback runs. A callback that
//! starts, stops, creates, or deletes a slot affects the following ticks only.
//!
//! ## Control Plane
//!
//! `create`, `delete`, `start`, and `stop` reject out-of-range indices with
//! [`SchedError::SlotOutOfRange`]. Every other misuse (double create, starting
//! a free or zero-period slot) is absorbed as a no-op.

use heapless::Vec;

use crate::error::{SchedError, SchedResult};
use crate::task::{Slot, SlotState, Task};

/// Callbacks that became due on one tick, in ascending slot order.
pub type Due<'a, const N: usize> = Vec<&'a dyn Task, N>;

/// The slot table. Holds non-owning references to callbacks that outlive `'a`.
pub struct TaskTable<'a, const N: usize> {
    slots: [Slot<'a>; N],
}

impl<'a, const N: usize> TaskTable<'a, N> {
    /// Create a table with every slot free.
    pub const fn new() -> Self {
        Self {
            slots: [Slot::FREE; N],
        }
    }

    /// Number of slots.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    fn slot(&self, index: usize) -> SchedResult<&Slot<'a>> {
        self.slots.get(index).ok_or(SchedError::SlotOutOfRange {
            index,
            capacity: N,
        })
    }

    fn slot_mut(&mut self, index: usize) -> SchedResult<&mut Slot<'a>> {
        match self.slots.get_mut(index) {
            Some(slot) => Ok(slot),
            None => {
                warn!("rejected slot {} (capacity {})", index, N);
                Err(SchedError::SlotOutOfRange { index, capacity: N })
            }
        }
    }

    /// Register `callback` at `index`, stopped, with the given period in ticks.
    ///
    /// The first registration wins: on an occupied index this is a no-op and
    /// the existing callback, period, and running state are kept.
    pub fn create(&mut self, index: usize, callback: &'a dyn Task, period: u32) -> SchedResult<()> {
        let slot = self.slot_mut(index)?;
        if slot.active {
            trace!("create ignored: slot {} occupied", index);
            return Ok(());
        }

        slot.register(callback, period);
        debug!("slot {} created, period {}", index, period);
        Ok(())
    }

    /// Free the slot at `index`. No-op if it is already free.
    pub fn delete(&mut self, index: usize) -> SchedResult<()> {
        let slot = self.slot_mut(index)?;
        if !slot.active {
            trace!("delete ignored: slot {} free", index);
            return Ok(());
        }

        slot.clear();
        debug!("slot {} deleted", index);
        Ok(())
    }

    /// Clear the counter and let the slot take part in tick advancement.
    ///
    /// No-op on a free slot or a zero-period slot.
    pub fn start(&mut self, index: usize) -> SchedResult<()> {
        let slot = self.slot_mut(index)?;
        if !slot.is_controllable() {
            trace!("start ignored: slot {} not startable", index);
            return Ok(());
        }

        slot.elapsed = 0;
        slot.running = true;
        debug!("slot {} started", index);
        Ok(())
    }

    /// Clear the counter and remove the slot from tick advancement.
    ///
    /// Same no-op conditions as [`start`](Self::start).
    pub fn stop(&mut self, index: usize) -> SchedResult<()> {
        let slot = self.slot_mut(index)?;
        if !slot.is_controllable() {
            trace!("stop ignored: slot {} not stoppable", index);
            return Ok(());
        }

        slot.elapsed = 0;
        slot.running = false;
        debug!("slot {} stopped", index);
        Ok(())
    }

    pub fn state(&self, index: usize) -> SchedResult<SlotState> {
        self.slot(index).map(Slot::state)
    }

    /// Ticks counted since the slot last fired or was started/stopped.
    pub fn elapsed(&self, index: usize) -> SchedResult<u32> {
        self.slot(index).map(|slot| slot.elapsed)
    }

    /// Configured period of the slot; zero for a free slot.
    pub fn period(&self, index: usize) -> SchedResult<u32> {
        self.slot(index).map(|slot| slot.period)
    }

    /// Advance every running slot by one tick and return the callbacks that
    /// became due, without invoking them.
    pub fn collect_due(&mut self) -> Due<'a, N> {
        let mut due: Due<'a, N> = Vec::new();
        for slot in self.slots.iter_mut() {
            if let Some(callback) = slot.advance() {
                // At most one entry per slot, so the vector never overflows.
                let _ = due.push(callback);
            }
        }
        due
    }

    /// Advance one tick and invoke every due callback in ascending slot order.
    pub fn advance_tick(&mut self) {
        for callback in self.collect_due() {
            callback.run();
        }
    }
}

impl<'a, const N: usize> Default for TaskTable<'a, N> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CAPACITY;
    use core::sync::atomic::{AtomicU32, Ordering};

    fn noop() {}

    struct Counter(AtomicU32);

    impl Counter {
        const fn new() -> Self {
            Self(AtomicU32::new(0))
        }

        fn hits(&self) -> u32 {
            self.0.load(Ordering::Relaxed)
        }
    }

    impl Task for Counter {
        fn run(&self) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_fires_exactly_on_period() {
        for period in 1..=8u32 {
            let cb = Counter::new();
            let mut table: TaskTable<'_, 4> = TaskTable::new();
            table.create(2, &cb, period).unwrap();
            table.start(2).unwrap();

            for _ in 0..period - 1 {
                table.advance_tick();
            }
            assert_eq!(cb.hits(), 0, "period {} fired early", period);

            table.advance_tick();
            assert_eq!(cb.hits(), 1);
            assert_eq!(table.elapsed(2).unwrap(), 0);
        }
    }

    #[test]
    fn test_reference_scenario() {
        let cb_a = Counter::new();
        let mut table: TaskTable<'_, CAPACITY> = TaskTable::new();
        table.create(3, &cb_a, 5).unwrap();
        table.start(3).unwrap();

        for _ in 0..4 {
            table.advance_tick();
        }
        assert_eq!(cb_a.hits(), 0);

        table.advance_tick();
        assert_eq!(cb_a.hits(), 1);
        assert_eq!(table.elapsed(3).unwrap(), 0);

        for _ in 0..4 {
            table.advance_tick();
        }
        assert_eq!(cb_a.hits(), 1);
        table.advance_tick();
        assert_eq!(cb_a.hits(), 2);
    }

    #[test]
    fn test_period_one_fires_every_tick() {
        let cb_x = Counter::new();
        let mut table: TaskTable<'_, CAPACITY> = TaskTable::new();
        table.create(0, &cb_x, 1).unwrap();
        table.start(0).unwrap();

        for tick in 1..=20 {
            table.advance_tick();
            assert_eq!(cb_x.hits(), tick);
        }
    }

    #[test]
    fn test_create_is_first_registration_wins() {
        let first = Counter::new();
        let second = Counter::new();
        let mut table: TaskTable<'_, 4> = TaskTable::new();

        table.create(1, &first, 2).unwrap();
        table.start(1).unwrap();
        table.advance_tick();

        table.create(1, &second, 7).unwrap();
        assert_eq!(table.period(1).unwrap(), 2);
        assert_eq!(table.state(1).unwrap(), SlotState::Running);
        assert_eq!(table.elapsed(1).unwrap(), 1);

        table.advance_tick();
        assert_eq!(first.hits(), 1);
        assert_eq!(second.hits(), 0);
    }

    #[test]
    fn test_stop_silences_and_start_resumes_from_zero() {
        let cb = Counter::new();
        let mut table: TaskTable<'_, 4> = TaskTable::new();
        table.create(0, &cb, 3).unwrap();
        table.start(0).unwrap();
        table.advance_tick();
        table.advance_tick();
        assert_eq!(table.elapsed(0).unwrap(), 2);

        table.stop(0).unwrap();
        assert_eq!(table.state(0).unwrap(), SlotState::Stopped);
        for _ in 0..50 {
            table.advance_tick();
        }
        assert_eq!(cb.hits(), 0);

        table.start(0).unwrap();
        assert_eq!(table.elapsed(0).unwrap(), 0);
        table.advance_tick();
        table.advance_tick();
        assert_eq!(cb.hits(), 0);
        table.advance_tick();
        assert_eq!(cb.hits(), 1);
    }

    #[test]
    fn test_restart_resets_counter() {
        let cb = Counter::new();
        let mut table: TaskTable<'_, 2> = TaskTable::new();
        table.create(0, &cb, 4).unwrap();
        table.start(0).unwrap();
        table.advance_tick();
        table.advance_tick();

        table.start(0).unwrap();
        assert_eq!(table.elapsed(0).unwrap(), 0);
    }

    #[test]
    fn test_delete_then_create_is_fresh() {
        let old = Counter::new();
        let new = Counter::new();
        let mut table: TaskTable<'_, 4> = TaskTable::new();
        table.create(2, &old, 3).unwrap();
        table.start(2).unwrap();
        table.advance_tick();

        table.delete(2).unwrap();
        assert_eq!(table.state(2).unwrap(), SlotState::Free);
        assert_eq!(table.period(2).unwrap(), 0);

        table.create(2, &new, 2).unwrap();
        assert_eq!(table.state(2).unwrap(), SlotState::Stopped);
        assert_eq!(table.elapsed(2).unwrap(), 0);

        table.advance_tick();
        table.advance_tick();
        assert_eq!(new.hits(), 0);

        table.start(2).unwrap();
        table.advance_tick();
        table.advance_tick();
        assert_eq!(new.hits(), 1);
        assert_eq!(old.hits(), 0);
    }

    #[test]
    fn test_zero_period_cannot_start_or_stop() {
        let mut table: TaskTable<'_, 4> = TaskTable::new();
        table.create(0, &noop, 0).unwrap();
        assert_eq!(table.state(0).unwrap(), SlotState::Stopped);

        table.start(0).unwrap();
        assert_eq!(table.state(0).unwrap(), SlotState::Stopped);
        table.stop(0).unwrap();
        assert_eq!(table.state(0).unwrap(), SlotState::Stopped);
    }

    #[test]
    fn test_lifecycle_on_free_slot_is_noop() {
        let mut table: TaskTable<'_, 4> = TaskTable::new();
        table.start(3).unwrap();
        table.stop(3).unwrap();
        table.delete(3).unwrap();
        assert_eq!(table.state(3).unwrap(), SlotState::Free);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut table: TaskTable<'_, CAPACITY> = TaskTable::new();
        let expected = Err(SchedError::SlotOutOfRange {
            index: CAPACITY,
            capacity: CAPACITY,
        });

        assert_eq!(table.create(CAPACITY, &noop, 1), expected);
        assert_eq!(table.delete(CAPACITY), expected);
        assert_eq!(table.start(CAPACITY), expected);
        assert_eq!(table.stop(CAPACITY), expected);
        assert!(table.state(CAPACITY).is_err());
    }

    #[test]
    fn test_collect_due_ascending_order() {
        static ORDER: [AtomicU32; 3] = [AtomicU32::new(0), AtomicU32::new(0), AtomicU32::new(0)];
        static SEQ: AtomicU32 = AtomicU32::new(0);

        fn first() {
            ORDER[0].store(SEQ.fetch_add(1, Ordering::Relaxed), Ordering::Relaxed);
        }
        fn second() {
            ORDER[1].store(SEQ.fetch_add(1, Ordering::Relaxed), Ordering::Relaxed);
        }
        fn third() {
            ORDER[2].store(SEQ.fetch_add(1, Ordering::Relaxed), Ordering::Relaxed);
        }

        let mut table: TaskTable<'_, 8> = TaskTable::new();
        table.create(6, &third, 1).unwrap();
        table.create(1, &first, 1).unwrap();
        table.create(4, &second, 1).unwrap();
        for index in [1, 4, 6] {
            table.start(index).unwrap();
        }

        let due = table.collect_due();
        assert_eq!(due.len(), 3);
        for callback in due {
            callback.run();
        }

        assert_eq!(ORDER[0].load(Ordering::Relaxed), 0);
        assert_eq!(ORDER[1].load(Ordering::Relaxed), 1);
        assert_eq!(ORDER[2].load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_slots_count_independently() {
        let fast = Counter::new();
        let slow = Counter::new();
        let mut table: TaskTable<'_, CAPACITY> = TaskTable::new();
        table.create(0, &fast, 2).unwrap();
        table.create(14, &slow, 5).unwrap();
        table.start(0).unwrap();
        table.start(14).unwrap();

        for _ in 0..10 {
            table.advance_tick();
        }
        assert_eq!(fast.hits(), 5);
        assert_eq!(slow.hits(), 2);
    }
}
