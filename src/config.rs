//! # Scheduler Configuration
//!
//! Compile-time constants governing the tick source and the task table.
//! All limits are fixed at compile time — no dynamic allocation.

/// Number of task slots in the system task table.
///
/// Slot indices are assigned by the caller and must lie in `0..CAPACITY`.
pub const CAPACITY: usize = 15;

/// Base tick period in milliseconds. Every slot period is expressed as a
/// multiple of this value.
pub const BASE_PERIOD_MS: u32 = 1;

/// Core clock feeding the tick hardware, in Hz (STM32F4 16 MHz HSI).
pub const SYSTEM_CLOCK_HZ: u32 = 16_000_000;

/// NVIC priority of the tick exception. Only the upper bits are implemented
/// on Cortex-M4 (4 priority bits), so keep the value a multiple of 0x10.
pub const TICK_PRIORITY: u8 = 0x40;
