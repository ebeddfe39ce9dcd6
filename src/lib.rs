//! # ticksched — Tick-Driven Cooperative Scheduler
//!
//! A fixed-capacity periodic task scheduler for ARM Cortex-M
//! microcontrollers. A hardware timer fires once per base period (1 ms) and
//! the tick handler runs every task whose interval has elapsed, directly on
//! the interrupt stack.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                 Application Callbacks                   │
//! ├────────────────────────────────────────────────────────┤
//! │                 Kernel API (kernel.rs)                  │
//! │     init() · create() · delete() · start() · stop()    │
//! ├──────────────┬────────────────────┬───────────────────┤
//! │  Task Table  │   Tick Source      │  Sync Primitives  │
//! │  scheduler.rs│   tick.rs          │  sync.rs          │
//! │  ─ collect() │   ─ initialize()   │  ─ Shared<T>      │
//! │  ─ advance() │   ─ rearm()        │                   │
//! ├──────────────┴────────────────────┴───────────────────┤
//! │              Slot Model (task.rs)                       │
//! │         Slot · SlotState · Task capability              │
//! ├────────────────────────────────────────────────────────┤
//! │            Arch Port (arch/cortex_m4.rs)                │
//! │          SysTick compare timer · tick handler          │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Timing Model
//!
//! - Each deadline is the previous deadline plus one period, so handler
//!   latency never accumulates into phase drift.
//! - A slot with period `p` fires on every `p`-th tick after it is started.
//! - A slot fires at most once per tick; missed periods are dropped.
//!
//! ## Memory Model
//!
//! - **No heap**: All state is statically allocated
//! - **No `alloc`**: Pure `core` only
//! - **Fixed-size slot array**: `[Slot; N]`, `N = CAPACITY` on target
//! - **Critical sections**: `critical_section::with()` for shared state

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod config;
pub mod error;
pub mod task;
pub mod scheduler;
pub mod tick;
pub mod kernel;
pub mod sync;

#[cfg(all(target_arch = "arm", target_os = "none"))]
pub mod arch;

pub use error::{SchedError, SchedResult, TimerFault};
pub use kernel::Kernel;
pub use scheduler::TaskTable;
pub use task::{SlotState, Task};
pub use tick::{CompareTimer, TickSource};
