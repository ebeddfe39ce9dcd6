//! # Architecture Abstraction Layer
//!
//! Hardware ports of the tick source. Currently implements the Cortex-M4
//! SysTick port; extensible to other timers by adding sibling modules that
//! implement [`CompareTimer`](crate::tick::CompareTimer).

pub mod cortex_m4;
