//! Millisecond budget bookkeeping for one decision.
//!
//! - [`Stage`] — Named pipeline steps (perception, solver, advisory, decision)
//! - [`Scheduler`] — Allocations, reservations, overrun spill, and preemption advice
//! - [`Settings`] — Per-hand defaults the scheduler resets to
//! - [`Clock`] — Hard deadline over the whole hand
//! - [`Window`] / [`Metrics`] — Rolling latency percentiles per stage
mod clock;
mod metrics;
mod scheduler;
mod stage;

pub use clock::*;
pub use metrics::*;
pub use scheduler::*;
pub use stage::*;
