//! Bankroll and session risk gate.
//!
//! - [`Gate`] — Order-dependent exposure tracking with a one-shot panic stop
//! - [`Limits`] — Bankroll and session thresholds (zero disables)
//! - [`Verdict`] — Approval or [`Rejection`] with a counter [`Snapshot`]
//! - [`Panic`] — The hand and action that breached the bankroll
mod gate;
mod limits;
mod verdict;

pub use gate::*;
pub use limits::*;
pub use verdict::*;
