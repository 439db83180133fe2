//! Per-hand orchestration around the decision engine.
//!
//! - [`Pilot`] — Budgets, cache lookup, parallel advisory queries, gated decision
//! - [`Config`] — JSON configuration with environment overrides
//! - [`Oracle`] — Async seam for external advisory services
//! - [`Canned`] — Oracle answering with a fixed payload
//! - [`Advice`] — Validated advisory outcome: opinion, rejection, timeout, failure
mod advice;
mod config;
mod oracle;
mod pilot;

pub use advice::*;
pub use config::*;
pub use oracle::*;
pub use pilot::*;
