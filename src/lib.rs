//! Per-hand decision loop for an automated poker agent.
//!
//! This facade crate re-exports all public tablepilot crates.
//!
//! ## Crate Organization
//!
//! ### Core Types
//! - [`core`] — Type aliases, constants, stable hashing
//! - [`state`] — Cards, positions, actions, and the [`state::GameState`] snapshot
//!
//! ### Signals
//! - [`fingerprint`] — Bucketed, versioned game-state keys
//! - [`cache`] — Content-addressed strategy cache
//!
//! ### Control
//! - [`budget`] — Per-stage millisecond budgets and latency metrics
//! - [`risk`] — Bankroll and session risk gate
//! - [`engine`] — Seeded blend, sample, and replay
//! - [`pilot`] — Async per-hand orchestration

pub use tp_budget       as budget;
pub use tp_cache        as cache;
pub use tp_core         as core;
pub use tp_engine       as engine;
pub use tp_fingerprint  as fingerprint;
pub use tp_pilot        as pilot;
pub use tp_risk         as risk;
pub use tp_state        as state;
