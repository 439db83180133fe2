//! Decision engine: blend, sample, gate.
//!
//! ## Signals
//!
//! - [`CacheSignal`] — A cache hit detached from the index
//! - [`Opinion`] — One validated advisory distribution with its confidence
//! - [`Projection`] — A distribution restricted to the legal action set
//! - [`Blend`] — Cache weight, divergence threshold, and [`Consensus`] rule
//!
//! ## Decisions
//!
//! - [`Engine`] — Seeded blend-sample-gate over one [`Request`]
//! - [`Decision`] — Final action, legal entry, and gate verdict
//! - [`Metadata`] — Audit trail with [`Fallback`] and [`Forced`] reasons
//! - [`HandRecord`] — Persisted inputs and metadata, re-run by [`replay`]
//!
//! ## Seeds
//!
//! - [`derive_seed`] — `fnv1a32(hand_id:session_id)`
//! - [`sub_seed`] — Child seeds for auxiliary draws
mod blend;
mod engine;
mod metadata;
mod opinion;
mod projection;
mod record;
mod seed;
mod signal;

pub use blend::*;
pub use engine::*;
pub use metadata::*;
pub use opinion::*;
pub use projection::*;
pub use record::*;
pub use seed::*;
pub use signal::*;
