//! Content-addressed strategy cache.
//!
//! A cache root holds `manifest.json` plus one directory per supported
//! street, each containing zstd-compressed JSON strategy records named by
//! fingerprint.
//!
//! ## Disk Format
//!
//! - [`Manifest`] — Format version, fingerprint algorithm, compression, streets
//! - [`StrategyRecord`] — Solved action frequencies for one fingerprint
//! - [`Stored`] — One stored action with its [`Stats`]
//!
//! ## Index
//!
//! - [`Loader`] — Reads a root into a [`Strategies`] index, failing soft
//! - [`Strategies`] — Exact and approximate lookup by game state
//! - [`Entry`] — A loaded record with its street and source file
//! - [`Hit`] — A lookup result tagged with its [`Match`] kind
mod entry;
mod manifest;
mod record;
mod strategies;

pub use entry::*;
pub use manifest::*;
pub use record::*;
pub use strategies::*;
