//! Game state canonicalization into strategy cache keys.
//!
//! - [`Features`] — The bucketed feature tuple (stack, pot, texture, hole class, history, SPR)
//! - [`Texture`] — Board pairing, suitedness, and rank profile
//! - [`Class`] — Hole card class (`AA`, `AKs`, `T9o`)
//! - [`Fingerprint`] — Versioned hash of the feature tuple
mod class;
mod features;
mod fingerprint;
mod texture;

pub use class::*;
pub use features::*;
pub use fingerprint::*;
pub use texture::*;
