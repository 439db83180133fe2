//! Table snapshot types consumed by the decision loop.
//!
//! Everything downstream of perception reads the same immutable
//! [`GameState`]; nothing in this crate knows about caching, budgets, or risk.
//!
//! ## Cards
//!
//! - [`Card`] — A single card as a `(Rank, Suit)` pair encoded in one byte
//! - [`Rank`], [`Suit`] — Card components with short-string parsing
//! - [`Hole`] — Hero's two private cards
//!
//! ## Table
//!
//! - [`Street`] — The four betting rounds
//! - [`Position`] — Named seat relative to the button
//! - [`Seat`] — Stack and optional hole cards at one position
//! - [`GameState`] — The full snapshot at hero's turn
//!
//! ## Actions
//!
//! - [`Kind`] — Action category (fold, check, call, bet, raise, shove, blind)
//! - [`Action`] — A concrete action with its chip amount
//! - [`Choice`] — A candidate action key, optionally sized, used in distributions
//! - [`Legal`] — One entry of the legal action set with its sizing bounds
//! - [`Distribution`] — Weighted choices from one source (cache, advisor, blend)
mod action;
mod card;
mod choice;
mod distribution;
mod kind;
mod legal;
mod position;
mod rank;
mod seat;
mod state;
mod street;
mod suit;

pub use action::*;
pub use card::*;
pub use choice::*;
pub use distribution::*;
pub use kind::*;
pub use legal::*;
pub use position::*;
pub use rank::*;
pub use seat::*;
pub use state::*;
pub use street::*;
pub use suit::*;
