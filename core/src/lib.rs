//! susfarm-core — the SusFarm simulation layer.
//!
//! A deterministic tick engine for an idle farming game: timed crop
//! growth, a randomized market, consumable goods with metabolic side
//! effects, stacking buffs, and pressure-driven anomalies. One logical
//! tick is 60 simulated seconds; a returning player's missed ticks are
//! replayed synchronously, capped at 24 hours.
//!
//! The UI layer is an external collaborator: it drives [`engine::FarmEngine`]
//! once per real minute, calls the boolean-returning operations, and
//! renders the read-only state snapshot.

pub mod anomaly;
pub mod atmosphere;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod event;
pub mod market;
pub mod metabolism;
pub mod plots;
pub mod rng;
pub mod state;
pub mod store;
pub mod types;
pub mod wallet;

pub use engine::FarmEngine;
pub use error::{FarmError, FarmResult};
pub use state::FarmState;
