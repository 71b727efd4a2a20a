//! Tree Tapper: progression engine for an idle tree-tapping game.
//!
//! Players tap a tree for energy and coins, buy upgrades, claim quests,
//! gamble gems on two mini-games and prestige for permanent shards.
//! Rendering, audio and UI live outside this crate; they call into
//! [`engine::Engine`] and read [`state::GameState`].

pub mod catalog;
pub mod engine;
pub mod error;
pub mod formula;
pub mod gambling;
pub mod income;
pub mod lab;
pub mod logic;
pub mod offline;
pub mod quests;
pub mod rates;
pub mod save;
pub mod state;
pub mod time;

#[cfg(test)]
mod simulator;

pub use engine::{Engine, EngineConfig};
pub use error::{GambleError, SaveError};
pub use state::GameState;
