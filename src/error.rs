//! Error types for persistence and gambling configuration.
//!
//! Gameplay rejections (not enough coins, already owned, ...) are not
//! errors; those operations return `bool` and leave the state untouched.

use thiserror::Error;

/// Failure while snapshotting or restoring a game.
#[derive(Debug, Error)]
pub enum SaveError {
    /// JSON could not be produced or parsed.
    #[error("save data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The key-value backend refused the read or write.
    #[error("storage backend failed: {0}")]
    Storage(String),

    /// Save written by a format this build no longer reads.
    #[error("save version {saved} is older than the minimum compatible version {min_compatible}")]
    IncompatibleVersion {
        /// Version found in the snapshot.
        saved: u32,
        /// Oldest version this build accepts.
        min_compatible: u32,
    },
}

/// A prize table that cannot be drawn from.
#[derive(Debug, Error, PartialEq)]
pub enum GambleError {
    #[error("prize table has no entries")]
    EmptyTable,

    #[error("entry {index} has invalid weight {weight}")]
    InvalidWeight { index: usize, weight: f64 },

    #[error("prize table total weight is zero")]
    ZeroTotalWeight,
}
