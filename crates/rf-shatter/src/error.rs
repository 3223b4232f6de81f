//! Error types for the shatter slot engine

use thiserror::Error;

/// Slot engine errors
#[derive(Debug, Error)]
pub enum SlotError {
    /// Bet rejected: not a positive number or larger than the balance
    #[error("Invalid bet: {value} (balance {balance})")]
    InvalidBet { value: f64, balance: f64 },

    /// Autospin start requested while a run is active
    #[error("Autospin already running")]
    AlreadyRunning,

    /// Speed change requested while a run is active
    #[error("Cannot change speed while autospin is running")]
    SpeedLocked,

    /// Autospin count must be positive
    #[error("Invalid autospin count: {0}")]
    InvalidAutospinCount(u32),

    /// Symbol id not present in the catalog
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(String),
}

/// Result type for slot engine operations
pub type SlotResult<T> = Result<T, SlotError>;
