//! Error types for slot math

use thiserror::Error;

/// A violated structural constraint in a game configuration or call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Symbol weight table is empty")]
    EmptyWeights,

    #[error("Symbol '{symbol}' has non-positive weight")]
    NonPositiveWeight { symbol: String },

    #[error("Total symbol weight overflows")]
    WeightOverflow,

    #[error("Symbol '{symbol}' has invalid pay value {value}")]
    NegativeValue { symbol: String, value: f64 },

    #[error("Invalid {name}: {value} (must be > 0)")]
    InvalidDimension { name: &'static str, value: usize },

    #[error("Invalid {name}: {value} (at most {max})")]
    DimensionTooLarge {
        name: &'static str,
        value: usize,
        max: usize,
    },

    #[error("Payline table is empty")]
    NoPaylines,

    #[error("Payline {index} has {actual} positions, expected {expected}")]
    PaylineLength {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Payline {payline} uses row {row} on reel {reel}, grid has {rows} rows")]
    RowOutOfRange {
        payline: usize,
        reel: usize,
        row: usize,
        rows: usize,
    },

    #[error("Wild symbol id is empty")]
    EmptyWild,

    #[error("Invalid trial count: {0} (must be > 0)")]
    InvalidTrialCount(u64),

    #[error("Invalid bet {bet} (must be > 0 and <= max bet {max_bet})")]
    InvalidBet { bet: f64, max_bet: f64 },

    #[error("Board is {actual_reels}×{actual_rows}, expected {reels}×{rows}")]
    BoardShape {
        reels: usize,
        rows: usize,
        actual_reels: usize,
        actual_rows: usize,
    },

    #[error("Unknown symbol '{symbol}' at reel {reel}, row {row}")]
    UnknownSymbol {
        symbol: String,
        reel: usize,
        row: usize,
    },
}

/// Slot math errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlotError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Config parse error: {0}")]
    Parse(String),
}

/// Result type for slot math operations
pub type SlotResult<T> = Result<T, SlotError>;
