//! # se-math: slot outcome math
//!
//! Pure computation behind a line-pay slot: weighted board draws, payline
//! evaluation with wild substitution, and the analytic RTP of a config.
//!
//! ## Architecture
//!
//! ```text
//! GameConfig ──validate──> SlotGame
//!                              │
//!                              ├── BoardGenerator (weighted, i.i.d. cells)
//!                              └── PayTable (paylines, values, wild)
//!                                    │
//!                                    v
//!                              SpinResult
//! ```
//!
//! Randomness is always supplied by the caller as `&mut impl Rng`, so a
//! seeded generator reproduces a spin exactly.

pub mod board;
pub mod config;
pub mod error;
pub mod math;
pub mod paytable;
pub mod spin;
pub mod symbols;

pub use board::*;
pub use config::*;
pub use error::*;
pub use math::*;
pub use paytable::*;
pub use spin::*;
pub use symbols::*;
