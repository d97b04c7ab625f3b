//! # se-sim: batch spin simulator
//!
//! Drives `se_math::SlotGame` across many independent trials and reports
//! RTP, hit frequency and win extremes.
//!
//! ```text
//! SimulationRunner
//!     ├── chunk 0 ── ChaCha stream 0 ──> SimulationStats ─┐
//!     ├── chunk 1 ── ChaCha stream 1 ──> SimulationStats ─┼─ merge ──> SimulationReport
//!     └── chunk N ── ChaCha stream N ──> SimulationStats ─┘
//! ```

pub mod runner;
pub mod stats;

pub use runner::*;
pub use stats::*;
