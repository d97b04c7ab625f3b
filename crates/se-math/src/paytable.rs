//! Paylines and win evaluation

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::{GameConfig, GridSpec};
use crate::error::{ConfigError, SlotResult};
use crate::symbols::{SymbolId, SymbolTable};

/// Shortest run that pays
pub const MIN_RUN: usize = 3;

/// A payline definition: one row index per reel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payline {
    /// Row positions for each reel (e.g., [0, 1, 2, 1, 0] for a "V" shape)
    pub positions: Vec<u8>,
}

impl Payline {
    pub fn new(positions: Vec<u8>) -> Self {
        Self { positions }
    }

    /// Create a straight line (same row across all reels)
    pub fn straight(row: u8, reel_count: u8) -> Self {
        Self {
            positions: vec![row; reel_count as usize],
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Check length and row bounds for the line at `index`
    pub fn validate(&self, index: usize, reels: usize, rows: usize) -> Result<(), ConfigError> {
        if self.positions.len() != reels {
            return Err(ConfigError::PaylineLength {
                index,
                expected: reels,
                actual: self.positions.len(),
            });
        }
        for (reel, &row) in self.positions.iter().enumerate() {
            if row as usize >= rows {
                return Err(ConfigError::RowOutOfRange {
                    payline: index,
                    reel,
                    row: row as usize,
                    rows,
                });
            }
        }
        Ok(())
    }
}

/// Default payline set for a 5×3 grid: three rows plus the two V shapes
pub fn standard_paylines() -> Vec<Payline> {
    vec![
        Payline::straight(0, 5), // Top
        Payline::straight(1, 5), // Middle
        Payline::straight(2, 5), // Bottom
        Payline::new(vec![0, 1, 2, 1, 0]),
        Payline::new(vec![2, 1, 0, 1, 2]),
    ]
}

/// A win result on a single payline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineWin {
    /// Payline index (position in the payline table)
    pub line_index: usize,
    /// Winning symbol
    pub symbol: String,
    /// Number of consecutive matching cells from reel 0
    pub run_length: usize,
    /// Win amount (bet × base value × (run − 2))
    pub win_amount: f64,
    /// Positions of the run (reel, row)
    pub positions: Vec<(usize, usize)>,
    /// Wild positions included in the run
    pub wild_positions: Vec<(usize, usize)>,
}

/// Validated payline table plus symbol values
#[derive(Debug, Clone)]
pub struct PayTable {
    /// Row per reel for each line
    paylines: Vec<Vec<usize>>,
    /// Base value indexed by symbol id
    values: Vec<f64>,
    symbols: SymbolTable,
    wild_id: SymbolId,
}

impl PayTable {
    /// Build from a config. Fails on any malformed payline.
    pub fn new(config: &GameConfig, symbols: &SymbolTable) -> Result<Self, ConfigError> {
        config.grid.validate()?;
        Self::from_parts(
            &config.paylines,
            &config.symbol_values,
            &config.wild,
            symbols,
            config.grid.reels as usize,
            config.grid.rows as usize,
        )
    }

    fn from_parts(
        lines: &[Payline],
        symbol_values: &BTreeMap<String, f64>,
        wild: &str,
        symbols: &SymbolTable,
        reels: usize,
        rows: usize,
    ) -> Result<Self, ConfigError> {
        if lines.is_empty() {
            return Err(ConfigError::NoPaylines);
        }

        let mut paylines = Vec::with_capacity(lines.len());
        for (index, line) in lines.iter().enumerate() {
            line.validate(index, reels, rows)?;
            paylines.push(line.positions.iter().map(|&r| r as usize).collect());
        }

        let mut values = vec![0.0; symbols.len()];
        for (name, &value) in symbol_values {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NegativeValue {
                    symbol: name.clone(),
                    value,
                });
            }
            if let Some(id) = symbols.id(name) {
                values[id as usize] = value;
            }
        }

        let wild_id = symbols.id(wild).ok_or(ConfigError::EmptyWild)?;

        Ok(Self {
            paylines,
            values,
            symbols: symbols.clone(),
            wild_id,
        })
    }

    pub fn line_count(&self) -> usize {
        self.paylines.len()
    }

    pub fn wild_id(&self) -> SymbolId {
        self.wild_id
    }

    /// Base value for a symbol (0 when it has none)
    pub fn value(&self, id: SymbolId) -> f64 {
        self.values.get(id as usize).copied().unwrap_or(0.0)
    }

    /// Evaluate every payline on a board
    pub fn evaluate(&self, board: &Board, bet: f64) -> EvaluationResult {
        let line_wins: Vec<LineWin> = self
            .paylines
            .iter()
            .enumerate()
            .filter_map(|(index, rows)| self.evaluate_line(board, index, rows, bet))
            .collect();

        let total_win: f64 = line_wins.iter().map(|w| w.win_amount).sum();

        EvaluationResult {
            line_wins,
            total_win,
            win_ratio: if bet > 0.0 { total_win / bet } else { 0.0 },
        }
    }

    fn evaluate_line(
        &self,
        board: &Board,
        line_index: usize,
        rows: &[usize],
        bet: f64,
    ) -> Option<LineWin> {
        let line: Vec<SymbolId> = rows
            .iter()
            .enumerate()
            .map(|(reel, &row)| board.symbol_at(reel, row))
            .collect::<Option<_>>()?;

        // Wild-led lines never pay
        let first = *line.first()?;
        if first == self.wild_id {
            return None;
        }

        let run_length = 1 + line[1..]
            .iter()
            .take_while(|&&s| s == first || s == self.wild_id)
            .count();

        if run_length < MIN_RUN {
            return None;
        }

        let multiplier = (run_length - 2) as f64;
        let win_amount = bet * self.value(first) * multiplier;

        let positions: Vec<(usize, usize)> = rows[..run_length]
            .iter()
            .enumerate()
            .map(|(reel, &row)| (reel, row))
            .collect();
        let wild_positions = positions
            .iter()
            .zip(&line)
            .filter(|(_, s)| **s == self.wild_id)
            .map(|(pos, _)| *pos)
            .collect();

        Some(LineWin {
            line_index,
            symbol: self.symbols.name(first).to_string(),
            run_length,
            win_amount,
            positions,
            wild_positions,
        })
    }
}

/// Evaluate a board of symbol names (column-major) against raw tables.
/// Board dimensions come from the board itself.
pub fn evaluate_board(
    board: &[Vec<String>],
    paylines: &[Payline],
    symbol_values: &BTreeMap<String, f64>,
    wild: &str,
    bet: f64,
) -> SlotResult<EvaluationResult> {
    if wild.is_empty() {
        return Err(ConfigError::EmptyWild.into());
    }
    let reels = board.len();
    let rows = board.first().map(Vec::len).unwrap_or(0);
    let too_large = |name, value| ConfigError::DimensionTooLarge {
        name,
        value,
        max: u8::MAX as usize,
    };
    let grid = GridSpec {
        reels: u8::try_from(reels).map_err(|_| too_large("reel count", reels))?,
        rows: u8::try_from(rows).map_err(|_| too_large("row count", rows))?,
    };
    grid.validate()?;

    let mut symbols = SymbolTable::default();
    for name in board.iter().flatten() {
        symbols.insert(name);
    }
    for name in symbol_values.keys() {
        symbols.insert(name);
    }
    symbols.insert(wild);

    let table = PayTable::from_parts(paylines, symbol_values, wild, &symbols, reels, rows)?;
    let board = Board::from_names(board, &symbols, grid)?;
    Ok(table.evaluate(&board, bet))
}

/// Result of evaluating a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Line wins, in payline order
    pub line_wins: Vec<LineWin>,
    /// Total win amount
    pub total_win: f64,
    /// Win-to-bet ratio
    pub win_ratio: f64,
}

impl EvaluationResult {
    /// Check if this is a winning spin
    pub fn is_win(&self) -> bool {
        self.total_win > 0.0
    }
}
