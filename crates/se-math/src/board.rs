//! Board generation from a weighted symbol table

use std::collections::BTreeMap;

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::{Error as WeightError, WeightedIndex};
use serde::{Deserialize, Serialize};

use crate::config::GridSpec;
use crate::error::{ConfigError, SlotResult};
use crate::symbols::{SymbolId, SymbolTable};

/// A spun board, column-major (`grid[reel][row]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    grid: Vec<Vec<SymbolId>>,
}

impl Board {
    /// Wrap a column-major grid
    pub fn from_columns(grid: Vec<Vec<SymbolId>>) -> Self {
        Self { grid }
    }

    /// Map a grid of symbol names onto ids, checking its shape
    pub fn from_names(
        names: &[Vec<String>],
        symbols: &SymbolTable,
        grid: GridSpec,
    ) -> Result<Self, ConfigError> {
        let reels = grid.reels as usize;
        let rows = grid.rows as usize;
        let shape_error = || ConfigError::BoardShape {
            reels,
            rows,
            actual_reels: names.len(),
            actual_rows: names.first().map(Vec::len).unwrap_or(0),
        };

        if names.len() != reels {
            return Err(shape_error());
        }

        let mut columns = Vec::with_capacity(reels);
        for (reel, column) in names.iter().enumerate() {
            if column.len() != rows {
                return Err(ConfigError::BoardShape {
                    reels,
                    rows,
                    actual_reels: names.len(),
                    actual_rows: column.len(),
                });
            }
            let mut ids = Vec::with_capacity(rows);
            for (row, name) in column.iter().enumerate() {
                let id = symbols.id(name).ok_or_else(|| ConfigError::UnknownSymbol {
                    symbol: name.clone(),
                    reel,
                    row,
                })?;
                ids.push(id);
            }
            columns.push(ids);
        }

        Ok(Self { grid: columns })
    }

    pub fn reels(&self) -> usize {
        self.grid.len()
    }

    pub fn rows(&self) -> usize {
        self.grid.first().map(Vec::len).unwrap_or(0)
    }

    /// Symbol at (reel, row)
    pub fn symbol_at(&self, reel: usize, row: usize) -> Option<SymbolId> {
        self.grid.get(reel).and_then(|c| c.get(row)).copied()
    }

    pub fn columns(&self) -> &[Vec<SymbolId>] {
        &self.grid
    }

    /// Resolve ids to symbol names
    pub fn to_names(&self, symbols: &SymbolTable) -> Vec<Vec<String>> {
        self.grid
            .iter()
            .map(|column| column.iter().map(|&id| symbols.name(id).to_string()).collect())
            .collect()
    }
}

/// Draws boards cell by cell, each cell an independent weighted pick
#[derive(Debug, Clone)]
pub struct BoardGenerator {
    grid: GridSpec,
    /// Symbol id for each sampler index
    ids: Vec<SymbolId>,
    sampler: WeightedIndex<u64>,
}

impl BoardGenerator {
    /// Build a generator. Fails before touching any random source.
    pub fn new(
        weights: &BTreeMap<String, i64>,
        symbols: &SymbolTable,
        grid: GridSpec,
    ) -> Result<Self, ConfigError> {
        grid.validate()?;
        if weights.is_empty() {
            return Err(ConfigError::EmptyWeights);
        }

        let mut ids = Vec::with_capacity(weights.len());
        let mut positive = Vec::with_capacity(weights.len());
        for (name, &weight) in weights {
            let weight = u64::try_from(weight)
                .ok()
                .filter(|&w| w > 0)
                .ok_or_else(|| ConfigError::NonPositiveWeight {
                    symbol: name.clone(),
                })?;
            let id = symbols.id(name).ok_or_else(|| ConfigError::UnknownSymbol {
                symbol: name.clone(),
                reel: 0,
                row: 0,
            })?;
            ids.push(id);
            positive.push(weight);
        }

        let sampler = WeightedIndex::new(positive).map_err(|e| match e {
            WeightError::Overflow => ConfigError::WeightOverflow,
            _ => ConfigError::EmptyWeights,
        })?;

        Ok(Self { grid, ids, sampler })
    }

    pub fn grid(&self) -> GridSpec {
        self.grid
    }

    /// Generate one board
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Board {
        let reels = self.grid.reels as usize;
        let rows = self.grid.rows as usize;

        let mut grid = Vec::with_capacity(reels);
        for _ in 0..reels {
            let column = (0..rows)
                .map(|_| self.ids[self.sampler.sample(rng)])
                .collect();
            grid.push(column);
        }

        Board { grid }
    }
}

/// One-shot board draw straight from a weight table, returning symbol names
pub fn generate_board<R: Rng + ?Sized>(
    weights: &BTreeMap<String, i64>,
    reels: u8,
    rows: u8,
    rng: &mut R,
) -> SlotResult<Vec<Vec<String>>> {
    let mut symbols = SymbolTable::default();
    for name in weights.keys() {
        symbols.insert(name);
    }
    let generator = BoardGenerator::new(weights, &symbols, GridSpec { reels, rows })?;
    Ok(generator.generate(rng).to_names(&symbols))
}
