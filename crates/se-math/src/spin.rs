//! Validated game and single-spin entry point

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardGenerator};
use crate::config::GameConfig;
use crate::error::SlotResult;
use crate::paytable::{EvaluationResult, LineWin, PayTable};
use crate::symbols::SymbolTable;

/// Complete spin result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinResult {
    /// Final board (reels × rows), symbol names
    pub board: Vec<Vec<String>>,
    /// Bet amount
    pub bet: f64,
    /// Total win
    pub total_win: f64,
    /// Win-to-bet ratio
    pub win_ratio: f64,
    /// Line wins, in payline order
    pub wins: Vec<LineWin>,
    /// Target RTP metadata from the config
    pub rtp: f64,
    /// House edge metadata from the config
    pub house_edge: f64,
}

impl SpinResult {
    /// Check if this is a win
    pub fn is_win(&self) -> bool {
        self.total_win > 0.0
    }
}

/// An immutable, pre-validated game. Build once, spin many times.
#[derive(Debug, Clone)]
pub struct SlotGame {
    config: GameConfig,
    symbols: SymbolTable,
    generator: BoardGenerator,
    paytable: PayTable,
}

impl SlotGame {
    /// Validate a config and prepare its sampler and paytable
    pub fn new(config: GameConfig) -> SlotResult<Self> {
        let config = config.folded();
        config.validate()?;

        let symbols = SymbolTable::from_config(&config);
        let generator = BoardGenerator::new(&config.symbol_weights, &symbols, config.grid)?;
        let paytable = PayTable::new(&config, &symbols)?;

        let info = &config.info;
        if (info.rtp + info.house_edge - 1.0).abs() > 1e-9 {
            log::warn!(
                "Game '{}': rtp {} and house edge {} do not sum to 1",
                info.game_id,
                info.rtp,
                info.house_edge
            );
        }
        log::debug!(
            "Game '{}' ready: {}x{} grid, {} symbols, {} paylines, wild '{}'",
            info.game_id,
            config.grid.reels,
            config.grid.rows,
            symbols.len(),
            paytable.line_count(),
            config.wild
        );

        Ok(Self {
            config,
            symbols,
            generator,
            paytable,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn generator(&self) -> &BoardGenerator {
        &self.generator
    }

    pub fn paytable(&self) -> &PayTable {
        &self.paytable
    }

    /// Check a bet against the game's limits
    pub fn validate_bet(&self, bet: f64) -> SlotResult<()> {
        Ok(self.config.validate_bet(bet)?)
    }

    /// Draw and evaluate one board. The bet is assumed already validated.
    pub fn play_round<R: Rng + ?Sized>(&self, bet: f64, rng: &mut R) -> (Board, EvaluationResult) {
        let board = self.generator.generate(rng);
        let eval = self.paytable.evaluate(&board, bet);
        (board, eval)
    }

    /// Execute a random spin
    pub fn spin<R: Rng + ?Sized>(&self, bet: f64, rng: &mut R) -> SlotResult<SpinResult> {
        self.validate_bet(bet)?;
        let (board, eval) = self.play_round(bet, rng);
        Ok(self.result(&board, bet, eval))
    }

    /// Evaluate a caller-supplied board (names, column-major). Consumes no randomness.
    pub fn spin_board(&self, board: &[Vec<String>], bet: f64) -> SlotResult<SpinResult> {
        self.validate_bet(bet)?;
        let board = Board::from_names(board, &self.symbols, self.config.grid)?;
        let eval = self.paytable.evaluate(&board, bet);
        Ok(self.result(&board, bet, eval))
    }

    fn result(&self, board: &Board, bet: f64, eval: EvaluationResult) -> SpinResult {
        SpinResult {
            board: board.to_names(&self.symbols),
            bet,
            total_win: eval.total_win,
            win_ratio: eval.win_ratio,
            wins: eval.line_wins,
            rtp: self.config.info.rtp,
            house_edge: self.config.info.house_edge,
        }
    }
}

/// Validate a config and spin it once
pub fn spin<R: Rng + ?Sized>(config: &GameConfig, bet: f64, rng: &mut R) -> SlotResult<SpinResult> {
    let game = SlotGame::new(config.clone())?;
    game.spin(bet, rng)
}
