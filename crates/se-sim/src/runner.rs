//! Chunked, parallel trial runner

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use se_math::{ConfigError, GameConfig, SlotGame, SlotResult, theoretical_rtp};

use crate::stats::{SimulationReport, SimulationStats};

/// Trials per random stream
pub const DEFAULT_CHUNK_SIZE: u64 = 4096;

/// Simulation options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationOptions {
    /// Base seed (None = draw one from the OS)
    pub seed: Option<u64>,
    /// Worker threads (0 = one per core)
    pub workers: usize,
    /// Trials per chunk; each chunk owns one random stream
    pub chunk_size: u64,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            seed: None,
            workers: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Runs many independent spins of one game and aggregates them.
///
/// Trials are cut into fixed-size chunks. Chunk `k` draws from its own
/// ChaCha stream `k` under the base seed, and chunk results are merged in
/// chunk order, so the report depends only on (seed, chunk size) and never on
/// the number of workers.
#[derive(Debug, Clone)]
pub struct SimulationRunner {
    game: SlotGame,
    options: SimulationOptions,
}

impl SimulationRunner {
    /// Create a runner for a validated game
    pub fn new(game: SlotGame) -> Self {
        Self {
            game,
            options: SimulationOptions::default(),
        }
    }

    /// Validate a config and create a runner for it
    pub fn with_config(config: GameConfig) -> SlotResult<Self> {
        Ok(Self::new(SlotGame::new(config)?))
    }

    pub fn with_options(mut self, options: SimulationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.options.seed = Some(seed);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.options.workers = workers;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.options.chunk_size = chunk_size.max(1);
        self
    }

    pub fn game(&self) -> &SlotGame {
        &self.game
    }

    pub fn options(&self) -> &SimulationOptions {
        &self.options
    }

    /// Random stream for chunk `chunk` under `seed`
    pub fn chunk_rng(seed: u64, chunk: u64) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(chunk);
        rng
    }

    /// Run `trials` spins and finalize the report
    pub fn run(&self, trials: u64, bet: f64) -> SlotResult<SimulationReport> {
        let (stats, seed) = self.run_stats(trials, bet)?;
        let info = &self.game.config().info;
        let report = SimulationReport::from_stats(
            &stats,
            info.rtp,
            info.house_edge,
            theoretical_rtp(&self.game),
            seed,
        );

        log::info!(
            "Simulation of '{}' done: {} spins, RTP {:.4} (theoretical {:.4}), hit frequency {:.4}",
            info.game_id,
            report.total_spins,
            report.actual_rtp,
            report.theoretical_rtp,
            report.hit_frequency
        );

        Ok(report)
    }

    /// Run `trials` spins, returning raw stats and the seed used.
    /// Validation happens before any random draw.
    pub fn run_stats(&self, trials: u64, bet: f64) -> SlotResult<(SimulationStats, u64)> {
        if trials == 0 {
            return Err(ConfigError::InvalidTrialCount(trials).into());
        }
        self.game.validate_bet(bet)?;

        let seed = self.options.seed.unwrap_or_else(rand::random);
        let chunk_size = self.options.chunk_size.max(1);
        let chunks = trials.div_ceil(chunk_size) as usize;
        let workers = match self.options.workers {
            0 => num_cpus::get(),
            n => n,
        };

        log::info!(
            "Simulating {} spins of '{}' at bet {} (seed {}, {} chunks, {} workers)",
            trials,
            self.game.config().info.game_id,
            bet,
            seed,
            chunks,
            workers
        );

        let run_chunk = |chunk: usize| {
            let start = chunk as u64 * chunk_size;
            let count = chunk_size.min(trials - start);
            self.run_chunk(seed, chunk as u64, count, bet)
        };

        let partials: Vec<SimulationStats> =
            match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
                Ok(pool) => pool.install(|| (0..chunks).into_par_iter().map(run_chunk).collect()),
                Err(e) => {
                    log::warn!("Thread pool unavailable ({}), running sequentially", e);
                    (0..chunks).map(run_chunk).collect()
                }
            };

        let stats = partials
            .iter()
            .fold(SimulationStats::new(), |acc, partial| acc.merged(partial));

        Ok((stats, seed))
    }

    fn run_chunk(&self, seed: u64, chunk: u64, trials: u64, bet: f64) -> SimulationStats {
        let mut rng = Self::chunk_rng(seed, chunk);
        let mut stats = SimulationStats::new();
        for _ in 0..trials {
            let (_, eval) = self.game.play_round(bet, &mut rng);
            stats.record(bet, eval.total_win);
        }
        stats
    }
}

/// Validate a config and simulate it
pub fn simulate(
    config: &GameConfig,
    trials: u64,
    bet: f64,
    seed: Option<u64>,
) -> SlotResult<SimulationReport> {
    let options = SimulationOptions {
        seed,
        ..SimulationOptions::default()
    };
    SimulationRunner::with_config(config.clone())?
        .with_options(options)
        .run(trials, bet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use se_math::SlotError;

    #[test]
    fn test_zero_trials_rejected() {
        let runner = SimulationRunner::with_config(GameConfig::default()).unwrap();
        assert_eq!(
            runner.run(0, 1.0),
            Err(SlotError::InvalidConfig(ConfigError::InvalidTrialCount(0)))
        );
    }

    #[test]
    fn test_bad_bet_rejected() {
        let runner = SimulationRunner::with_config(GameConfig::default()).unwrap();
        assert!(matches!(
            runner.run(10, -1.0),
            Err(SlotError::InvalidConfig(ConfigError::InvalidBet { .. }))
        ));
    }

    #[test]
    fn test_session_stats() {
        let runner = SimulationRunner::with_config(GameConfig::default())
            .unwrap()
            .with_seed(11111);
        let report = runner.run(100, 1.0).unwrap();

        assert_eq!(report.total_spins, 100);
        assert_eq!(report.total_bet, 100.0);
        assert_eq!(report.seed, 11111);
        assert!((0.0..=1.0).contains(&report.hit_frequency));
        assert!(report.min_win <= report.max_win);
    }

    #[test]
    fn test_partial_last_chunk() {
        let runner = SimulationRunner::with_config(GameConfig::default())
            .unwrap()
            .with_seed(5)
            .with_chunk_size(64);
        let (stats, _) = runner.run_stats(200, 1.0).unwrap();
        assert_eq!(stats.total_trials, 200);
    }

    #[test]
    fn test_chunk_streams_differ() {
        let mut a = SimulationRunner::chunk_rng(1, 0);
        let mut b = SimulationRunner::chunk_rng(1, 1);
        assert_ne!(a.random::<u64>(), b.random::<u64>());
    }
}
