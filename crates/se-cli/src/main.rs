//! Slot outcome engine CLI
//!
//! Usage:
//!   se spin --config game.json --bet 1
//!   se spin --board '[["A","A","A"],...]' --bet 2
//!   se simulate --config game.yaml --trials 100000 --bet 1 --seed 42
//!   se rtp --config game.json
//!   se default-config [--yaml]
//!
//! Without `--config` the built-in "Basic Slot" config is used.
//! Logging goes to stderr, controlled by `RUST_LOG`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use se_math::{GameConfig, SlotGame, line_expected_value, theoretical_rtp};
use se_sim::{DEFAULT_CHUNK_SIZE, SimulationOptions, SimulationRunner};

#[derive(Parser)]
#[command(name = "se", about = "Slot outcome engine: spins and batch simulation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Spin once and print the board and wins
    Spin {
        /// Game config (JSON or YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Bet amount
        #[arg(short, long, default_value_t = 1.0)]
        bet: f64,
        /// Seed for a reproducible board
        #[arg(short, long)]
        seed: Option<u64>,
        /// Evaluate this board (JSON, column-major) instead of drawing one
        #[arg(long, conflicts_with = "seed")]
        board: Option<String>,
    },
    /// Run a batch simulation and print aggregate stats
    Simulate {
        /// Game config (JSON or YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of spins
        #[arg(short, long, default_value_t = 1000)]
        trials: u64,
        /// Bet amount per spin
        #[arg(short, long, default_value_t = 1.0)]
        bet: f64,
        /// Base seed
        #[arg(short, long)]
        seed: Option<u64>,
        /// Worker threads (0 = all cores)
        #[arg(short, long, default_value_t = 0)]
        workers: usize,
        /// Spins per random stream
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: u64,
    },
    /// Print the analytic RTP of a config
    Rtp {
        /// Game config (JSON or YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the built-in default config
    DefaultConfig {
        /// Emit YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },
}

#[derive(Serialize)]
struct RtpReport {
    game_id: String,
    paylines: usize,
    line_expected_value: f64,
    theoretical_rtp: f64,
    target_rtp: f64,
    house_edge: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Spin {
            config,
            bet,
            seed,
            board,
        } => run_spin(config.as_deref(), bet, seed, board.as_deref()),
        Commands::Simulate {
            config,
            trials,
            bet,
            seed,
            workers,
            chunk_size,
        } => {
            let options = SimulationOptions {
                seed,
                workers,
                chunk_size,
            };
            run_simulate(config.as_deref(), trials, bet, options)
        }
        Commands::Rtp { config } => run_rtp(config.as_deref()),
        Commands::DefaultConfig { yaml } => print_default_config(yaml),
    }
}

fn load_game(path: Option<&Path>) -> Result<SlotGame> {
    let config = match path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };
    SlotGame::new(config).context("Invalid game config")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to encode output")?;
    println!("{}", json);
    Ok(())
}

fn run_spin(config: Option<&Path>, bet: f64, seed: Option<u64>, board: Option<&str>) -> Result<()> {
    let game = load_game(config)?;

    let result = match board {
        Some(board) => {
            let board: Vec<Vec<String>> =
                serde_json::from_str(board).context("Board must be a JSON array of reels")?;
            game.spin_board(&board, bet)?
        }
        None => {
            let mut rng = match seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed),
                None => ChaCha8Rng::from_os_rng(),
            };
            game.spin(bet, &mut rng)?
        }
    };

    log::debug!("Spin paid {} over {} lines", result.total_win, result.wins.len());
    print_json(&result)
}

fn run_simulate(
    config: Option<&Path>,
    trials: u64,
    bet: f64,
    options: SimulationOptions,
) -> Result<()> {
    let game = load_game(config)?;
    let report = SimulationRunner::new(game)
        .with_options(options)
        .run(trials, bet)
        .context("Simulation failed")?;
    print_json(&report)
}

fn run_rtp(config: Option<&Path>) -> Result<()> {
    let game = load_game(config)?;
    let info = &game.config().info;
    print_json(&RtpReport {
        game_id: info.game_id.clone(),
        paylines: game.paytable().line_count(),
        line_expected_value: line_expected_value(&game),
        theoretical_rtp: theoretical_rtp(&game),
        target_rtp: info.rtp,
        house_edge: info.house_edge,
    })
}

fn print_default_config(yaml: bool) -> Result<()> {
    let config = GameConfig::default();
    let text = if yaml {
        config.to_yaml()?
    } else {
        config.to_json_pretty()?
    };
    println!("{}", text);
    Ok(())
}
