//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};

use ludo_engine::player::Difficulty;

use crate::commands::rng::DEFAULT_ROLLS;
use crate::config::ConfigOverrides;

#[derive(Parser, Debug)]
#[command(
    name = "ludo",
    version,
    about = "Ludo rules engine command-line driver"
)]
pub struct LudoCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Flags shared by the commands that start games. Anything left unset falls
/// back to the environment, the config file, then the defaults.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct GameArgs {
    /// Number of players (2-4)
    #[arg(long, value_parser = clap::value_parser!(u8).range(2..=4))]
    pub players: Option<u8>,
    /// AI tier: easy, medium or hard
    #[arg(long, value_parser = parse_difficulty)]
    pub difficulty: Option<Difficulty>,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Abandon a game after this many rolls
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub turn_limit: Option<u32>,
}

impl From<GameArgs> for ConfigOverrides {
    fn from(args: GameArgs) -> Self {
        ConfigOverrides {
            players: args.players,
            difficulty: args.difficulty,
            seed: args.seed,
            turn_limit: args.turn_limit,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play against AI opponents (seat 0 is yours)
    Play {
        #[command(flatten)]
        game: GameArgs,
        /// Let the AI play every seat and print the game
        #[arg(long)]
        watch: bool,
    },
    /// Simulate computer-only games and record them as JSONL
    Sim {
        #[arg(long)]
        games: u32,
        #[arg(long)]
        output: Option<String>,
        #[command(flatten)]
        game: GameArgs,
    },
    /// Play two AI tiers against each other
    Eval {
        #[arg(long, value_parser = parse_difficulty)]
        ai_a: Difficulty,
        #[arg(long, value_parser = parse_difficulty)]
        ai_b: Difficulty,
        #[arg(long)]
        games: u32,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Re-simulate recorded games and check they match
    Replay {
        #[arg(long)]
        input: String,
        /// Print the moves of one game instead of verifying
        #[arg(long)]
        show: Option<String>,
    },
    /// Aggregate statistics from recorded games
    Stats {
        #[arg(long)]
        input: String,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
    /// Roll the seeded die and show its distribution
    Rng {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = DEFAULT_ROLLS)]
        rolls: u32,
    },
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    s.parse()
}
