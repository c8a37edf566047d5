//! # ludo-engine: Race Board Game Rules Core
//!
//! A deterministic rules engine for a four-seat race game in the Ludo family.
//! Two to four players each bring four pieces from a yard around a shared
//! circular track and up a private home lane; the first player with every
//! piece home wins. The engine owns board geometry, move generation and
//! validation, move execution (captures, finishing) and the turn state
//! machine. It performs no I/O beyond the optional JSONL [`logger`], and all
//! randomness comes from an injected RNG so games replay exactly from a seed.
//!
//! ## Core Modules
//!
//! - [`board`] - Track layout, safe and star cells, distance-to-position projection
//! - [`dice`] - Validated die value and rolling with an injected RNG
//! - [`piece`] - Piece state and piece references
//! - [`player`] - Players, seats and AI difficulty tiers
//! - [`rules`] - Legal move generation, validation and move previews
//! - [`executor`] - Applying a validated move: captures, finishing, winning
//! - [`engine`] - Turn controller: roll, choose, bonus turns, three-six forfeit
//! - [`game`] - Game state, turn phases and the move log
//! - [`logger`] - MoveRecord / GameRecord serialization to JSONL
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use ludo_engine::engine::{initialize_game, RollTurn};
//! use ludo_engine::player::{Difficulty, PlayerSpec};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let mut engine = initialize_game(&[
//!     PlayerSpec::human(),
//!     PlayerSpec::ai(Difficulty::Hard),
//! ])
//! .unwrap();
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//!
//! let player = engine.state().current_player();
//! let outcome = engine.roll(player, &mut rng).unwrap();
//! if outcome.turn == RollTurn::AwaitingMove {
//!     let result = engine.choose_move(player, outcome.legal_moves[0]).unwrap();
//!     println!("moved to {:?}", result.to);
//! }
//! ```
//!
//! ## Board Geometry
//!
//! ```rust
//! use ludo_engine::board::{BoardGeometry, PiecePosition};
//!
//! let board = BoardGeometry::standard();
//! assert_eq!(board.entry_cell(1), 13);
//! assert_eq!(board.project(1, 5), PiecePosition::OnTrack(18));
//! assert_eq!(board.project(1, 52), PiecePosition::InHomeLane(1));
//! assert_eq!(board.project(1, board.total_path()), PiecePosition::Finished);
//! assert!(board.is_protected(21));
//! ```

pub mod board;
pub mod dice;
pub mod engine;
pub mod errors;
pub mod executor;
pub mod game;
pub mod logger;
pub mod piece;
pub mod player;
pub mod rules;
