//! Command handler modules for the Ludo CLI.
//!
//! Each command is implemented in its own module file with a consistent pattern:
//!
//! - Public handler function: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Module-private helpers: Helper functions specific to that command
//! - Dependency injection: Output streams (`&mut dyn Write`) passed as parameters
//! - Error propagation: All errors propagated via `CliError` enum

pub mod cfg;
pub mod eval;
pub mod play;
pub mod replay;
pub mod rng;
pub mod sim;
pub mod stats;

pub use cfg::handle_cfg_command;
pub use eval::handle_eval_command;
pub use play::handle_play_command;
pub use replay::handle_replay_command;
pub use rng::handle_rng_command;
pub use sim::handle_sim_command;
pub use stats::handle_stats_command;
