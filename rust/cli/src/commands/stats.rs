//! Statistics aggregation command for recorded games.
//!
//! Reads `GameRecord` JSONL files (a single file or every `.jsonl` below a
//! directory) and reports game counts, wins per player, captures and average
//! game length.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use ludo_engine::logger::GameRecord;

use crate::error::CliError;
use crate::formatters::format_player;
use crate::io_utils::{collect_jsonl_files, read_text};
use crate::ui;

#[derive(Debug, Default)]
struct StatsState {
    games: u64,
    unfinished: u64,
    wins: BTreeMap<String, u64>,
    captures: u64,
    moves: u64,
    rolls: u64,
    skipped: u64,
    corrupted: u64,
}

impl StatsState {
    fn consume(&mut self, content: &str) {
        let has_trailing_nl = content.ends_with('\n');
        let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
        for (i, line) in lines.iter().enumerate() {
            let rec: GameRecord = match serde_json::from_str(line) {
                Ok(v) => v,
                Err(_) => {
                    // a cut-off last line is a write in progress, not corruption
                    if i == lines.len() - 1 && !has_trailing_nl {
                        self.skipped += 1;
                    } else {
                        self.corrupted += 1;
                    }
                    continue;
                }
            };

            self.games += 1;
            self.captures += rec.captures() as u64;
            self.moves += rec.moves.len() as u64;
            self.rolls += u64::from(rec.rolls);
            match rec.winner {
                Some(w) => *self.wins.entry(format_player(w)).or_default() += 1,
                None => self.unfinished += 1,
            }
        }
    }

    fn average(&self, total: u64) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            total as f64 / self.games as f64
        }
    }
}

/// Aggregates statistics from game record files.
///
/// # Arguments
///
/// * `input` - Path to a JSONL file or a directory containing record files
/// * `out` - Output stream for the JSON summary
/// * `err` - Output stream for error messages and warnings
///
/// # Returns
///
/// `Ok(())` when at least one record was read, otherwise an `Err` that maps
/// to exit code `2`.
pub fn handle_stats_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let path = Path::new(&input);
    let files = match collect_jsonl_files(path) {
        Ok(files) => files,
        Err(e) => {
            ui::write_error(err, &format!("Failed to read {}: {}", input, e))?;
            return Err(CliError::InvalidInput(format!(
                "Failed to read {}: {}",
                input, e
            )));
        }
    };

    let mut state = StatsState::default();
    for file in &files {
        match read_text(file) {
            Ok(content) => state.consume(&content),
            Err(_) => state.corrupted += 1,
        }
    }

    if state.corrupted > 0 {
        ui::write_error(
            err,
            &format!("Skipped {} corrupted record(s)", state.corrupted),
        )?;
    }
    if state.skipped > 0 {
        ui::write_error(
            err,
            &format!("Discarded {} incomplete final line(s)", state.skipped),
        )?;
    }
    if !path.is_dir() && state.games == 0 && (state.corrupted > 0 || state.skipped > 0) {
        ui::write_error(err, "Invalid record")?;
        return Err(CliError::InvalidInput("Invalid record".to_string()));
    }

    let summary = serde_json::json!({
        "games": state.games,
        "unfinished": state.unfinished,
        "wins": state.wins,
        "captures": state.captures,
        "avg_moves": state.average(state.moves),
        "avg_rolls": state.average(state.rolls),
    });
    let json_output = serde_json::to_string_pretty(&summary)
        .map_err(|e| CliError::InvalidInput(format!("Failed to serialize stats: {}", e)))?;
    writeln!(out, "{}", json_output)?;
    Ok(())
}
