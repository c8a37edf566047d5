//! Replay command handler.
//!
//! Checks recorded games by playing them again: every record carries its seed
//! and player specs, so re-simulating it with its own roll count as the limit
//! must reproduce the recorded move log and winner exactly. Records with a
//! human seat cannot be regenerated and are skipped.
//!
//! With `--show <GAME_ID>` the move list of that one game is printed instead.

use std::io::Write;
use std::path::Path;

use ludo_engine::logger::GameRecord;

use crate::error::{BatchValidationError, CliError};
use crate::io_utils::read_text;
use crate::runner::play_ai_game;
use crate::ui;

/// Handle the replay command.
///
/// # Arguments
///
/// * `input` - Path to a JSONL file of game records
/// * `show` - Print the moves of this game id instead of verifying
/// * `out` - Output stream for the replay report
/// * `err` - Error stream for mismatches and warnings
///
/// # Returns
///
/// `Ok(())` when every replayable record matches, otherwise `Err`.
pub fn handle_replay_command(
    input: String,
    show: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let content = match read_text(Path::new(&input)) {
        Ok(s) => s,
        Err(e) => {
            ui::write_error(err, &format!("Failed to read {}: {}", input, e))?;
            return Err(CliError::InvalidInput(format!(
                "Failed to read {}: {}",
                input, e
            )));
        }
    };

    let mut records = Vec::new();
    let mut failures: Vec<BatchValidationError<String>> = Vec::new();
    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<GameRecord>(line) {
            Ok(rec) => records.push(rec),
            Err(e) => failures.push(BatchValidationError {
                item_context: format!("line {}", i + 1),
                message: format!("not a game record: {}", e),
            }),
        }
    }

    if let Some(game_id) = show {
        let Some(record) = records.iter().find(|r| r.game_id == game_id) else {
            ui::write_error(err, &format!("Game {} not found in {}", game_id, input))?;
            return Err(CliError::InvalidInput(format!("Game {} not found", game_id)));
        };
        return show_record(record, out);
    }

    let mut verified = 0usize;
    let mut skipped = 0usize;
    for record in &records {
        match verify_record(record) {
            Ok(true) => verified += 1,
            Ok(false) => skipped += 1,
            Err(failure) => failures.push(failure),
        }
    }

    for failure in &failures {
        ui::write_error(err, &failure.to_string())?;
    }
    if skipped > 0 {
        ui::display_warning(
            err,
            &format!("{} record(s) with human players or no seed skipped", skipped),
        )?;
    }
    writeln!(
        out,
        "Replayed: {} games, {} mismatches",
        verified,
        failures.len()
    )?;

    if failures.is_empty() {
        Ok(())
    } else {
        Err(CliError::InvalidInput(format!(
            "{} record(s) failed replay",
            failures.len()
        )))
    }
}

/// `Ok(false)` when the record cannot be regenerated.
fn verify_record(record: &GameRecord) -> Result<bool, BatchValidationError<String>> {
    let Some(seed) = record.seed else {
        return Ok(false);
    };
    if record.players.iter().any(|p| !p.is_ai) {
        return Ok(false);
    }
    let fail = |message: String| BatchValidationError {
        item_context: record.game_id.clone(),
        message,
    };

    let replayed = play_ai_game(&record.game_id, &record.players, seed, record.rolls)
        .map_err(|e| fail(e.to_string()))?;
    if replayed.moves.len() != record.moves.len() {
        return Err(fail(format!(
            "recorded {} moves, replay produced {}",
            record.moves.len(),
            replayed.moves.len()
        )));
    }
    if let Some((recorded, actual)) = record
        .moves
        .iter()
        .zip(&replayed.moves)
        .find(|(recorded, actual)| recorded != actual)
    {
        return Err(fail(format!(
            "move {} differs: recorded piece {} to {}, replay piece {} to {}",
            recorded.seq,
            recorded.piece,
            recorded.to_distance,
            actual.piece,
            actual.to_distance
        )));
    }
    if replayed.winner != record.winner {
        return Err(fail(format!(
            "winner differs: recorded {:?}, replay {:?}",
            record.winner, replayed.winner
        )));
    }
    Ok(true)
}

fn show_record(record: &GameRecord, out: &mut dyn Write) -> Result<(), CliError> {
    writeln!(
        out,
        "Game {} ({} players, seed {})",
        record.game_id,
        record.players.len(),
        record
            .seed
            .map_or_else(|| "unknown".to_string(), |s| s.to_string())
    )?;
    for m in &record.moves {
        let from = m
            .from_distance
            .map_or_else(|| "yard".to_string(), |d| d.to_string());
        write!(
            out,
            "{:>4}. P{} rolled {}: piece {} {} -> {}",
            m.seq + 1,
            m.player,
            m.die,
            m.piece,
            from,
            m.to_distance
        )?;
        if let Some(victim) = m.captured {
            write!(out, " captures P{} piece {}", victim.player, victim.piece)?;
        }
        writeln!(out)?;
    }
    match record.winner {
        Some(w) => writeln!(out, "Winner: P{} after {} rolls", w, record.rolls)?,
        None => writeln!(out, "Unfinished after {} rolls", record.rolls)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ludo_engine::player::{Difficulty, PlayerSpec};

    fn record() -> GameRecord {
        let specs = [PlayerSpec::ai(Difficulty::Easy); 2];
        play_ai_game("20250102-000001", &specs, 11, 300).unwrap()
    }

    #[test]
    fn untouched_record_verifies() {
        assert!(matches!(verify_record(&record()), Ok(true)));
    }

    #[test]
    fn tampered_winner_is_reported() {
        let mut rec = record();
        rec.winner = if rec.winner == Some(1) { Some(0) } else { Some(1) };
        let failure = verify_record(&rec).unwrap_err();
        assert_eq!(failure.item_context, "20250102-000001");
        assert!(failure.message.contains("winner differs"));
    }

    #[test]
    fn human_records_are_skipped() {
        let mut rec = record();
        rec.players[0] = PlayerSpec::human();
        assert!(matches!(verify_record(&rec), Ok(false)));
    }
}
