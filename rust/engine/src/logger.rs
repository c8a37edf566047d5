use serde::{Deserialize, Serialize};

use crate::board::Distance;
use crate::dice::DieValue;
use crate::piece::{PieceId, PieceRef};
use crate::player::{PlayerId, PlayerSpec};

/// One executed move, appended to the game's move log by the executor.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Position in the move log (0-based)
    pub seq: u32,
    /// Player who moved
    pub player: PlayerId,
    /// Die value the move was made with
    pub die: DieValue,
    /// Piece that moved
    pub piece: PieceId,
    /// Distance before the move; `None` when the piece left the yard
    pub from_distance: Option<Distance>,
    /// Distance after the move
    pub to_distance: Distance,
    /// Opponent piece sent back to its yard
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured: Option<PieceRef>,
}

/// Complete record of a game: who played, every executed move and the outcome.
/// Serialized to JSONL format for game history storage and replay.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Unique identifier for this game (format: YYYYMMDD-NNNNNN)
    pub game_id: String,
    /// RNG seed the game was played with (enables deterministic replay)
    pub seed: Option<u64>,
    /// Seat controllers in turn order
    pub players: Vec<PlayerSpec>,
    /// Chronological list of executed moves
    pub moves: Vec<MoveRecord>,
    /// Winning player, `None` if the game was cut off
    pub winner: Option<PlayerId>,
    /// Number of dice rolls taken
    pub rolls: u32,
    /// Timestamp when the game was played (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
    /// Additional metadata (extensible JSON object)
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

impl GameRecord {
    pub fn captures(&self) -> usize {
        self.moves.iter().filter(|m| m.captured.is_some()).count()
    }
}

pub fn format_game_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct GameLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl GameLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    pub fn with_seq_for_test(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_game_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &GameRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
