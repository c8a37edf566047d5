//! Collaborators supplied by the host application.
//!
//! The session layer never decides who a connected user is or how money
//! moves. It only asks whether a player may act right now, and reports a
//! finished game exactly once.

use ludo_engine::player::{PlayerId, PlayerSpec};

/// Gate checked before every human roll and move.
pub trait PlayerAuthority: Send + Sync {
    fn can_act(&self, session_id: &str, player: PlayerId) -> bool;
}

/// Called once per session when a player wins.
pub trait Settlement: Send + Sync {
    fn settle(&self, session_id: &str, winner: PlayerId, players: &[PlayerSpec]);
}

/// Lets every player act.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl PlayerAuthority for AllowAll {
    fn can_act(&self, _session_id: &str, _player: PlayerId) -> bool {
        true
    }
}

/// Ignores game results.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSettlement;

impl Settlement for NoSettlement {
    fn settle(&self, _session_id: &str, _winner: PlayerId, _players: &[PlayerSpec]) {}
}
