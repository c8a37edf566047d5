use crate::events::{EventBus, ForfeitReason, GameEvent, PlayerInfo};
use crate::hooks::{AllowAll, NoSettlement, PlayerAuthority, Settlement};
use chrono::{SecondsFormat, Utc};
use ludo_ai::{create_ai, AIOpponent};
use ludo_engine::engine::{Engine, RollOutcome, RollTurn};
use ludo_engine::errors::GameError;
use ludo_engine::executor::ExecutionResult;
use ludo_engine::game::{GameState, TurnPhase};
use ludo_engine::logger::GameRecord;
use ludo_engine::player::{Difficulty, PlayerId, PlayerSpec};
use ludo_engine::rules::Move;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;

pub type SessionId = String;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Seats and seed for a new game. Without a seed one is drawn at random and
/// reported in [`GameEvent::GameStarted`] so the game can still be replayed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameConfig {
    pub players: Vec<PlayerSpec>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: vec![PlayerSpec::human(), PlayerSpec::ai(Difficulty::Medium)],
            seed: None,
        }
    }
}

/// One engine step taken by [`SessionManager::play_ai_turn`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnStep {
    Rolled(RollOutcome),
    Moved(ExecutionResult),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),
    #[error("Session expired: {0}")]
    Expired(SessionId),
    #[error("Player {player} is not allowed to act in session {session_id}")]
    Unauthorized {
        session_id: SessionId,
        player: PlayerId,
    },
    #[error("Session storage poisoned")]
    StoragePoisoned,
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Owns every running game. Each game sits behind its own mutex, so calls
/// into one game are serialised while independent games proceed in parallel.
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<GameSession>>>,
    event_bus: Arc<EventBus>,
    authority: Arc<dyn PlayerAuthority>,
    settlement: Arc<dyn Settlement>,
    session_ttl: Duration,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("sessions", &self.active_sessions().len())
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}

impl SessionManager {
    pub fn new(event_bus: Arc<EventBus>) -> Self {
        Self::with_ttl(event_bus, DEFAULT_SESSION_TTL)
    }

    pub fn with_ttl(event_bus: Arc<EventBus>, ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            event_bus,
            authority: Arc::new(AllowAll),
            settlement: Arc::new(NoSettlement),
            session_ttl: ttl,
        }
    }

    pub fn with_authority(mut self, authority: Arc<dyn PlayerAuthority>) -> Self {
        self.authority = authority;
        self
    }

    pub fn with_settlement(mut self, settlement: Arc<dyn Settlement>) -> Self {
        self.settlement = settlement;
        self
    }

    pub fn create_session(&self, config: GameConfig) -> Result<SessionId, SessionError> {
        let id = Uuid::new_v4().to_string();
        let seed = config.seed.unwrap_or_else(rand::random);

        tracing::info!(
            session_id = %id,
            players = config.players.len(),
            seed,
            "creating new game session"
        );

        let session = Arc::new(GameSession::new(id.clone(), config, seed)?);
        let players = session.player_info()?;
        {
            let mut guard = self
                .sessions
                .write()
                .map_err(|_| SessionError::StoragePoisoned)?;
            guard.insert(id.clone(), session);
        }

        self.event_bus.broadcast(
            &id,
            GameEvent::GameStarted {
                session_id: id.clone(),
                players,
                seed,
            },
        );
        Ok(id)
    }

    pub fn get_session(&self, id: &str) -> Result<Arc<GameSession>, SessionError> {
        let guard = self
            .sessions
            .read()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// Read-only snapshot of the game.
    pub fn state(&self, id: &str) -> Result<GameState, SessionError> {
        let session = self.live_session(id)?;
        let inner = session.lock()?;
        Ok(inner.engine.snapshot())
    }

    /// Rolls for a player through the session's seeded RNG.
    pub fn roll(&self, id: &str, player: PlayerId) -> Result<RollOutcome, SessionError> {
        let session = self.live_session(id)?;
        self.authorize(id, player)?;
        let mut inner = session.lock()?;
        let SessionInner { engine, rng, .. } = &mut *inner;
        let outcome = engine
            .roll(player, rng)
            .map_err(|err| self.report(id, err))?;
        self.publish_roll(id, &outcome);
        Ok(outcome)
    }

    pub fn choose_move(
        &self,
        id: &str,
        player: PlayerId,
        mv: Move,
    ) -> Result<ExecutionResult, SessionError> {
        let session = self.live_session(id)?;
        self.authorize(id, player)?;
        let mut inner = session.lock()?;
        let result = inner
            .engine
            .choose_move(player, mv)
            .map_err(|err| self.report(id, err))?;
        self.publish_move(id, &inner.engine, &result);
        self.settle_if_finished(&session, &mut inner);
        Ok(result)
    }

    /// Plays every consecutive AI turn: rolls, picks a move with the seat's
    /// tier and applies it, until a human seat must act or the game ends.
    /// Returns the steps taken, which is empty when a human is to play.
    pub fn play_ai_turn(&self, id: &str) -> Result<Vec<TurnStep>, SessionError> {
        let session = self.live_session(id)?;
        let mut inner = session.lock()?;
        let mut steps = Vec::new();

        loop {
            let SessionInner { engine, rng, .. } = &mut *inner;
            let (player, phase) = {
                let state = engine.state();
                (state.current_player(), state.phase())
            };
            let Some(ai) = session.ai_for(player) else {
                break;
            };

            let legal = match phase {
                TurnPhase::Finished => break,
                TurnPhase::AwaitingMoveChoice => engine.state().pending_moves().to_vec(),
                TurnPhase::WaitingForRoll => {
                    let outcome = engine
                        .roll(player, rng)
                        .map_err(|err| self.report(id, err))?;
                    self.publish_roll(id, &outcome);
                    let awaiting = outcome.turn == RollTurn::AwaitingMove;
                    let legal = outcome.legal_moves.clone();
                    steps.push(TurnStep::Rolled(outcome));
                    if !awaiting {
                        continue;
                    }
                    legal
                }
            };

            let Some(mv) = ai.select_move(engine.state(), player, &legal, rng) else {
                break;
            };
            tracing::debug!(
                session_id = %id,
                player,
                ai = ai.name(),
                piece = mv.piece,
                to = mv.resulting_distance,
                "ai selected move"
            );
            let result = engine
                .choose_move(player, mv)
                .map_err(|err| self.report(id, err))?;
            self.publish_move(id, engine, &result);
            steps.push(TurnStep::Moved(result));
        }

        self.settle_if_finished(&session, &mut inner);
        Ok(steps)
    }

    /// Game record for replay and audit, keyed by the session id.
    pub fn record(&self, id: &str) -> Result<GameRecord, SessionError> {
        let session = self.get_session(id)?;
        let inner = session.lock()?;
        let state = inner.engine.state();
        Ok(GameRecord {
            game_id: session.id.clone(),
            seed: Some(session.seed),
            players: session.config.players.clone(),
            moves: state.move_log().to_vec(),
            winner: state.winner(),
            rolls: state.rolls(),
            ts: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            meta: None,
        })
    }

    pub fn delete_session(&self, id: &str) -> Result<(), SessionError> {
        if self.remove_session(id, "terminated_by_request")? {
            Ok(())
        } else {
            Err(SessionError::NotFound(id.to_string()))
        }
    }

    /// Drops sessions idle for longer than the TTL and returns their ids.
    pub fn cleanup_expired(&self) -> Vec<SessionId> {
        let mut expired = Vec::new();
        {
            let mut guard = match self.sessions.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.retain(|id, session| {
                if session.is_expired(self.session_ttl) {
                    expired.push(id.clone());
                    false
                } else {
                    true
                }
            });
        }

        for id in &expired {
            tracing::info!(session_id = %id, "session expired");
            self.close_channel(id, "expired");
        }
        expired
    }

    pub fn active_sessions(&self) -> Vec<SessionId> {
        match self.sessions.read() {
            Ok(guard) => guard.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }

    fn live_session(&self, id: &str) -> Result<Arc<GameSession>, SessionError> {
        let session = self.get_session(id)?;
        if session.is_expired(self.session_ttl) {
            self.remove_session(id, "expired due to inactivity")?;
            return Err(SessionError::Expired(id.to_string()));
        }
        session.touch();
        Ok(session)
    }

    fn authorize(&self, id: &str, player: PlayerId) -> Result<(), SessionError> {
        if self.authority.can_act(id, player) {
            return Ok(());
        }
        tracing::warn!(session_id = %id, player, "player not authorized to act");
        Err(SessionError::Unauthorized {
            session_id: id.to_string(),
            player,
        })
    }

    fn report(&self, id: &str, err: GameError) -> SessionError {
        tracing::debug!(session_id = %id, error = %err, "rejected game action");
        self.event_bus.broadcast(
            &id.to_string(),
            GameEvent::Error {
                session_id: id.to_string(),
                message: err.to_string(),
            },
        );
        SessionError::Game(err)
    }

    fn publish_roll(&self, id: &str, outcome: &RollOutcome) {
        let session_id = id.to_string();
        self.event_bus.broadcast(
            &session_id,
            GameEvent::DiceRolled {
                session_id: session_id.clone(),
                player: outcome.player,
                die: outcome.die,
                legal_moves: outcome.legal_moves.clone(),
            },
        );
        let forfeit = match outcome.turn {
            RollTurn::AwaitingMove => None,
            RollTurn::NoLegalMoves { next } => Some((ForfeitReason::NoLegalMoves, next)),
            RollTurn::ThreeSixes { next } => Some((ForfeitReason::ThreeSixes, next)),
        };
        if let Some((reason, next_player)) = forfeit {
            self.event_bus.broadcast(
                &session_id,
                GameEvent::TurnForfeited {
                    session_id: session_id.clone(),
                    player: outcome.player,
                    reason,
                    next_player,
                },
            );
        }
    }

    fn publish_move(&self, id: &str, engine: &Engine, result: &ExecutionResult) {
        let session_id = id.to_string();
        self.event_bus.broadcast(
            &session_id,
            GameEvent::PieceMoved {
                session_id: session_id.clone(),
                player: result.player,
                piece: result.mv.piece,
                from: result.from,
                to: result.to,
                next_player: result.next_player,
            },
        );
        if let Some(captured) = result.captured() {
            self.event_bus.broadcast(
                &session_id,
                GameEvent::PieceCaptured {
                    session_id: session_id.clone(),
                    by: result.player,
                    captured,
                },
            );
        }
        if result.reached_home() {
            let finished_count = engine
                .state()
                .player(result.player)
                .map(|p| p.finished_count())
                .unwrap_or_default();
            self.event_bus.broadcast(
                &session_id,
                GameEvent::PieceFinished {
                    session_id: session_id.clone(),
                    player: result.player,
                    piece: result.mv.piece,
                    finished_count,
                },
            );
        }
        if let Some(winner) = result.winner() {
            self.event_bus.broadcast(
                &session_id,
                GameEvent::GameFinished {
                    session_id: session_id.clone(),
                    winner,
                },
            );
        }
    }

    fn settle_if_finished(&self, session: &GameSession, inner: &mut SessionInner) {
        if inner.settled {
            return;
        }
        if let Some(winner) = inner.engine.state().winner() {
            inner.settled = true;
            tracing::info!(
                session_id = %session.id,
                winner,
                rolls = inner.engine.state().rolls(),
                "game finished"
            );
            self.settlement
                .settle(&session.id, winner, &session.config.players);
        }
    }

    fn remove_session(&self, id: &str, reason: &str) -> Result<bool, SessionError> {
        let removed = match self.sessions.write() {
            Ok(mut guard) => guard.remove(id),
            Err(_) => return Err(SessionError::StoragePoisoned),
        };
        if removed.is_some() {
            tracing::info!(session_id = %id, reason, "session closed");
            self.close_channel(id, reason);
        }
        Ok(removed.is_some())
    }

    fn close_channel(&self, id: &str, reason: &str) {
        let session_id = id.to_string();
        self.event_bus.broadcast(
            &session_id,
            GameEvent::SessionClosed {
                session_id: session_id.clone(),
                reason: reason.to_string(),
            },
        );
        self.event_bus.drop_session(&session_id);
    }
}

pub struct GameSession {
    id: SessionId,
    config: GameConfig,
    seed: u64,
    ais: Vec<Option<Box<dyn AIOpponent>>>,
    inner: Mutex<SessionInner>,
    created_at: Instant,
    last_active: Mutex<Instant>,
}

struct SessionInner {
    engine: Engine,
    rng: ChaCha20Rng,
    settled: bool,
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("seed", &self.seed)
            .field("created_at", &self.created_at)
            .field(
                "ais",
                &self
                    .ais
                    .iter()
                    .map(|ai| ai.as_ref().map(|ai| ai.name()).unwrap_or("human"))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl GameSession {
    fn new(id: SessionId, config: GameConfig, seed: u64) -> Result<Self, SessionError> {
        let engine = Engine::new(&config.players)?;
        let ais = config
            .players
            .iter()
            .map(|spec| {
                spec.is_ai
                    .then(|| create_ai(spec.ai_difficulty.unwrap_or_default()))
            })
            .collect();
        let now = Instant::now();
        Ok(Self {
            id,
            config,
            seed,
            ais,
            inner: Mutex::new(SessionInner {
                engine,
                rng: ChaCha20Rng::seed_from_u64(seed),
                settled: false,
            }),
            created_at: now,
            last_active: Mutex::new(now),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn is_ai_player(&self, player: PlayerId) -> bool {
        self.ai_for(player).is_some()
    }

    fn ai_for(&self, player: PlayerId) -> Option<&dyn AIOpponent> {
        self.ais.get(player)?.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionInner>, SessionError> {
        self.inner.lock().map_err(|_| SessionError::StoragePoisoned)
    }

    fn player_info(&self) -> Result<Vec<PlayerInfo>, SessionError> {
        let inner = self.lock()?;
        Ok(inner
            .engine
            .state()
            .players()
            .iter()
            .map(|p| PlayerInfo {
                id: p.id(),
                seat: p.seat(),
                is_ai: p.is_ai(),
                difficulty: p.ai_difficulty(),
            })
            .collect())
    }

    fn touch(&self) {
        if let Ok(mut guard) = self.last_active.lock() {
            *guard = Instant::now();
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        match self.last_active.lock() {
            Ok(last) => last.elapsed() >= ttl,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
impl GameSession {
    fn force_last_active(&self, instant: Instant) {
        if let Ok(mut guard) = self.last_active.lock() {
            *guard = instant;
        }
    }
}
