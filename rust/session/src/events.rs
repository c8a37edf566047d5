use crate::session::SessionId;
use ludo_engine::board::{PiecePosition, Seat};
use ludo_engine::dice::DieValue;
use ludo_engine::piece::{PieceId, PieceRef};
use ludo_engine::player::{Difficulty, PlayerId};
use ludo_engine::rules::Move;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc;

// Holds every event of a complete four-player game.
const EVENT_CHANNEL_BUFFER: usize = 8192;

type Subscribers = HashMap<SessionId, Vec<(usize, mpsc::Sender<GameEvent>)>>;

/// Receiving end for one session's events. Dropping it unsubscribes.
pub struct EventSubscription {
    bus: EventBus,
    session_id: SessionId,
    subscriber_id: usize,
    receiver: mpsc::Receiver<GameEvent>,
}

impl EventSubscription {
    /// Waits for the next event; `None` once the session has closed.
    pub async fn next_event(&mut self) -> Option<GameEvent> {
        self.receiver.recv().await
    }

    /// Everything delivered so far, without waiting.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::iter::from_fn(|| self.receiver.try_recv().ok()).collect()
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus
            .retain(&self.session_id, |id| id != self.subscriber_id);
    }
}

/// Per-session fan-out of [`GameEvent`]s to any number of subscribers.
///
/// Hosts use these events to drive presentation (dice animation, capture
/// sounds, a finish banner) and to decide when to persist or sync state.
/// A subscriber whose queue is full or closed is dropped; the game never
/// waits on a slow listener.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    subscribers: Arc<RwLock<Subscribers>>,
    next_id: Arc<AtomicUsize>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, session_id: SessionId) -> EventSubscription {
        let (tx, receiver) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let subscriber_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(session_id.clone())
            .or_default()
            .push((subscriber_id, tx));
        tracing::info!(session_id = %session_id, subscriber_id, "subscribed to game events");

        EventSubscription {
            bus: self.clone(),
            session_id,
            subscriber_id,
            receiver,
        }
    }

    pub fn broadcast(&self, session_id: &SessionId, event: GameEvent) {
        tracing::debug!(session_id = %session_id, event_type = event.kind(), "broadcasting game event");

        let senders = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session_id)
            .cloned()
            .unwrap_or_default();

        let stale: Vec<usize> = senders
            .iter()
            .filter_map(|(id, tx)| match tx.try_send(event.clone()) {
                Ok(()) => None,
                Err(e) => {
                    tracing::warn!(
                        session_id = %session_id,
                        subscriber_id = id,
                        error = %e,
                        "dropping subscriber that cannot take events"
                    );
                    Some(*id)
                }
            })
            .collect();
        if !stale.is_empty() {
            self.retain(session_id, |id| !stale.contains(&id));
        }
    }

    /// Forgets every subscriber of a session; their receivers then close.
    pub fn drop_session(&self, session_id: &SessionId) {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session_id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }

    fn retain(&self, session_id: &SessionId, keep: impl Fn(usize) -> bool) {
        let mut guard = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(list) = guard.get_mut(session_id) {
            list.retain(|(id, _)| keep(*id));
            if list.is_empty() {
                guard.remove(session_id);
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForfeitReason {
    NoLegalMoves,
    ThreeSixes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    GameStarted {
        session_id: SessionId,
        players: Vec<PlayerInfo>,
        seed: u64,
    },
    DiceRolled {
        session_id: SessionId,
        player: PlayerId,
        die: DieValue,
        legal_moves: Vec<Move>,
    },
    TurnForfeited {
        session_id: SessionId,
        player: PlayerId,
        reason: ForfeitReason,
        next_player: PlayerId,
    },
    PieceMoved {
        session_id: SessionId,
        player: PlayerId,
        piece: PieceId,
        from: PiecePosition,
        to: PiecePosition,
        next_player: Option<PlayerId>,
    },
    PieceCaptured {
        session_id: SessionId,
        by: PlayerId,
        captured: PieceRef,
    },
    PieceFinished {
        session_id: SessionId,
        player: PlayerId,
        piece: PieceId,
        finished_count: u8,
    },
    GameFinished {
        session_id: SessionId,
        winner: PlayerId,
    },
    SessionClosed {
        session_id: SessionId,
        reason: String,
    },
    Error {
        session_id: SessionId,
        message: String,
    },
}

impl GameEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::GameStarted { .. } => "game_started",
            GameEvent::DiceRolled { .. } => "dice_rolled",
            GameEvent::TurnForfeited { .. } => "turn_forfeited",
            GameEvent::PieceMoved { .. } => "piece_moved",
            GameEvent::PieceCaptured { .. } => "piece_captured",
            GameEvent::PieceFinished { .. } => "piece_finished",
            GameEvent::GameFinished { .. } => "game_finished",
            GameEvent::SessionClosed { .. } => "session_closed",
            GameEvent::Error { .. } => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub seat: Seat,
    pub is_ai: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_event(session: &SessionId, message: &str) -> GameEvent {
        GameEvent::Error {
            session_id: session.clone(),
            message: message.into(),
        }
    }

    #[test]
    fn subscription_drop_unsubscribes() {
        let bus = EventBus::new();
        let session = "s".to_string();
        {
            let _sub = bus.subscribe(session.clone());
            assert_eq!(bus.subscriber_count(), 1);
        }
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn broadcast_reaches_all_subscribers() {
        let bus = EventBus::new();
        let session = "s".to_string();
        let mut sub1 = bus.subscribe(session.clone());
        let mut sub2 = bus.subscribe(session.clone());

        bus.broadcast(&session, error_event(&session, "ping"));

        let ev1 = sub1.drain().remove(0);
        let ev2 = sub2.drain().remove(0);
        assert!(matches!(ev1, GameEvent::Error { .. }));
        assert_eq!(ev1, ev2);
    }

    #[test]
    fn events_stay_within_their_session() {
        let bus = EventBus::new();
        let a = "a".to_string();
        let b = "b".to_string();
        let mut sub_a = bus.subscribe(a.clone());
        let mut sub_b = bus.subscribe(b.clone());

        bus.broadcast(&a, error_event(&a, "only a"));

        assert_eq!(sub_a.drain().len(), 1);
        assert!(sub_b.drain().is_empty());
    }

    #[test]
    fn full_queue_drops_the_subscriber() {
        let bus = EventBus::new();
        let session = "s".to_string();
        let mut slow = bus.subscribe(session.clone());
        for i in 0..=EVENT_CHANNEL_BUFFER {
            bus.broadcast(&session, error_event(&session, &i.to_string()));
        }
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(slow.drain().len(), EVENT_CHANNEL_BUFFER);
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let event = GameEvent::GameFinished {
            session_id: "s".into(),
            winner: 2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "game_finished");
        assert_eq!(json["winner"], 2);
    }
}
