//! # ludo-session: Host Session Layer
//!
//! Runs many independent games on top of `ludo-engine` and `ludo-ai`. Each
//! game lives in a [`GameSession`] behind its own lock with a seeded RNG; the
//! [`SessionManager`] drives rolls, human and AI moves, emits [`GameEvent`]s
//! for presentation, consults the host's [`PlayerAuthority`] before every
//! human action and calls its [`Settlement`] once when a game is won.
//!
//! ```rust
//! use std::sync::Arc;
//! use ludo_session::{EventBus, GameConfig, SessionManager, TurnStep};
//! use ludo_engine::player::{Difficulty, PlayerSpec};
//!
//! let manager = SessionManager::new(Arc::new(EventBus::new()));
//! let id = manager
//!     .create_session(GameConfig {
//!         players: vec![PlayerSpec::ai(Difficulty::Easy), PlayerSpec::ai(Difficulty::Hard)],
//!         seed: Some(7),
//!     })
//!     .unwrap();
//!
//! // Nobody is human, so the AIs play the whole game.
//! let steps = manager.play_ai_turn(&id).unwrap();
//! assert!(steps.iter().any(|s| matches!(s, TurnStep::Moved(r) if r.game_over())));
//! assert!(manager.state(&id).unwrap().is_finished());
//! ```

pub mod events;
pub mod hooks;
pub mod logging;
pub mod session;

pub use events::{EventBus, EventSubscription, ForfeitReason, GameEvent, PlayerInfo};
pub use hooks::{AllowAll, NoSettlement, PlayerAuthority, Settlement};
pub use logging::{init_logging, LogCapture, LogEntry, LogFormat};
pub use session::{
    GameConfig, GameSession, SessionError, SessionId, SessionManager, TurnStep,
    DEFAULT_SESSION_TTL,
};
