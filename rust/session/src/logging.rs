//! Tracing setup for hosts and a capture layer for asserting on session logs.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::{EnvFilter, Layer};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info";

/// Output format for [`init_logging`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// `"json"` selects JSON lines; anything else is the human-readable format.
    pub fn from_env_value(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Installs the global subscriber: `RUST_LOG` filtering (default
/// [`DEFAULT_FILTER`]) written to stderr so command output on stdout stays
/// machine readable.
pub fn init_logging(format: LogFormat) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => {
            tracing::subscriber::set_global_default(builder.json().with_current_span(false).finish())
        }
    }
}

/// One captured log event.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the entry was logged for `session_id`.
    pub fn is_for_session(&self, session_id: &str) -> bool {
        self.field("session_id") == Some(session_id)
    }
}

/// Layer that keeps every event it sees. Clones share the same buffer, so
/// keep one handle and install the other:
///
/// ```rust
/// use tracing_subscriber::layer::SubscriberExt;
/// use ludo_session::LogCapture;
///
/// let capture = LogCapture::new();
/// let subscriber = tracing_subscriber::registry().with(capture.clone());
/// tracing::subscriber::with_default(subscriber, || {
///     tracing::info!(session_id = "s-1", "session closed");
/// });
/// assert_eq!(capture.messages(), vec!["session closed"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.message).collect()
    }

    /// Entries logged for one session, oldest first.
    pub fn for_session(&self, session_id: &str) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.is_for_session(session_id))
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = FieldCollector::default();
        event.record(&mut fields);
        let entry = LogEntry {
            level: *event.metadata().level(),
            message: fields.message,
            fields: fields.rest,
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

#[derive(Default)]
struct FieldCollector {
    message: String,
    rest: Vec<(String, String)>,
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.record(field, format!("{:?}", value));
    }
}

impl FieldCollector {
    fn record(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.rest.push((field.name().to_string(), value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EventBus, GameConfig, PlayerAuthority, SessionManager};
    use ludo_engine::player::{Difficulty, PlayerId, PlayerSpec};
    use tracing_subscriber::layer::SubscriberExt;

    fn capture<T>(f: impl FnOnce() -> T) -> (T, LogCapture) {
        let capture = LogCapture::new();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let value = tracing::subscriber::with_default(subscriber, f);
        (value, capture)
    }

    struct NoOne;

    impl PlayerAuthority for NoOne {
        fn can_act(&self, _session_id: &str, _player: PlayerId) -> bool {
            false
        }
    }

    #[test]
    fn session_lifecycle_is_logged() {
        let (id, logs) = capture(|| {
            let manager = SessionManager::new(Arc::new(EventBus::new()));
            let id = manager
                .create_session(GameConfig {
                    players: vec![
                        PlayerSpec::ai(Difficulty::Easy),
                        PlayerSpec::ai(Difficulty::Medium),
                    ],
                    seed: Some(11),
                })
                .unwrap();
            manager.play_ai_turn(&id).unwrap();
            manager.delete_session(&id).unwrap();
            id
        });

        let entries = logs.for_session(&id);
        let created = &entries[0];
        assert_eq!(created.message, "creating new game session");
        assert_eq!(created.level, Level::INFO);
        assert_eq!(created.field("players"), Some("2"));
        assert_eq!(created.field("seed"), Some("11"));

        let finished = entries
            .iter()
            .find(|e| e.message == "game finished")
            .expect("game finished entry");
        assert!(finished.field("winner").is_some());
        let closed = entries
            .iter()
            .position(|e| e.message == "session closed")
            .expect("session closed entry");
        assert_eq!(entries[closed].field("reason"), Some("terminated_by_request"));
        assert!(entries.iter().position(|e| e.message == "game finished") < Some(closed));
    }

    #[test]
    fn refused_player_is_logged_as_warning() {
        let (id, logs) = capture(|| {
            let manager =
                SessionManager::new(Arc::new(EventBus::new())).with_authority(Arc::new(NoOne));
            let id = manager
                .create_session(GameConfig {
                    players: vec![PlayerSpec::human(), PlayerSpec::human()],
                    seed: Some(3),
                })
                .unwrap();
            assert!(manager.roll(&id, 0).is_err());
            id
        });

        let warning = logs
            .for_session(&id)
            .into_iter()
            .find(|e| e.level == Level::WARN)
            .expect("warning entry");
        assert_eq!(warning.message, "player not authorized to act");
        assert_eq!(warning.field("player"), Some("0"));
    }

    #[test]
    fn clones_share_entries() {
        let (_, logs) = capture(|| {
            tracing::debug!(die = 6, "dice rolled");
        });
        let other = logs.clone();
        assert_eq!(other.entries()[0].level, Level::DEBUG);
        assert_eq!(other.entries()[0].field("die"), Some("6"));
    }

    #[test]
    fn log_format_from_env_value() {
        assert_eq!(LogFormat::from_env_value("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_env_value(""), LogFormat::Pretty);
    }
}
