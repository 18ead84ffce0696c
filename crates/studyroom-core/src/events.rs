use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::CompletedSession;
use crate::timer::{PhaseState, SessionType};

/// Every state change of the focus timer produces an Event.
/// Hosts print or forward them; nothing in the core consumes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        session_type: SessionType,
        remaining_secs: u32,
        /// True when continuing a paused countdown.
        resumed: bool,
        at: DateTime<Utc>,
    },
    TimerPaused {
        session_type: SessionType,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        session_type: SessionType,
        at: DateTime<Utc>,
    },
    /// A phase ran down to zero and the next one is loaded.
    /// `session` is only present when a WORK phase finished.
    PhaseCompleted {
        finished: SessionType,
        next: SessionType,
        session: Option<CompletedSession>,
        at: DateTime<Utc>,
    },
    SubjectSelected {
        subject_id: Option<String>,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: PhaseState,
        session_type: SessionType,
        is_running: bool,
        remaining_secs: u32,
        formatted_time: String,
        progress_pct: f64,
        selected_subject_id: Option<String>,
        session_started_at: Option<DateTime<Utc>>,
        at: DateTime<Utc>,
    },
}
