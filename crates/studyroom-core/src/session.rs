//! Completed work sessions and the sinks that accept them.
//!
//! A [`CompletedSession`] is emitted once per finished WORK phase. Break
//! completions are never recorded.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SinkError;
use crate::timer::SessionType;

/// How the recorded duration of a work session is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DurationPolicy {
    /// Countdown seconds actually consumed since the session started.
    /// Paused time is excluded.
    #[default]
    Countdown,
    /// Wall-clock span between `started_at` and completion, paused time
    /// included.
    WallClock,
}

impl DurationPolicy {
    /// Whole minutes to record for a session.
    ///
    /// Falls back to the nominal work duration when the start time is
    /// missing or lies after the end. A wall-clock span shorter than one
    /// minute also records the nominal duration.
    pub fn minutes(
        self,
        started_at: Option<DateTime<Utc>>,
        ended_at: DateTime<Utc>,
        counted_secs: u32,
    ) -> u32 {
        let nominal = SessionType::Work.duration_min();
        let Some(started_at) = started_at else {
            return nominal;
        };
        if ended_at < started_at {
            return nominal;
        }
        match self {
            DurationPolicy::Countdown => counted_secs / 60,
            DurationPolicy::WallClock => {
                u32::try_from((ended_at - started_at).num_minutes())
                    .ok()
                    .filter(|minutes| *minutes > 0)
                    .unwrap_or(nominal)
            }
        }
    }
}

impl std::str::FromStr for DurationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "countdown" => Ok(DurationPolicy::Countdown),
            "wall_clock" => Ok(DurationPolicy::WallClock),
            other => Err(format!("unknown duration policy: {other}")),
        }
    }
}

/// Immutable record of one finished WORK phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedSession {
    pub id: String,
    pub duration_min: u32,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub session_type: SessionType,
    pub subject_id: Option<String>,
}

impl CompletedSession {
    /// Build the record for a work phase that completed at `ended_at`.
    pub fn work(
        started_at: Option<DateTime<Utc>>,
        ended_at: DateTime<Utc>,
        counted_secs: u32,
        subject_id: Option<String>,
        policy: DurationPolicy,
    ) -> Self {
        let duration_min = policy.minutes(started_at, ended_at, counted_secs);
        let started_at =
            started_at.unwrap_or_else(|| ended_at - Duration::minutes(i64::from(duration_min)));
        Self {
            id: Uuid::new_v4().to_string(),
            duration_min,
            started_at,
            ended_at,
            session_type: SessionType::Work,
            subject_id,
        }
    }
}

/// Append-only acceptor of completed sessions.
pub trait SessionSink: Send {
    fn record_session(&mut self, session: &CompletedSession) -> Result<(), SinkError>;
}

/// In-memory session list, newest first.
///
/// Clones share the same list, so a caller can keep a handle while the
/// session host owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionLog {
    sessions: Arc<Mutex<Vec<CompletedSession>>>,
}

impl MemorySessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sessions(&self) -> Vec<CompletedSession> {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionSink for MemorySessionLog {
    fn record_session(&mut self, session: &CompletedSession) -> Result<(), SinkError> {
        if session.session_type != SessionType::Work {
            return Err(SinkError::Rejected(format!(
                "only work sessions are recorded, got {}",
                session.session_type
            )));
        }
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(0, session.clone());
        Ok(())
    }
}
