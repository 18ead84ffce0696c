//! Focus timer state machine.
//!
//! The timer is a countdown driven by an external tick source. It does not
//! use internal threads - the caller is responsible for calling `tick()`
//! once per elapsed second while the timer runs.
//!
//! ## State Transitions
//!
//! ```text
//! WorkIdle  --start--> WorkRunning  --pause--> WorkIdle
//! WorkRunning  --tick, remaining == 0--> BreakIdle   (records a session)
//! BreakIdle --start--> BreakRunning --pause--> BreakIdle
//! BreakRunning --tick, remaining == 0--> WorkIdle
//! any --reset--> <current>Idle with the full phase duration
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = FocusTimer::new();
//! timer.start();
//! // Once per second:
//! if let Some(Event::PhaseCompleted { session, .. }) = timer.tick() { ... }
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock::{Clock, SystemClock};
use super::phase::{PhaseState, SessionType};
use crate::events::Event;
use crate::session::{CompletedSession, DurationPolicy};

/// Transient state of one focus timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub session_type: SessionType,
    pub remaining_secs: u32,
    pub is_running: bool,
    /// Set when a fresh work countdown starts; kept across pauses. Always
    /// `None` during a break.
    pub session_started_at: Option<DateTime<Utc>>,
    /// Opaque reference to an externally owned subject.
    pub selected_subject_id: Option<String>,
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            session_type: SessionType::Work,
            remaining_secs: SessionType::Work.duration_secs(),
            is_running: false,
            session_started_at: None,
            selected_subject_id: None,
        }
    }
}

impl TimerState {
    pub fn phase(&self) -> PhaseState {
        PhaseState::new(self.session_type, self.is_running)
    }

    pub fn phase_duration_secs(&self) -> u32 {
        self.session_type.duration_secs()
    }
}

/// Core focus timer.
///
/// Counts down in whole seconds, one per `tick()`.
#[derive(Debug, Clone)]
pub struct FocusTimer {
    state: TimerState,
    /// Countdown seconds consumed since `session_started_at` was set.
    counted_secs: u32,
    policy: DurationPolicy,
    clock: Arc<dyn Clock>,
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusTimer {
    /// Create a timer in `WorkIdle` with a full work phase loaded.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: TimerState::default(),
            counted_secs: 0,
            policy: DurationPolicy::default(),
            clock,
        }
    }

    pub fn with_policy(mut self, policy: DurationPolicy) -> Self {
        self.policy = policy;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn phase(&self) -> PhaseState {
        self.state.phase()
    }

    pub fn session_type(&self) -> SessionType {
        self.state.session_type
    }

    pub fn remaining_secs(&self) -> u32 {
        self.state.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn selected_subject_id(&self) -> Option<&str> {
        self.state.selected_subject_id.as_deref()
    }

    pub fn session_started_at(&self) -> Option<DateTime<Utc>> {
        self.state.session_started_at
    }

    pub fn counted_secs(&self) -> u32 {
        self.counted_secs
    }

    /// 0.0 .. 100.0 progress within the current phase.
    pub fn progress_pct(&self) -> f64 {
        let total = self.state.phase_duration_secs();
        if total == 0 {
            return 0.0;
        }
        f64::from(total - self.state.remaining_secs) / f64::from(total) * 100.0
    }

    /// Remaining time as zero-padded `MM:SS`.
    pub fn formatted_time(&self) -> String {
        format_mm_ss(self.state.remaining_secs)
    }

    /// Whether `select_subject` would currently be applied.
    pub fn can_select_subject(&self) -> bool {
        self.state.session_type == SessionType::Work && !self.state.is_running
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.phase(),
            session_type: self.state.session_type,
            is_running: self.state.is_running,
            remaining_secs: self.state.remaining_secs,
            formatted_time: self.formatted_time(),
            progress_pct: self.progress_pct(),
            selected_subject_id: self.state.selected_subject_id.clone(),
            session_started_at: self.state.session_started_at,
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume the countdown. No-op while already running.
    pub fn start(&mut self) -> Option<Event> {
        if self.state.is_running {
            return None;
        }
        let now = self.clock.now();
        // Only work sessions carry a start time.
        let resumed = match self.state.session_type {
            SessionType::Work => self.state.session_started_at.is_some(),
            SessionType::Break => self.state.remaining_secs < self.state.phase_duration_secs(),
        };
        if !resumed {
            self.counted_secs = 0;
            if self.state.session_type == SessionType::Work {
                self.state.session_started_at = Some(now);
            }
        }
        self.state.is_running = true;
        Some(Event::TimerStarted {
            session_type: self.state.session_type,
            remaining_secs: self.state.remaining_secs,
            resumed,
            at: now,
        })
    }

    /// Stop counting, keeping the remaining time and session start.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.state.is_running = false;
        Some(Event::TimerPaused {
            session_type: self.state.session_type,
            remaining_secs: self.state.remaining_secs,
            at: self.clock.now(),
        })
    }

    /// Return to the idle state of the current phase with its full duration.
    pub fn reset(&mut self) -> Option<Event> {
        self.state.is_running = false;
        self.state.remaining_secs = self.state.phase_duration_secs();
        self.state.session_started_at = None;
        self.counted_secs = 0;
        Some(Event::TimerReset {
            session_type: self.state.session_type,
            at: self.clock.now(),
        })
    }

    /// Consume one second. Returns `Some(Event::PhaseCompleted)` when the
    /// phase runs out. Ticks delivered while stopped are ignored.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.state.remaining_secs = self.state.remaining_secs.saturating_sub(1);
        self.counted_secs = self.counted_secs.saturating_add(1);
        if self.state.remaining_secs == 0 {
            return Some(self.complete_phase());
        }
        None
    }

    /// Change the subject attributed to the next work session.
    ///
    /// Only applied in an idle WORK phase; otherwise ignored and `None` is
    /// returned.
    pub fn select_subject(&mut self, subject_id: Option<String>) -> Option<Event> {
        if !self.can_select_subject() {
            tracing::debug!(
                phase = ?self.phase(),
                "ignoring subject selection outside an idle work phase"
            );
            return None;
        }
        self.state.selected_subject_id = subject_id.clone();
        Some(Event::SubjectSelected {
            subject_id,
            at: self.clock.now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_phase(&mut self) -> Event {
        // The countdown stops before the next phase is loaded.
        self.state.is_running = false;
        let now = self.clock.now();
        let finished = self.state.session_type;

        let session = match finished {
            SessionType::Work => Some(CompletedSession::work(
                self.state.session_started_at,
                now,
                self.counted_secs,
                self.state.selected_subject_id.clone(),
                self.policy,
            )),
            SessionType::Break => None,
        };

        let next = finished.next();
        self.state.session_type = next;
        self.state.remaining_secs = next.duration_secs();
        self.state.session_started_at = None;
        self.counted_secs = 0;

        tracing::info!(%finished, %next, "phase completed");

        Event::PhaseCompleted {
            finished,
            next,
            session,
            at: now,
        }
    }
}

/// Format seconds as zero-padded `MM:SS`.
pub fn format_mm_ss(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
