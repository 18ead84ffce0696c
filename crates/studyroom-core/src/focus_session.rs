//! Session host: one focus timer wired to its collaborators.
//!
//! A `FocusSession` lives as long as the screen (or CLI run) that shows the
//! timer. It owns the tick source and guarantees the source is inactive
//! whenever the timer is not counting down, including after it is dropped.

use crate::events::Event;
use crate::notify::{
    phase_complete_message, NotificationSink, PHASE_COMPLETE_TITLE, SAVE_FAILED_MESSAGE,
    SAVE_FAILED_TITLE,
};
use crate::session::SessionSink;
use crate::timer::{FocusTimer, IntervalTicker, TickSource};

pub struct FocusSession<T: TickSource> {
    timer: FocusTimer,
    ticker: T,
    sessions: Box<dyn SessionSink>,
    notifier: Box<dyn NotificationSink>,
    notifications_enabled: bool,
}

impl<T: TickSource> FocusSession<T> {
    pub fn new(
        timer: FocusTimer,
        ticker: T,
        sessions: Box<dyn SessionSink>,
        notifier: Box<dyn NotificationSink>,
    ) -> Self {
        Self {
            timer,
            ticker,
            sessions,
            notifier,
            notifications_enabled: true,
        }
    }

    /// Toggle phase-completion notifications. Save failures are always
    /// reported.
    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.notifications_enabled = enabled;
        self
    }

    pub fn timer(&self) -> &FocusTimer {
        &self.timer
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn snapshot(&self) -> Event {
        self.timer.snapshot()
    }

    pub fn start(&mut self) -> Option<Event> {
        let event = self.timer.start();
        if self.timer.is_running() {
            self.ticker.activate();
        }
        event
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.ticker.cancel();
        self.timer.pause()
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.ticker.cancel();
        self.timer.reset()
    }

    /// Returns `true` when the selection was applied, `false` when it was
    /// ignored because a work countdown is running or a break is loaded.
    pub fn select_subject(&mut self, subject_id: Option<String>) -> bool {
        self.timer.select_subject(subject_id).is_some()
    }

    /// Advance the countdown by one second and handle phase completion.
    pub fn tick(&mut self) -> Option<Event> {
        let event = self.timer.tick()?;
        if let Event::PhaseCompleted {
            finished, session, ..
        } = &event
        {
            self.ticker.cancel();

            if let Some(session) = session {
                match self.sessions.record_session(session) {
                    Ok(()) => tracing::info!(
                        id = %session.id,
                        duration_min = session.duration_min,
                        subject = ?session.subject_id,
                        "work session recorded"
                    ),
                    Err(e) => {
                        tracing::warn!(id = %session.id, error = %e, "failed to record work session");
                        self.notifier.notify(SAVE_FAILED_TITLE, SAVE_FAILED_MESSAGE);
                    }
                }
            }

            if self.notifications_enabled {
                self.notifier
                    .notify(PHASE_COMPLETE_TITLE, phase_complete_message(*finished));
            }
        }
        Some(event)
    }
}

impl FocusSession<IntervalTicker> {
    /// Wait for the next tick and apply it.
    ///
    /// Never resolves while the timer is stopped. Cancel-safe: dropping the
    /// future before it resolves loses no tick.
    pub async fn next_tick(&mut self) -> Option<Event> {
        self.ticker.next_tick().await;
        self.tick()
    }
}

impl<T: TickSource> Drop for FocusSession<T> {
    fn drop(&mut self) {
        self.ticker.cancel();
    }
}
