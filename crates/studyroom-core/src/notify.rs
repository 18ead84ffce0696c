//! User-facing notifications.
//!
//! Purely observational: the timer never consumes a result from a
//! notification sink.

use std::sync::{Arc, Mutex};

use crate::timer::SessionType;

pub const PHASE_COMPLETE_TITLE: &str = "Pomodoro complete!";
pub const BREAK_TIME_MESSAGE: &str = "Time to take a break!";
pub const BACK_TO_WORK_MESSAGE: &str = "Time to get back to work!";
pub const SAVE_FAILED_TITLE: &str = "Error";
pub const SAVE_FAILED_MESSAGE: &str = "Could not save the session.";

pub trait NotificationSink: Send {
    fn notify(&mut self, title: &str, message: &str);
}

/// Message shown when a phase of the given type finishes.
pub fn phase_complete_message(finished: SessionType) -> &'static str {
    match finished {
        SessionType::Work => BREAK_TIME_MESSAGE,
        SessionType::Break => BACK_TO_WORK_MESSAGE,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

/// Collects notifications in memory. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl NotificationSink for NotificationLog {
    fn notify(&mut self, title: &str, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Notification {
                title: title.to_string(),
                message: message.to_string(),
            });
    }
}
