//! # Studyroom Core Library
//!
//! Core business logic for the Studyroom focus timer: a Pomodoro-style
//! countdown that alternates 25-minute work phases with 5-minute breaks and
//! records every finished work phase.
//!
//! ## Architecture
//!
//! - **Timer**: A tick-driven state machine; the caller invokes `tick()`
//!   once per second while it runs
//! - **Focus session**: Hosts one timer together with its tick source,
//!   session sink and notification sink
//! - **Storage**: SQLite-based session storage and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`FocusTimer`]: Core timer state machine
//! - [`FocusSession`]: Timer host wiring collaborators together
//! - [`SessionSink`]: Acceptor of [`CompletedSession`] records
//! - [`Database`]: Session and statistics persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod focus_session;
pub mod notify;
pub mod session;
pub mod stats;
pub mod storage;
pub mod subject;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, SinkError};
pub use events::Event;
pub use focus_session::FocusSession;
pub use notify::{NotificationLog, NotificationSink};
pub use session::{CompletedSession, DurationPolicy, MemorySessionLog, SessionSink};
pub use stats::Stats;
pub use storage::{Config, Database, DatabaseSink};
pub use subject::{Subject, SubjectDirectory};
pub use timer::{
    Clock, FocusTimer, IntervalTicker, ManualClock, ManualTicker, PhaseState, SessionType,
    SystemClock, TickSource, TimerState,
};
