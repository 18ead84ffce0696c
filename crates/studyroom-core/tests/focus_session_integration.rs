//! Integration tests for a hosted focus session.
//!
//! Drives the session end to end with a manual clock and ticker, recording
//! into the in-memory log or the SQLite store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use studyroom_core::notify::{BACK_TO_WORK_MESSAGE, BREAK_TIME_MESSAGE, PHASE_COMPLETE_TITLE};
use studyroom_core::{
    Database, DatabaseSink, DurationPolicy, FocusSession, FocusTimer, ManualClock, ManualTicker,
    MemorySessionLog, NotificationLog, PhaseState, SessionType, Stats, TickSource,
};

fn start_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

struct Harness {
    session: FocusSession<ManualTicker>,
    clock: ManualClock,
    log: MemorySessionLog,
    notes: NotificationLog,
}

impl Harness {
    fn new(policy: DurationPolicy) -> Self {
        let clock = ManualClock::new(start_time());
        let log = MemorySessionLog::new();
        let notes = NotificationLog::new();
        let timer = FocusTimer::with_clock(Arc::new(clock.clone())).with_policy(policy);
        let session = FocusSession::new(
            timer,
            ManualTicker::new(),
            Box::new(log.clone()),
            Box::new(notes.clone()),
        );
        Self {
            session,
            clock,
            log,
            notes,
        }
    }

    fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.clock.advance_secs(1);
            self.session.tick();
        }
    }
}

#[test]
fn paused_work_session_records_countdown_minutes() {
    let mut h = Harness::new(DurationPolicy::Countdown);
    assert!(h.session.select_subject(Some("math-1".into())));

    h.session.start();
    h.tick(600);
    h.session.pause();
    assert_eq!(h.session.timer().remaining_secs(), 900);
    assert_eq!(h.session.timer().phase(), PhaseState::WorkIdle);

    h.clock.advance_secs(600);
    h.session.start();
    h.tick(900);

    let sessions = h.log.sessions();
    assert_eq!(sessions.len(), 1);
    let record = &sessions[0];
    assert_eq!(record.duration_min, 25);
    assert_eq!(record.subject_id.as_deref(), Some("math-1"));
    assert_eq!(record.session_type, SessionType::Work);
    assert_eq!(record.started_at, start_time());
    assert_eq!(record.ended_at - record.started_at, chrono::Duration::minutes(35));
}

#[test]
fn paused_work_session_records_wall_clock_minutes() {
    let mut h = Harness::new(DurationPolicy::WallClock);
    h.session.start();
    h.tick(600);
    h.session.pause();
    h.clock.advance_secs(600);
    h.session.start();
    h.tick(900);

    let sessions = h.log.sessions();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].duration_min, 35);
}

#[test]
fn full_cycle_alternates_and_notifies() {
    let mut h = Harness::new(DurationPolicy::Countdown);
    h.session.start();
    h.tick(1500);
    assert_eq!(h.session.timer().phase(), PhaseState::BreakIdle);
    assert!(!h.session.ticker().is_active());

    h.session.start();
    h.tick(300);
    assert_eq!(h.session.timer().phase(), PhaseState::WorkIdle);
    assert_eq!(h.session.timer().remaining_secs(), 1500);

    assert_eq!(h.log.len(), 1);
    let notes = h.notes.entries();
    assert_eq!(notes.len(), 2);
    assert!(notes.iter().all(|n| n.title == PHASE_COMPLETE_TITLE));
    assert_eq!(notes[0].message, BREAK_TIME_MESSAGE);
    assert_eq!(notes[1].message, BACK_TO_WORK_MESSAGE);
}

#[test]
fn ticks_after_completion_are_ignored_until_restart() {
    let mut h = Harness::new(DurationPolicy::Countdown);
    h.session.start();
    h.tick(1500);
    h.tick(50);
    assert_eq!(h.session.timer().remaining_secs(), 300);
    assert_eq!(h.session.timer().phase(), PhaseState::BreakIdle);
}

#[test]
fn reset_mid_session_discards_attribution_start() {
    let mut h = Harness::new(DurationPolicy::WallClock);
    h.session.start();
    h.tick(100);
    h.session.reset();
    h.clock.advance_secs(3600);

    h.session.start();
    h.tick(1500);
    let sessions = h.log.sessions();
    assert_eq!(sessions[0].duration_min, 25);
    assert_eq!(sessions[0].started_at, start_time() + chrono::Duration::seconds(3700));
}

#[test]
fn database_sink_collects_stats() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studyroom.db");
    let clock = ManualClock::new(start_time());
    let notes = NotificationLog::new();
    let sink = DatabaseSink::new(Database::open_at(&path).unwrap(), Some("ana".into()));
    let mut session = FocusSession::new(
        FocusTimer::with_clock(Arc::new(clock.clone())),
        ManualTicker::new(),
        Box::new(sink),
        Box::new(notes.clone()),
    );
    session.select_subject(Some("hist-1".into()));

    for _ in 0..2 {
        session.start();
        for _ in 0..1500 {
            clock.advance_secs(1);
            session.tick();
        }
        session.start();
        for _ in 0..300 {
            clock.advance_secs(1);
            session.tick();
        }
    }
    assert_eq!(session.timer().phase(), PhaseState::WorkIdle);
    assert_eq!(notes.entries().len(), 4);
    drop(session);

    let db = Database::open_at(&path).unwrap();
    let stats = db.stats(Some("ana"), start_time().date_naive(), &Utc).unwrap();
    assert_eq!(stats.total_sessions, 2);
    assert_eq!(stats.total_minutes, 50);
    let bruno = db.stats(Some("bruno"), start_time().date_naive(), &Utc).unwrap();
    assert_eq!(bruno, Stats::default());

    let stored = db.list_sessions(Some("ana"), None).unwrap();
    assert!(stored.iter().all(|s| s.subject_id.as_deref() == Some("hist-1")));
    assert!(stored[0].started_at > stored[1].started_at);
}

#[test]
fn stats_from_memory_log_match_records() {
    let mut h = Harness::new(DurationPolicy::Countdown);
    for _ in 0..3 {
        h.session.start();
        h.tick(1500);
        h.session.start();
        h.tick(300);
    }
    let stats = Stats::from_sessions(&h.log.sessions(), start_time().date_naive(), &Utc);
    assert_eq!(stats.total_sessions, 3);
    assert_eq!(stats.total_minutes, 75);
    assert_eq!(stats.today_sessions, 3);
}

#[test]
fn dropping_the_session_deactivates_the_ticker() {
    struct Probe(Arc<std::sync::atomic::AtomicBool>);

    impl TickSource for Probe {
        fn activate(&mut self) {
            self.0.store(true, std::sync::atomic::Ordering::SeqCst);
        }
        fn cancel(&mut self) {
            self.0.store(false, std::sync::atomic::Ordering::SeqCst);
        }
        fn is_active(&self) -> bool {
            self.0.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    let flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let mut session = FocusSession::new(
        FocusTimer::new(),
        Probe(flag.clone()),
        Box::new(MemorySessionLog::new()),
        Box::new(NotificationLog::new()),
    );
    session.start();
    assert!(flag.load(std::sync::atomic::Ordering::SeqCst));
    drop(session);
    assert!(!flag.load(std::sync::atomic::Ordering::SeqCst));
}
