//! SQLite-based session storage and statistics.
//!
//! Provides persistent storage for:
//! - Completed work sessions
//! - Session statistics (daily and all-time), optionally per user

use std::path::Path;

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use crate::error::{DatabaseError, SinkError};
use crate::session::{CompletedSession, SessionSink};
use crate::stats::{day_bounds, Stats};
use crate::timer::SessionType;

/// SQLite database for session storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/studyroom/studyroom.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> crate::error::Result<Self> {
        let path = data_dir()?.join("studyroom.db");
        Ok(Self::open_at(&path)?)
    }

    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id           TEXT PRIMARY KEY,
                session_type TEXT NOT NULL,
                duration_min INTEGER NOT NULL,
                started_at   TEXT NOT NULL,
                ended_at     TEXT NOT NULL,
                subject_id   TEXT,
                user_id      TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_started_at ON sessions(started_at);
            CREATE INDEX IF NOT EXISTS idx_sessions_user_started_at ON sessions(user_id, started_at);",
        )?;
        Ok(())
    }

    /// Append a completed session.
    ///
    /// # Errors
    /// Returns an error if the insert fails (including a duplicate id).
    pub fn record_session(
        &self,
        session: &CompletedSession,
        user_id: Option<&str>,
    ) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO sessions (id, session_type, duration_min, started_at, ended_at, subject_id, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                session.id,
                session.session_type.as_str(),
                session.duration_min,
                timestamp(session.started_at),
                timestamp(session.ended_at),
                session.subject_id,
                user_id,
            ],
        )?;
        Ok(())
    }

    /// Sessions newest first. `None` for `user_id` returns every user's.
    pub fn list_sessions(
        &self,
        user_id: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<CompletedSession>, DatabaseError> {
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let mut stmt = self.conn.prepare(
            "SELECT id, session_type, duration_min, started_at, ended_at, subject_id
             FROM sessions
             WHERE (?1 IS NULL OR user_id = ?1)
             ORDER BY started_at DESC, rowid DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![user_id, limit], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, Option<String>>(5)?,
            ))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            let (id, session_type, duration_min, started_at, ended_at, subject_id) = row?;
            sessions.push(build_session(
                id,
                &session_type,
                duration_min,
                &started_at,
                &ended_at,
                subject_id,
            )?);
        }
        Ok(sessions)
    }

    pub fn get_session(&self, id: &str) -> Result<Option<CompletedSession>, DatabaseError> {
        let row = self
            .conn
            .query_row(
                "SELECT session_type, duration_min, started_at, ended_at, subject_id
                 FROM sessions WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, Option<String>>(4)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(session_type, duration_min, started_at, ended_at, subject_id)| {
            build_session(
                id.to_string(),
                &session_type,
                duration_min,
                &started_at,
                &ended_at,
                subject_id,
            )
        })
        .transpose()
    }

    /// Today's and all-time totals. "Today" is the calendar date `today`
    /// in `tz`.
    pub fn stats<Tz: TimeZone>(
        &self,
        user_id: Option<&str>,
        today: NaiveDate,
        tz: &Tz,
    ) -> Result<Stats, DatabaseError> {
        let (total_sessions, total_minutes) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(duration_min), 0)
             FROM sessions
             WHERE session_type = 'work' AND (?1 IS NULL OR user_id = ?1)",
            params![user_id],
            |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?)),
        )?;

        let (day_start, day_end) = day_bounds(today, tz);
        let (today_sessions, today_minutes) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(duration_min), 0)
             FROM sessions
             WHERE session_type = 'work'
               AND (?1 IS NULL OR user_id = ?1)
               AND started_at >= ?2 AND started_at < ?3",
            params![user_id, timestamp(day_start), timestamp(day_end)],
            |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?)),
        )?;

        Ok(Stats {
            today_sessions,
            today_minutes,
            total_sessions,
            total_minutes,
        })
    }

    /// Totals with "today" taken from the local calendar.
    pub fn stats_today(&self, user_id: Option<&str>) -> Result<Stats, DatabaseError> {
        self.stats(user_id, Local::now().date_naive(), &Local)
    }
}

fn build_session(
    id: String,
    session_type: &str,
    duration_min: u32,
    started_at: &str,
    ended_at: &str,
    subject_id: Option<String>,
) -> Result<CompletedSession, DatabaseError> {
    Ok(CompletedSession {
        id,
        duration_min,
        started_at: parse_timestamp(started_at)?,
        ended_at: parse_timestamp(ended_at)?,
        session_type: session_type
            .parse::<SessionType>()
            .map_err(DatabaseError::QueryFailed)?,
        subject_id,
    })
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::QueryFailed(format!("bad timestamp '{s}': {e}")))
}

/// Session sink backed by the SQLite store, stamping every record with the
/// configured user.
pub struct DatabaseSink {
    db: Database,
    user_id: Option<String>,
}

impl DatabaseSink {
    pub fn new(db: Database, user_id: Option<String>) -> Self {
        Self { db, user_id }
    }
}

impl SessionSink for DatabaseSink {
    fn record_session(&mut self, session: &CompletedSession) -> Result<(), SinkError> {
        if session.session_type != SessionType::Work {
            return Err(SinkError::Rejected(format!(
                "only work sessions are recorded, got {}",
                session.session_type
            )));
        }
        self.db.record_session(session, self.user_id.as_deref())?;
        Ok(())
    }
}
