use serde::{Deserialize, Serialize};

/// Nominal length of a work phase.
pub const WORK_DURATION_SECS: u32 = 25 * 60;
/// Nominal length of a break phase.
pub const BREAK_DURATION_SECS: u32 = 5 * 60;

/// The two alternating phases of a focus session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    #[default]
    Work,
    Break,
}

impl SessionType {
    /// Full countdown length of this phase, in seconds.
    pub fn duration_secs(self) -> u32 {
        match self {
            SessionType::Work => WORK_DURATION_SECS,
            SessionType::Break => BREAK_DURATION_SECS,
        }
    }

    /// Nominal length of this phase, in whole minutes.
    pub fn duration_min(self) -> u32 {
        self.duration_secs() / 60
    }

    /// The phase that follows this one. Phases alternate strictly.
    pub fn next(self) -> Self {
        match self {
            SessionType::Work => SessionType::Break,
            SessionType::Break => SessionType::Work,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionType::Work => "Work Session",
            SessionType::Break => "Break",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionType::Work => "work",
            SessionType::Break => "break",
        }
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(SessionType::Work),
            "break" => Ok(SessionType::Break),
            other => Err(format!("unknown session type: {other}")),
        }
    }
}

/// Which of the four machine states the timer is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseState {
    WorkIdle,
    WorkRunning,
    BreakIdle,
    BreakRunning,
}

impl PhaseState {
    pub fn new(session_type: SessionType, is_running: bool) -> Self {
        match (session_type, is_running) {
            (SessionType::Work, false) => PhaseState::WorkIdle,
            (SessionType::Work, true) => PhaseState::WorkRunning,
            (SessionType::Break, false) => PhaseState::BreakIdle,
            (SessionType::Break, true) => PhaseState::BreakRunning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_alternate() {
        assert_eq!(SessionType::Work.next(), SessionType::Break);
        assert_eq!(SessionType::Break.next(), SessionType::Work);
        assert_eq!(SessionType::Work.next().next(), SessionType::Work);
    }

    #[test]
    fn nominal_durations() {
        assert_eq!(SessionType::Work.duration_secs(), 1500);
        assert_eq!(SessionType::Break.duration_secs(), 300);
        assert_eq!(SessionType::Work.duration_min(), 25);
    }

    #[test]
    fn parses_its_own_display() {
        for t in [SessionType::Work, SessionType::Break] {
            assert_eq!(t.to_string().parse::<SessionType>().unwrap(), t);
        }
        assert!("pause".parse::<SessionType>().is_err());
    }
}
