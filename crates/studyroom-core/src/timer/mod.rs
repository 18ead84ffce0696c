mod clock;
mod engine;
mod phase;
mod ticker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{format_mm_ss, FocusTimer, TimerState};
pub use phase::{PhaseState, SessionType, BREAK_DURATION_SECS, WORK_DURATION_SECS};
pub use ticker::{IntervalTicker, ManualTicker, TickSource};
