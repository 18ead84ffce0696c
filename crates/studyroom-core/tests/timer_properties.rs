//! Property tests for the focus timer state machine.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use studyroom_core::{Event, FocusTimer, ManualClock, PhaseState, SessionType};

fn timer() -> (FocusTimer, ManualClock) {
    let clock = ManualClock::new(DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap());
    (FocusTimer::with_clock(Arc::new(clock.clone())), clock)
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Start,
    Pause,
    Tick(u16),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Start),
        Just(Op::Pause),
        (1u16..400).prop_map(Op::Tick),
    ]
}

fn apply(timer: &mut FocusTimer, clock: &ManualClock, op: Op) -> Vec<Event> {
    match op {
        Op::Start => timer.start().into_iter().collect(),
        Op::Pause => timer.pause().into_iter().collect(),
        Op::Tick(n) => (0..n)
            .filter_map(|_| {
                clock.advance_secs(1);
                timer.tick()
            })
            .collect(),
    }
}

proptest! {
    #[test]
    fn ticks_decrement_one_second_each(n in 0u32..1500) {
        let (mut timer, clock) = timer();
        timer.start();
        for _ in 0..n {
            clock.advance_secs(1);
            prop_assert!(timer.tick().is_none());
        }
        prop_assert_eq!(timer.remaining_secs(), 1500 - n);
        prop_assert_eq!(timer.phase(), PhaseState::WorkRunning);
    }

    #[test]
    fn reset_restores_full_phase(ops in proptest::collection::vec(op(), 0..20)) {
        let (mut timer, clock) = timer();
        for op in ops {
            apply(&mut timer, &clock, op);
        }
        let phase_type = timer.session_type();
        timer.reset();
        prop_assert_eq!(timer.session_type(), phase_type);
        prop_assert_eq!(timer.remaining_secs(), phase_type.duration_secs());
        prop_assert!(!timer.is_running());
        prop_assert!(timer.session_started_at().is_none());
    }

    #[test]
    fn remaining_stays_within_phase_bounds(ops in proptest::collection::vec(op(), 0..30)) {
        let (mut timer, clock) = timer();
        for op in ops {
            apply(&mut timer, &clock, op);
            let remaining = timer.remaining_secs();
            prop_assert!(remaining > 0);
            prop_assert!(remaining <= timer.session_type().duration_secs());
        }
    }

    #[test]
    fn phases_strictly_alternate(ops in proptest::collection::vec(op(), 0..40)) {
        let (mut timer, clock) = timer();
        let mut expected = SessionType::Work;
        for op in ops {
            for event in apply(&mut timer, &clock, op) {
                if let Event::PhaseCompleted { finished, next, session, .. } = event {
                    prop_assert_eq!(finished, expected);
                    prop_assert_eq!(next, expected.next());
                    prop_assert_eq!(session.is_some(), finished == SessionType::Work);
                    expected = next;
                }
            }
        }
        prop_assert_eq!(timer.session_type(), expected);
    }
}

#[test]
fn start_twice_equals_start_once() {
    let (mut once, _) = timer();
    let (mut twice, _) = timer();
    once.start();
    twice.start();
    twice.start();
    assert_eq!(once.state(), twice.state());
}

#[test]
fn full_work_phase_emits_exactly_one_session() {
    let (mut timer, clock) = timer();
    timer.start();
    let events = apply(&mut timer, &clock, Op::Tick(1500));
    let sessions: Vec<_> = events
        .into_iter()
        .filter_map(|e| match e {
            Event::PhaseCompleted { session, .. } => session,
            _ => None,
        })
        .collect();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].session_type, SessionType::Work);
    assert_eq!(timer.phase(), PhaseState::BreakIdle);
    assert_eq!(timer.remaining_secs(), 300);
}
