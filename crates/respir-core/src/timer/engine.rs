//! Phase engine implementation.
//!
//! The phase engine is a clock-free state machine. It does not own a tick
//! source - the caller is responsible for calling `tick()` once per second
//! while the engine is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> (Phase1 | Phase2) -> Phase1 <-> Phase2 -> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = PhaseEngine::new();
//! engine.start(SessionConfig::new(1, 4, 6))?;
//! // Once per second:
//! let events = engine.tick();
//! ```

use chrono::Utc;
use tracing::debug;

use super::session::{Phase, SessionConfig, TimerState};
use crate::error::SessionError;
use crate::events::{Event, StopReason};

/// Core phase engine.
///
/// Every command returns the events it produced, in order.
#[derive(Debug, Clone, Default)]
pub struct PhaseEngine {
    config: SessionConfig,
    state: TimerState,
}

impl PhaseEngine {
    /// Create an idle engine.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.current_phase
    }

    pub fn is_running(&self) -> bool {
        self.state.current_phase.is_active()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a new session, replacing whatever was running.
    ///
    /// Validation happens first; on error the engine is untouched.
    pub fn start(&mut self, config: SessionConfig) -> Result<Vec<Event>, SessionError> {
        config.validate()?;

        let total_seconds = config.total_seconds();
        self.config = config;
        self.state = TimerState {
            total_seconds_remaining: i64::try_from(total_seconds).unwrap_or(i64::MAX),
            current_phase: Phase::Idle,
            phase_seconds_remaining: 0,
        };
        debug!(?config, total_seconds, "session starting");

        let mut events = vec![Event::SessionStarted {
            config,
            total_seconds,
            at: Utc::now(),
        }];
        self.enter_phase(Phase::Phase1, &mut events);
        Ok(events)
    }

    /// Advance the countdown by one second.
    ///
    /// Total expiry is checked before phase expiry, so a session whose
    /// total and phase run out on the same tick ends without a switch.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.is_running() {
            return Vec::new();
        }

        let mut events = Vec::new();

        self.state.total_seconds_remaining -= 1;
        if self.state.total_seconds_remaining < 0 {
            debug!("total duration expired");
            events.push(Event::SessionEnded { at: Utc::now() });
            events.push(self.halt(StopReason::Completed));
            return events;
        }

        self.state.phase_seconds_remaining -= 1;
        if self.state.phase_seconds_remaining < 0 {
            let from = self.state.current_phase;
            events.push(Event::PhaseSwitched {
                from,
                at: Utc::now(),
            });
            self.enter_phase(from.other(), &mut events);
        } else {
            events.push(Event::Tick {
                phase: self.state.current_phase,
                phase_seconds_remaining: self.state.phase_seconds_remaining,
                total_seconds_remaining: self.state.total_seconds_remaining,
                at: Utc::now(),
            });
        }
        events
    }

    /// Return to `Idle`. Calling it while idle only repeats the stop event.
    pub fn stop(&mut self) -> Event {
        self.halt(StopReason::Cancelled)
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Enter `phase`, or its partner when `phase` has no duration. Stops
    /// the session when neither can be entered.
    fn enter_phase(&mut self, phase: Phase, events: &mut Vec<Event>) {
        for candidate in [phase, phase.other()] {
            let seconds = self.config.phase_seconds(candidate);
            if seconds > 0 {
                self.state.current_phase = candidate;
                self.state.phase_seconds_remaining = i64::from(seconds);
                debug!(phase = ?candidate, seconds, "phase entered");
                events.push(Event::PhaseEntered {
                    phase: candidate,
                    seconds,
                    at: Utc::now(),
                });
                return;
            }
        }
        events.push(self.halt(StopReason::NoPhaseAvailable));
    }

    fn halt(&mut self, reason: StopReason) -> Event {
        self.state.current_phase = Phase::Idle;
        Event::TimerStopped {
            reason,
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(events: &[Event]) -> Vec<&'static str> {
        events.iter().map(Event::kind).collect()
    }

    #[test]
    fn start_enters_phase1() {
        let mut engine = PhaseEngine::new();
        assert_eq!(engine.phase(), Phase::Idle);

        let events = engine.start(SessionConfig::new(1, 4, 6)).unwrap();
        assert_eq!(kinds(&events), ["SessionStarted", "PhaseEntered"]);
        assert_eq!(engine.phase(), Phase::Phase1);
        assert_eq!(engine.state().phase_seconds_remaining, 4);
        assert_eq!(engine.state().total_seconds_remaining, 60);
    }

    #[test]
    fn zero_phase1_skips_to_phase2() {
        let mut engine = PhaseEngine::new();
        engine.start(SessionConfig::new(1, 0, 4)).unwrap();
        assert_eq!(engine.phase(), Phase::Phase2);
        assert_eq!(engine.state().phase_seconds_remaining, 4);
    }

    #[test]
    fn rejected_start_keeps_running_session() {
        let mut engine = PhaseEngine::new();
        engine.start(SessionConfig::new(1, 4, 6)).unwrap();
        engine.tick();
        let before = engine.state();

        let err = engine.start(SessionConfig::new(0, 5, 0)).unwrap_err();
        assert_eq!(err, SessionError::MissingTotalDuration);
        assert_eq!(engine.state(), before);
    }

    #[test]
    fn tick_counts_down_then_switches() {
        let mut engine = PhaseEngine::new();
        engine.start(SessionConfig::new(1, 2, 3)).unwrap();

        assert_eq!(kinds(&engine.tick()), ["Tick"]);
        assert_eq!(kinds(&engine.tick()), ["Tick"]);
        assert_eq!(engine.state().phase_seconds_remaining, 0);

        let events = engine.tick();
        assert_eq!(kinds(&events), ["PhaseSwitched", "PhaseEntered"]);
        assert_eq!(engine.phase(), Phase::Phase2);
        assert_eq!(engine.state().phase_seconds_remaining, 3);
    }

    #[test]
    fn single_phase_reenters_itself() {
        let mut engine = PhaseEngine::new();
        engine.start(SessionConfig::new(1, 1, 0)).unwrap();
        engine.tick();
        let events = engine.tick();
        assert_eq!(kinds(&events), ["PhaseSwitched", "PhaseEntered"]);
        assert_eq!(engine.phase(), Phase::Phase1);
    }

    #[test]
    fn total_expiry_preempts_phase_switch() {
        let mut engine = PhaseEngine::new();
        engine.start(SessionConfig::new(1, 60, 5)).unwrap();
        for _ in 0..60 {
            let events = engine.tick();
            assert_eq!(kinds(&events), ["Tick"]);
        }
        let events = engine.tick();
        assert_eq!(kinds(&events), ["SessionEnded", "TimerStopped"]);
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut engine = PhaseEngine::new();
        engine.start(SessionConfig::new(1, 4, 6)).unwrap();
        assert!(engine.stop().is_stop());
        assert!(engine.stop().is_stop());
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(engine.tick().is_empty());
    }

    #[test]
    fn unenterable_phases_stop_instead_of_looping() {
        // Bypass validation to reach the fallback.
        let mut engine = PhaseEngine {
            config: SessionConfig::new(1, 0, 0),
            state: TimerState::idle(),
        };
        let mut events = Vec::new();
        engine.enter_phase(Phase::Phase1, &mut events);
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(matches!(
            events.as_slice(),
            [Event::TimerStopped {
                reason: StopReason::NoPhaseAvailable,
                ..
            }]
        ));
    }
}
