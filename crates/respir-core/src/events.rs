use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, SessionConfig};

/// Why a session went back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Total duration ran out.
    Completed,
    /// `stop()` was called.
    Cancelled,
    /// Neither phase had a positive duration when one had to be entered.
    NoPhaseAvailable,
}

/// Every state change in the timer produces an Event.
/// The controller turns them into display and cue calls; front ends can
/// subscribe to the same stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        config: SessionConfig,
        total_seconds: u64,
        at: DateTime<Utc>,
    },
    PhaseEntered {
        phase: Phase,
        seconds: u32,
        at: DateTime<Utc>,
    },
    Tick {
        phase: Phase,
        phase_seconds_remaining: i64,
        total_seconds_remaining: i64,
        at: DateTime<Utc>,
    },
    /// A phase ran out; the next `PhaseEntered` names the new one.
    PhaseSwitched {
        from: Phase,
        at: DateTime<Utc>,
    },
    SessionEnded {
        at: DateTime<Utc>,
    },
    TimerStopped {
        reason: StopReason,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short name matching the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::SessionStarted { .. } => "SessionStarted",
            Event::PhaseEntered { .. } => "PhaseEntered",
            Event::Tick { .. } => "Tick",
            Event::PhaseSwitched { .. } => "PhaseSwitched",
            Event::SessionEnded { .. } => "SessionEnded",
            Event::TimerStopped { .. } => "TimerStopped",
        }
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, Event::TimerStopped { .. })
    }
}
