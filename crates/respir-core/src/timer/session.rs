use serde::{Deserialize, Serialize};

use crate::error::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Phase1,
    Phase2,
}

impl Phase {
    /// The phase that follows this one. `Idle` has no partner and
    /// alternation always starts over from `Phase1`.
    pub fn other(self) -> Self {
        match self {
            Phase::Phase1 => Phase::Phase2,
            Phase::Phase2 | Phase::Idle => Phase::Phase1,
        }
    }

    pub fn is_active(self) -> bool {
        self != Phase::Idle
    }
}

/// Durations for one breathing session.
///
/// Read once when a session starts and never changed while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub total_minutes: u32,
    pub phase1_seconds: u32,
    pub phase2_seconds: u32,
}

impl SessionConfig {
    pub fn new(total_minutes: u32, phase1_seconds: u32, phase2_seconds: u32) -> Self {
        Self {
            total_minutes,
            phase1_seconds,
            phase2_seconds,
        }
    }

    /// Build a config from raw form input. Anything that does not start
    /// with a number counts as zero.
    pub fn from_inputs(minutes: &str, phase1: &str, phase2: &str) -> Self {
        Self::new(
            parse_lenient(minutes),
            parse_lenient(phase1),
            parse_lenient(phase2),
        )
    }

    /// Check the config before any timer state is touched.
    pub fn validate(&self) -> Result<(), SessionError> {
        let phase_sum = u64::from(self.phase1_seconds) + u64::from(self.phase2_seconds);
        if self.total_minutes == 0 && phase_sum > 0 {
            return Err(SessionError::MissingTotalDuration);
        }
        if phase_sum == 0 {
            return Err(SessionError::NoPhaseDuration);
        }
        Ok(())
    }

    /// Total session length in seconds.
    pub fn total_seconds(&self) -> u64 {
        u64::from(self.total_minutes).saturating_mul(60)
    }

    /// Configured length of `phase`; zero for `Idle`.
    pub fn phase_seconds(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Phase1 => self.phase1_seconds,
            Phase::Phase2 => self.phase2_seconds,
            Phase::Idle => 0,
        }
    }
}

/// Snapshot of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub total_seconds_remaining: i64,
    pub current_phase: Phase,
    pub phase_seconds_remaining: i64,
}

impl TimerState {
    pub fn idle() -> Self {
        Self {
            total_seconds_remaining: 0,
            current_phase: Phase::Idle,
            phase_seconds_remaining: 0,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::idle()
    }
}

/// Parse the leading integer of `input`, treating junk, negatives and
/// blanks as zero. Saturates at `u32::MAX`.
pub fn parse_lenient(input: &str) -> u32 {
    let s = input.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: u32 = 0;
    let mut seen_digit = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(u32::from(b - b'0'));
    }

    if negative || !seen_digit {
        0
    } else {
        value
    }
}
