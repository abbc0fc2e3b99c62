//! Presentation collaborators the timer reports to.

use crate::timer::Phase;

/// What the display shows while no session runs.
pub const IDLE_INDICATOR: &str = "00";

/// Renders the countdown and highlights the active phase.
///
/// Called while the timer holds its state lock, so an implementation
/// must not call back into the [`PhaseTimer`](crate::PhaseTimer) that
/// owns it; react to events through
/// [`PhaseTimer::subscribe`](crate::PhaseTimer::subscribe) instead.
pub trait DisplayReporter: Send {
    /// Show `seconds_remaining` for `phase`. With `Phase::Idle` the
    /// display shows [`IDLE_INDICATOR`] and clears any highlight.
    fn render(&mut self, phase: Phase, seconds_remaining: i64);
}

/// Plays audible cues. Implementations must swallow their own failures.
///
/// Like [`DisplayReporter`], cues run under the timer's state lock and
/// must not call back into the timer.
pub trait CuePlayer: Send {
    fn on_phase_switch(&mut self);
    fn on_session_end(&mut self);
}

impl<T: DisplayReporter + ?Sized> DisplayReporter for Box<T> {
    fn render(&mut self, phase: Phase, seconds_remaining: i64) {
        (**self).render(phase, seconds_remaining);
    }
}

impl<T: CuePlayer + ?Sized> CuePlayer for Box<T> {
    fn on_phase_switch(&mut self) {
        (**self).on_phase_switch();
    }

    fn on_session_end(&mut self) {
        (**self).on_session_end();
    }
}

/// Display text for a phase countdown: two digits, zero padded, or the
/// idle indicator when no phase is active.
pub fn format_phase_time(phase: Phase, seconds: i64) -> String {
    if phase.is_active() {
        format!("{:02}", seconds.max(0))
    } else {
        IDLE_INDICATOR.to_string()
    }
}

/// `MM:SS` for a duration in seconds. Minutes grow past two digits.
pub fn format_time(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Reporter that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDisplay;

impl DisplayReporter for NullDisplay {
    fn render(&mut self, _phase: Phase, _seconds_remaining: i64) {}
}

/// Cue player that stays silent.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCues;

impl CuePlayer for SilentCues {
    fn on_phase_switch(&mut self) {}
    fn on_session_end(&mut self) {}
}
