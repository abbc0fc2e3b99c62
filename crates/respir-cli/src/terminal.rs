//! Terminal display and bell cues.

use std::io::Write;

use colored::Colorize;
use respir_core::storage::DisplayConfig;
use respir_core::{format_phase_time, CuePlayer, DisplayReporter, Phase};
use tracing::warn;

/// Redraws a single status line: both phase labels, the active one
/// highlighted, followed by the two-digit countdown.
pub struct TerminalDisplay {
    phase1_label: String,
    phase2_label: String,
}

impl TerminalDisplay {
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            phase1_label: config.phase1_label.clone(),
            phase2_label: config.phase2_label.clone(),
        }
    }

    fn line(&self, phase: Phase, seconds_remaining: i64) -> String {
        let label = |text: &str, active: bool| {
            let padded = format!(" {text} ");
            if active {
                padded.bold().reversed().to_string()
            } else {
                padded.dimmed().to_string()
            }
        };
        format!(
            "{} {}  {}",
            label(&self.phase1_label, phase == Phase::Phase1),
            label(&self.phase2_label, phase == Phase::Phase2),
            format_phase_time(phase, seconds_remaining).bold(),
        )
    }
}

impl DisplayReporter for TerminalDisplay {
    fn render(&mut self, phase: Phase, seconds_remaining: i64) {
        let mut out = std::io::stdout().lock();
        let result = write!(out, "\r\x1b[2K{}", self.line(phase, seconds_remaining))
            .and_then(|()| out.flush());
        if let Err(e) = result {
            warn!("display write failed: {e}");
        }
    }
}

/// Rings the terminal bell on stderr: once per phase switch, three times
/// at session end.
#[derive(Debug, Default)]
pub struct BellCues;

impl BellCues {
    pub fn new() -> Self {
        Self
    }

    fn ring(times: usize) {
        let mut err = std::io::stderr().lock();
        let result = err
            .write_all("\x07".repeat(times).as_bytes())
            .and_then(|()| err.flush());
        if let Err(e) = result {
            warn!("cue playback failed: {e}");
        }
    }
}

impl CuePlayer for BellCues {
    fn on_phase_switch(&mut self) {
        Self::ring(1);
    }

    fn on_session_end(&mut self) {
        Self::ring(3);
    }
}
