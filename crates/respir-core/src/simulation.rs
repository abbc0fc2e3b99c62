//! Clock-free dry run of a session.
//!
//! Runs a [`PhaseEngine`] to completion and records every event with the
//! tick that produced it. Handy for previewing a breathing pattern and
//! for regression tests that would otherwise wait in real time.

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::events::Event;
use crate::timer::{PhaseEngine, SessionConfig};

/// One recorded event. Tick 0 holds the events emitted by `start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub tick: u64,
    pub event: Event,
}

/// Full trace of a simulated session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionTrace {
    pub config: SessionConfig,
    pub entries: Vec<TraceEntry>,
}

impl SessionTrace {
    /// Ticks on which a phase switch cue would play.
    pub fn switch_ticks(&self) -> Vec<u64> {
        self.ticks_where(|e| matches!(e, Event::PhaseSwitched { .. }))
    }

    /// Tick on which the session-end cue plays.
    pub fn end_tick(&self) -> Option<u64> {
        self.ticks_where(|e| matches!(e, Event::SessionEnded { .. }))
            .first()
            .copied()
    }

    /// Number of ticks until the engine went idle.
    pub fn tick_count(&self) -> u64 {
        self.entries.last().map(|e| e.tick).unwrap_or(0)
    }

    fn ticks_where(&self, pred: impl Fn(&Event) -> bool) -> Vec<u64> {
        self.entries
            .iter()
            .filter(|e| pred(&e.event))
            .map(|e| e.tick)
            .collect()
    }
}

/// Run `config` from start to natural end.
pub fn simulate(config: SessionConfig) -> Result<SessionTrace, SessionError> {
    let mut engine = PhaseEngine::new();
    let mut trace = SessionTrace {
        config,
        entries: Vec::new(),
    };

    record(&mut trace, 0, engine.start(config)?);

    let mut tick = 0;
    while engine.is_running() {
        tick += 1;
        record(&mut trace, tick, engine.tick());
    }
    Ok(trace)
}

fn record(trace: &mut SessionTrace, tick: u64, events: Vec<Event>) {
    trace
        .entries
        .extend(events.into_iter().map(|event| TraceEntry { tick, event }));
}
