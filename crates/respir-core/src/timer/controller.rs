//! Phase timer controller.
//!
//! Wires a [`PhaseEngine`] to a tick source and to the display and cue
//! collaborators. All state sits behind one mutex; tick callbacks carry
//! the generation of the session that installed them and go quiet as
//! soon as that session is replaced or stopped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use super::engine::PhaseEngine;
use super::scheduler::{Scheduler, TickFn, TickHandle};
use super::session::{Phase, SessionConfig, TimerState};
use crate::error::SessionError;
use crate::events::Event;
use crate::report::{CuePlayer, DisplayReporter};

/// Nominal tick period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Runs breathing sessions on an injected scheduler.
pub struct PhaseTimer<S: Scheduler> {
    scheduler: S,
    shared: Arc<Mutex<Shared>>,
}

struct Shared {
    engine: PhaseEngine,
    display: Box<dyn DisplayReporter>,
    cues: Box<dyn CuePlayer>,
    subscribers: Vec<UnboundedSender<Event>>,
    tick_source: Option<Box<dyn TickHandle>>,
    generation: u64,
}

impl<S: Scheduler> PhaseTimer<S> {
    pub fn new(
        scheduler: S,
        display: impl DisplayReporter + 'static,
        cues: impl CuePlayer + 'static,
    ) -> Self {
        Self {
            scheduler,
            shared: Arc::new(Mutex::new(Shared {
                engine: PhaseEngine::new(),
                display: Box::new(display),
                cues: Box::new(cues),
                subscribers: Vec::new(),
                tick_source: None,
                generation: 0,
            })),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.lock().engine.state()
    }

    pub fn phase(&self) -> Phase {
        self.lock().engine.phase()
    }

    pub fn is_running(&self) -> bool {
        self.lock().engine.is_running()
    }

    /// Receive every event the timer dispatches from now on.
    pub fn subscribe(&self) -> UnboundedReceiver<Event> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().subscribers.push(tx);
        rx
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a session, replacing any that is running.
    ///
    /// On a validation error nothing changes, including a session that
    /// is already running.
    pub fn start(&self, config: SessionConfig) -> Result<(), SessionError> {
        let mut shared = self.lock();
        let events = shared.engine.start(config)?;

        shared.cancel_tick_source();
        shared.generation += 1;
        info!(
            minutes = config.total_minutes,
            phase1 = config.phase1_seconds,
            phase2 = config.phase2_seconds,
            "session started"
        );
        shared.dispatch(events);

        if shared.engine.is_running() {
            let tick = tick_callback(Arc::downgrade(&self.shared), shared.generation);
            shared.tick_source = Some(self.scheduler.schedule_repeating(TICK_PERIOD, tick));
        }
        Ok(())
    }

    /// Stop the session. No tick changes state after this returns.
    pub fn stop(&self) {
        let mut shared = self.lock();
        shared.cancel_tick_source();
        shared.generation += 1;
        let event = shared.engine.stop();
        debug!("session stopped");
        shared.dispatch(vec![event]);
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        lock_shared(&self.shared)
    }
}

impl<S: Scheduler> Drop for PhaseTimer<S> {
    fn drop(&mut self) {
        self.lock().cancel_tick_source();
    }
}

impl Shared {
    fn on_tick(&mut self) {
        let events = self.engine.tick();
        if !self.engine.is_running() {
            self.cancel_tick_source();
            info!("session finished");
        }
        self.dispatch(events);
    }

    fn cancel_tick_source(&mut self) {
        if let Some(mut handle) = self.tick_source.take() {
            handle.cancel();
        }
    }

    /// Collaborators run with the state lock held.
    fn dispatch(&mut self, events: Vec<Event>) {
        for event in events {
            match &event {
                Event::SessionStarted { .. } => {}
                Event::PhaseEntered { phase, seconds, .. } => {
                    self.display.render(*phase, i64::from(*seconds));
                }
                Event::Tick {
                    phase,
                    phase_seconds_remaining,
                    ..
                } => self.display.render(*phase, *phase_seconds_remaining),
                Event::PhaseSwitched { .. } => self.cues.on_phase_switch(),
                Event::SessionEnded { .. } => self.cues.on_session_end(),
                Event::TimerStopped { .. } => self.display.render(Phase::Idle, 0),
            }
            self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }
}

fn tick_callback(shared: Weak<Mutex<Shared>>, generation: u64) -> TickFn {
    Box::new(move || {
        let Some(shared) = shared.upgrade() else {
            return;
        };
        let mut shared = lock_shared(&shared);
        if shared.generation != generation {
            return;
        }
        shared.on_tick();
    })
}

fn lock_shared(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}
