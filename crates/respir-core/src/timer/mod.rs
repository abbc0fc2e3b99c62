mod controller;
mod engine;
mod scheduler;
mod session;

pub use controller::{PhaseTimer, TICK_PERIOD};
pub use engine::PhaseEngine;
pub use scheduler::{ManualScheduler, Scheduler, TickFn, TickHandle, TokioScheduler};
pub use session::{parse_lenient, Phase, SessionConfig, TimerState};
