//! # Respir Core Library
//!
//! This library provides the core logic for the Respir breathing timer.
//! A session counts down a total duration while alternating between two
//! timed phases, calling out to a display and a cue player as it goes.
//! The `respir` CLI is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Phase Engine**: A clock-free state machine advanced one second per
//!   `tick()` call
//! - **Phase Timer**: Controller that drives the engine from an injected
//!   [`Scheduler`] and reports to a [`DisplayReporter`] and [`CuePlayer`]
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`PhaseTimer`]: Session controller with `start`/`stop`
//! - [`PhaseEngine`]: Core timer state machine
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod report;
pub mod simulation;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, SchedulerError, SessionError};
pub use events::{Event, StopReason};
pub use report::{format_phase_time, format_time, CuePlayer, DisplayReporter};
pub use simulation::{simulate, SessionTrace, TraceEntry};
pub use storage::Config;
pub use timer::{
    ManualScheduler, Phase, PhaseEngine, PhaseTimer, Scheduler, SessionConfig, TimerState,
    TokioScheduler,
};
