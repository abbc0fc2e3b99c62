pub mod config;
pub mod preview;
pub mod run;

use clap::Args;
use respir_core::{timer::parse_lenient, Config, SessionConfig};

/// Session durations given on the command line. Anything left out comes
/// from the `[session]` section of the config file.
#[derive(Args, Debug, Default)]
pub struct SessionArgs {
    /// Total session length in minutes
    #[arg(short, long)]
    pub minutes: Option<String>,
    /// Seconds for the first phase
    #[arg(long)]
    pub phase1: Option<String>,
    /// Seconds for the second phase
    #[arg(long)]
    pub phase2: Option<String>,
}

impl SessionArgs {
    /// Non-numeric values count as zero, like an empty form field.
    pub fn resolve(&self, config: &Config) -> SessionConfig {
        let pick = |arg: &Option<String>, fallback: u32| {
            arg.as_deref().map(parse_lenient).unwrap_or(fallback)
        };
        SessionConfig::new(
            pick(&self.minutes, config.session.total_minutes),
            pick(&self.phase1, config.session.phase1_seconds),
            pick(&self.phase2, config.session.phase2_seconds),
        )
    }
}
