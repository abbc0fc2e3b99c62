use clap::Args;
use respir_core::report::{NullDisplay, SilentCues};
use respir_core::{
    format_time, Config, CuePlayer, DisplayReporter, PhaseTimer, SessionConfig, TokioScheduler,
};
use tracing::warn;

use super::SessionArgs;
use crate::terminal::{BellCues, TerminalDisplay};

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub session: SessionArgs,
    /// Print every timer event as a JSON line instead of the live display
    #[arg(long)]
    pub json: bool,
    /// Do not ring the terminal bell
    #[arg(short, long)]
    pub quiet: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let session = args.session.resolve(&config);
    session.validate()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_session(session, &config, &args))
}

async fn run_session(
    session: SessionConfig,
    config: &Config,
    args: &RunArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let display: Box<dyn DisplayReporter> = if args.json {
        Box::new(NullDisplay)
    } else {
        Box::new(TerminalDisplay::new(&config.display))
    };
    let cues: Box<dyn CuePlayer> = if args.quiet || !config.cues.enabled {
        Box::new(SilentCues)
    } else {
        Box::new(BellCues::new())
    };

    let timer = PhaseTimer::new(TokioScheduler::current()?, display, cues);
    let mut events = timer.subscribe();

    if !args.json {
        println!(
            "Breathing for {}  ({} {}s / {} {}s)  Ctrl-C to stop",
            format_time(i64::try_from(session.total_seconds()).unwrap_or(i64::MAX)),
            config.display.phase1_label,
            session.phase1_seconds,
            config.display.phase2_label,
            session.phase2_seconds,
        );
    }
    timer.start(session)?;

    let mut listen_for_ctrl_c = true;
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                if args.json {
                    println!("{}", serde_json::to_string(&event)?);
                }
                if event.is_stop() {
                    break;
                }
            }
            signal = tokio::signal::ctrl_c(), if listen_for_ctrl_c => {
                listen_for_ctrl_c = on_ctrl_c(signal, || timer.stop());
            }
        }
    }

    if !args.json {
        println!();
    }
    Ok(())
}

/// Stops the session on Ctrl-C. Returns whether to keep listening; a
/// handler that could not be installed leaves the session running.
fn on_ctrl_c(signal: std::io::Result<()>, stop: impl FnOnce()) -> bool {
    match signal {
        Ok(()) => {
            stop();
            true
        }
        Err(e) => {
            warn!("failed to listen for Ctrl-C: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_c_stops_the_session() {
        let mut stopped = false;
        assert!(on_ctrl_c(Ok(()), || stopped = true));
        assert!(stopped);
    }

    #[test]
    fn failed_ctrl_c_listener_keeps_session_running() {
        let mut stopped = false;
        let err = std::io::Error::other("no signal driver");
        assert!(!on_ctrl_c(Err(err), || stopped = true));
        assert!(!stopped);
    }
}
