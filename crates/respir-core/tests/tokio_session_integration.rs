//! Integration tests for sessions running on the tokio scheduler with a
//! paused clock.

use std::time::Duration;

use respir_core::report::{NullDisplay, SilentCues};
use respir_core::{Event, Phase, PhaseTimer, SessionConfig, StopReason, TokioScheduler};

#[tokio::test(start_paused = true)]
async fn test_session_runs_to_completion() {
    let timer = PhaseTimer::new(TokioScheduler::current().unwrap(), NullDisplay, SilentCues);
    let mut events = timer.subscribe();
    timer.start(SessionConfig::new(1, 4, 6)).unwrap();

    let mut switches = 0;
    let reason = loop {
        match events.recv().await.expect("timer dropped its subscribers") {
            Event::PhaseSwitched { .. } => switches += 1,
            Event::TimerStopped { reason, .. } => break reason,
            _ => {}
        }
    };

    assert_eq!(reason, StopReason::Completed);
    assert_eq!(switches, 10);
    assert_eq!(timer.phase(), Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_stop_halts_ticks() {
    let timer = PhaseTimer::new(TokioScheduler::current().unwrap(), NullDisplay, SilentCues);
    timer.start(SessionConfig::new(1, 4, 6)).unwrap();

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(timer.state().total_seconds_remaining, 58);

    timer.stop();
    let frozen = timer.state();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(timer.state(), frozen);
    assert_eq!(frozen.current_phase, Phase::Idle);
}
