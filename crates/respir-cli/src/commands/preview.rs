use clap::Args;
use respir_core::{format_time, simulate, Config};

use super::SessionArgs;

#[derive(Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub session: SessionArgs,
    /// Print switch and end ticks instead of the full JSON trace
    #[arg(long)]
    pub summary: bool,
}

pub fn run(args: PreviewArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let trace = simulate(args.session.resolve(&config))?;

    if args.summary {
        let switches = trace.switch_ticks();
        println!("length: {}", clock(trace.tick_count()));
        println!("phase switches: {}", switches.len());
        for tick in switches {
            println!("  switch at {}", clock(tick));
        }
        if let Some(end) = trace.end_tick() {
            println!("end at {}", clock(end));
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&trace)?);
    }
    Ok(())
}

fn clock(ticks: u64) -> String {
    format_time(i64::try_from(ticks).unwrap_or(i64::MAX))
}
