use clap::Parser;
use ddp_timer::sim;
use ddp_timer::{Device, MeasurePolicy, Phase, StepStats, TimerRegistry};
use spdlog::prelude::*;

/// Simulates a data-parallel training loop and reports per-phase latency.
#[derive(Parser)]
struct Args {
    /// Number of training steps to simulate.
    #[arg(long, default_value_t = 1000)]
    steps: u64,

    /// Device index to bind the timer to.
    #[arg(long, default_value_t = 0)]
    device_index: u32,

    /// Query the true device elapsed time instead of reporting zero.
    #[arg(long)]
    accurate: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let policy = if args.accurate {
        MeasurePolicy::AccurateBlocking
    } else {
        MeasurePolicy::FastUnsafeZero
    };

    // Registration happens once, before the first step
    let mut registry = TimerRegistry::new();
    sim::register_with_policy(&mut registry, policy);

    let device = Device::new(sim::BACKEND, args.device_index);
    let mut timer = registry.create(sim::BACKEND, device)?;
    let mut stats = StepStats::new();

    info!("[System] Simulating {} training steps on {}...", args.steps, device);

    for step in 0..args.steps {
        timer.record(Phase::ForwardStart);
        sim::advance(device, 4_000_000 + (step % 7) as i64 * 250_000);

        timer.record(Phase::BackwardComputeStart);
        sim::advance(device, 9_000_000 + (step % 13) as i64 * 500_000);
        timer.record(Phase::BackwardComputeEnd);

        timer.record(Phase::BackwardCommStart);
        sim::advance(device, 2_000_000 + (step % 5) as i64 * 125_000);
        timer.record(Phase::BackwardCommEnd);

        stats.measure_into(
            timer.as_mut(),
            Phase::ForwardStart,
            Phase::BackwardComputeStart,
        );
        stats.measure_into(
            timer.as_mut(),
            Phase::BackwardComputeStart,
            Phase::BackwardComputeEnd,
        );
        stats.measure_into(
            timer.as_mut(),
            Phase::BackwardCommStart,
            Phase::BackwardCommEnd,
        );
    }

    stats.report();
    info!("[System] Done!");

    Ok(())
}
