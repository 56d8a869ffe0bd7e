use ddp_timer::sim::{self, SimEvent};
use ddp_timer::{Device, EventTimer, MeasurePolicy, Phase, Timer};

fn sim_device(index: u32) -> Device {
    Device::new(sim::BACKEND, index)
}

#[test]
fn test_measure_absent_when_nothing_recorded() {
    let mut timer = EventTimer::<SimEvent>::new(sim_device(0));

    for start in Phase::ALL {
        for end in Phase::ALL {
            assert_eq!(timer.measure(start, end), None);
        }
    }
}

#[test]
fn test_measure_absent_when_only_one_recorded() {
    let mut timer = EventTimer::<SimEvent>::new(sim_device(1));
    timer.record(Phase::ForwardStart);

    assert_eq!(
        timer.measure(Phase::ForwardStart, Phase::BackwardComputeStart),
        None
    );
    assert_eq!(
        timer.measure(Phase::BackwardComputeStart, Phase::ForwardStart),
        None
    );
}

#[test]
fn test_fast_policy_reports_zero_once_both_recorded() {
    let device = sim_device(2);
    let mut timer = EventTimer::<SimEvent>::new(device);

    timer.record(Phase::BackwardComputeStart);
    sim::advance(device, 7_000_000);
    timer.record(Phase::BackwardComputeEnd);

    // Measurable, but the fast policy never queries the hardware
    assert_eq!(
        timer.measure(Phase::BackwardComputeStart, Phase::BackwardComputeEnd),
        Some(0)
    );
}

#[test]
fn test_accurate_policy_reports_device_elapsed() {
    let device = sim_device(3);
    let mut timer = EventTimer::<SimEvent>::with_policy(device, MeasurePolicy::AccurateBlocking);

    timer.record(Phase::BackwardCommStart);
    sim::advance(device, 5_000_000);
    timer.record(Phase::BackwardCommEnd);

    assert_eq!(
        timer.measure(Phase::BackwardCommStart, Phase::BackwardCommEnd),
        Some(5_000_000)
    );
}

#[test]
fn test_accurate_policy_keeps_nanosecond_exactness() {
    let device = sim_device(8);
    let mut timer = EventTimer::<SimEvent>::with_policy(device, MeasurePolicy::AccurateBlocking);

    timer.record(Phase::BackwardComputeStart);
    // Long enough that a single-precision millisecond reading would round
    // away the trailing nanosecond
    sim::advance(device, 20_000_001);
    timer.record(Phase::BackwardComputeEnd);

    assert_eq!(
        timer.measure(Phase::BackwardComputeStart, Phase::BackwardComputeEnd),
        Some(20_000_001)
    );
}

#[test]
fn test_negative_device_reading_maps_to_absent() {
    let device = sim_device(4);
    let mut timer = EventTimer::<SimEvent>::with_policy(device, MeasurePolicy::AccurateBlocking);

    timer.record(Phase::ForwardStart);
    // Fault-inject a non-monotonic timestamp source
    sim::advance(device, -50_000);
    timer.record(Phase::BackwardComputeStart);

    assert_eq!(
        timer.measure(Phase::ForwardStart, Phase::BackwardComputeStart),
        None
    );
}

#[test]
fn test_rerecord_moves_the_marker() {
    let device = sim_device(5);
    let mut timer = EventTimer::<SimEvent>::with_policy(device, MeasurePolicy::AccurateBlocking);

    timer.record(Phase::BackwardComputeStart);
    sim::advance(device, 10_000_000);

    // Re-record: the old marker position is discarded
    timer.record(Phase::BackwardComputeStart);
    sim::advance(device, 2_000_000);
    timer.record(Phase::BackwardComputeEnd);

    assert_eq!(
        timer.measure(Phase::BackwardComputeStart, Phase::BackwardComputeEnd),
        Some(2_000_000)
    );
}

#[test]
fn test_timer_reused_across_steps() {
    let device = sim_device(6);
    let mut timer = EventTimer::<SimEvent>::with_policy(device, MeasurePolicy::AccurateBlocking);

    for step_cost_ns in [1_000_000, 3_000_000, 2_000_000] {
        timer.record(Phase::BackwardComputeStart);
        sim::advance(device, step_cost_ns);
        timer.record(Phase::BackwardComputeEnd);

        assert_eq!(
            timer.measure(Phase::BackwardComputeStart, Phase::BackwardComputeEnd),
            Some(step_cost_ns as u64)
        );
    }
}

#[test]
fn test_host_timestamps_recorded_alongside_device_marks() {
    let mut timer = EventTimer::<SimEvent>::new(sim_device(7));

    assert_eq!(
        timer.host().measure(Phase::ForwardStart, Phase::BackwardCommEnd),
        None
    );

    timer.record(Phase::ForwardStart);
    timer.record(Phase::BackwardCommEnd);

    assert!(
        timer
            .host()
            .measure(Phase::ForwardStart, Phase::BackwardCommEnd)
            .is_some()
    );
}
