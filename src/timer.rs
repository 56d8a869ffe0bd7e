use crate::device::Device;
use crate::event::{DeviceEvent, MeasurePolicy};
use crate::phase::Phase;
use std::time::Instant;

const MILLIS_TO_NANOS: f64 = 1_000_000.0;

/// Host-side wall-clock bookkeeping, kept in sync with device-side records so
/// downstream consumers can correlate the two timelines.
#[derive(Debug, Default)]
pub struct HostTimer {
    recorded: [Option<Instant>; Phase::COUNT],
}

impl HostTimer {
    /// Snapshots the host clock for `phase`, overwriting any prior snapshot.
    pub fn record(&mut self, phase: Phase) {
        self.recorded[phase.index()] = Some(Instant::now());
    }

    /// Host-clock nanoseconds from `start` to `end`, or `None` if either
    /// phase was never recorded or the clock read backwards.
    pub fn measure(&self, start: Phase, end: Phase) -> Option<u64> {
        let start_at = self.recorded[start.index()]?;
        let end_at = self.recorded[end.index()]?;
        let elapsed = end_at.checked_duration_since(start_at)?;
        Some(elapsed.as_nanos() as u64)
    }
}

/// Backend-agnostic phase timing surface handed out by the registry.
///
/// One instance per training thread; `record` and `measure` are called
/// repeatedly across steps, mutating the same underlying events each time.
pub trait Timer: Send {
    /// Marks `phase` at the current position of the bound device's stream.
    /// Non-blocking: only enqueues a marker.
    fn record(&mut self, phase: Phase);

    /// Device-side nanoseconds from `start` to `end`, or `None` when the
    /// pair is not measurable this step. This is the single blocking point:
    /// it waits, unbounded, for the device to reach both markers.
    ///
    /// Chronological ordering of `start` and `end` is the caller's job;
    /// measuring markers left over from a prior step measures stale work.
    fn measure(&mut self, start: Phase, end: Phase) -> Option<u64>;

    /// The device this timer is bound to.
    fn device(&self) -> Device;
}

impl std::fmt::Debug for dyn Timer + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timer").field("device", &self.device()).finish()
    }
}

/// A [`Timer`] over any [`DeviceEvent`] backend: one event per phase, all
/// bound to the same device.
pub struct EventTimer<E: DeviceEvent> {
    device: Device,
    host: HostTimer,
    policy: MeasurePolicy,
    events: [E; Phase::COUNT],
}

impl<E: DeviceEvent> EventTimer<E> {
    pub fn new(device: Device) -> Self {
        Self::with_policy(device, MeasurePolicy::default())
    }

    pub fn with_policy(device: Device, policy: MeasurePolicy) -> Self {
        Self {
            device,
            host: HostTimer::default(),
            policy,
            events: std::array::from_fn(|_| E::default()),
        }
    }

    /// The host-side snapshots taken alongside the device-side records.
    pub fn host(&self) -> &HostTimer {
        &self.host
    }
}

impl<E: DeviceEvent + Send> Timer for EventTimer<E> {
    fn record(&mut self, phase: Phase) {
        // Host-side time first, so the two timelines share a record point
        self.host.record(phase);
        let _active = E::activate(self.device);
        self.events[phase.index()].record();
    }

    fn measure(&mut self, start: Phase, end: Phase) -> Option<u64> {
        let _active = E::activate(self.device);
        let start_event = &self.events[start.index()];
        let end_event = &self.events[end.index()];

        // Expected on skipped phases or the first step, not an error
        if !start_event.is_created() || !end_event.is_created() {
            return None;
        }

        start_event.synchronize();
        end_event.synchronize();

        let millis = match self.policy {
            MeasurePolicy::FastUnsafeZero => 0.0,
            MeasurePolicy::AccurateBlocking => start_event.elapsed_ms(end_event),
        };

        // Timestamp sources are not guaranteed monotonic on every backend
        if millis < 0.0 {
            return None;
        }
        Some((millis * MILLIS_TO_NANOS).round() as u64)
    }

    fn device(&self) -> Device {
        self.device
    }
}
