use crate::device::Device;

/// A single-shot marker on one device's execution queue.
///
/// An event starts out uncreated and only materializes device-side resources
/// on the first `record`. Recording enqueues the marker at the current
/// position of the device's active stream; the timestamp behind it is only
/// meaningful once the device has actually executed up to that point.
pub trait DeviceEvent: Default {
    /// Scoped device-context switch. Dropping the guard restores the
    /// previously active device, on every exit path.
    type DeviceGuard;

    /// Makes `device` the active device for the current thread. An event
    /// recorded while the wrong device is active lands on the wrong timeline.
    fn activate(device: Device) -> Self::DeviceGuard;

    /// Enqueues the marker at the current position of the active stream.
    /// The first call transitions the event to created; later calls move the
    /// marker forward, discarding the previous position.
    fn record(&mut self);

    /// Whether `record` has ever been called. Pure query.
    fn is_created(&self) -> bool;

    /// Blocks the calling thread until the device has executed up to the
    /// marker. Callers must check `is_created` first; there is no timeout,
    /// so a fenced device hangs the caller indefinitely.
    fn synchronize(&self);

    /// Device time from `self` to `end`, in milliseconds. Only valid once
    /// both events have been synchronized. On real hardware this query can
    /// stall the device pipeline; see [`MeasurePolicy`].
    fn elapsed_ms(&self, end: &Self) -> f64;
}

/// How a timer obtains the device-side elapsed time between two events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasurePolicy {
    /// Report 0 instead of querying the hardware. Querying elapsed time can
    /// stall the device pipeline unpredictably, so this is the default;
    /// consumers still learn whether a phase pair was measurable at all.
    #[default]
    FastUnsafeZero,
    /// Query the true hardware elapsed time, accepting the stall risk.
    AccurateBlocking,
}
