//! In-memory simulated accelerator backend.
//!
//! Each simulated device has its own timeline that tests, benches, and demos
//! advance explicitly. Markers "execute" the moment they are enqueued, so
//! `synchronize` never actually waits; what remains is the full record /
//! is-created / difference protocol over a deterministic clock.

use crate::device::Device;
use crate::event::{DeviceEvent, MeasurePolicy};
use crate::registry::TimerRegistry;
use crate::timer::EventTimer;
use fxhash::FxHashMap;
use std::cell::Cell;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, LazyLock, Mutex};

/// Tag under which the simulated backend registers its timer factory.
pub const BACKEND: &str = "sim";

struct SimTimeline {
    now_ns: AtomicI64,
}

static TIMELINES: LazyLock<Mutex<FxHashMap<Device, Arc<SimTimeline>>>> =
    LazyLock::new(|| Mutex::new(FxHashMap::default()));

fn timeline(device: Device) -> Arc<SimTimeline> {
    TIMELINES
        .lock()
        .unwrap()
        .entry(device)
        .or_insert_with(|| {
            Arc::new(SimTimeline {
                now_ns: AtomicI64::new(0),
            })
        })
        .clone()
}

/// Advances `device`'s timeline by `delta_ns`. A negative delta rewinds it,
/// which is how tests fault-inject a non-monotonic timestamp source.
pub fn advance(device: Device, delta_ns: i64) {
    timeline(device).now_ns.fetch_add(delta_ns, Ordering::SeqCst);
}

thread_local! {
    static ACTIVE: Cell<Option<Device>> = const { Cell::new(None) };
}

/// Restores the previously active device when dropped.
pub struct SimDeviceGuard {
    prev: Option<Device>,
}

impl Drop for SimDeviceGuard {
    fn drop(&mut self) {
        ACTIVE.with(|active| active.set(self.prev));
    }
}

/// A marker on a simulated device's timeline. Uncreated until first `record`.
#[derive(Debug, Default)]
pub struct SimEvent {
    mark_ns: Option<i64>,
}

impl DeviceEvent for SimEvent {
    type DeviceGuard = SimDeviceGuard;

    fn activate(device: Device) -> SimDeviceGuard {
        let prev = ACTIVE.with(|active| active.replace(Some(device)));
        SimDeviceGuard { prev }
    }

    fn record(&mut self) {
        let device = ACTIVE
            .with(|active| active.get())
            .expect("sim event recorded outside a device scope");
        self.mark_ns = Some(timeline(device).now_ns.load(Ordering::SeqCst));
    }

    fn is_created(&self) -> bool {
        self.mark_ns.is_some()
    }

    fn synchronize(&self) {
        // Simulated markers execute as soon as they are enqueued, so the
        // device has already reached this position.
    }

    fn elapsed_ms(&self, end: &SimEvent) -> f64 {
        let start_ns = self.mark_ns.expect("elapsed_ms on an unrecorded event");
        let end_ns = end.mark_ns.expect("elapsed_ms on an unrecorded event");
        (end_ns - start_ns) as f64 / 1_000_000.0
    }
}

/// Installs the simulated backend's timer factory under [`BACKEND`].
pub fn register(registry: &mut TimerRegistry) {
    register_with_policy(registry, MeasurePolicy::default());
}

/// Same as [`register`], but every produced timer uses `policy`.
pub fn register_with_policy(registry: &mut TimerRegistry, policy: MeasurePolicy) {
    registry.register(BACKEND, move |device| {
        Box::new(EventTimer::<SimEvent>::with_policy(device, policy))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_restores_previous_device() {
        let outer = Device::new(BACKEND, 100);
        let inner = Device::new(BACKEND, 101);

        let _outer_scope = SimEvent::activate(outer);
        {
            let _inner_scope = SimEvent::activate(inner);
            assert_eq!(ACTIVE.with(|active| active.get()), Some(inner));
        }
        assert_eq!(ACTIVE.with(|active| active.get()), Some(outer));
    }

    #[test]
    fn test_record_captures_timeline_position() {
        let device = Device::new(BACKEND, 102);
        let _scope = SimEvent::activate(device);

        let mut start = SimEvent::default();
        assert!(!start.is_created());
        start.record();
        assert!(start.is_created());

        advance(device, 5_000_000);
        let mut end = SimEvent::default();
        end.record();

        assert_eq!(start.elapsed_ms(&end), 5.0);
    }

    #[test]
    fn test_timelines_are_per_device() {
        let near = Device::new(BACKEND, 103);
        let far = Device::new(BACKEND, 104);

        let mut on_near = SimEvent::default();
        let mut on_far = SimEvent::default();
        {
            let _scope = SimEvent::activate(near);
            on_near.record();
        }
        {
            let _scope = SimEvent::activate(far);
            on_far.record();
        }

        advance(near, 1_000_000);
        let mut later_on_far = SimEvent::default();
        {
            let _scope = SimEvent::activate(far);
            later_on_far.record();
        }
        // Advancing `near` must not move `far`'s timeline
        assert_eq!(on_far.elapsed_ms(&later_on_far), 0.0);
    }
}
