mod device;
mod event;
mod phase;
mod registry;
pub mod sim;
mod stats;
mod timer;

pub use crate::device::Device;
pub use crate::event::{DeviceEvent, MeasurePolicy};
pub use crate::phase::Phase;
pub use crate::registry::{TimerError, TimerRegistry};
pub use crate::stats::{LatencySummary, StepStats};
pub use crate::timer::{EventTimer, HostTimer, Timer};
