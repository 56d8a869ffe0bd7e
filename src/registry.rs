use crate::device::Device;
use crate::timer::Timer;
use fxhash::FxHashMap;
use spdlog::{info, warn};
use std::collections::hash_map::Entry;
use thiserror::Error;

type TimerFactory = Box<dyn Fn(Device) -> Box<dyn Timer> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// Recoverable: callers are expected to fall back to a host-only timer.
    #[error("no phase timer registered for backend `{0}`")]
    UnknownBackend(String),
}

/// Maps a device-backend tag to a factory producing that backend's [`Timer`].
///
/// The registry is passed explicitly to whoever needs it rather than living
/// in a process global. The lifecycle contract stays the same either way:
/// every `register` call happens single-threaded at startup, before the first
/// training step; after that the registry is read-only and safe to share
/// across threads.
#[derive(Default)]
pub struct TimerRegistry {
    factories: FxHashMap<&'static str, TimerFactory>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `tag` with a timer factory. First registration wins;
    /// duplicates are ignored so module load order cannot change which
    /// implementation serves a backend.
    pub fn register<F>(&mut self, tag: &'static str, factory: F)
    where
        F: Fn(Device) -> Box<dyn Timer> + Send + Sync + 'static,
    {
        match self.factories.entry(tag) {
            Entry::Vacant(slot) => {
                slot.insert(Box::new(factory));
                info!("[TimerRegistry] registered backend `{}`", tag);
            }
            Entry::Occupied(_) => {
                warn!("[TimerRegistry] duplicate registration for `{}` ignored", tag);
            }
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// Builds a new timer for `tag`, bound to `device`.
    pub fn create(&self, tag: &str, device: Device) -> Result<Box<dyn Timer>, TimerError> {
        let factory = self
            .factories
            .get(tag)
            .ok_or_else(|| TimerError::UnknownBackend(tag.to_string()))?;
        Ok(factory(device))
    }
}
