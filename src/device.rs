use std::fmt;

/// Identifies one accelerator managed by the process.
///
/// The backend tag matches the key used when the backend's timer factory was
/// registered, so orchestration code can go from a device straight to a timer
/// without naming the concrete backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Device {
    pub backend: &'static str,
    pub index: u32,
}

impl Device {
    pub fn new(backend: &'static str, index: u32) -> Self {
        Self { backend, index }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.backend, self.index)
    }
}
