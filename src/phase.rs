/// A named point in a data-parallel training step used as a timing boundary.
///
/// The set is closed: every timer implementation owns exactly one event per
/// variant, so adding a phase means touching every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Phase {
    ForwardStart,
    BackwardComputeStart,
    BackwardComputeEnd,
    BackwardCommStart,
    BackwardCommEnd,
}

impl Phase {
    pub const COUNT: usize = 5;

    pub const ALL: [Phase; Phase::COUNT] = [
        Phase::ForwardStart,
        Phase::BackwardComputeStart,
        Phase::BackwardComputeEnd,
        Phase::BackwardCommStart,
        Phase::BackwardCommEnd,
    ];

    /// Dense index into per-phase tables.
    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::ForwardStart => "forward_start",
            Phase::BackwardComputeStart => "backward_compute_start",
            Phase::BackwardComputeEnd => "backward_compute_end",
            Phase::BackwardCommStart => "backward_comm_start",
            Phase::BackwardCommEnd => "backward_comm_end",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
