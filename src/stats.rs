use crate::phase::Phase;
use crate::timer::Timer;
use fxhash::FxHashMap;
use hdrhistogram::Histogram;
use spdlog::info;

/// Summary of the durations observed for one phase pair. All durations are
/// nanoseconds.
///
/// `count` covers measurable steps only; steps where the pair was absent are
/// tracked separately, since absent means "not measurable", never zero.
#[derive(Debug, Clone, Default)]
pub struct LatencySummary {
    pub count: u64,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub p50: u64,
    pub p90: u64,
    pub p99: u64,
    pub p999: u64,
}

/// Aggregates per-step phase durations into HdrHistograms, one per
/// (start, end) phase pair.
pub struct StepStats {
    histograms: FxHashMap<(Phase, Phase), Histogram<u64>>,
    absent: FxHashMap<(Phase, Phase), u64>,
}

impl StepStats {
    pub fn new() -> Self {
        Self {
            histograms: FxHashMap::default(),
            absent: FxHashMap::default(),
        }
    }

    pub fn observe(&mut self, start: Phase, end: Phase, nanos: u64) {
        let histogram = self.histograms.entry((start, end)).or_insert_with(|| {
            // Range: 1ns to 1,000s (1,000,000,000,000 ns)
            // 3 significant figures
            Histogram::<u64>::new_with_bounds(1, 1_000_000_000_000, 3).unwrap()
        });
        histogram.record(nanos.clamp(1, 1_000_000_000_000)).unwrap();
    }

    /// Runs `timer.measure(start, end)` and records the duration if the pair
    /// was measurable this step. Returns the measurement either way.
    pub fn measure_into(
        &mut self,
        timer: &mut dyn Timer,
        start: Phase,
        end: Phase,
    ) -> Option<u64> {
        match timer.measure(start, end) {
            Some(nanos) => {
                self.observe(start, end, nanos);
                Some(nanos)
            }
            None => {
                *self.absent.entry((start, end)).or_insert(0) += 1;
                None
            }
        }
    }

    /// Steps on which the pair was not measurable.
    pub fn absent_count(&self, start: Phase, end: Phase) -> u64 {
        self.absent.get(&(start, end)).copied().unwrap_or(0)
    }

    pub fn summary(&self, start: Phase, end: Phase) -> Option<LatencySummary> {
        let histogram = self.histograms.get(&(start, end))?;
        if histogram.is_empty() {
            return None;
        }
        Some(LatencySummary {
            count: histogram.len(),
            min: histogram.min(),
            max: histogram.max(),
            mean: histogram.mean(),
            p50: histogram.value_at_quantile(0.5),
            p90: histogram.value_at_quantile(0.9),
            p99: histogram.value_at_quantile(0.99),
            p999: histogram.value_at_quantile(0.999),
        })
    }

    pub fn format_summary(&self, start: Phase, end: Phase) -> String {
        let Some(summary) = self.summary(start, end) else {
            return "no measurable steps yet".into();
        };
        format!(
            "\tcount={},\tmin={},\tmax={},\tmean={},\tp50={},\tp90={},\tp99={},\tp999={}",
            summary.count,
            Self::format_duration(summary.min as f64),
            Self::format_duration(summary.max as f64),
            Self::format_duration(summary.mean),
            Self::format_duration(summary.p50 as f64),
            Self::format_duration(summary.p90 as f64),
            Self::format_duration(summary.p99 as f64),
            Self::format_duration(summary.p999 as f64),
        )
    }

    /// Logs one line per phase pair that has been observed or skipped.
    pub fn report(&self) {
        let mut pairs: Vec<(Phase, Phase)> = self
            .histograms
            .keys()
            .chain(self.absent.keys())
            .copied()
            .collect();
        pairs.sort_by_key(|(start, end)| (start.index(), end.index()));
        pairs.dedup();

        for (start, end) in pairs {
            info!(
                "[Latency/{}..{}]{} (absent={})",
                start,
                end,
                self.format_summary(start, end),
                self.absent_count(start, end),
            );
        }
    }

    fn format_duration(nanos: f64) -> String {
        const MICRO: f64 = 1_000.0;
        const MILLI: f64 = 1_000_000.0;
        const SECOND: f64 = 1_000_000_000.0;
        match nanos {
            n if n < MICRO => format!("{n:.0}ns"),
            n if n < MILLI => format!("{:.2}us", n / MICRO),
            n if n < SECOND => format!("{:.2}ms", n / MILLI),
            n => format!("{:.3}s", n / SECOND),
        }
    }
}

impl Default for StepStats {
    fn default() -> Self {
        Self::new()
    }
}
