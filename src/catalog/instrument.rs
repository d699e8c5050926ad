//! Instrument Handles
//!
//! Capability variants over the `prometheus-client` primitives. Whether an
//! instrument supports exemplar tagging is decided once, at construction,
//! by which variant the catalog builder picks for its slot; callers never
//! need a per-call capability check.

use std::time::Duration;

use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::exemplar::{CounterWithExemplar, HistogramWithExemplars};
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};

use crate::exemplar::ExemplarLabels;

/// Classic Prometheus default bucket boundaries, used for plain and
/// exemplar-capable histograms.
pub const DEFAULT_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Lower bound of the exponential bucket ladder backing native histograms.
const NATIVE_BUCKET_START: f64 = 0.001;

/// A counter slot in the catalog.
///
/// Plain slots only ever receive bare deltas; exemplar slots only ever
/// receive exemplar-tagged deltas.
#[derive(Debug, Clone)]
pub enum CounterInstrument {
    Plain(Counter),
    WithExemplar(CounterWithExemplar<ExemplarLabels>),
}

impl CounterInstrument {
    /// Current accumulated value, independent of variant.
    pub fn value(&self) -> u64 {
        match self {
            Self::Plain(counter) => counter.get(),
            Self::WithExemplar(counter) => counter.get().0,
        }
    }

    /// Whether this slot carries exemplars on its additions.
    pub fn supports_exemplars(&self) -> bool {
        matches!(self, Self::WithExemplar(_))
    }
}

/// A histogram slot in the catalog.
#[derive(Debug, Clone)]
pub enum HistogramInstrument {
    Plain(Histogram),
    WithExemplar(HistogramWithExemplars<ExemplarLabels>),
}

impl HistogramInstrument {
    /// Whether this slot carries exemplars on its observations.
    pub fn supports_exemplars(&self) -> bool {
        matches!(self, Self::WithExemplar(_))
    }
}

/// Parameters for native (high-resolution) histograms.
///
/// The bucket ladder grows exponentially by `bucket_factor` per bucket and is
/// hard-capped at `max_buckets`, bounding memory under highly variable data.
/// `min_reset` is the minimum duration between automatic resets of the sparse
/// bucket schedule; the reset policy itself belongs to the registry
/// collaborator, this type only carries the parameters through.
#[derive(Debug, Clone)]
pub struct NativeHistogramSpec {
    /// Growth factor between adjacent buckets, must be > 1
    pub bucket_factor: f64,
    /// Hard cap on the number of buckets
    pub max_buckets: u16,
    /// Minimum duration between sparse-schedule resets
    pub min_reset: Duration,
}

impl Default for NativeHistogramSpec {
    fn default() -> Self {
        Self {
            bucket_factor: 1.1,
            max_buckets: 150,
            min_reset: Duration::from_secs(3600),
        }
    }
}

impl NativeHistogramSpec {
    /// Exponential bucket ladder honoring the growth factor and cap.
    pub(crate) fn buckets(&self) -> impl Iterator<Item = f64> {
        exponential_buckets(NATIVE_BUCKET_START, self.bucket_factor, self.max_buckets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_bucket_ladder_respects_cap_and_factor() {
        let spec = NativeHistogramSpec::default();
        let buckets: Vec<f64> = spec.buckets().collect();
        assert_eq!(buckets.len(), 150);
        // Adjacent buckets grow by the configured factor.
        let ratio = buckets[1] / buckets[0];
        assert!((ratio - spec.bucket_factor).abs() < 1e-9);
    }

    #[test]
    fn test_counter_variant_capability() {
        let plain = CounterInstrument::Plain(Counter::default());
        assert!(!plain.supports_exemplars());
        assert_eq!(plain.value(), 0);

        let tagged = CounterInstrument::WithExemplar(CounterWithExemplar::default());
        assert!(tagged.supports_exemplars());
        assert_eq!(tagged.value(), 0);
    }
}
