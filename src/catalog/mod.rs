//! Instrument Catalog
//!
//! Configuration and build-once construction of the generated instrument
//! population. The catalog is built exactly once at startup, registering
//! every instrument with the shared registry; afterwards only the
//! instruments' internal values change, never the sequences themselves.

mod instrument;
mod proptest;

pub use instrument::{CounterInstrument, HistogramInstrument, NativeHistogramSpec, DEFAULT_BUCKETS};

use std::collections::HashSet;
use std::time::Duration;

use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::exemplar::{CounterWithExemplar, HistogramWithExemplars};
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::metrics::histogram::Histogram;
use prometheus_client::registry::{Metric, Registry};
use tracing::debug;

use crate::error::{Error, Result};

/// Namespace prefix for plain instruments.
const PLAIN_NAMESPACE: &str = "metrics_gen";

/// Namespace prefix for exemplar-capable instruments. Gauges are registered
/// here as well even though they have no exemplar variant.
const EXEMPLAR_NAMESPACE: &str = "metrics_exemplars_gen";

// =============================================================================
// Configuration
// =============================================================================

/// Generator configuration: tick interval and population sizes per kind.
///
/// Immutable after startup.
#[derive(Debug, Clone)]
pub struct CatalogSpec {
    /// Interval between mutation sweeps
    pub evaluate_every: Duration,
    /// Number of plain counters
    pub num_counters: usize,
    /// Number of exemplar-capable counters
    pub num_counters_with_exemplars: usize,
    /// Number of gauges
    pub num_gauges: usize,
    /// Number of plain histograms
    pub num_histograms: usize,
    /// Number of exemplar-capable histograms
    pub num_histograms_with_exemplars: usize,
    /// Number of native high-resolution histograms
    pub num_native_histograms: usize,
    /// Bucket parameters shared by all native histograms
    pub native_histogram: NativeHistogramSpec,
}

impl Default for CatalogSpec {
    fn default() -> Self {
        Self {
            evaluate_every: Duration::from_secs(1),
            num_counters: 1,
            num_counters_with_exemplars: 1,
            num_gauges: 1,
            num_histograms: 1,
            num_histograms_with_exemplars: 1,
            num_native_histograms: 1,
            native_histogram: NativeHistogramSpec::default(),
        }
    }
}

impl CatalogSpec {
    /// Validate the configuration before building a catalog from it.
    pub fn validate(&self) -> Result<()> {
        if self.evaluate_every.is_zero() {
            return Err(Error::InvalidSpec(
                "evaluate-every must be a positive duration".to_owned(),
            ));
        }
        if self.native_histogram.bucket_factor <= 1.0 {
            return Err(Error::InvalidSpec(format!(
                "native histogram bucket factor must be > 1, got {}",
                self.native_histogram.bucket_factor
            )));
        }
        Ok(())
    }

    /// Total number of instruments this configuration describes.
    pub fn total_instruments(&self) -> usize {
        self.num_counters
            + self.num_counters_with_exemplars
            + self.num_gauges
            + self.num_histograms
            + self.num_histograms_with_exemplars
            + self.num_native_histograms
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Build-once instrument sequences, grouped by kind.
///
/// Within [`Self::counters`] the first `num_counters` slots are plain and the
/// remaining `num_counters_with_exemplars` slots carry exemplars; the same
/// split applies to [`Self::histograms`]. Gauges and native histograms have
/// no exemplar variant.
#[derive(Debug)]
pub struct Catalog {
    counters: Vec<CounterInstrument>,
    gauges: Vec<Gauge>,
    histograms: Vec<HistogramInstrument>,
    native_histograms: Vec<Histogram>,
}

impl Catalog {
    /// Construct and register every instrument described by `spec`.
    ///
    /// Construction order is deterministic: plain counters, exemplar
    /// counters, gauges, plain histograms, exemplar histograms, native
    /// histograms, ascending index within each group. Each instrument is
    /// registered with `registry` as it is created; a name collision aborts
    /// the build with [`Error::DuplicateInstrument`].
    pub fn build(spec: &CatalogSpec, registry: &mut Registry) -> Result<Self> {
        spec.validate()?;

        let mut names = HashSet::with_capacity(spec.total_instruments());

        let mut counters =
            Vec::with_capacity(spec.num_counters + spec.num_counters_with_exemplars);
        for i in 0..spec.num_counters {
            let counter = Counter::default();
            register_unique(
                registry,
                &mut names,
                format!("{PLAIN_NAMESPACE}_counter_{i}"),
                format!("Generated counter num {i}"),
                counter.clone(),
            )?;
            counters.push(CounterInstrument::Plain(counter));
        }
        for i in 0..spec.num_counters_with_exemplars {
            let counter = CounterWithExemplar::default();
            register_unique(
                registry,
                &mut names,
                format!("{EXEMPLAR_NAMESPACE}_counter_{i}"),
                format!("Generated counter exemplar num {i}"),
                counter.clone(),
            )?;
            counters.push(CounterInstrument::WithExemplar(counter));
        }

        let mut gauges = Vec::with_capacity(spec.num_gauges);
        for i in 0..spec.num_gauges {
            let gauge = Gauge::default();
            register_unique(
                registry,
                &mut names,
                format!("{EXEMPLAR_NAMESPACE}_gauge_{i}"),
                format!("Generated gauge num {i}"),
                gauge.clone(),
            )?;
            gauges.push(gauge);
        }

        let mut histograms =
            Vec::with_capacity(spec.num_histograms + spec.num_histograms_with_exemplars);
        for i in 0..spec.num_histograms {
            let histogram = Histogram::new(DEFAULT_BUCKETS.into_iter());
            register_unique(
                registry,
                &mut names,
                format!("{PLAIN_NAMESPACE}_histogram_{i}"),
                format!("Generated histogram num {i}"),
                histogram.clone(),
            )?;
            histograms.push(HistogramInstrument::Plain(histogram));
        }
        for i in 0..spec.num_histograms_with_exemplars {
            let histogram = HistogramWithExemplars::new(DEFAULT_BUCKETS.into_iter());
            register_unique(
                registry,
                &mut names,
                format!("{EXEMPLAR_NAMESPACE}_histogram_{i}"),
                format!("Generated histogram exemplar num {i}"),
                histogram.clone(),
            )?;
            histograms.push(HistogramInstrument::WithExemplar(histogram));
        }

        let mut native_histograms = Vec::with_capacity(spec.num_native_histograms);
        for i in 0..spec.num_native_histograms {
            let histogram = Histogram::new(spec.native_histogram.buckets());
            register_unique(
                registry,
                &mut names,
                format!("{PLAIN_NAMESPACE}_native_histogram_{i}"),
                format!("Generated native histogram num {i}"),
                histogram.clone(),
            )?;
            native_histograms.push(histogram);
        }

        debug!(
            counters = counters.len(),
            gauges = gauges.len(),
            histograms = histograms.len(),
            native_histograms = native_histograms.len(),
            "Catalog built"
        );

        Ok(Self {
            counters,
            gauges,
            histograms,
            native_histograms,
        })
    }

    /// All counter slots, plain first, exemplar-capable after.
    pub fn counters(&self) -> &[CounterInstrument] {
        &self.counters
    }

    /// All gauge slots.
    pub fn gauges(&self) -> &[Gauge] {
        &self.gauges
    }

    /// All histogram slots, plain first, exemplar-capable after.
    pub fn histograms(&self) -> &[HistogramInstrument] {
        &self.histograms
    }

    /// All native histogram slots.
    pub fn native_histograms(&self) -> &[Histogram] {
        &self.native_histograms
    }

    /// Total number of instruments in the catalog.
    pub fn len(&self) -> usize {
        self.counters.len()
            + self.gauges.len()
            + self.histograms.len()
            + self.native_histograms.len()
    }

    /// Whether the catalog holds no instruments at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Register `metric` under `name`, failing if the name was already taken.
///
/// The registry collaborator does not police collisions itself, so the
/// builder tracks every name it has handed out.
fn register_unique(
    registry: &mut Registry,
    names: &mut HashSet<String>,
    name: String,
    help: String,
    metric: impl Metric,
) -> Result<()> {
    if !names.insert(name.clone()) {
        return Err(Error::DuplicateInstrument(name));
    }
    registry.register(name, help, metric);
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn spec_with_counts(counts: [usize; 6]) -> CatalogSpec {
        CatalogSpec {
            num_counters: counts[0],
            num_counters_with_exemplars: counts[1],
            num_gauges: counts[2],
            num_histograms: counts[3],
            num_histograms_with_exemplars: counts[4],
            num_native_histograms: counts[5],
            ..CatalogSpec::default()
        }
    }

    #[test]
    fn test_build_registers_configured_counts() {
        let spec = spec_with_counts([2, 3, 4, 5, 6, 7]);
        let mut registry = Registry::default();
        let catalog = Catalog::build(&spec, &mut registry).unwrap();

        assert_eq!(catalog.counters().len(), 5);
        assert_eq!(catalog.gauges().len(), 4);
        assert_eq!(catalog.histograms().len(), 11);
        assert_eq!(catalog.native_histograms().len(), 7);
        assert_eq!(catalog.len(), spec.total_instruments());
    }

    #[test]
    fn test_empty_spec_registers_nothing() {
        let spec = spec_with_counts([0, 0, 0, 0, 0, 0]);
        let mut registry = Registry::default();
        let catalog = Catalog::build(&spec, &mut registry).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_exemplar_slots_follow_plain_slots() {
        let spec = spec_with_counts([2, 1, 0, 1, 2, 0]);
        let mut registry = Registry::default();
        let catalog = Catalog::build(&spec, &mut registry).unwrap();

        assert!(!catalog.counters()[0].supports_exemplars());
        assert!(!catalog.counters()[1].supports_exemplars());
        assert!(catalog.counters()[2].supports_exemplars());

        assert!(!catalog.histograms()[0].supports_exemplars());
        assert!(catalog.histograms()[1].supports_exemplars());
        assert!(catalog.histograms()[2].supports_exemplars());
    }

    #[test]
    fn test_exemplar_only_split_starts_at_index_zero() {
        let spec = spec_with_counts([0, 1, 0, 0, 0, 0]);
        let mut registry = Registry::default();
        let catalog = Catalog::build(&spec, &mut registry).unwrap();

        assert_eq!(catalog.counters().len(), 1);
        assert_matches!(catalog.counters()[0], CounterInstrument::WithExemplar(_));
    }

    #[test]
    fn test_duplicate_name_is_fatal() {
        let mut registry = Registry::default();
        let mut names = HashSet::new();

        register_unique(
            &mut registry,
            &mut names,
            "metrics_gen_counter_0".to_owned(),
            "Generated counter num 0".to_owned(),
            Counter::<u64>::default(),
        )
        .unwrap();

        let err = register_unique(
            &mut registry,
            &mut names,
            "metrics_gen_counter_0".to_owned(),
            "Generated counter num 0".to_owned(),
            Counter::<u64>::default(),
        )
        .unwrap_err();
        assert_matches!(err, Error::DuplicateInstrument(name) => {
            assert_eq!(name, "metrics_gen_counter_0");
        });
    }

    #[test]
    fn test_registered_names_are_unique() {
        // Plain and exemplar sub-populations share indexes but live in
        // different namespaces, so equal counts must not collide.
        let spec = spec_with_counts([3, 3, 3, 3, 3, 3]);
        let mut registry = Registry::default();
        let catalog = Catalog::build(&spec, &mut registry).unwrap();
        assert_eq!(catalog.len(), 18);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let spec = CatalogSpec {
            evaluate_every: Duration::ZERO,
            ..CatalogSpec::default()
        };
        let mut registry = Registry::default();
        let err = Catalog::build(&spec, &mut registry).unwrap_err();
        assert_matches!(err, Error::InvalidSpec(_));
    }

    #[test]
    fn test_bad_bucket_factor_rejected() {
        let spec = CatalogSpec {
            native_histogram: NativeHistogramSpec {
                bucket_factor: 1.0,
                ..NativeHistogramSpec::default()
            },
            ..CatalogSpec::default()
        };
        let mut registry = Registry::default();
        let err = Catalog::build(&spec, &mut registry).unwrap_err();
        assert_matches!(err, Error::InvalidSpec(_));
    }
}
