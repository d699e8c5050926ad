//! Property-Based Tests for the Instrument Catalog
//!
//! Uses proptest to verify catalog construction and the random generators
//! across a wide range of configurations.
//!
//! # Test Properties
//!
//! 1. **Population Counts**: every configuration registers exactly the
//!    configured number of instruments per kind
//! 2. **Split Policy**: plain slots always precede exemplar slots
//! 3. **Monotonicity**: counters never decrease across a sweep
//! 4. **Random Strings**: requested length, 52-letter alphabet only

#![cfg(test)]

use proptest::prelude::*;

use std::sync::Arc;

use prometheus_client::registry::Registry;

use super::{Catalog, CatalogSpec};
use crate::driver::TickDriver;
use crate::exemplar::random_string;

/// Strategy for generating small population counts per kind.
fn counts_strategy() -> impl Strategy<Value = [usize; 6]> {
    [0usize..8, 0usize..8, 0usize..8, 0usize..8, 0usize..8, 0usize..8]
}

fn spec_from_counts(counts: [usize; 6]) -> CatalogSpec {
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

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: every configuration builds exactly the configured
    /// population, with plain slots ahead of exemplar slots.
    #[test]
    fn prop_catalog_population_matches_spec(counts in counts_strategy()) {
        let spec = spec_from_counts(counts);
        let mut registry = Registry::default();
        let catalog = Catalog::build(&spec, &mut registry).unwrap();

        prop_assert_eq!(catalog.counters().len(), counts[0] + counts[1]);
        prop_assert_eq!(catalog.gauges().len(), counts[2]);
        prop_assert_eq!(catalog.histograms().len(), counts[3] + counts[4]);
        prop_assert_eq!(catalog.native_histograms().len(), counts[5]);

        for (i, counter) in catalog.counters().iter().enumerate() {
            prop_assert_eq!(counter.supports_exemplars(), i >= counts[0]);
        }
        for (i, histogram) in catalog.histograms().iter().enumerate() {
            prop_assert_eq!(histogram.supports_exemplars(), i >= counts[3]);
        }
    }

    /// Property: a sweep touches every counter with a delta in [0,9].
    #[test]
    fn prop_sweep_keeps_counters_monotone(counts in counts_strategy()) {
        let spec = spec_from_counts(counts);
        let mut registry = Registry::default();
        let catalog = Arc::new(Catalog::build(&spec, &mut registry).unwrap());
        let driver = TickDriver::new(catalog.clone(), spec.evaluate_every);

        let before: Vec<u64> = catalog.counters().iter().map(|c| c.value()).collect();
        driver.tick();
        for (counter, before) in catalog.counters().iter().zip(before) {
            let after = counter.value();
            prop_assert!(after >= before);
            prop_assert!(after - before <= 9);
        }
    }

    /// Property: random strings have the requested length and only use the
    /// 52-letter alphabet.
    #[test]
    fn prop_random_string_shape(n in 0usize..64) {
        let s = random_string(n);
        prop_assert_eq!(s.len(), n);
        prop_assert!(s.chars().all(|c| c.is_ascii_alphabetic()));
    }
}
