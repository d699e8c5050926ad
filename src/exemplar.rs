//! Exemplar Label Generation
//!
//! Randomized label sets attached to exemplar-capable observations, plus the
//! random alphabetic string generator backing them.

use rand::Rng;

/// Label set attached to an exemplar-tagged observation.
///
/// `prometheus-client` encodes `Vec<(String, String)>` directly as an
/// OpenMetrics label set, which lets us keep the non-identifier `TraceID`
/// key the scrape output is expected to carry.
pub type ExemplarLabels = Vec<(String, String)>;

/// Constant `job` label value identifying this generator.
pub const JOB_VALUE: &str = "generator";

/// The 52 ASCII letters random label values are drawn from.
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Produce a fresh exemplar label set.
///
/// Exactly three keys: a random 10-character `TraceID`, the constant `job`
/// label, and a random 5-character `random_label`. A new set is generated for
/// every tagged observation; sets are never cached or reused.
pub fn exemplar_labels() -> ExemplarLabels {
    vec![
        ("TraceID".to_owned(), random_string(10)),
        ("job".to_owned(), JOB_VALUE.to_owned()),
        ("random_label".to_owned(), random_string(5)),
    ]
}

/// Generate a string of exactly `n` characters drawn uniformly from the
/// 52-letter alphabet. Not cryptographically secure.
pub fn random_string(n: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_string_empty() {
        assert_eq!(random_string(0), "");
    }

    #[test]
    fn test_random_string_length_and_alphabet() {
        let s = random_string(5);
        assert_eq!(s.len(), 5);
        assert!(s.chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn test_exemplar_labels_shape() {
        let labels = exemplar_labels();
        assert_eq!(labels.len(), 3);

        let trace_id = &labels[0];
        assert_eq!(trace_id.0, "TraceID");
        assert_eq!(trace_id.1.len(), 10);
        assert!(trace_id.1.chars().all(|c| c.is_ascii_alphabetic()));

        let job = &labels[1];
        assert_eq!(job.0, "job");
        assert_eq!(job.1, JOB_VALUE);

        let random_label = &labels[2];
        assert_eq!(random_label.0, "random_label");
        assert_eq!(random_label.1.len(), 5);
        assert!(random_label.1.chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn test_exemplar_labels_fresh_per_call() {
        // Two 10-char draws from a 52-letter alphabet colliding is
        // effectively impossible; equality would mean the set was reused.
        let a = exemplar_labels();
        let b = exemplar_labels();
        assert_ne!(a[0].1, b[0].1);
    }
}
