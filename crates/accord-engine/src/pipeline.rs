//! Per-subject resolution: enumerate pairs, consult the dedup guard, classify
//! what is new, and hand every verdict to the sink.

use accord_core::entities::enumerate_pairs;
use accord_core::rules::{ClassifyError, RuleSource};
use accord_core::{License, ResultStore, StoreError};
use tracing::{debug, trace};

/// Why one subject could not be completed.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Rules or existing results could not be read.
    #[error("read failed: {0}")]
    Read(String),

    /// A verdict could not be recorded.
    #[error("persist failed: {0}")]
    Persist(String),
}

impl From<ClassifyError> for PipelineError {
    fn from(err: ClassifyError) -> Self {
        Self::Read(err.to_string())
    }
}

impl From<StoreError> for PipelineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Lookup(reason) => Self::Read(reason),
            StoreError::Write(reason) => Self::Persist(reason),
        }
    }
}

/// Counters for one evaluated subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubjectReport {
    /// Pairs enumerated for the subject.
    pub pairs: usize,
    /// Pairs skipped because a verdict already existed.
    pub deduplicated: usize,
    /// Verdicts handed to the sink.
    pub recorded: usize,
}

/// Evaluate every unordered pair of `licenses`.
///
/// Pairs the store already holds are skipped without consulting `rules`.
/// Fewer than two licenses touch neither the rules nor the store.
///
/// # Errors
///
/// Returns the first [`PipelineError`]; pairs already recorded stay recorded.
pub async fn evaluate_subject<K, R, S>(
    licenses: &[License<K>],
    rules: &R,
    store: &mut S,
) -> Result<SubjectReport, PipelineError>
where
    K: Clone + Send + Sync,
    R: RuleSource<K>,
    S: ResultStore<K>,
{
    let pairs = enumerate_pairs(licenses);
    let mut report = SubjectReport {
        pairs: pairs.len(),
        ..SubjectReport::default()
    };

    for pair in &pairs {
        if store.exists(pair).await? {
            trace!(main = %pair.main.name, sub = %pair.sub.name, "pair already evaluated");
            report.deduplicated += 1;
            continue;
        }

        for verdict in rules.classify(pair).await? {
            store.record(pair, verdict).await?;
            report.recorded += 1;
        }
    }

    debug!(
        pairs = report.pairs,
        deduplicated = report.deduplicated,
        recorded = report.recorded,
        "subject evaluated"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use accord_core::{LicensePair, Outcome, PairIdentity, Tier, Verdict};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    /// Answers every pair with one compatible verdict, or fails on demand.
    #[derive(Default)]
    struct FixedRules {
        calls: AtomicUsize,
        verdicts_per_pair: usize,
        fail: bool,
    }

    impl RuleSource<i64> for FixedRules {
        async fn classify(&self, _pair: &LicensePair<i64>) -> Result<Vec<Verdict>, ClassifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ClassifyError::Lookup("rules table gone".into()));
            }
            Ok(vec![
                Verdict::new(Outcome::Compatible, Tier::Type);
                self.verdicts_per_pair.max(1)
            ])
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        known: HashSet<PairIdentity<i64>>,
        recorded: Vec<(i64, i64, Verdict)>,
        exists_calls: AtomicUsize,
        fail_writes: bool,
    }

    impl ResultStore<i64> for MemoryStore {
        async fn exists(&self, pair: &LicensePair<i64>) -> Result<bool, StoreError> {
            self.exists_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.known.contains(&pair.identity()))
        }

        async fn record(&mut self, pair: &LicensePair<i64>, verdict: Verdict) -> Result<(), StoreError> {
            if self.fail_writes {
                return Err(StoreError::Write("disk full".into()));
            }
            self.known.insert(pair.identity());
            self.recorded.push((pair.main.key, pair.sub.key, verdict));
            Ok(())
        }
    }

    fn licenses(n: i64) -> Vec<License<i64>> {
        (1..=n)
            .map(|i| License::new(i, format!("L{i}"), "permissive"))
            .collect()
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[tokio::test]
    async fn fewer_than_two_licenses_touch_nothing(#[case] n: i64) {
        let rules = FixedRules::default();
        let mut store = MemoryStore::default();

        let report = evaluate_subject(&licenses(n), &rules, &mut store).await.unwrap();

        assert_eq!(report, SubjectReport::default());
        assert_eq!(rules.calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.exists_calls.load(Ordering::SeqCst), 0);
        assert!(store.recorded.is_empty());
    }

    #[tokio::test]
    async fn every_pair_is_classified_once_in_order() {
        let rules = FixedRules::default();
        let mut store = MemoryStore::default();

        let report = evaluate_subject(&licenses(4), &rules, &mut store).await.unwrap();

        assert_eq!(report.pairs, 6);
        assert_eq!(report.recorded, 6);
        assert_eq!(rules.calls.load(Ordering::SeqCst), 6);
        let keys: Vec<(i64, i64)> = store.recorded.iter().map(|(a, b, _)| (*a, *b)).collect();
        assert_eq!(keys, vec![(1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4)]);
    }

    #[tokio::test]
    async fn known_pairs_skip_classification_in_either_orientation() {
        let rules = FixedRules::default();
        let mut store = MemoryStore::default();
        store.known.insert(PairIdentity::new(2, 1));

        let report = evaluate_subject(&licenses(3), &rules, &mut store).await.unwrap();

        assert_eq!(report.deduplicated, 1);
        assert_eq!(report.recorded, 2);
        assert_eq!(rules.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn second_pass_records_nothing() {
        let rules = FixedRules::default();
        let mut store = MemoryStore::default();
        evaluate_subject(&licenses(3), &rules, &mut store).await.unwrap();

        let again = evaluate_subject(&licenses(3), &rules, &mut store).await.unwrap();

        assert_eq!(again.recorded, 0);
        assert_eq!(again.deduplicated, 3);
        assert_eq!(rules.calls.load(Ordering::SeqCst), 3);
        assert_eq!(store.recorded.len(), 3);
    }

    #[tokio::test]
    async fn multiple_verdicts_are_all_recorded() {
        let rules = FixedRules {
            verdicts_per_pair: 2,
            ..FixedRules::default()
        };
        let mut store = MemoryStore::default();

        let report = evaluate_subject(&licenses(2), &rules, &mut store).await.unwrap();

        assert_eq!(report.recorded, 2);
        assert_eq!(store.recorded.len(), 2);
    }

    #[tokio::test]
    async fn classify_failure_is_a_read_error() {
        let rules = FixedRules {
            fail: true,
            ..FixedRules::default()
        };
        let mut store = MemoryStore::default();

        let err = evaluate_subject(&licenses(2), &rules, &mut store).await.unwrap_err();
        assert!(matches!(err, PipelineError::Read(_)), "{err}");
    }

    #[tokio::test]
    async fn write_failure_is_a_persist_error() {
        let rules = FixedRules::default();
        let mut store = MemoryStore {
            fail_writes: true,
            ..MemoryStore::default()
        };

        let err = evaluate_subject(&licenses(2), &rules, &mut store).await.unwrap_err();
        assert!(matches!(err, PipelineError::Persist(_)), "{err}");
    }
}
