use std::future::Future;

use tracing::debug;

use super::{ClassifyError, RuleSource};
use crate::entities::{License, LicensePair, Verdict};
use crate::enums::{Outcome, Tier};

/// Backend for the tiered cascade.
///
/// Each lookup returns `Ok(None)` when no rule matches, which is distinct from
/// a matching rule whose outcome is `false`. Lookups are order-independent
/// over the two licenses where noted.
pub trait TierLookup<K>: Send + Sync {
    /// Rule keyed by both license keys, in either order.
    fn by_identity(
        &self,
        main: &License<K>,
        sub: &License<K>,
    ) -> impl Future<Output = Result<Option<bool>, ClassifyError>> + Send;

    /// Rule keyed by both license types, in either order.
    fn by_type(
        &self,
        main: &License<K>,
        sub: &License<K>,
    ) -> impl Future<Output = Result<Option<bool>, ClassifyError>> + Send;

    /// Rule keyed by `(main key, sub type)` or `(sub key, main type)`.
    fn by_mixed(
        &self,
        main: &License<K>,
        sub: &License<K>,
    ) -> impl Future<Output = Result<Option<bool>, ClassifyError>> + Send;
}

/// Identity → type → mixed → default, stopping at the first match.
pub struct TieredRuleSource<'a, T> {
    lookup: &'a T,
}

impl<'a, T> TieredRuleSource<'a, T> {
    pub const fn new(lookup: &'a T) -> Self {
        Self { lookup }
    }

    /// Resolve one pair to a single verdict.
    ///
    /// # Errors
    ///
    /// Propagates the first lookup failure.
    pub async fn resolve<K>(&self, pair: &LicensePair<K>) -> Result<Verdict, ClassifyError>
    where
        K: Sync,
        T: TierLookup<K>,
    {
        let (main, sub) = (&pair.main, &pair.sub);

        if let Some(compatible) = self.lookup.by_identity(main, sub).await? {
            return Ok(Verdict::new(Outcome::from_rule(compatible), Tier::Identity));
        }
        if let Some(compatible) = self.lookup.by_type(main, sub).await? {
            return Ok(Verdict::new(Outcome::from_rule(compatible), Tier::Type));
        }
        if let Some(compatible) = self.lookup.by_mixed(main, sub).await? {
            return Ok(Verdict::new(Outcome::from_rule(compatible), Tier::Mixed));
        }

        debug!(main = %main.name, sub = %sub.name, "no rule matched");
        Ok(Verdict::undetermined())
    }
}

impl<K, T> RuleSource<K> for TieredRuleSource<'_, T>
where
    K: Sync,
    T: TierLookup<K>,
{
    async fn classify(&self, pair: &LicensePair<K>) -> Result<Vec<Verdict>, ClassifyError> {
        Ok(vec![self.resolve(pair).await?])
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;

    /// In-memory tier tables that count how often each tier is consulted.
    #[derive(Default)]
    struct CountingTiers {
        identity: HashMap<(i64, i64), bool>,
        types: HashMap<(String, String), bool>,
        mixed: HashMap<(i64, String), bool>,
        identity_calls: AtomicUsize,
        type_calls: AtomicUsize,
        mixed_calls: AtomicUsize,
        fail_types: bool,
    }

    impl CountingTiers {
        fn calls(&self) -> (usize, usize, usize) {
            (
                self.identity_calls.load(Ordering::SeqCst),
                self.type_calls.load(Ordering::SeqCst),
                self.mixed_calls.load(Ordering::SeqCst),
            )
        }
    }

    impl TierLookup<i64> for CountingTiers {
        async fn by_identity(
            &self,
            main: &License<i64>,
            sub: &License<i64>,
        ) -> Result<Option<bool>, ClassifyError> {
            self.identity_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .identity
                .get(&(main.key, sub.key))
                .or_else(|| self.identity.get(&(sub.key, main.key)))
                .copied())
        }

        async fn by_type(
            &self,
            main: &License<i64>,
            sub: &License<i64>,
        ) -> Result<Option<bool>, ClassifyError> {
            self.type_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_types {
                return Err(ClassifyError::Lookup("license_rules unreadable".into()));
            }
            let (a, b) = (main.license_type.clone(), sub.license_type.clone());
            Ok(self
                .types
                .get(&(a.clone(), b.clone()))
                .or_else(|| self.types.get(&(b, a)))
                .copied())
        }

        async fn by_mixed(
            &self,
            main: &License<i64>,
            sub: &License<i64>,
        ) -> Result<Option<bool>, ClassifyError> {
            self.mixed_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .mixed
                .get(&(main.key, sub.license_type.clone()))
                .or_else(|| self.mixed.get(&(sub.key, main.license_type.clone())))
                .copied())
        }
    }

    fn pair(main: (i64, &str), sub: (i64, &str)) -> LicensePair<i64> {
        LicensePair {
            main: License::new(main.0, format!("L{}", main.0), main.1),
            sub: License::new(sub.0, format!("L{}", sub.0), sub.1),
        }
    }

    #[tokio::test]
    async fn identity_match_short_circuits_later_tiers() {
        let mut tiers = CountingTiers::default();
        tiers.identity.insert((2, 1), false);
        tiers
            .types
            .insert(("permissive".into(), "copyleft".into()), true);

        let source = TieredRuleSource::new(&tiers);
        let verdicts = source
            .classify(&pair((1, "permissive"), (2, "copyleft")))
            .await
            .unwrap();

        assert_eq!(
            verdicts,
            vec![Verdict::new(Outcome::Incompatible, Tier::Identity)]
        );
        assert_eq!(tiers.calls(), (1, 0, 0));
    }

    #[tokio::test]
    async fn type_rule_applies_in_either_order() {
        let mut tiers = CountingTiers::default();
        tiers
            .types
            .insert(("permissive".into(), "copyleft".into()), true);

        let source = TieredRuleSource::new(&tiers);
        let verdict = source
            .resolve(&pair((1, "copyleft"), (2, "permissive")))
            .await
            .unwrap();

        assert_eq!(verdict, Verdict::new(Outcome::Compatible, Tier::Type));
        assert_eq!(tiers.calls(), (1, 1, 0));
    }

    #[tokio::test]
    async fn mixed_rule_matches_sub_key_with_main_type() {
        let mut tiers = CountingTiers::default();
        tiers.mixed.insert((2, "permissive".into()), false);

        let source = TieredRuleSource::new(&tiers);
        let verdict = source
            .resolve(&pair((1, "permissive"), (2, "copyleft")))
            .await
            .unwrap();

        assert_eq!(verdict, Verdict::new(Outcome::Incompatible, Tier::Mixed));
        assert_eq!(tiers.calls(), (1, 1, 1));
    }

    #[tokio::test]
    async fn no_match_yields_single_undetermined() {
        let tiers = CountingTiers::default();
        let source = TieredRuleSource::new(&tiers);
        let verdicts = source
            .classify(&pair((1, "permissive"), (2, "copyleft")))
            .await
            .unwrap();

        assert_eq!(verdicts, vec![Verdict::undetermined()]);
        assert_eq!(tiers.calls(), (1, 1, 1));
    }

    #[tokio::test]
    async fn lookup_failure_stops_the_cascade() {
        let tiers = CountingTiers {
            fail_types: true,
            ..CountingTiers::default()
        };
        let source = TieredRuleSource::new(&tiers);
        let result = source
            .resolve(&pair((1, "permissive"), (2, "copyleft")))
            .await;

        assert!(matches!(result, Err(ClassifyError::Lookup(_))));
        assert_eq!(tiers.calls(), (1, 1, 0));
    }
}
