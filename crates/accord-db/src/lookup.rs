//! Database backend for the tiered rule cascade.

use accord_core::License;
use accord_core::rules::{ClassifyError, TierLookup};

use crate::DbHandle;

impl TierLookup<i64> for DbHandle {
    async fn by_identity(
        &self,
        main: &License<i64>,
        sub: &License<i64>,
    ) -> Result<Option<bool>, ClassifyError> {
        Ok(self.rule_by_identity(main.key, sub.key).await?)
    }

    async fn by_type(
        &self,
        main: &License<i64>,
        sub: &License<i64>,
    ) -> Result<Option<bool>, ClassifyError> {
        Ok(self.rule_by_type(&main.license_type, &sub.license_type).await?)
    }

    async fn by_mixed(
        &self,
        main: &License<i64>,
        sub: &License<i64>,
    ) -> Result<Option<bool>, ClassifyError> {
        Ok(self
            .rule_by_mixed(
                (main.key, main.license_type.as_str()),
                (sub.key, sub.license_type.as_str()),
            )
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use accord_core::rules::{RuleSource, TieredRuleSource};
    use accord_core::{LicensePair, Outcome, Tier, Verdict};
    use pretty_assertions::assert_eq;

    use crate::repos::rules::NewRule;
    use crate::test_support::helpers::{seed_licenses, test_db};

    #[tokio::test]
    async fn type_tier_decides_permissive_into_copyleft() {
        let db = test_db().await;
        let ids = seed_licenses(&db, &[("L1", "permissive"), ("L2", "copyleft")]).await;
        let h = db.primary();
        h.insert_rule(&NewRule::by_type("permissive", "copyleft", true))
            .await
            .unwrap();

        let pair = LicensePair {
            main: h.license_by_id(ids[0]).await.unwrap(),
            sub: h.license_by_id(ids[1]).await.unwrap(),
        };
        let verdicts = TieredRuleSource::new(h).classify(&pair).await.unwrap();
        assert_eq!(verdicts, vec![Verdict::new(Outcome::Compatible, Tier::Type)]);
    }

    #[tokio::test]
    async fn identity_beats_type_rule() {
        let db = test_db().await;
        let ids = seed_licenses(&db, &[("L1", "permissive"), ("L2", "copyleft")]).await;
        let h = db.primary();
        h.insert_rule(&NewRule::by_type("permissive", "copyleft", true))
            .await
            .unwrap();
        h.insert_rule(&NewRule::by_identity(ids[1], ids[0], false))
            .await
            .unwrap();

        let pair = LicensePair {
            main: h.license_by_id(ids[0]).await.unwrap(),
            sub: h.license_by_id(ids[1]).await.unwrap(),
        };
        let verdict = TieredRuleSource::new(h).resolve(&pair).await.unwrap();
        assert_eq!(verdict, Verdict::new(Outcome::Incompatible, Tier::Identity));
    }

    #[tokio::test]
    async fn missing_rules_table_surfaces_as_lookup_error() {
        let db = test_db().await;
        let ids = seed_licenses(&db, &[("L1", "permissive"), ("L2", "copyleft")]).await;
        let h = db.primary();
        let pair = LicensePair {
            main: h.license_by_id(ids[0]).await.unwrap(),
            sub: h.license_by_id(ids[1]).await.unwrap(),
        };
        h.conn()
            .execute("DROP TABLE license_rules", ())
            .await
            .unwrap();

        let result = TieredRuleSource::new(h).resolve(&pair).await;
        assert!(matches!(
            result,
            Err(accord_core::rules::ClassifyError::Lookup(_))
        ));
    }
}
