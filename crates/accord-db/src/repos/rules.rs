//! Compatibility rules: tier queries and export.

use accord_core::rules::{RuleDocument, RuleEntry};

use crate::DbHandle;
use crate::error::DatabaseError;
use crate::helpers::{flag, get_flag, get_opt_string};

/// A rule row to insert. Unused keys stay NULL.
#[derive(Debug, Clone, Default)]
pub struct NewRule {
    pub main_license: Option<i64>,
    pub sub_license: Option<i64>,
    pub main_type: Option<String>,
    pub sub_type: Option<String>,
    pub compatible: bool,
    pub text: Option<String>,
}

impl NewRule {
    #[must_use]
    pub fn by_identity(main: i64, sub: i64, compatible: bool) -> Self {
        Self {
            main_license: Some(main),
            sub_license: Some(sub),
            compatible,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn by_type(main: &str, sub: &str, compatible: bool) -> Self {
        Self {
            main_type: Some(main.to_string()),
            sub_type: Some(sub.to_string()),
            compatible,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn by_mixed(main: i64, sub_type: &str, compatible: bool) -> Self {
        Self {
            main_license: Some(main),
            sub_type: Some(sub_type.to_string()),
            compatible,
            ..Self::default()
        }
    }
}

impl DbHandle {
    pub async fn insert_rule(&self, rule: &NewRule) -> Result<i64, DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO license_rules (main_rf_fk, sub_rf_fk, main_type, sub_type, compatibility, text)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                libsql::params![
                    rule.main_license,
                    rule.sub_license,
                    rule.main_type.as_deref(),
                    rule.sub_type.as_deref(),
                    flag(rule.compatible),
                    rule.text.as_deref()
                ],
            )
            .await?;
        Ok(self.conn().last_insert_rowid())
    }

    /// Rule keyed by both license ids, in either order.
    pub async fn rule_by_identity(&self, a: i64, b: i64) -> Result<Option<bool>, DatabaseError> {
        self.first_compatibility(
            "SELECT compatibility FROM license_rules
             WHERE (main_rf_fk = ?1 AND sub_rf_fk = ?2) OR (main_rf_fk = ?2 AND sub_rf_fk = ?1)
             ORDER BY lr_pk LIMIT 1",
            libsql::params![a, b],
        )
        .await
    }

    /// Rule keyed by both license types, in either order.
    pub async fn rule_by_type(&self, a: &str, b: &str) -> Result<Option<bool>, DatabaseError> {
        self.first_compatibility(
            "SELECT compatibility FROM license_rules
             WHERE (main_type = ?1 AND sub_type = ?2) OR (main_type = ?2 AND sub_type = ?1)
             ORDER BY lr_pk LIMIT 1",
            libsql::params![a, b],
        )
        .await
    }

    /// Rule keyed by `(main id, sub type)` or `(sub id, main type)`.
    pub async fn rule_by_mixed(
        &self,
        main: (i64, &str),
        sub: (i64, &str),
    ) -> Result<Option<bool>, DatabaseError> {
        self.first_compatibility(
            "SELECT compatibility FROM license_rules
             WHERE (main_rf_fk = ?1 AND sub_type = ?2) OR (main_rf_fk = ?3 AND sub_type = ?4)
             ORDER BY lr_pk LIMIT 1",
            libsql::params![main.0, sub.1, sub.0, main.1],
        )
        .await
    }

    async fn first_compatibility(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<Option<bool>, DatabaseError> {
        let mut rows = self.conn().query(sql, params).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(get_flag(&row, 0)?)),
            None => Ok(None),
        }
    }

    /// All rules as a rule document, in `lr_pk` order.
    ///
    /// License ids are resolved to short names. The document default is
    /// `false`.
    pub async fn export_rules(&self) -> Result<RuleDocument, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT m.rf_shortname, s.rf_shortname, r.main_type, r.sub_type, r.compatibility, r.text
                 FROM license_rules AS r
                 LEFT JOIN license_ref AS m ON r.main_rf_fk = m.rf_pk
                 LEFT JOIN license_ref AS s ON r.sub_rf_fk = s.rf_pk
                 ORDER BY r.lr_pk",
                (),
            )
            .await?;

        let mut rules = Vec::new();
        while let Some(row) = rows.next().await? {
            rules.push(RuleEntry {
                mainname: get_opt_string(&row, 0)?,
                subname: get_opt_string(&row, 1)?,
                maintype: get_opt_string(&row, 2)?,
                subtype: get_opt_string(&row, 3)?,
                compatibility: Some(get_flag(&row, 4)?),
                text: get_opt_string(&row, 5)?,
            });
        }

        Ok(RuleDocument {
            default: false,
            rules,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::test_support::helpers::{seed_licenses, test_db};

    #[tokio::test]
    async fn identity_rule_matches_either_order() {
        let db = test_db().await;
        let ids = seed_licenses(&db, &[("MIT", "permissive"), ("GPL-2.0-only", "copyleft")]).await;
        let h = db.primary();
        h.insert_rule(&NewRule::by_identity(ids[0], ids[1], false))
            .await
            .unwrap();

        assert_eq!(h.rule_by_identity(ids[1], ids[0]).await.unwrap(), Some(false));
        assert_eq!(h.rule_by_identity(ids[0], ids[1]).await.unwrap(), Some(false));
        assert_eq!(h.rule_by_identity(ids[0], ids[0]).await.unwrap(), None);
    }

    #[rstest]
    #[case("permissive", "copyleft", Some(true))]
    #[case("copyleft", "permissive", Some(true))]
    #[case("copyleft", "copyleft", None)]
    #[case("permissive", "", None)]
    #[tokio::test]
    async fn type_rule_matches_either_order(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: Option<bool>,
    ) {
        let db = test_db().await;
        let h = db.primary();
        h.insert_rule(&NewRule::by_type("permissive", "copyleft", true))
            .await
            .unwrap();

        assert_eq!(h.rule_by_type(a, b).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn mixed_rule_checks_both_orientations() {
        let db = test_db().await;
        let ids = seed_licenses(&db, &[("MIT", "permissive"), ("GPL-3.0-only", "copyleft")]).await;
        let h = db.primary();
        h.insert_rule(&NewRule::by_mixed(ids[1], "permissive", false))
            .await
            .unwrap();

        let mit = (ids[0], "permissive");
        let gpl = (ids[1], "copyleft");
        assert_eq!(h.rule_by_mixed(mit, gpl).await.unwrap(), Some(false));
        assert_eq!(h.rule_by_mixed(gpl, mit).await.unwrap(), Some(false));
        assert_eq!(
            h.rule_by_mixed(mit, (ids[0], "permissive")).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn export_resolves_names_in_rule_order() {
        let db = test_db().await;
        let ids = seed_licenses(&db, &[("MIT", "permissive"), ("GPL-2.0-only", "copyleft")]).await;
        let h = db.primary();
        h.insert_rule(&NewRule {
            text: Some("one-way".into()),
            ..NewRule::by_type("permissive", "copyleft", true)
        })
        .await
        .unwrap();
        h.insert_rule(&NewRule::by_identity(ids[1], ids[0], false))
            .await
            .unwrap();

        let doc = h.export_rules().await.unwrap();
        assert!(!doc.default);
        assert_eq!(
            doc.rules,
            vec![
                RuleEntry {
                    compatibility: Some(true),
                    maintype: Some("permissive".into()),
                    subtype: Some("copyleft".into()),
                    text: Some("one-way".into()),
                    ..RuleEntry::default()
                },
                RuleEntry {
                    compatibility: Some(false),
                    mainname: Some("GPL-2.0-only".into()),
                    subname: Some("MIT".into()),
                    ..RuleEntry::default()
                },
            ]
        );
    }
}
