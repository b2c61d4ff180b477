use std::path::Path;

use super::{ClassifyError, LicenseTable, RuleDocument, RuleEntry, RuleSource};
use crate::entities::{License, LicensePair, Verdict};
use crate::enums::{Outcome, Tier};
use crate::errors::CoreError;

/// Rule source backed by a rule document and a license-metadata table.
///
/// Every entry is scanned in document order for every pair. One scan can
/// append more than one verdict for the same pair when several entries (or
/// several rule classes of one entry) match; callers receive all of them.
#[derive(Debug, Clone)]
pub struct StaticRuleSource {
    document: RuleDocument,
    table: LicenseTable,
}

impl StaticRuleSource {
    #[must_use]
    pub const fn new(document: RuleDocument, table: LicenseTable) -> Self {
        Self { document, table }
    }

    /// Load both documents from disk.
    ///
    /// # Errors
    ///
    /// Returns `CoreError` if either document is unreadable or malformed.
    pub fn load(rules: &Path, types: &Path) -> Result<Self, CoreError> {
        Ok(Self::new(RuleDocument::load(rules)?, LicenseTable::load(types)?))
    }

    /// Resolve a license name through the metadata table.
    #[must_use]
    pub fn license(&self, name: &str) -> License<String> {
        self.table.resolve(name)
    }

    /// Outcome rendered for `Undetermined` verdicts.
    #[must_use]
    pub const fn default_outcome(&self) -> bool {
        self.document.default
    }

    /// Scan every entry for `pair`.
    #[must_use]
    pub fn scan(&self, pair: &LicensePair<String>) -> Vec<Verdict> {
        let mut verdicts = Vec::new();
        let mut name_rules_fired = 0_usize;

        for entry in &self.document.rules {
            let Some(compatible) = entry.compatibility else {
                continue;
            };
            let outcome = Outcome::from_rule(compatible);

            if type_pair_matches(entry, pair) {
                verdicts.push(Verdict::new(outcome, Tier::Type));
            }
            if name_pair_matches(entry, pair) {
                verdicts.push(Verdict::new(outcome, Tier::Identity));
                name_rules_fired += 1;
            }
            if name_rules_fired == 0 && mixed_matches(entry, pair) {
                verdicts.push(Verdict::new(outcome, Tier::Mixed));
            }
        }

        if verdicts.is_empty() {
            verdicts.push(Verdict::undetermined());
        }
        verdicts
    }
}

impl RuleSource<String> for StaticRuleSource {
    async fn classify(&self, pair: &LicensePair<String>) -> Result<Vec<Verdict>, ClassifyError> {
        Ok(self.scan(pair))
    }
}

/// Positional: main type to main type, sub type to sub type.
fn type_pair_matches(entry: &RuleEntry, pair: &LicensePair<String>) -> bool {
    match (&entry.maintype, &entry.subtype) {
        (Some(main_type), Some(sub_type)) => {
            pair.main.license_type == *main_type && pair.sub.license_type == *sub_type
        }
        _ => false,
    }
}

/// Commutative over the two name slots.
fn name_pair_matches(entry: &RuleEntry, pair: &LicensePair<String>) -> bool {
    match (&entry.mainname, &entry.subname) {
        (Some(a), Some(b)) => [&pair.main.name, &pair.sub.name]
            .iter()
            .all(|name| *name == a || *name == b),
        _ => false,
    }
}

fn mixed_matches(entry: &RuleEntry, pair: &LicensePair<String>) -> bool {
    match (&entry.mainname, &entry.subtype) {
        (Some(name), Some(license_type)) => {
            (pair.main.name == *name || pair.sub.name == *name)
                && (pair.main.license_type == *license_type
                    || pair.sub.license_type == *license_type)
        }
        _ => false,
    }
}
