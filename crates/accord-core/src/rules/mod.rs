//! Rule sources: the seam that turns a license pair into verdicts.
//!
//! Two implementations sit behind [`RuleSource`]:
//! - [`TieredRuleSource`] drives the three-tier lookup cascade over any
//!   [`TierLookup`] backend (the database implements it).
//! - [`StaticRuleSource`] scans an ordered YAML rule document, resolving
//!   names and types through a [`LicenseTable`].
//!
//! The pipeline and dispatcher only ever see `RuleSource`.

mod document;
mod metadata;
mod static_cascade;
mod tiered;

use std::future::Future;

use thiserror::Error;

use crate::entities::{LicensePair, Verdict};

pub use document::{RuleDocument, RuleEntry, WILDCARD};
pub use metadata::LicenseTable;
pub use static_cascade::StaticRuleSource;
pub use tiered::{TierLookup, TieredRuleSource};

/// A rule source could not be read while classifying a pair.
///
/// Recoverable at subject granularity: the subject is abandoned, the run
/// continues.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Rule lookup failed: {0}")]
    Lookup(String),
}

/// Classifies license pairs.
pub trait RuleSource<K>: Send + Sync {
    /// Classify one pair.
    ///
    /// Returns at least one verdict. The tiered cascade always returns
    /// exactly one; the static document may return several when more than one
    /// entry matches.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError`] if the backing rules cannot be read.
    fn classify(
        &self,
        pair: &LicensePair<K>,
    ) -> impl Future<Output = Result<Vec<Verdict>, ClassifyError>> + Send;
}
