//! Result sink and dedup guard seam.
//!
//! A store is scoped to one subject: the persistent backend binds a pfile and
//! an agent id, the in-memory backend collects rows for one report block.

use std::future::Future;

use thiserror::Error;

use crate::entities::{LicensePair, Verdict};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The dedup guard could not read existing results.
    #[error("Result lookup failed: {0}")]
    Lookup(String),

    /// A verdict could not be persisted.
    #[error("Result write failed: {0}")]
    Write(String),
}

pub trait ResultStore<K>: Send {
    /// Whether a verdict already exists for this subject and unordered pair.
    ///
    /// Stores without persistence always answer `false`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Lookup` if existing results cannot be read.
    fn exists(
        &self,
        pair: &LicensePair<K>,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Record one verdict for `pair`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Write` if the verdict cannot be stored.
    fn record(
        &mut self,
        pair: &LicensePair<K>,
        verdict: Verdict,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
