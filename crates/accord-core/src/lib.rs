//! # accord-core
//!
//! Core types and the compatibility resolution procedure for accord.
//!
//! This crate provides the pieces shared by every other accord crate:
//! - Entity structs for licenses, license pairs, subjects, and verdicts
//! - Outcome and tier enums with their storage codes
//! - The pair enumerator
//! - The `RuleSource` seam and both rule cascades (tiered lookup and
//!   static rule document)
//! - The `ResultStore` seam shared by the persistent and report sinks
//! - Parsers for the rule document, the license-metadata table, and the
//!   standalone input document
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod input;
pub mod rules;
pub mod sink;

pub use entities::{License, LicensePair, PairIdentity, Subject, Verdict};
pub use enums::{Outcome, Tier};
pub use errors::CoreError;
pub use sink::{ResultStore, StoreError};
