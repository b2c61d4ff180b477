//! Entity structs for the compatibility engine.

mod license;
mod pair;
mod result;
mod subject;

pub use license::{License, distinct_in_order};
pub use pair::{LicensePair, PairIdentity, enumerate_pairs};
pub use result::Verdict;
pub use subject::Subject;
