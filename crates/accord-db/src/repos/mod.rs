//! Repository modules.
//!
//! Each module adds methods to `DbHandle` via `impl DbHandle` blocks.

pub mod agents;
pub mod licenses;
pub mod results;
pub mod rules;
pub mod uploads;
