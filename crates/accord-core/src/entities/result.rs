use serde::{Deserialize, Serialize};

use crate::enums::{Outcome, Tier};

/// One classification: what was decided and which rule class decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Verdict {
    pub outcome: Outcome,
    pub tier: Tier,
}

impl Verdict {
    #[must_use]
    pub const fn new(outcome: Outcome, tier: Tier) -> Self {
        Self { outcome, tier }
    }

    /// The no-match verdict.
    #[must_use]
    pub const fn undetermined() -> Self {
        Self::new(Outcome::Undetermined, Tier::Default)
    }
}

