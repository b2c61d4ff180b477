//! Outcome and tier enums for accord.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Compatibility verdict for one license pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Compatible,
    Incompatible,
    /// No rule matched; rendered with the configured default marker.
    Undetermined,
}

/// Storage code for a compatible pair.
pub const CODE_COMPATIBLE: char = 't';
/// Storage code for an incompatible pair.
pub const CODE_INCOMPATIBLE: char = 'f';

impl Outcome {
    /// Map a matched rule's boolean to an outcome.
    #[must_use]
    pub const fn from_rule(compatible: bool) -> Self {
        if compatible {
            Self::Compatible
        } else {
            Self::Incompatible
        }
    }

    /// Single-character code stored in the results table.
    ///
    /// `Undetermined` has no code of its own and uses `default_marker`.
    #[must_use]
    pub const fn code(self, default_marker: char) -> char {
        match self {
            Self::Compatible => CODE_COMPATIBLE,
            Self::Incompatible => CODE_INCOMPATIBLE,
            Self::Undetermined => default_marker,
        }
    }

    /// Resolve to a boolean, falling back to `default` for `Undetermined`.
    #[must_use]
    pub const fn resolve(self, default: bool) -> bool {
        match self {
            Self::Compatible => true,
            Self::Incompatible => false,
            Self::Undetermined => default,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compatible => "compatible",
            Self::Incompatible => "incompatible",
            Self::Undetermined => "undetermined",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

/// Which rule class produced a verdict.
///
/// ```text
/// identity (license, license) → type (type, type) → mixed (license, type) → default
/// ```
///
/// In the static rule document, name-pair entries report `Identity`,
/// type-pair entries `Type`, and name/type entries `Mixed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Identity,
    Type,
    Mixed,
    Default,
}

impl Tier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Type => "type",
            Self::Mixed => "mixed",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
