use serde::{Deserialize, Serialize};

use super::License;

/// Two distinct licenses of one subject.
///
/// `main` is the license that appeared first in the subject's license list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LicensePair<K> {
    pub main: License<K>,
    pub sub: License<K>,
}

impl<K: Clone + Ord> LicensePair<K> {
    /// Order-independent identity used by the dedup guard.
    #[must_use]
    pub fn identity(&self) -> PairIdentity<K> {
        PairIdentity::new(self.main.key.clone(), self.sub.key.clone())
    }
}

/// Unordered pair of license keys: `(a, b)` and `(b, a)` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairIdentity<K> {
    low: K,
    high: K,
}

impl<K: Ord> PairIdentity<K> {
    pub fn new(a: K, b: K) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub const fn keys(&self) -> (&K, &K) {
        (&self.low, &self.high)
    }
}

/// Enumerate the `n·(n−1)/2` unordered pairs of `licenses`.
///
/// Orientation follows input order: for `[A, B, C]` the result is
/// `(A,B), (A,C), (B,C)`. Fewer than two licenses yield no pairs.
/// The input is expected to hold distinct keys.
pub fn enumerate_pairs<K: Clone>(licenses: &[License<K>]) -> Vec<LicensePair<K>> {
    let n = licenses.len();
    if n < 2 {
        return Vec::new();
    }

    let mut pairs = Vec::with_capacity(n * (n - 1) / 2);
    for (i, main) in licenses.iter().enumerate() {
        for sub in &licenses[i + 1..] {
            pairs.push(LicensePair {
                main: main.clone(),
                sub: sub.clone(),
            });
        }
    }
    pairs
}
