use std::collections::HashSet;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// A license as seen by one run.
///
/// `K` is the stable key: the `license_ref` primary key (`i64`) when running
/// against the database, or the plain license name (`String`) in standalone
/// mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct License<K> {
    pub key: K,
    pub name: String,
    /// Classification string, e.g. `permissive` or `copyleft`. Empty when unknown.
    pub license_type: String,
}

impl<K> License<K> {
    pub fn new(key: K, name: impl Into<String>, license_type: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
            license_type: license_type.into(),
        }
    }
}

/// Drop repeated items, keeping the first occurrence of each.
pub fn distinct_in_order<T>(items: impl IntoIterator<Item = T>) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
