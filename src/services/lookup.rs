//! Bulk existence checks over store results.

use std::collections::{HashMap, HashSet};

/// Entities returned by a bulk lookup, indexed by id.
#[derive(Debug, Clone)]
pub struct ResolvedIndex<T> {
    by_id: HashMap<String, T>,
}

impl<T> ResolvedIndex<T> {
    /// Index `found` by id and check every requested id resolved.
    ///
    /// On failure returns every missing id, de-duplicated, in request order.
    pub fn resolve(
        requested: &[String],
        found: Vec<T>,
        id_of: impl Fn(&T) -> &str,
    ) -> Result<Self, Vec<String>> {
        let by_id: HashMap<String, T> = found
            .into_iter()
            .map(|item| (id_of(&item).to_string(), item))
            .collect();

        let missing = missing_ids(requested, |id| by_id.contains_key(id));
        if missing.is_empty() {
            Ok(Self { by_id })
        } else {
            Err(missing)
        }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.by_id.get(id)
    }
}

/// Distinct ids, first occurrence order.
pub fn distinct_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

fn missing_ids(requested: &[String], exists: impl Fn(&str) -> bool) -> Vec<String> {
    distinct_ids(requested.iter().map(String::as_str).filter(|id| !exists(id)))
}
