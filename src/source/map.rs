//! Fold normalized sources into one identifier -> entry table.
//!
//! Sources are applied in argument order and the last write wins, so a later
//! source always overrides an earlier one defining the same identifier.
//! Entries whose key yields no identifier are dropped.

use std::collections::BTreeMap;

use super::NormalizedSource;

/// Winning entry for an identifier.
#[derive(Debug, Clone)]
pub struct MapEntry<V> {
    /// Key the value was registered under in its glob.
    pub key: String,
    /// Position of the source in the argument list.
    pub source: usize,
    pub value: V,
}

/// An identifier defined more than once, with the entry it displaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub identifier: String,
    pub shadowed_key: String,
    pub shadowed_source: usize,
    pub winning_key: String,
    pub winning_source: usize,
}

/// Identifier -> entry lookup built from one or more glob sources.
#[derive(Debug, Clone)]
pub struct IdentifierMap<V> {
    entries: BTreeMap<String, MapEntry<V>>,
    collisions: Vec<Collision>,
    skipped: Vec<String>,
}

impl<V> Default for IdentifierMap<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            collisions: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<V> IdentifierMap<V> {
    /// Build the map from sources in the given order.
    pub fn build(sources: impl IntoIterator<Item = NormalizedSource<V>>) -> Self {
        let mut map = Self::default();

        for (index, source) in sources.into_iter().enumerate() {
            let NormalizedSource {
                glob,
                extractor,
                pattern,
            } = source;

            for (key, value) in glob {
                let Some(identifier) = extractor.extract(&key, &pattern) else {
                    map.skipped.push(key);
                    continue;
                };

                let entry = MapEntry {
                    key,
                    source: index,
                    value,
                };
                map.insert(identifier, entry);
            }
        }

        map
    }

    fn insert(&mut self, identifier: String, entry: MapEntry<V>) {
        let winning_key = entry.key.clone();
        let winning_source = entry.source;

        if let Some(previous) = self.entries.insert(identifier.clone(), entry) {
            self.collisions.push(Collision {
                identifier,
                shadowed_key: previous.key,
                shadowed_source: previous.source,
                winning_key,
                winning_source,
            });
        }
    }

    /// Value registered for `identifier`.
    pub fn get(&self, identifier: &str) -> Option<&V> {
        self.entries.get(identifier).map(|entry| &entry.value)
    }

    /// Full entry (key and source position) for `identifier`.
    pub fn entry(&self, identifier: &str) -> Option<&MapEntry<V>> {
        self.entries.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    /// Known identifiers in sorted order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(identifier, entry)` pairs in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MapEntry<V>)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    /// Overrides that happened while building, in fold order.
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Keys that produced no identifier.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
