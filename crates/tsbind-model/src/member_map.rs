//! Case-insensitive, insertion-ordered member collections.

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// A value stored in a [`MemberMap`], keyed by its own name.
pub trait MemberName {
    fn member_name(&self) -> &str;
}

/// Members keyed by name, compared case-insensitively.
///
/// Inserting a member whose name matches an existing one replaces the value
/// but keeps the original position. Serializes as a map keyed by each
/// member's own (case-preserved) name.
#[derive(Clone, PartialEq, Eq)]
pub struct MemberMap<T> {
    entries: IndexMap<String, T>,
}

impl<T> Default for MemberMap<T> {
    fn default() -> Self {
        MemberMap {
            entries: IndexMap::new(),
        }
    }
}

fn fold_key(name: &str) -> String {
    name.to_lowercase()
}

impl<T: MemberName> MemberMap<T> {
    pub fn new() -> MemberMap<T> {
        MemberMap::default()
    }

    /// Insert `member`, returning the value it replaced.
    pub fn insert(&mut self, member: T) -> Option<T> {
        let key = fold_key(member.member_name());
        self.entries.insert(key, member)
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(&fold_key(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&fold_key(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.values()
    }

    /// Member names with their original casing, in position order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.values().map(|m| m.member_name())
    }
}

impl<T: MemberName> FromIterator<T> for MemberMap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut map = MemberMap::new();
        for member in iter {
            map.insert(member);
        }
        map
    }
}

impl<T: MemberName> Extend<T> for MemberMap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for member in iter {
            self.insert(member);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for MemberMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.values()).finish()
    }
}

impl<T: MemberName + Serialize> Serialize for MemberMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for member in self.entries.values() {
            map.serialize_entry(member.member_name(), member)?;
        }
        map.end()
    }
}

impl<'de, T: MemberName + Deserialize<'de>> Deserialize<'de> for MemberMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, T>::deserialize(deserializer)?;
        Ok(raw.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemberMap, MemberName};

    #[derive(Debug, PartialEq)]
    struct Named(&'static str, u32);

    impl MemberName for Named {
        fn member_name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn last_insert_wins_at_first_position() {
        let mut map = MemberMap::new();
        map.insert(Named("alpha", 1));
        map.insert(Named("beta", 2));
        let replaced = map.insert(Named("ALPHA", 3));

        assert_eq!(replaced, Some(Named("alpha", 1)));
        assert_eq!(map.len(), 2);
        assert_eq!(map.names().collect::<Vec<_>>(), vec!["ALPHA", "beta"]);
        assert_eq!(map.get("Alpha"), Some(&Named("ALPHA", 3)));
    }

    #[test]
    fn lookup_ignores_case() {
        let map: MemberMap<Named> = [Named("timeout", 1)].into_iter().collect();
        assert!(map.contains("Timeout"));
        assert!(map.contains("TIMEOUT"));
        assert!(!map.contains("timeouts"));
    }
}
