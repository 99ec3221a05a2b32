use std::mem;

use indexmap::IndexMap;

/// Catalog headers, keyed case-insensitively and kept in insertion order.
///
/// Replacing a header keeps its position and the spelling of the name it
/// was first inserted with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: IndexMap<String, Header>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Header {
    name: String,
    value: String,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        let key = normalize(&name);
        match self.entries.get_mut(&key) {
            Some(header) => Some(mem::replace(&mut header.value, value)),
            None => {
                self.entries.insert(key, Header { name, value });
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&normalize(name))
            .map(|header| header.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&normalize(name))
    }

    /// Remove a header, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries
            .shift_remove(&normalize(name))
            .map(|header| header.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|header| (header.name.as_str(), header.value.as_str()))
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
