use std::fmt::{Display, Formatter, Result as FmtResult};

use indexmap::IndexMap;

/// The flags of a message (`#, fuzzy, c-format`).
///
/// Membership is case-insensitive: flags are compared by their lowercased
/// form, while the first spelling inserted is the one kept for output.
/// Iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    entries: IndexMap<String, String>,
}

impl Flags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flag. Returns `false` if an equal flag was already present.
    pub fn insert(&mut self, flag: impl Into<String>) -> bool {
        let flag = flag.into();
        let key = flag.to_lowercase();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, flag);
        true
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.entries.contains_key(&flag.to_lowercase())
    }

    /// Remove a flag. Returns `true` if it was present.
    pub fn remove(&mut self, flag: &str) -> bool {
        self.entries.shift_remove(&flag.to_lowercase()).is_some()
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

    /// Flags in insertion order, with their original spelling.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Flags {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut flags = Flags::new();
        flags.extend(iter);
        flags
    }
}

impl<S: Into<String>> Extend<S> for Flags {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        for flag in iter {
            self.insert(flag);
        }
    }
}

/// Comma-separated, as on a `#,` line.
impl Display for Flags {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (i, flag) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(flag)?;
        }
        Ok(())
    }
}
