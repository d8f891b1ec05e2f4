//! Wire-shaped header map.
//!
//! # Design Decisions
//! - Names are stored exactly as first seen; lookups ignore ASCII case
//! - Repeated occurrences of a name are separate list entries, never joined
//! - Insertion order is preserved so logs read like the wire

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered mapping from header name to its values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers {
    entries: IndexMap<String, Vec<String>>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the stored spelling of `name`, ignoring case.
    fn key_of(&self, name: &str) -> Option<&str> {
        self.entries
            .keys()
            .find(|k| k.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    /// Append one value, creating the entry if needed.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.key_of(&name).map(str::to_owned) {
            Some(existing) => {
                if let Some(values) = self.entries.get_mut(&existing) {
                    values.push(value);
                }
            }
            None => {
                self.entries.insert(name, vec![value]);
            }
        }
    }

    /// Replace all values stored under `name`.
    pub fn set(&mut self, name: impl Into<String>, values: Vec<String>) {
        let name = name.into();
        match self.key_of(&name).map(str::to_owned) {
            Some(existing) => {
                self.entries.insert(existing, values);
            }
            None => {
                self.entries.insert(name, values);
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        let key = self.key_of(name)?.to_owned();
        self.entries.shift_remove(&key)
    }

    /// All values for `name`, case-insensitive.
    pub fn get_all(&self, name: &str) -> Option<&[String]> {
        let key = self.key_of(name)?;
        self.entries.get(key).map(Vec::as_slice)
    }

    /// First value for `name`, case-insensitive.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.key_of(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Every `(name, value)` pair in wire order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(name, values)| {
            values.iter().map(move |v| (name.as_str(), v.as_str()))
        })
    }
}

impl From<&axum::http::HeaderMap> for Headers {
    fn from(map: &axum::http::HeaderMap) -> Self {
        let mut headers = Headers::new();
        for name in map.keys() {
            let values = map
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect();
            headers.set(name.as_str(), values);
        }
        headers
    }
}

impl<N, V> FromIterator<(N, V)> for Headers
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.add(name, value);
        }
        headers
    }
}
