use crate::keys;
use crate::value::Value;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Ordered key/value bag describing a disk.
///
/// A disk hands out only shared references to its description; every
/// mutation goes through the disk so the cached serialization stays valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Description {
    entries: BTreeMap<String, Value>,
}

impl Description {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Stores `value` under `key`; `None` removes the key.
    pub fn set(&mut self, key: impl Into<String>, value: Option<Value>) {
        let key = key.into();
        match value {
            Some(value) => {
                self.entries.insert(key, value);
            }
            None => {
                self.entries.remove(&key);
            }
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn as_map(&self) -> &BTreeMap<String, Value> {
        &self.entries
    }

    /// Every criterion must hold. The reserved [`keys::PROPERTY_MATCH`]
    /// criterion is delegated to `capability`; all others need an equal
    /// value under the same key.
    pub fn matches<F>(&self, criteria: &Description, mut capability: F) -> bool
    where
        F: FnMut(&Value) -> bool,
    {
        criteria.iter().all(|(key, expected)| {
            if key == keys::PROPERTY_MATCH {
                capability(expected)
            } else {
                self.entries.get(key) == Some(expected)
            }
        })
    }

    pub fn compare(&self, key: &str, value: Option<&Value>) -> Ordering {
        match (self.entries.get(key), value) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(current), Some(value)) if current == value => Ordering::Equal,
            (Some(_), Some(_)) => Ordering::Less,
        }
    }
}

impl FromIterator<(String, Value)> for Description {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl From<BTreeMap<String, Value>> for Description {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Self { entries }
    }
}
