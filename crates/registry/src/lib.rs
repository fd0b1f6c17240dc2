//! Device registry abstraction: entries, planes and the upward walks the
//! disk builders perform over them.

pub mod mem;
pub mod props;
pub mod text;

use diskarb_core::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use thiserror::Error;

pub use mem::{MemEntry, MemEntryBuilder};

pub type Properties = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plane {
    Service,
    DeviceTree,
}

impl Plane {
    pub fn name(&self) -> &'static str {
        match self {
            Plane::Service => "IOService",
            Plane::DeviceTree => "IODeviceTree",
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("entry is not attached to the {0} plane")]
    NotInPlane(Plane),
    #[error("entry properties are unavailable: {0}")]
    Unavailable(String),
}

/// A retained handle on one registry entry. Dropping the handle releases it.
pub trait RegistryEntry: Clone {
    /// Identity of the underlying entry, shared by every handle on it.
    fn entry_id(&self) -> u64;

    /// Snapshot of the entry's own properties.
    fn properties(&self) -> Result<Properties, RegistryError>;

    fn property(&self, key: &str) -> Option<Value>;

    fn name(&self) -> Result<Vec<u8>, RegistryError>;

    fn name_in_plane(&self, plane: Plane) -> Result<Vec<u8>, RegistryError>;

    fn path(&self, plane: Plane) -> Result<Vec<u8>, RegistryError>;

    fn in_plane(&self, plane: Plane) -> bool;

    fn conforms_to(&self, class: &str) -> bool;

    /// Direct parents in `plane`, in registry order.
    fn parents(&self, plane: Plane) -> Vec<Self>;

    /// Structural match of a property table (a dictionary) against the entry.
    fn matches_property_table(&self, table: &Value) -> bool;
}

/// Depth-first walk over the ancestors of an entry, closest first. The
/// starting entry is not yielded and each entry is yielded once.
pub struct Ancestors<E: RegistryEntry> {
    plane: Plane,
    pending: Vec<E>,
    visited: HashSet<u64>,
}

impl<E: RegistryEntry> Ancestors<E> {
    fn new(entry: &E, plane: Plane) -> Self {
        let mut pending = entry.parents(plane);
        pending.reverse();
        let mut visited = HashSet::new();
        visited.insert(entry.entry_id());
        Self {
            plane,
            pending,
            visited,
        }
    }
}

impl<E: RegistryEntry> Iterator for Ancestors<E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        while let Some(entry) = self.pending.pop() {
            if !self.visited.insert(entry.entry_id()) {
                continue;
            }
            let mut parents = entry.parents(self.plane);
            parents.reverse();
            self.pending.extend(parents);
            return Some(entry);
        }
        None
    }
}

pub fn ancestors<E: RegistryEntry>(entry: &E, plane: Plane) -> Ancestors<E> {
    Ancestors::new(entry, plane)
}

pub fn find_ancestor<E, P>(entry: &E, plane: Plane, mut predicate: P) -> Option<E>
where
    E: RegistryEntry,
    P: FnMut(&E) -> bool,
{
    ancestors(entry, plane).find(|candidate| predicate(candidate))
}

/// Looks `key` up on the entry itself, then on its ancestors closest first.
pub fn search_property<E: RegistryEntry>(entry: &E, plane: Plane, key: &str) -> Option<Value> {
    entry
        .property(key)
        .or_else(|| ancestors(entry, plane).find_map(|ancestor| ancestor.property(key)))
}
