//! In-memory registry used by tests and by hosts without a device registry.

use crate::{props, Plane, Properties, RegistryEntry, RegistryError};
use diskarb_core::Value;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ENTRY_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
struct MemNode {
    id: u64,
    name: Vec<u8>,
    classes: Vec<String>,
    properties: Properties,
    parents: Vec<MemEntry>,
    device_tree: Option<(Vec<u8>, Vec<u8>)>,
    readable: bool,
}

/// Reference-counted handle on an in-memory registry entry. A child keeps
/// its parents alive.
#[derive(Debug, Clone)]
pub struct MemEntry(Rc<MemNode>);

pub struct MemEntryBuilder {
    name: Vec<u8>,
    classes: Vec<String>,
    properties: Properties,
    parents: Vec<MemEntry>,
    device_tree: Option<(Vec<u8>, Vec<u8>)>,
    readable: bool,
}

impl MemEntry {
    pub fn builder(name: impl Into<Vec<u8>>) -> MemEntryBuilder {
        MemEntryBuilder {
            name: name.into(),
            classes: Vec::new(),
            properties: Properties::new(),
            parents: Vec::new(),
            device_tree: None,
            readable: true,
        }
    }

    /// Number of live handles on this entry, including this one.
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    fn service_path(&self) -> Vec<u8> {
        let mut chain = vec![self.0.name.clone()];
        let mut current = self.0.parents.first().cloned();
        while let Some(entry) = current {
            chain.push(entry.0.name.clone());
            current = entry.0.parents.first().cloned();
        }
        chain.reverse();
        let mut path = format!("{}:", Plane::Service.name()).into_bytes();
        for name in chain {
            path.push(b'/');
            path.extend_from_slice(&name);
        }
        path
    }
}

impl MemEntryBuilder {
    /// Adds a class the entry conforms to. List superclasses too.
    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn parent(mut self, parent: &MemEntry) -> Self {
        self.parents.push(parent.clone());
        self
    }

    /// Attaches the entry to the device-tree plane under `name` at `path`.
    pub fn device_tree(mut self, name: impl Into<Vec<u8>>, path: impl Into<Vec<u8>>) -> Self {
        self.device_tree = Some((name.into(), path.into()));
        self
    }

    /// Makes property snapshots fail, as for an entry that went away.
    pub fn unreadable(mut self) -> Self {
        self.readable = false;
        self
    }

    pub fn build(self) -> MemEntry {
        MemEntry(Rc::new(MemNode {
            id: NEXT_ENTRY_ID.fetch_add(1, Ordering::Relaxed),
            name: self.name,
            classes: self.classes,
            properties: self.properties,
            parents: self.parents,
            device_tree: self.device_tree,
            readable: self.readable,
        }))
    }
}

impl RegistryEntry for MemEntry {
    fn entry_id(&self) -> u64 {
        self.0.id
    }

    fn properties(&self) -> Result<Properties, RegistryError> {
        if !self.0.readable {
            return Err(RegistryError::Unavailable(
                String::from_utf8_lossy(&self.0.name).to_string(),
            ));
        }
        Ok(self.0.properties.clone())
    }

    fn property(&self, key: &str) -> Option<Value> {
        self.0.properties.get(key).cloned()
    }

    fn name(&self) -> Result<Vec<u8>, RegistryError> {
        Ok(self.0.name.clone())
    }

    fn name_in_plane(&self, plane: Plane) -> Result<Vec<u8>, RegistryError> {
        match plane {
            Plane::Service => self.name(),
            Plane::DeviceTree => self
                .0
                .device_tree
                .as_ref()
                .map(|(name, _)| name.clone())
                .ok_or(RegistryError::NotInPlane(plane)),
        }
    }

    fn path(&self, plane: Plane) -> Result<Vec<u8>, RegistryError> {
        match plane {
            Plane::Service => Ok(self.service_path()),
            Plane::DeviceTree => self
                .0
                .device_tree
                .as_ref()
                .map(|(_, path)| path.clone())
                .ok_or(RegistryError::NotInPlane(plane)),
        }
    }

    fn in_plane(&self, plane: Plane) -> bool {
        match plane {
            Plane::Service => true,
            Plane::DeviceTree => self.0.device_tree.is_some(),
        }
    }

    fn conforms_to(&self, class: &str) -> bool {
        self.0.classes.iter().any(|candidate| candidate == class)
    }

    fn parents(&self, plane: Plane) -> Vec<Self> {
        self.0
            .parents
            .iter()
            .filter(|parent| parent.in_plane(plane))
            .cloned()
            .collect()
    }

    fn matches_property_table(&self, table: &Value) -> bool {
        let Some(table) = table.as_dictionary() else {
            return false;
        };
        table.iter().all(|(key, expected)| match key.as_str() {
            props::PROVIDER_CLASS => expected
                .as_str()
                .map(|class| self.conforms_to(class))
                .unwrap_or(false),
            props::NAME_MATCH => expected
                .as_str()
                .map(|name| self.0.name == name.as_bytes())
                .unwrap_or(false),
            props::PROPERTY_MATCH => expected
                .as_dictionary()
                .map(|wanted| {
                    wanted
                        .iter()
                        .all(|(key, value)| self.0.properties.get(key) == Some(value))
                })
                .unwrap_or(false),
            _ => self.0.properties.get(key) == Some(expected),
        })
    }
}
