//! The slot map: at most one component per category.
//!
//! Registered categories live in `slots`; an empty slot is simply an absent key.
//! Keys outside the registry are accepted by the string-keyed store API and kept
//! in `inert`, where they ride along in snapshots and exports but are never
//! rendered, checked, or counted.
//!
//! On the wire the map always carries all fourteen registry keys, empty ones as
//! `null`, followed by any inert keys.

use crate::core::category::Category;
use crate::core::component::Component;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Target of a string-keyed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotKey {
    Registered(Category),
    Unregistered(String),
}

impl SlotKey {
    pub fn parse(key: &str) -> SlotKey {
        match Category::from_key(key) {
            Some(c) => SlotKey::Registered(c),
            None => SlotKey::Unregistered(key.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SlotKey::Registered(c) => c.key(),
            SlotKey::Unregistered(k) => k,
        }
    }
}

/// Snapshots of this type are plain owned clones; nothing is shared between a
/// snapshot and the live map.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, Option<Component>>")]
pub struct SlotMap {
    slots: BTreeMap<Category, Component>,
    inert: BTreeMap<String, Component>,
}

impl SlotMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: Category) -> Option<&Component> {
        self.slots.get(&category)
    }

    pub fn get_key(&self, key: &SlotKey) -> Option<&Component> {
        match key {
            SlotKey::Registered(c) => self.slots.get(c),
            SlotKey::Unregistered(k) => self.inert.get(k),
        }
    }

    pub fn set(&mut self, key: &SlotKey, component: Component) {
        match key {
            SlotKey::Registered(c) => {
                self.slots.insert(*c, component);
            }
            SlotKey::Unregistered(k) => {
                self.inert.insert(k.clone(), component);
            }
        }
    }

    pub fn clear(&mut self, key: &SlotKey) {
        match key {
            SlotKey::Registered(c) => {
                self.slots.remove(c);
            }
            SlotKey::Unregistered(k) => {
                self.inert.remove(k);
            }
        }
    }

    pub fn is_filled(&self, category: Category) -> bool {
        self.slots.contains_key(&category)
    }

    /// True when no registered slot is filled.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Filled registered slots, in registry order.
    pub fn filled(&self) -> impl Iterator<Item = (Category, &Component)> {
        self.slots.iter().map(|(c, comp)| (*c, comp))
    }

    pub fn inert(&self) -> &BTreeMap<String, Component> {
        &self.inert
    }

    /// Replacement map for `loadBuild`: every registered slot comes from
    /// `incoming`; an inert key survives only if both maps carry it.
    pub fn replaced_by(&self, incoming: &SlotMap) -> SlotMap {
        let inert = self
            .inert
            .keys()
            .filter_map(|k| incoming.inert.get(k).map(|c| (k.clone(), c.clone())))
            .collect();
        SlotMap {
            slots: incoming.slots.clone(),
            inert,
        }
    }
}

impl From<BTreeMap<String, Option<Component>>> for SlotMap {
    fn from(raw: BTreeMap<String, Option<Component>>) -> Self {
        let mut map = SlotMap::new();
        for (key, component) in raw {
            if let Some(component) = component {
                map.set(&SlotKey::parse(&key), component);
            }
        }
        map
    }
}

impl Serialize for SlotMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::ALL.len() + self.inert.len()))?;
        for category in Category::ALL {
            map.serialize_entry(category.key(), &self.slots.get(&category))?;
        }
        for (key, component) in &self.inert {
            map.serialize_entry(key, component)?;
        }
        map.end()
    }
}
