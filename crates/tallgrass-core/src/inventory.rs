//! Inventory ("bag") state and store

use crate::error::{Error, Result};
use crate::item::Item;
use crate::stream::{Stream, StreamReader};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An item together with how many of it the bag holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagEntry {
    pub item: Item,
    pub quantity: u32,
}

impl BagEntry {
    /// Create a new bag entry
    pub fn new(item: Item, quantity: u32) -> Self {
        Self { item, quantity }
    }
}

/// Immutable snapshot of the bag
///
/// Entries keep insertion order and are unique by item name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<BagEntry>", into = "Vec<BagEntry>")]
pub struct InventoryState {
    entries: IndexMap<String, BagEntry>,
}

impl InventoryState {
    /// Create an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bag from entries, rejecting duplicate item names
    pub fn from_entries(entries: impl IntoIterator<Item = BagEntry>) -> Result<Self> {
        let mut map = IndexMap::new();
        for entry in entries {
            let name = entry.item.name.clone();
            if map.contains_key(&name) {
                return Err(Error::DuplicateItem(name));
            }
            map.insert(name, entry);
        }
        Ok(Self { entries: map })
    }

    /// Iterate over entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = &BagEntry> {
        self.entries.values()
    }

    /// Look up an entry by item name
    pub fn get(&self, name: &str) -> Option<&BagEntry> {
        self.entries.get(name)
    }

    /// Quantity held of an item (0 when absent)
    pub fn quantity(&self, name: &str) -> u32 {
        self.get(name).map(|e| e.quantity).unwrap_or(0)
    }

    /// Number of distinct entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the bag has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The bag after adding `quantity` of `item`
    ///
    /// An existing entry keeps its position and takes the new item
    /// description.
    pub fn with_added(&self, item: Item, quantity: u32) -> Self {
        let mut entries = self.entries.clone();
        match entries.get_mut(&item.name) {
            Some(entry) => {
                entry.quantity = entry.quantity.saturating_add(quantity);
                entry.item = item;
            }
            None => {
                entries.insert(item.name.clone(), BagEntry::new(item, quantity));
            }
        }
        Self { entries }
    }

    /// The bag after using one of `name`, or `None` if none is held
    pub fn with_used(&self, name: &str) -> Option<Self> {
        let entry = self.entries.get(name)?;
        if entry.quantity == 0 {
            return None;
        }

        let mut entries = self.entries.clone();
        if let Some(entry) = entries.get_mut(name) {
            entry.quantity -= 1;
        }
        Some(Self { entries })
    }
}

impl TryFrom<Vec<BagEntry>> for InventoryState {
    type Error = Error;

    fn try_from(entries: Vec<BagEntry>) -> Result<Self> {
        Self::from_entries(entries)
    }
}

impl From<InventoryState> for Vec<BagEntry> {
    fn from(state: InventoryState) -> Self {
        state.entries.into_values().collect()
    }
}

/// Owner of the bag state
///
/// Mutations compute a new [`InventoryState`] and publish it on the bag
/// stream; readers only ever see snapshots.
#[derive(Debug)]
pub struct InventoryStore {
    state: InventoryState,
    stream: Stream<InventoryState>,
}

impl InventoryStore {
    /// Create a store with an empty bag
    pub fn new() -> Self {
        Self::with_state(InventoryState::new())
    }

    /// Create a store seeded with `state`
    pub fn with_state(state: InventoryState) -> Self {
        let stream = Stream::with_value(state.clone());
        Self { state, stream }
    }

    /// Read-only stream of bag snapshots
    pub fn stream(&self) -> StreamReader<InventoryState> {
        self.stream.reader()
    }

    /// Current bag state
    pub fn state(&self) -> &InventoryState {
        &self.state
    }

    /// Add `quantity` of `item` to the bag
    pub fn add_item(&mut self, item: Item, quantity: u32) {
        tracing::debug!(item = %item.name, quantity, "adding to bag");
        let next = self.state.with_added(item, quantity);
        self.publish(next);
    }

    /// Add a single `item` to the bag
    pub fn add_one(&mut self, item: Item) {
        self.add_item(item, 1);
    }

    /// Use one of the named item
    ///
    /// Returns `false` and leaves the bag untouched if the item is missing or
    /// its quantity is already zero.
    pub fn use_item(&mut self, name: &str) -> bool {
        match self.state.with_used(name) {
            Some(next) => {
                tracing::debug!(item = name, "used item");
                self.publish(next);
                true
            }
            None => {
                tracing::debug!(item = name, "nothing to use");
                false
            }
        }
    }

    fn publish(&mut self, next: InventoryState) {
        self.state = next.clone();
        self.stream.push(next);
    }
}

impl Default for InventoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{pokeball, potion};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_add_merges_by_name() {
        let mut store = InventoryStore::new();
        store.add_item(potion(), 1);
        store.add_item(potion(), 2);

        assert_eq!(store.state().len(), 1);
        assert_eq!(store.state().quantity("Potion"), 3);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut store = InventoryStore::new();
        store.add_one(potion());
        store.add_one(pokeball());
        store.add_one(potion());

        let names: Vec<_> = store.state().entries().map(|e| e.item.name.as_str()).collect();
        assert_eq!(names, vec!["Potion", "Pokeball"]);
    }

    #[test]
    fn test_use_item_down_to_zero() {
        let mut store = InventoryStore::new();
        store.add_one(potion());

        assert!(store.use_item("Potion"));
        assert_eq!(store.state().quantity("Potion"), 0);

        assert!(!store.use_item("Potion"));
        assert_eq!(store.state().quantity("Potion"), 0);
        assert!(store.state().get("Potion").is_some());
    }

    #[test]
    fn test_use_missing_item_does_not_publish() {
        let mut store = InventoryStore::new();
        let pushes = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&pushes);
        let _sub = store.stream().subscribe(move |_| *counter.borrow_mut() += 1);
        assert_eq!(*pushes.borrow(), 1); // replay

        assert!(!store.use_item("Masterball"));
        assert_eq!(*pushes.borrow(), 1);
    }

    #[test]
    fn test_subscribers_receive_snapshots() {
        let mut store = InventoryStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = store
            .stream()
            .subscribe(move |bag: &InventoryState| sink.borrow_mut().push(bag.quantity("Potion")));

        store.add_item(potion(), 2);
        store.use_item("Potion");

        assert_eq!(*seen.borrow(), vec![0, 2, 1]);
    }

    #[test]
    fn test_readd_replaces_item_description() {
        let mut store = InventoryStore::new();
        store.add_one(potion());
        let mut stronger = potion();
        stronger.value = 20;
        store.add_one(stronger);

        let entry = store.state().get("Potion").unwrap();
        assert_eq!(entry.quantity, 2);
        assert_eq!(entry.item.value, 20);
    }

    #[test]
    fn test_duplicate_entries_rejected() {
        let result = InventoryState::from_entries(vec![
            BagEntry::new(potion(), 1),
            BagEntry::new(potion(), 4),
        ]);
        assert_eq!(result, Err(Error::DuplicateItem("Potion".to_string())));
    }

    #[test]
    fn test_state_ron_is_entry_list() {
        let ron_str = r#"
        [
            (item: (name: "Potion", effect: heal, value: 10), quantity: 3),
            (item: (name: "Pokeball", effect: pokeball, value: 10), quantity: 5),
        ]
        "#;

        let state: InventoryState = ron::from_str(ron_str).unwrap();
        assert_eq!(state.quantity("Potion"), 3);
        assert_eq!(state.quantity("Pokeball"), 5);
    }
}
