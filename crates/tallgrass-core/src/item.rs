//! Item definitions and the built-in catalog

use serde::{Deserialize, Serialize};
use std::fmt;

/// What an item does when used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemEffect {
    /// Restores hit points
    Heal,
    /// Attempts to catch a wild creature
    Pokeball,
}

impl ItemEffect {
    /// Lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemEffect::Heal => "heal",
            ItemEffect::Pokeball => "pokeball",
        }
    }
}

impl fmt::Display for ItemEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An item that can be stored in the bag
///
/// Items are keyed by `name`; two items with the same name share one bag
/// entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique name
    pub name: String,
    /// Effect applied on use
    pub effect: ItemEffect,
    /// Strength of the effect (hit points healed, catch power)
    pub value: u32,
}

impl Item {
    /// Create a new item
    pub fn new(name: impl Into<String>, effect: ItemEffect, value: u32) -> Self {
        Self {
            name: name.into(),
            effect,
            value,
        }
    }
}

/// The standard Potion
pub fn potion() -> Item {
    Item::new("Potion", ItemEffect::Heal, 10)
}

/// The standard Pokeball
pub fn pokeball() -> Item {
    Item::new("Pokeball", ItemEffect::Pokeball, 10)
}

/// All built-in items
pub fn builtin_items() -> Vec<Item> {
    vec![potion(), pokeball()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_items() {
        let items = builtin_items();
        assert_eq!(items.len(), 2);
        assert_eq!(potion().effect, ItemEffect::Heal);
        assert_eq!(pokeball().value, 10);
    }

    #[test]
    fn test_item_ron() {
        let ron_str = r#"(name: "Super Potion", effect: heal, value: 50)"#;

        let item: Item = ron::from_str(ron_str).unwrap();
        assert_eq!(item.name, "Super Potion");
        assert_eq!(item.effect, ItemEffect::Heal);
        assert_eq!(item.value, 50);
    }
}
