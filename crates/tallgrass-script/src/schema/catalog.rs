//! Item catalog schema

use serde::{Deserialize, Serialize};
use tallgrass_core::Item;

/// A collection of item definitions
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ItemCatalog {
    pub items: Vec<Item>,
}
