//! Starting state schema

use serde::{Deserialize, Serialize};
use tallgrass_core::Creature;

/// Bag contents by item name and quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagSeed(pub String, pub u32);

/// Starting state of a session, before item names are resolved
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedDef {
    #[serde(default)]
    pub bag: Vec<BagSeed>,
    #[serde(default)]
    pub party: Vec<Creature>,
    #[serde(default)]
    pub active_index: usize,
}
