//! Per-session game state
//!
//! A [`GameSession`] owns one store of each kind. Presentation code receives
//! the session (or a store from it) explicitly instead of reaching for shared
//! global instances, so every test and every session gets its own state.

use crate::inventory::{InventoryState, InventoryStore};
use crate::party::{PartyState, PartyStore};
use serde::{Deserialize, Serialize};

/// Starting state for a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSeed {
    #[serde(default)]
    pub inventory: InventoryState,
    #[serde(default)]
    pub party: PartyState,
}

/// The stores of one play session
#[derive(Debug, Default)]
pub struct GameSession {
    pub inventory: InventoryStore,
    pub party: PartyStore,
}

impl GameSession {
    /// Create a session with an empty bag and party
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from a seed
    pub fn from_seed(seed: SessionSeed) -> Self {
        Self {
            inventory: InventoryStore::with_state(seed.inventory),
            party: PartyStore::with_state(seed.party),
        }
    }

    /// Snapshot of both stores
    pub fn snapshot(&self) -> SessionSeed {
        SessionSeed {
            inventory: self.inventory.state().clone(),
            party: self.party.state().clone(),
        }
    }
}
