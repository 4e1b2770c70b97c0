//! Tallgrass Core - reactive game state for a 2D overworld prototype
//!
//! This crate provides:
//! - `Stream` - synchronous, multicast value streams with replay and `map`
//! - `InventoryStore` and `PartyStore` - owners of immutable game state that
//!   publish every change on a stream
//! - `MovementController` - per-frame keyboard sampling, velocity steering
//!   and tile step tracking for the player
//! - `OverworldScene` - scene configuration and lifecycle around the
//!   controller
//! - `Timers` - one-shot delayed payloads for hosts
//!
//! Rendering, input and physics belong to the host engine, which plugs in
//! through the [`PlayerBody`] and [`Hud`] traits.

pub mod creature;
mod error;
mod inventory;
pub mod item;
pub mod movement;
mod party;
pub mod scene;
mod session;
pub mod stream;
pub mod timer;

pub use creature::Creature;
pub use error::{Error, Result};
pub use inventory::{BagEntry, InventoryState, InventoryStore};
pub use item::{Item, ItemEffect};
pub use movement::{
    Direction, Hud, KeyState, MovementController, Notice, PlayerBody, StepTracker, Tile,
};
pub use party::{PartyState, PartyStore, MAX_PARTY_SIZE};
pub use scene::{build_scenes, Bounds, GameConfig, OverworldScene, Point, SceneConfig, WorldSize};
pub use session::{GameSession, SessionSeed};
pub use stream::{Stream, StreamReader, Subscription};
pub use timer::{TimerId, Timers};
