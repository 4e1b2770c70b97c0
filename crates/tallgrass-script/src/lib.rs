//! Tallgrass Script - RON loader for game content
//!
//! Loads from RON files:
//! - Game configuration (world size, player speed, tile size)
//! - Item catalogs
//! - Starting state seeds (bag contents and party)

mod error;
mod loader;
mod schema;

pub use error::{Error, Result};
pub use loader::{GameDefs, Loader};
pub use schema::{BagSeed, ConfigFile, ItemCatalog, SeedDef};
