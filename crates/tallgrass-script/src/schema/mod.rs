//! Schema definitions for RON scripts

pub mod catalog;
pub mod config;
pub mod seed;

pub use catalog::ItemCatalog;
pub use config::ConfigFile;
pub use seed::{BagSeed, SeedDef};
