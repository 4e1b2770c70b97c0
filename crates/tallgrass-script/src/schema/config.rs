//! Game configuration file schema

use serde::{Deserialize, Serialize};
use tallgrass_core::GameConfig;

/// Top level of a configuration file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub game: GameConfig,
}
