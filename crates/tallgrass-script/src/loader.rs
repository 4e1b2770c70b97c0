//! RON script loader

use crate::error::{Error, Result};
use crate::schema::{ConfigFile, ItemCatalog, SeedDef};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tallgrass_core::{item, BagEntry, GameConfig, InventoryState, Item, PartyState, SessionSeed};

/// Loaded game content
#[derive(Debug, Default)]
pub struct GameDefs {
    /// Game configuration, if a config file was loaded
    pub config: Option<GameConfig>,
    /// Catalog items by name
    pub items: HashMap<String, Item>,
    /// Starting state, if a seed file was loaded
    pub seed: Option<SeedDef>,
}

impl GameDefs {
    /// Create empty game definitions
    pub fn new() -> Self {
        Self::default()
    }

    /// The loaded configuration, or the defaults
    pub fn game_config(&self) -> GameConfig {
        self.config.clone().unwrap_or_default()
    }

    /// Look up an item, falling back to the built-in items
    pub fn get_item(&self, name: &str) -> Option<Item> {
        self.items
            .get(name)
            .cloned()
            .or_else(|| item::builtin_items().into_iter().find(|i| i.name == name))
    }

    /// Resolve the loaded seed into session state
    ///
    /// Without a seed file the session starts empty.
    pub fn session_seed(&self) -> Result<SessionSeed> {
        let Some(seed) = &self.seed else {
            return Ok(SessionSeed::default());
        };

        let mut entries = Vec::with_capacity(seed.bag.len());
        for bag in &seed.bag {
            let item = self
                .get_item(&bag.0)
                .ok_or_else(|| Error::UnknownItem(bag.0.clone()))?;
            entries.push(BagEntry::new(item, bag.1));
        }

        Ok(SessionSeed {
            inventory: InventoryState::from_entries(entries)?,
            party: PartyState::from_members(seed.party.clone(), seed.active_index)?,
        })
    }
}

/// Loader for RON game scripts
pub struct Loader {
    defs: GameDefs,
}

impl Loader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            defs: GameDefs::new(),
        }
    }

    /// Load a single RON file
    ///
    /// The kind of file is picked from its name, then from its content.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        tracing::debug!(?path, "loading script");

        if filename.contains("item") || content.contains("items:") {
            self.load_items_str(&content)
        } else if filename.contains("config") || content.contains("game:") {
            self.load_config_str(&content)
        } else if filename.contains("seed") || content.contains("bag:") || content.contains("party:")
        {
            self.load_seed_str(&content)
        } else {
            Err(Error::InvalidSchema(format!(
                "Could not tell what kind of script {} is",
                path.display()
            )))
        }
    }

    /// Load an item catalog from a RON string
    pub fn load_items_str(&mut self, content: &str) -> Result<()> {
        let catalog: ItemCatalog = ron::from_str(content)?;
        for item in catalog.items {
            if self.defs.items.contains_key(&item.name) {
                return Err(Error::DuplicateDefinition(item.name));
            }
            self.defs.items.insert(item.name.clone(), item);
        }
        Ok(())
    }

    /// Load the game configuration from a RON string
    pub fn load_config_str(&mut self, content: &str) -> Result<()> {
        if self.defs.config.is_some() {
            return Err(Error::DuplicateDefinition("game config".to_string()));
        }
        let file: ConfigFile = ron::from_str(content)?;
        for scene in tallgrass_core::build_scenes(&file.game) {
            scene.validate()?;
        }
        self.defs.config = Some(file.game);
        Ok(())
    }

    /// Load the starting state from a RON string
    pub fn load_seed_str(&mut self, content: &str) -> Result<()> {
        if self.defs.seed.is_some() {
            return Err(Error::DuplicateDefinition("seed".to_string()));
        }
        let seed: SeedDef = ron::from_str(content)?;
        self.defs.seed = Some(seed);
        Ok(())
    }

    /// Load all RON files from a directory
    pub fn load_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if !path.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {:?}", path),
            )));
        }

        let mut files: Vec<_> = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        files.sort();

        for file_path in files {
            if file_path.extension().map(|e| e == "ron").unwrap_or(false) {
                self.load_file(&file_path)?;
            } else if file_path.is_dir() {
                self.load_directory(&file_path)?;
            }
        }

        Ok(())
    }

    /// Finish loading and return the game definitions
    pub fn finish(self) -> GameDefs {
        self.defs
    }

    /// Get the current definitions (for inspection during loading)
    pub fn defs(&self) -> &GameDefs {
        &self.defs
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
