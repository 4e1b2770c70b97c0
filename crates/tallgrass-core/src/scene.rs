//! Scene configuration and the overworld scene

use crate::error::{Error, Result};
use crate::movement::{Hud, KeyState, MovementController, Notice, PlayerBody};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Key the overworld scene registers under
pub const OVERWORLD_KEY: &str = "overworld";

/// Hint shown for the whole life of the overworld scene
pub const MOVE_HINT: &str = "Use the arrow keys to move around";

/// Width and height of a world in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldSize {
    pub width: f32,
    pub height: f32,
}

impl WorldSize {
    /// Create a new world size
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for WorldSize {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// A point in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl From<Point> for Vec2 {
    fn from(point: Point) -> Self {
        Vec2::new(point.x, point.y)
    }
}

/// Game-wide settings every scene is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub world_size: WorldSize,
    /// Player speed in world units per second
    #[serde(default = "default_player_speed")]
    pub player_speed: f32,
    /// Edge length of a grid tile
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
}

fn default_player_speed() -> f32 {
    160.0
}

fn default_tile_size() -> f32 {
    16.0
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_size: WorldSize::default(),
            player_speed: default_player_speed(),
            tile_size: default_tile_size(),
        }
    }
}

/// Settings for one scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Key the scene registers under
    pub key: String,
    #[serde(default)]
    pub world_size: WorldSize,
    #[serde(default = "default_player_speed")]
    pub player_speed: f32,
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    /// Where the player appears
    #[serde(default = "default_spawn")]
    pub spawn: Point,
    /// Edge length of the player's square body
    #[serde(default = "default_player_size")]
    pub player_size: f32,
}

fn default_spawn() -> Point {
    Point { x: 100.0, y: 100.0 }
}

fn default_player_size() -> f32 {
    16.0
}

impl SceneConfig {
    /// Overworld settings derived from the game config
    pub fn overworld(game: &GameConfig) -> Self {
        Self {
            key: OVERWORLD_KEY.to_string(),
            world_size: game.world_size,
            player_speed: game.player_speed,
            tile_size: game.tile_size,
            spawn: default_spawn(),
            player_size: default_player_size(),
        }
    }

    /// Check that the world, spawn point, speed and grid are usable
    pub fn validate(&self) -> Result<()> {
        if self.key.is_empty() {
            return Err(Error::InvalidConfig("scene key is empty".to_string()));
        }
        let WorldSize { width, height } = self.world_size;
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "world size must be positive, got {width}x{height}"
            )));
        }
        if !(self.tile_size > 0.0 && self.tile_size.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "tile size must be positive, got {}",
                self.tile_size
            )));
        }
        if !(self.player_speed >= 0.0 && self.player_speed.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "player speed must be non-negative, got {}",
                self.player_speed
            )));
        }
        let Point { x, y } = self.spawn;
        if !(x.is_finite() && y.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "spawn point must be finite, got ({x}, {y})"
            )));
        }
        if !(self.player_size >= 0.0 && self.player_size.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "player size must be non-negative, got {}",
                self.player_size
            )));
        }
        Ok(())
    }
}

/// All scenes of the game, in start order
pub fn build_scenes(game: &GameConfig) -> Vec<SceneConfig> {
    vec![SceneConfig::overworld(game)]
}

/// Axis-aligned world rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Clamp `position` so it stays inside the bounds
    pub fn clamp(&self, position: Vec2) -> Vec2 {
        position.clamp(self.min, self.max)
    }
}

/// The overworld: a bounded world with a steerable player
#[derive(Debug)]
pub struct OverworldScene {
    config: SceneConfig,
    controller: MovementController,
}

impl OverworldScene {
    /// Set the scene up around the player `body`
    ///
    /// Shows the movement hint and stops the body.
    pub fn create(
        config: SceneConfig,
        body: Rc<RefCell<dyn PlayerBody>>,
        hud: &mut dyn Hud,
    ) -> Result<Self> {
        config.validate()?;
        let controller = MovementController::new(body, config.player_speed, config.tile_size);
        hud.show_notice(Notice::permanent(MOVE_HINT));
        tracing::debug!(key = %config.key, "scene created");

        Ok(Self { config, controller })
    }

    /// Run one frame with the keys currently held
    pub fn update(&mut self, keys: KeyState, hud: &mut dyn Hud) {
        self.controller.update(keys, hud);
    }

    /// Scene settings
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// The player's movement controller
    pub fn controller(&self) -> &MovementController {
        &self.controller
    }

    /// World rectangle the player body must stay within
    pub fn bounds(&self) -> Bounds {
        Bounds {
            min: Vec2::ZERO,
            max: Vec2::new(self.config.world_size.width, self.config.world_size.height),
        }
    }

    /// Where the player appears
    pub fn spawn(&self) -> Vec2 {
        self.config.spawn.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::test_support::{FakeBody, RecordingHud};

    #[test]
    fn test_build_scenes() {
        let game = GameConfig::default();
        let scenes = build_scenes(&game);

        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].key, OVERWORLD_KEY);
        assert_eq!(scenes[0].tile_size, 16.0);
        assert_eq!(scenes[0].spawn, Point { x: 100.0, y: 100.0 });
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = SceneConfig::overworld(&GameConfig::default());
        assert!(config.validate().is_ok());

        config.tile_size = 0.0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        config.tile_size = 16.0;
        config.player_speed = f32::NAN;
        assert!(config.validate().is_err());

        config.player_speed = 160.0;
        config.world_size = WorldSize::new(-1.0, 10.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_spawn() {
        let mut config = SceneConfig::overworld(&GameConfig::default());
        config.spawn = Point {
            x: f32::NAN,
            y: 100.0,
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        config.spawn = Point {
            x: 100.0,
            y: f32::INFINITY,
        };
        assert!(config.validate().is_err());

        let body = Rc::new(RefCell::new(FakeBody::at(0.0, 0.0)));
        let mut hud = RecordingHud::default();
        assert!(OverworldScene::create(config, body, &mut hud).is_err());
        assert!(hud.notices.is_empty());
    }

    #[test]
    fn test_create_shows_hint() {
        let body = Rc::new(RefCell::new(FakeBody::at(100.0, 100.0)));
        let mut hud = RecordingHud::default();
        let scene =
            OverworldScene::create(SceneConfig::overworld(&GameConfig::default()), body, &mut hud)
                .unwrap();

        assert_eq!(hud.notices, vec![Notice::permanent(MOVE_HINT)]);
        assert_eq!(scene.bounds().max, Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_create_rejects_invalid_config() {
        let body = Rc::new(RefCell::new(FakeBody::default()));
        let mut hud = RecordingHud::default();
        let mut config = SceneConfig::overworld(&GameConfig::default());
        config.key.clear();

        assert!(OverworldScene::create(config, body, &mut hud).is_err());
        assert!(hud.notices.is_empty());
    }

    #[test]
    fn test_update_drives_controller() {
        let body = Rc::new(RefCell::new(FakeBody::at(100.0, 100.0)));
        let mut hud = RecordingHud::default();
        let mut scene = OverworldScene::create(
            SceneConfig::overworld(&GameConfig::default()),
            body.clone(),
            &mut hud,
        )
        .unwrap();

        scene.update(
            KeyState {
                down: true,
                ..Default::default()
            },
            &mut hud,
        );
        assert_eq!(body.borrow().last_velocity(), Some(Vec2::new(0.0, 160.0)));
        assert_eq!(scene.controller().steps(), 1);
    }

    #[test]
    fn test_bounds_clamp() {
        let bounds = Bounds {
            min: Vec2::ZERO,
            max: Vec2::new(10.0, 10.0),
        };
        assert_eq!(bounds.clamp(Vec2::new(-3.0, 12.0)), Vec2::new(0.0, 10.0));
    }

    #[test]
    fn test_game_config_ron_defaults() {
        let config: GameConfig = ron::from_str("(world_size: (width: 1600.0, height: 1200.0))").unwrap();
        assert_eq!(config.world_size.width, 1600.0);
        assert_eq!(config.player_speed, 160.0);
        assert_eq!(config.tile_size, 16.0);
    }
}
