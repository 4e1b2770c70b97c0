//! Keyboard-driven movement and tile step tracking
//!
//! Each frame the [`MovementController`] samples the held arrow keys, pushes
//! the raw [`Direction`] into its direction stream and records tile
//! crossings. A listener registered when the controller is built turns every
//! direction into a velocity for the player body.

use crate::stream::{Stream, StreamReader, Subscription};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Steps between "steps walked" notices
pub const STEP_MILESTONE: u64 = 50;
/// How long a step notice stays on screen, in milliseconds
pub const STEP_NOTICE_LIFETIME_MS: u64 = 2000;

/// Held state of the four movement keys for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

/// Raw axis input, each component in `{-1, 0, 1}`
///
/// Screen coordinates: `y` grows downwards, so "up" is `-1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction {
    pub x: i8,
    pub y: i8,
}

impl Direction {
    /// Combine opposing keys; pressing both cancels out
    pub fn from_keys(keys: KeyState) -> Self {
        fn axis(neg: bool, pos: bool) -> i8 {
            i8::from(pos) - i8::from(neg)
        }

        Self {
            x: axis(keys.left, keys.right),
            y: axis(keys.up, keys.down),
        }
    }

    /// Check if no movement is requested
    pub fn is_idle(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Unit-length velocity scaled by `speed`; idle stays zero
    pub fn velocity(&self, speed: f32) -> Vec2 {
        Vec2::new(f32::from(self.x), f32::from(self.y)).normalize_or_zero() * speed
    }
}

/// The physics-backed player entity owned by the rendering engine
pub trait PlayerBody {
    /// Current position in world units
    fn position(&self) -> Vec2;

    /// Set the body's velocity in world units per second
    fn set_velocity(&mut self, velocity: Vec2);
}

/// A text message for the HUD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    /// Milliseconds before the HUD should remove it; `None` keeps it
    pub lifetime_ms: Option<u64>,
}

impl Notice {
    /// A notice that stays until the scene ends
    pub fn permanent(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lifetime_ms: None,
        }
    }

    /// A notice that disappears after `lifetime_ms`
    pub fn transient(text: impl Into<String>, lifetime_ms: u64) -> Self {
        Self {
            text: text.into(),
            lifetime_ms: Some(lifetime_ms),
        }
    }
}

/// The presentation layer's heads-up display
pub trait Hud {
    /// Show a notice, removing it after its lifetime if it has one
    fn show_notice(&mut self, notice: Notice);
}

/// A cell of the tile grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
}

impl Tile {
    /// The tile containing `position`
    pub fn containing(position: Vec2, tile_size: f32) -> Self {
        let cell = (position / tile_size).floor();
        Self {
            x: cell.x as i32,
            y: cell.y as i32,
        }
    }
}

/// Counts tile crossings of a moving position
///
/// Starts with no recorded tile, so the first observation is a step.
#[derive(Debug, Clone)]
pub struct StepTracker {
    tile_size: f32,
    last_tile: Option<Tile>,
    steps: u64,
}

impl StepTracker {
    /// Create a tracker for a grid of `tile_size` world units
    pub fn new(tile_size: f32) -> Self {
        Self {
            tile_size,
            last_tile: None,
            steps: 0,
        }
    }

    /// Record `position`
    ///
    /// Returns the step count when this observation completes a multiple of
    /// [`STEP_MILESTONE`] steps.
    pub fn observe(&mut self, position: Vec2) -> Option<u64> {
        let tile = Tile::containing(position, self.tile_size);
        if self.last_tile == Some(tile) {
            return None;
        }

        self.last_tile = Some(tile);
        self.steps += 1;
        tracing::trace!(x = tile.x, y = tile.y, steps = self.steps, "entered tile");

        (self.steps % STEP_MILESTONE == 0).then_some(self.steps)
    }

    /// Steps taken so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Last tile the position was seen in
    pub fn last_tile(&self) -> Option<Tile> {
        self.last_tile
    }
}

/// Text of the step milestone notice
pub fn steps_walked_text(steps: u64) -> String {
    format!("You have walked {steps} steps!")
}

/// Per-frame movement for the player entity
pub struct MovementController {
    directions: Stream<Direction>,
    body: Rc<RefCell<dyn PlayerBody>>,
    tracker: StepTracker,
    velocity_link: Subscription,
}

impl MovementController {
    /// Create a controller driving `body`
    ///
    /// The direction stream starts idle, so the body is stopped right away.
    pub fn new(body: Rc<RefCell<dyn PlayerBody>>, player_speed: f32, tile_size: f32) -> Self {
        let directions = Stream::with_value(Direction::default());

        let target = Rc::clone(&body);
        let velocity_link = directions.subscribe(move |direction: &Direction| {
            let velocity = direction.velocity(player_speed);
            match target.try_borrow_mut() {
                Ok(mut body) => body.set_velocity(velocity),
                Err(_) => tracing::warn!(?direction, "player body busy, velocity dropped"),
            }
        });

        Self {
            directions,
            body,
            tracker: StepTracker::new(tile_size),
            velocity_link,
        }
    }

    /// Run one frame: publish the sampled direction and track steps
    pub fn update(&mut self, keys: KeyState, hud: &mut dyn Hud) {
        self.directions.push(Direction::from_keys(keys));

        let position = match self.body.try_borrow() {
            Ok(body) => body.position(),
            Err(_) => {
                tracing::warn!("player body busy, step tracking skipped");
                return;
            }
        };

        if let Some(steps) = self.tracker.observe(position) {
            tracing::info!(steps, "step milestone");
            hud.show_notice(Notice::transient(
                steps_walked_text(steps),
                STEP_NOTICE_LIFETIME_MS,
            ));
        }
    }

    /// Read-only stream of sampled directions
    pub fn directions(&self) -> StreamReader<Direction> {
        self.directions.reader()
    }

    /// Most recent direction
    pub fn direction(&self) -> Direction {
        self.directions.value().unwrap_or_default()
    }

    /// Steps taken so far
    pub fn steps(&self) -> u64 {
        self.tracker.steps()
    }

    /// Last tile the player was seen in
    pub fn last_tile(&self) -> Option<Tile> {
        self.tracker.last_tile()
    }

    /// Stop steering the body
    ///
    /// Later frames still publish directions and count steps, but no longer
    /// set the velocity.
    pub fn detach(&self) {
        self.velocity_link.unsubscribe();
    }
}

impl std::fmt::Debug for MovementController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovementController")
            .field("direction", &self.direction())
            .field("tracker", &self.tracker)
            .field("steering", &self.velocity_link.is_active())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Body that records velocities and moves only when told to
    #[derive(Debug, Default)]
    pub struct FakeBody {
        pub position: Vec2,
        pub velocities: Vec<Vec2>,
    }

    impl FakeBody {
        pub fn at(x: f32, y: f32) -> Self {
            Self {
                position: Vec2::new(x, y),
                velocities: Vec::new(),
            }
        }

        pub fn last_velocity(&self) -> Option<Vec2> {
            self.velocities.last().copied()
        }
    }

    impl PlayerBody for FakeBody {
        fn position(&self) -> Vec2 {
            self.position
        }

        fn set_velocity(&mut self, velocity: Vec2) {
            self.velocities.push(velocity);
        }
    }

    #[derive(Debug, Default)]
    pub struct RecordingHud {
        pub notices: Vec<Notice>,
    }

    impl Hud for RecordingHud {
        fn show_notice(&mut self, notice: Notice) {
            self.notices.push(notice);
        }
    }
}
