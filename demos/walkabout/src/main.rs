//! Walkabout
//!
//! A terminal overworld demonstrating tallgrass as a rendering host would use
//! it:
//! - The scene is driven once per frame with the held arrow keys
//! - The player body integrates velocity and stays inside the world
//! - HUD notices expire through `Timers`
//! - The status bar subscribes to the bag and party streams
//!
//! Keys: arrows move, `p` uses a Potion, `b` picks up a Pokeball, `c` catches
//! a creature, `x` trains the active creature, `1`-`6` switch the active
//! creature, `q`/Esc quits. Set `RUST_LOG` and redirect stderr to see logs.

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use glam::Vec2;
use std::cell::RefCell;
use std::io::{stdout, Stdout, Write};
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tallgrass_core::{
    build_scenes, item, Bounds, Creature, GameSession, Hud, InventoryState, KeyState, Notice,
    OverworldScene, PartyState, PlayerBody, Timers,
};
use tallgrass_script::{GameDefs, Loader};
use tracing_subscriber::EnvFilter;

/// Frame length
const FRAME_MS: u64 = 50;
/// Terminals report presses only, so a press counts as held this long
const KEY_HOLD_MS: u64 = 150;
/// Experience granted per training session
const TRAINING_EXP: u32 = 15;
/// Rows used by the HUD above the map
const HUD_ROWS: u16 = 4;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let defs = load_defs()?;

    terminal::enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let result = run(&mut stdout, &defs);

    execute!(stdout, Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    result
}

fn load_defs() -> Result<GameDefs, Box<dyn std::error::Error>> {
    let dirs = ["demos/walkabout/data", "data", "../data"];

    for dir in &dirs {
        if Path::new(dir).is_dir() {
            let mut loader = Loader::new();
            loader.load_directory(dir)?;
            return Ok(loader.finish());
        }
    }

    tracing::info!("no data directory found, using defaults");
    Ok(GameDefs::new())
}

/// Square player body with arcade-style movement
#[derive(Debug)]
struct ArcadeBody {
    position: Vec2,
    velocity: Vec2,
    half_size: f32,
}

impl ArcadeBody {
    /// Move by the current velocity, staying inside `bounds`
    fn integrate(&mut self, dt: f32, bounds: Bounds) {
        let min = bounds.min + Vec2::splat(self.half_size);
        let inset = Bounds {
            min,
            max: (bounds.max - Vec2::splat(self.half_size)).max(min),
        };
        self.position = inset.clamp(self.position + self.velocity * dt);
    }
}

impl PlayerBody for ArcadeBody {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }
}

/// Whole milliseconds of frame time, carrying the fraction to the next frame
#[derive(Debug, Default)]
struct MillisClock {
    carry: Duration,
}

impl MillisClock {
    fn advance(&mut self, delta: Duration) -> u64 {
        let elapsed = self.carry + delta;
        let millis = elapsed.as_millis() as u64;
        self.carry = elapsed - Duration::from_millis(millis);
        millis
    }
}

/// Notice lines with timed removal
#[derive(Debug, Default)]
struct TerminalHud {
    next_id: u64,
    lines: Vec<(u64, String)>,
    expiry: Timers<u64>,
}

impl TerminalHud {
    fn tick(&mut self, delta_ms: u64) {
        for id in self.expiry.advance(delta_ms) {
            self.lines.retain(|(line_id, _)| *line_id != id);
        }
    }
}

impl Hud for TerminalHud {
    fn show_notice(&mut self, notice: Notice) {
        let id = self.next_id;
        self.next_id += 1;
        self.lines.push((id, notice.text));
        if let Some(lifetime) = notice.lifetime_ms {
            self.expiry.schedule(lifetime, id);
        }
    }
}

/// Arrow keys with press deadlines
#[derive(Debug, Default)]
struct HeldKeys {
    left: Option<Instant>,
    right: Option<Instant>,
    up: Option<Instant>,
    down: Option<Instant>,
}

impl HeldKeys {
    fn press(&mut self, code: KeyCode, now: Instant) -> bool {
        let until = Some(now + Duration::from_millis(KEY_HOLD_MS));
        match code {
            KeyCode::Left => self.left = until,
            KeyCode::Right => self.right = until,
            KeyCode::Up => self.up = until,
            KeyCode::Down => self.down = until,
            _ => return false,
        }
        true
    }

    fn sample(&self, now: Instant) -> KeyState {
        let held = |deadline: Option<Instant>| deadline.is_some_and(|d| d > now);
        KeyState {
            left: held(self.left),
            right: held(self.right),
            up: held(self.up),
            down: held(self.down),
        }
    }
}

/// Latest snapshots seen by the status bar
#[derive(Debug, Default)]
struct StatusBar {
    bag: String,
    party: String,
}

fn bag_line(bag: &InventoryState) -> String {
    if bag.is_empty() {
        return "Bag: empty".to_string();
    }
    let items: Vec<String> = bag
        .entries()
        .map(|e| format!("{} x{}", e.item.name, e.quantity))
        .collect();
    format!("Bag: {}", items.join(", "))
}

fn party_line(party: &PartyState) -> String {
    let Some(active) = party.active() else {
        return "Party: nobody yet (press c)".to_string();
    };
    format!(
        "Party {}/{}: [{}] {} Lv{} HP {}/{} ATK {} EXP {}/{}",
        party.len(),
        tallgrass_core::MAX_PARTY_SIZE,
        party.active_index() + 1,
        active.name,
        active.level,
        active.hp,
        active.max_hp,
        active.attack,
        active.exp,
        active.exp_to_next_level(),
    )
}

fn run(stdout: &mut Stdout, defs: &GameDefs) -> Result<(), Box<dyn std::error::Error>> {
    let game = defs.game_config();
    let mut session = GameSession::from_seed(defs.session_seed()?);

    let status = Rc::new(RefCell::new(StatusBar::default()));
    let bag_lines = session.inventory.stream().map(bag_line);
    let bag_status = Rc::clone(&status);
    let _bag_sub =
        bag_lines.subscribe(move |line: &String| bag_status.borrow_mut().bag = line.clone());
    let party_lines = session.party.stream().map(party_line);
    let party_status = Rc::clone(&status);
    let _party_sub =
        party_lines.subscribe(move |line: &String| party_status.borrow_mut().party = line.clone());

    let Some(config) = build_scenes(&game).into_iter().next() else {
        return Err("no scenes configured".into());
    };
    let body = Rc::new(RefCell::new(ArcadeBody {
        position: config.spawn.into(),
        velocity: Vec2::ZERO,
        half_size: config.player_size / 2.0,
    }));
    let mut hud = TerminalHud::default();
    let mut scene = OverworldScene::create(config, body.clone(), &mut hud)?;

    let mut keys = HeldKeys::default();
    let mut caught = 0u32;
    let mut hud_clock = MillisClock::default();
    let mut last_frame = Instant::now();

    loop {
        let deadline = last_frame + Duration::from_millis(FRAME_MS);
        while let Some(timeout) = deadline.checked_duration_since(Instant::now()) {
            if !event::poll(timeout)? {
                break;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind == KeyEventKind::Release {
                continue;
            }
            let now = Instant::now();
            if keys.press(key.code, now) {
                continue;
            }
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(())
                }
                KeyCode::Char('p') => {
                    if !session.inventory.use_item("Potion") {
                        hud.show_notice(Notice::transient("No Potion left!", 2000));
                    }
                }
                KeyCode::Char('b') => session.inventory.add_one(item::pokeball()),
                KeyCode::Char('c') => {
                    caught += 1;
                    let creature =
                        Creature::new(format!("wild-{caught}"), format!("Critter {caught}"), 20, 5);
                    if !session.party.add_creature(creature) {
                        hud.show_notice(Notice::transient("Your party is full!", 2000));
                    }
                }
                KeyCode::Char('x') => {
                    session.party.gain_exp(TRAINING_EXP);
                }
                KeyCode::Char(d @ '1'..='6') => {
                    let index = d as usize - '1' as usize;
                    session.party.switch_active(index);
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let delta = now.duration_since(last_frame);
        last_frame = now;

        scene.update(keys.sample(now), &mut hud);
        body.borrow_mut().integrate(delta.as_secs_f32(), scene.bounds());
        hud.tick(hud_clock.advance(delta));

        render(stdout, &scene, &body.borrow(), &hud, &status.borrow())?;
    }
}

fn render(
    stdout: &mut Stdout,
    scene: &OverworldScene,
    body: &ArcadeBody,
    hud: &TerminalHud,
    status: &StatusBar,
) -> Result<(), Box<dyn std::error::Error>> {
    let (cols, rows) = terminal::size()?;
    queue!(stdout, Clear(ClearType::All))?;

    queue!(
        stdout,
        MoveTo(0, 0),
        SetForegroundColor(Color::Yellow),
        Print(&status.bag),
        MoveTo(0, 1),
        Print(&status.party),
        ResetColor,
        MoveTo(0, 2),
        Print(format!("Steps: {}", scene.controller().steps())),
    )?;
    for (row, (_, line)) in hud.lines.iter().rev().take(1).enumerate() {
        queue!(stdout, MoveTo(0, 3 + row as u16), Print(line))?;
    }

    let tile_size = scene.config().tile_size;
    let world = scene.bounds().max;
    let world_cols = (world.x / tile_size).ceil() as i32;
    let world_rows = (world.y / tile_size).ceil() as i32;
    let player = tallgrass_core::Tile::containing(body.position, tile_size);

    let view_cols = i32::from(cols);
    let view_rows = i32::from(rows.saturating_sub(HUD_ROWS));
    let origin_x = player.x - view_cols / 2;
    let origin_y = player.y - view_rows / 2;

    for row in 0..view_rows {
        let mut line = String::with_capacity(view_cols as usize);
        for col in 0..view_cols {
            let (tx, ty) = (origin_x + col, origin_y + row);
            let glyph = if tx == player.x && ty == player.y {
                '@'
            } else if tx < 0 || ty < 0 || tx >= world_cols || ty >= world_rows {
                ' '
            } else if (tx * 7 + ty * 13) % 11 == 0 {
                '"'
            } else {
                '.'
            };
            line.push(glyph);
        }
        queue!(stdout, MoveTo(0, HUD_ROWS + row as u16))?;
        queue!(stdout, SetForegroundColor(Color::Green), Print(line), ResetColor)?;
    }

    stdout.flush()?;
    Ok(())
}
