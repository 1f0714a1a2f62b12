/// All game entity types: pure data, no logic.
///
/// Behaviour lives in `compute` (simulation) and `display` (drawing).

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

// ── Colours ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub const BLACK: Rgb = Rgb::new(0, 0, 0);
pub const WHITE: Rgb = Rgb::new(255, 255, 255);
/// Marker colour of a freshly popped entity; fades toward white.
pub const RED: Rgb = Rgb::new(255, 0, 0);

// ── Alphabet ──────────────────────────────────────────────────────────────────

/// A trainable long-form / short-form pair, e.g. `"sit"` → `"i"`.
///
/// Shared through `Rc` by every entity spawned from it: `difficulty` is the
/// adaptive accumulator and must be seen by all of them.
#[derive(Debug)]
pub struct AlphabetItem {
    pub long_form: String,
    pub short_form: String,
    pub difficulty: Cell<i32>,
}

impl AlphabetItem {
    pub fn new(long_form: impl Into<String>, short_form: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            long_form: long_form.into(),
            short_form: short_form.into(),
            difficulty: Cell::new(0),
        })
    }

    pub fn difficulty(&self) -> i32 {
        self.difficulty.get()
    }

    pub fn adjust_difficulty(&self, delta: i32) {
        self.difficulty.set(self.difficulty.get() + delta);
    }
}

// ── Falling entity ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityState {
    Falling,
    /// Popped; colour animates toward white.
    Fading,
    /// Done. Removed from the session at the end of the frame.
    Finished,
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub item: Rc<AlphabetItem>,
    pub speed: i32,
    pub x: i32,
    pub y: i32,
    /// The single key that pops this entity (the item's short form).
    pub trigger_key: String,
    pub display_text: String,
    pub reward: i32,
    pub state: EntityState,
    pub color: Rgb,
}

// ── Key multiset ──────────────────────────────────────────────────────────────

/// Keys pressed during one frame. Two presses of the same key can pop two
/// entities that need it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyPresses {
    counts: HashMap<String, u32>,
}

impl KeyPresses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: impl Into<String>) {
        *self.counts.entry(key.into()).or_insert(0) += 1;
    }

    pub fn count(&self, key: &str) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Remove one instance of `key`. Returns `false` if none was pressed.
    pub fn consume(&mut self, key: &str) -> bool {
        match self.counts.get_mut(key) {
            Some(n) if *n > 0 => {
                *n -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl<S: Into<String>> FromIterator<S> for KeyPresses {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut keys = KeyPresses::new();
        for k in iter {
            keys.press(k);
        }
        keys
    }
}

// ── Tuning ────────────────────────────────────────────────────────────────────

/// Every tuning constant of the game. Coordinates are logical pixels in a
/// `width` × `height` play area; the display scales them to the terminal.
#[derive(Clone, Debug, PartialEq)]
pub struct Rules {
    pub width: i32,
    pub height: i32,
    /// Horizontal spawn band is `[spawn_margin, width - spawn_margin]`.
    pub spawn_margin: i32,
    pub spawn_y: i32,
    pub big_reward: i32,
    pub small_reward: i32,
    pub punishment: i32,
    /// Per-item difficulty change on every pop (+) or miss (−).
    pub difficulty_step: i32,
    pub fade_amount: u8,
    pub fade_done_at: u8,
    pub frame_interval_ms: u64,
    pub scroll_speed: i32,
    /// Frame interval shrinks by 1 ms each time the score passes a multiple of this.
    pub score_step: i64,
    pub spawn_chance: f64,
}

impl Rules {
    pub fn score_pos(&self) -> (i32, i32) {
        (self.width / 2, self.height - 50)
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Session {
    pub items: Vec<Rc<AlphabetItem>>,
    pub live_entities: Vec<Entity>,
    pub score: i64,
    pub frame_interval_ms: u64,
    pub rules: Rules,
}
