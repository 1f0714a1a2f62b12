/// Game-logic functions.
///
/// Everything here mutates entities and the session in place. Item
/// difficulty is a shared `Cell` written through by every entity spawned
/// from the item, so updates cannot be expressed as returning a new state.
/// All randomness comes through an injected `Rng` so callers control
/// determinism (tests use a seeded RNG).

use std::rc::Rc;

use rand::Rng;

use crate::display::Surface;
use crate::entities::{
    AlphabetItem, Entity, EntityState, KeyPresses, Rgb, Rules, Session, BLACK, RED,
};
use crate::input::FrameInput;

/// Upper bound (inclusive) of the per-spawn difficulty roll.
const DIFFICULTY_ROLL_MAX: i32 = 100;

// ── Entity ───────────────────────────────────────────────────────────────────

impl Entity {
    /// Spawn a new falling entity just above the top edge.
    ///
    /// The higher the item's accumulated difficulty, the more likely it shows
    /// the short form and pays the big reward.
    pub fn new(item: Rc<AlphabetItem>, speed: i32, rules: &Rules, rng: &mut impl Rng) -> Self {
        let x = rng.gen_range(rules.spawn_margin..=rules.width - rules.spawn_margin);
        let roll = rng.gen_range(0..=DIFFICULTY_ROLL_MAX);

        let (display_text, reward) = if item.difficulty() < roll {
            (item.long_form.clone(), rules.small_reward)
        } else {
            (item.short_form.clone(), rules.big_reward)
        };

        Entity {
            trigger_key: item.short_form.clone(),
            item,
            speed,
            x,
            y: rules.spawn_y,
            display_text,
            reward,
            state: EntityState::Falling,
            color: BLACK,
        }
    }

    /// Advance one frame against this frame's key presses and return the
    /// score delta. Exactly one branch fires; the off-screen check wins.
    pub fn step(&mut self, keys: &mut KeyPresses, rules: &Rules) -> i32 {
        if self.y >= rules.height {
            self.item.adjust_difficulty(-rules.difficulty_step);
            self.state = EntityState::Finished;
            log::debug!("missed {:?}", self.display_text);
            return -rules.punishment;
        }

        match self.state {
            EntityState::Finished => 0,
            EntityState::Fading if self.color.b < rules.fade_done_at => {
                self.color = Rgb {
                    r: 255,
                    g: self.color.g.saturating_add(rules.fade_amount),
                    b: self.color.b.saturating_add(rules.fade_amount),
                };
                0
            }
            EntityState::Fading => {
                self.state = EntityState::Finished;
                0
            }
            _ if keys.consume(&self.trigger_key) => {
                self.color = RED;
                self.state = EntityState::Fading;
                self.item.adjust_difficulty(rules.difficulty_step);
                log::debug!("popped {:?} for {}", self.display_text, self.reward);
                self.reward
            }
            _ => {
                self.y = self.y.saturating_add(self.speed);
                0
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state == EntityState::Finished
    }
}

// ── Session ──────────────────────────────────────────────────────────────────

impl Session {
    /// Build an empty session. `items` must be non-empty; the config loader
    /// guarantees that.
    pub fn new(items: Vec<Rc<AlphabetItem>>, rules: Rules) -> Self {
        Session {
            items,
            live_entities: Vec::new(),
            score: 0,
            frame_interval_ms: rules.frame_interval_ms,
            rules,
        }
    }

    /// Add `delta` to the score. Crossing into a higher multiple of
    /// `score_step` shortens the frame interval by 1 ms; it never grows back.
    pub fn add_score(&mut self, delta: i64) {
        let step = self.rules.score_step;
        let before = self.score.div_euclid(step);
        self.score += delta;
        if self.score.div_euclid(step) > before {
            self.frame_interval_ms = self.frame_interval_ms.saturating_sub(1);
            log::info!(
                "score {} passed a threshold, frame interval now {} ms",
                self.score,
                self.frame_interval_ms
            );
        }
    }

    /// Maybe spawn one entity from a uniformly chosen item.
    pub fn spawn_if_due(&mut self, rng: &mut impl Rng) -> bool {
        if self.items.is_empty() || !rng.gen_bool(self.rules.spawn_chance) {
            return false;
        }
        let idx = rng.gen_range(0..self.items.len());
        let item = Rc::clone(&self.items[idx]);
        let entity = Entity::new(item, self.rules.scroll_speed, &self.rules, rng);
        log::debug!("spawned {:?} at x={}", entity.display_text, entity.x);
        self.live_entities.push(entity);
        true
    }

    /// Advance the whole simulation by one frame and draw it onto `surface`.
    ///
    /// Entities that finish during this pass are still drawn this frame and
    /// dropped once the pass is over. Render failures are logged and never
    /// touch score or difficulty.
    pub fn tick<S: Surface>(
        &mut self,
        keys: &mut KeyPresses,
        rng: &mut impl Rng,
        surface: &mut S,
    ) {
        let mut entities = std::mem::take(&mut self.live_entities);

        // ── 1. Step, score and draw every live entity ────────────────────────
        for entity in entities.iter_mut().filter(|e| !e.is_finished()) {
            let delta = entity.step(keys, &self.rules);
            self.add_score(delta as i64);
            if let Err(e) = entity.render(surface) {
                log::warn!("render error: {e}");
            }
        }

        // ── 2. Deferred removal ──────────────────────────────────────────────
        entities.retain(|e| !e.is_finished());
        self.live_entities = entities;

        // ── 3. Spawn, then the score on top ──────────────────────────────────
        self.spawn_if_due(rng);
        if let Err(e) = self.render_score(surface) {
            log::warn!("render error: {e}");
        }
    }

    /// Run one frame of gameplay from already-gathered input. Keys typed in
    /// the frame that also carries a quit signal still count. Returns `false`
    /// once the game should stop.
    pub fn run_frame<S: Surface>(
        &mut self,
        mut input: FrameInput,
        rng: &mut impl Rng,
        surface: &mut S,
    ) -> bool {
        self.tick(&mut input.keys, rng, surface);
        !input.quit
    }
}
