#![allow(dead_code)]

use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use typing_rain::display::Surface;
use typing_rain::entities::*;

/// Surface that records every draw call instead of painting.
#[derive(Default)]
pub struct Recorder {
    pub draws: Vec<(i32, i32, String, Rgb)>,
}

impl Surface for Recorder {
    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Rgb) -> std::io::Result<()> {
        self.draws.push((x, y, text.to_string(), color));
        Ok(())
    }
}

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Default rules with spawning switched off so ticks are deterministic.
pub fn quiet_rules() -> Rules {
    Rules {
        spawn_chance: 0.0,
        ..Rules::default()
    }
}

pub fn make_entity(item: &Rc<AlphabetItem>, y: i32) -> Entity {
    Entity {
        item: Rc::clone(item),
        speed: 2,
        x: 100,
        y,
        trigger_key: item.short_form.clone(),
        display_text: item.long_form.clone(),
        reward: 3,
        state: EntityState::Falling,
        color: BLACK,
    }
}
