/// Startup configuration: tuning defaults and the alphabet file.
///
/// The alphabet file is TOML with one `long = "short"` pair per line:
///
/// ```toml
/// sit = "i"
/// cat = "a"
/// ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use anyhow::{bail, ensure, Context, Result};
use serde::Deserialize;

use crate::entities::{AlphabetItem, Rules};

impl Default for Rules {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            spawn_margin: 75,
            spawn_y: -10,
            big_reward: 20,
            small_reward: 3,
            punishment: 10,
            difficulty_step: 20,
            fade_amount: 5,
            fade_done_at: 250,
            frame_interval_ms: 16,
            scroll_speed: 2,
            score_step: 200,
            spawn_chance: 0.015,
        }
    }
}

impl Rules {
    /// Reject tuning that would panic or stall the game.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.scroll_speed > 0,
            "scroll speed must be positive, got {}",
            self.scroll_speed
        );
        ensure!(
            (0.0..=1.0).contains(&self.spawn_chance),
            "spawn chance must be between 0 and 1, got {}",
            self.spawn_chance
        );
        ensure!(self.score_step > 0, "score step must be positive");
        ensure!(
            self.width - 2 * self.spawn_margin >= 0,
            "spawn margin {} leaves no room in a {} wide play area",
            self.spawn_margin,
            self.width
        );
        Ok(())
    }
}

/// Top-level `long = "short"` table of an alphabet file.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct AlphabetFile(BTreeMap<String, String>);

/// Read and validate the alphabet file at `path`.
pub fn load_alphabet(path: &Path) -> Result<Vec<Rc<AlphabetItem>>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read alphabet file {}", path.display()))?;
    parse_alphabet(&text).with_context(|| format!("invalid alphabet file {}", path.display()))
}

/// Parse alphabet TOML. Items come back in key order.
pub fn parse_alphabet(text: &str) -> Result<Vec<Rc<AlphabetItem>>> {
    let AlphabetFile(pairs) =
        toml::from_str(text).context("expected a table of `long = \"short\"` string pairs")?;

    if pairs.is_empty() {
        bail!("alphabet is empty; add at least one `long = \"short\"` pair");
    }

    let mut items = Vec::with_capacity(pairs.len());
    for (long, short) in pairs {
        if short.is_empty() {
            bail!("short form for {long:?} is empty");
        }
        if short.chars().count() != 1 {
            // A key event carries one character, so this one can never be popped.
            log::warn!("short form {short:?} for {long:?} is not a single character");
        }
        items.push(AlphabetItem::new(long, short));
    }
    Ok(items)
}
