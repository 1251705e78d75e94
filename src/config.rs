//! Game configuration: award amounts and flow timings, loaded from TOML.
//!
//! All values have sensible defaults, so the TOML file is optional.
//! Point `GAME_CONFIG_PATH` at a file to override, e.g.:
//!
//! ```toml
//! [awards]
//! xp_per_word = 50
//! stars_per_word = 10
//!
//! [timing]
//! advance_delay_ms = 1500
//! shuffle_delay_ms = 300
//! ```

use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct GameConfig {
  #[serde(default)]
  pub awards: Awards,
  #[serde(default)]
  pub timing: Timing,
}

/// Rewards handed out when a word is learned.
#[derive(Clone, Debug, Deserialize)]
pub struct Awards {
  #[serde(default = "default_xp_per_word")]
  pub xp_per_word: i64,
  #[serde(default = "default_stars_per_word")]
  pub stars_per_word: i64,
}

/// Animation-driven delays in the letter game flow. These are display
/// choices, not game rules, hence configurable.
#[derive(Clone, Debug, Deserialize)]
pub struct Timing {
  /// Pause on the solved word before moving on.
  #[serde(default = "default_advance_delay_ms")]
  pub advance_delay_ms: u64,
  /// Extra fade-out before the next word appears.
  #[serde(default = "default_shuffle_delay_ms")]
  pub shuffle_delay_ms: u64,
}

fn default_xp_per_word() -> i64 {
  50
}
fn default_stars_per_word() -> i64 {
  10
}
fn default_advance_delay_ms() -> u64 {
  1500
}
fn default_shuffle_delay_ms() -> u64 {
  300
}

impl Default for Awards {
  fn default() -> Self {
    Self {
      xp_per_word: default_xp_per_word(),
      stars_per_word: default_stars_per_word(),
    }
  }
}

impl Default for Timing {
  fn default() -> Self {
    Self {
      advance_delay_ms: default_advance_delay_ms(),
      shuffle_delay_ms: default_shuffle_delay_ms(),
    }
  }
}

impl Timing {
  pub fn advance_delay(&self) -> Duration {
    Duration::from_millis(self.advance_delay_ms)
  }

  pub fn shuffle_delay(&self) -> Duration {
    Duration::from_millis(self.shuffle_delay_ms)
  }
}

/// Attempt to load `GameConfig` from GAME_CONFIG_PATH. On any parsing/IO
/// error we log and fall back to defaults.
pub fn load_game_config_from_env() -> GameConfig {
  let Ok(path) = std::env::var("GAME_CONFIG_PATH") else {
    return GameConfig::default();
  };
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<GameConfig>(&s) {
      Ok(cfg) => {
        info!(target: "wordquest_backend", %path, "Loaded game config (TOML)");
        cfg
      }
      Err(e) => {
        error!(target: "wordquest_backend", %path, error = %e, "Failed to parse TOML config");
        GameConfig::default()
      }
    },
    Err(e) => {
      error!(target: "wordquest_backend", %path, error = %e, "Failed to read TOML config file");
      GameConfig::default()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_are_the_shipped_values() {
    let cfg = GameConfig::default();
    assert_eq!(cfg.awards.xp_per_word, 50);
    assert_eq!(cfg.awards.stars_per_word, 10);
    assert_eq!(cfg.timing.advance_delay_ms, 1500);
    assert_eq!(cfg.timing.shuffle_delay_ms, 300);
  }

  #[test]
  fn partial_toml_keeps_other_defaults() {
    let cfg: GameConfig = toml::from_str("[timing]\nadvance_delay_ms = 10\n").expect("parse");
    assert_eq!(cfg.timing.advance_delay_ms, 10);
    assert_eq!(cfg.timing.shuffle_delay_ms, 300);
    assert_eq!(cfg.awards.xp_per_word, 50);
  }
}
