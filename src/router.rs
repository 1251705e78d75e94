//! Finite-state view router.
//!
//! The whole UI has one current screen; transitions are explicit events
//! applied to a tagged `View` value rather than ad-hoc setter calls. The
//! per-connection session owns one `View` and serializes it to the client
//! after every event.

use serde::{Deserialize, Serialize};

/// The current screen plus its navigation payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
  Map,
  WordDetail { word_id: String },
  MemoryChallenge { word_id: String },
  WordBook,
  Leaderboard,
  Profile,
  LetterGame,
  Settings,
}

/// Navigation events the client can raise.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "to", rename_all = "snake_case")]
pub enum NavEvent {
  Home,
  WordDetail { word_id: String },
  MemoryChallenge { word_id: String },
  WordBook,
  Leaderboard,
  Profile,
  LetterGame,
  Settings,
  Back,
  Logout,
}

impl View {
  /// Apply one navigation event. Back semantics: Settings returns to
  /// Profile, every other screen returns to the Map.
  pub fn apply(&self, event: NavEvent) -> View {
    match event {
      NavEvent::Home => View::Map,
      NavEvent::WordDetail { word_id } => View::WordDetail { word_id },
      NavEvent::MemoryChallenge { word_id } => View::MemoryChallenge { word_id },
      NavEvent::WordBook => View::WordBook,
      NavEvent::Leaderboard => View::Leaderboard,
      NavEvent::Profile => View::Profile,
      NavEvent::LetterGame => View::LetterGame,
      NavEvent::Settings => View::Settings,
      NavEvent::Back => match self {
        View::Settings => View::Profile,
        _ => View::Map,
      },
      NavEvent::Logout => View::Map,
    }
  }

  /// Screens that hide the bottom navigation bar in the SPA.
  pub fn is_game_view(&self) -> bool {
    matches!(
      self,
      View::WordDetail { .. }
        | View::MemoryChallenge { .. }
        | View::LetterGame
        | View::Settings
    )
  }
}

impl Default for View {
  fn default() -> Self {
    View::Map
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn starts_on_map() {
    assert_eq!(View::default(), View::Map);
  }

  #[test]
  fn word_selection_carries_payload() {
    let v = View::Map.apply(NavEvent::WordDetail { word_id: "w1".into() });
    assert_eq!(v, View::WordDetail { word_id: "w1".into() });
  }

  #[test]
  fn back_from_settings_returns_to_profile() {
    let v = View::Settings.apply(NavEvent::Back);
    assert_eq!(v, View::Profile);
  }

  #[test]
  fn back_from_everywhere_else_returns_to_map() {
    for v in [
      View::WordDetail { word_id: "w1".into() },
      View::MemoryChallenge { word_id: "w1".into() },
      View::WordBook,
      View::Leaderboard,
      View::Profile,
      View::LetterGame,
    ] {
      assert_eq!(v.apply(NavEvent::Back), View::Map);
    }
  }

  #[test]
  fn logout_lands_on_map() {
    assert_eq!(View::Settings.apply(NavEvent::Logout), View::Map);
  }

  #[test]
  fn game_views_hide_the_nav_bar() {
    assert!(View::LetterGame.is_game_view());
    assert!(View::Settings.is_game_view());
    assert!(!View::Map.is_game_view());
    assert!(!View::Leaderboard.is_game_view());
  }
}
