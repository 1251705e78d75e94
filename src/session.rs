//! Per-connection game session.
//!
//! Owns the router `View`, the letter-game cursor and the flashcard cursor.
//! Each client message produces one or more server messages; the timed
//! auto-advance after a correct spelling happens here with sequential awaits
//! (no cancellation: once a flow step starts it runs to completion).
//!
//! Error policy: remote failures are logged and reported, and the only
//! recovery is the user retrying the action.

use tokio::time::sleep;
use tracing::{error, info, instrument};

use crate::domain::Word;
use crate::logic;
use crate::protocol::{ChallengeOut, ClientWsMessage, ServerWsMessage};
use crate::router::View;
use crate::spelling::{ChallengeState, Outcome};
use crate::state::AppState;
use crate::store::Store;

/// Cursor over the word list during the letter game. Dropped whenever the
/// player leaves the game, which discards the challenge state with it.
struct LetterGame {
  index: usize,
  challenge: ChallengeState,
}

pub struct Session {
  state: AppState,
  view: View,
  words: Vec<Word>,
  letter_game: Option<LetterGame>,
  /// Current flashcard index in the memory challenge.
  card_index: usize,
}

impl Session {
  pub fn new(state: AppState) -> Self {
    Self {
      state,
      view: View::default(),
      words: Vec::new(),
      letter_game: None,
      card_index: 0,
    }
  }

  #[allow(dead_code)]
  pub fn view(&self) -> &View {
    &self.view
  }

  /// Fetch the word list, remembering it for the rest of the session flows.
  async fn refresh_words(&mut self) -> Result<(), ServerWsMessage> {
    match self.state.store.words_with_progress(&self.state.user_id).await {
      Ok(words) => {
        self.words = words;
        Ok(())
      }
      Err(e) => {
        error!(target: "wordquest_backend", error = %e, "Failed to fetch words");
        Err(ServerWsMessage::Error { message: format!("Failed to fetch words: {e}") })
      }
    }
  }

  fn set_view(&mut self, view: View) -> ServerWsMessage {
    if self.view == View::LetterGame && view != View::LetterGame {
      self.letter_game = None;
    }
    self.view = view.clone();
    let is_game_view = view.is_game_view();
    ServerWsMessage::ViewChanged { view, is_game_view }
  }

  /// Handle one client message. May sleep for the configured display
  /// delays, so replies can arrive spaced in time.
  #[instrument(level = "debug", skip(self, msg))]
  pub async fn handle(&mut self, msg: ClientWsMessage) -> Vec<ServerWsMessage> {
    match msg {
      ClientWsMessage::Ping => vec![ServerWsMessage::Pong],
      ClientWsMessage::Navigate { event } => {
        let next = self.view.apply(event);
        vec![self.set_view(next)]
      }
      ClientWsMessage::StartLetterGame => self.start_letter_game().await,
      ClientWsMessage::PlaceLetter { letter } => self.place_letter(letter),
      ClientWsMessage::ClearGuess => self.clear_guess(),
      ClientWsMessage::ConfirmGuess => self.confirm_guess().await,
      ClientWsMessage::StartMemoryChallenge { word_id } => {
        self.start_memory_challenge(word_id).await
      }
      ClientWsMessage::Remembered => self.remembered(),
      ClientWsMessage::Forgot => self.forgot(),
      ClientWsMessage::LearnNext => self.learn_next().await,
    }
  }

  async fn start_letter_game(&mut self) -> Vec<ServerWsMessage> {
    if let Err(e) = self.refresh_words().await {
      return vec![e];
    }
    let Some(word) = self.words.first() else {
      return vec![ServerWsMessage::Error { message: "No words available".into() }];
    };
    let challenge = ChallengeState::new(&word.word);
    info!(target: "letter_game", word = %word.word, total = self.words.len(), "Letter game started");
    let out = ChallengeOut::from_state(&word.id, &challenge);
    self.letter_game = Some(LetterGame { index: 0, challenge });
    vec![
      self.set_view(View::LetterGame),
      ServerWsMessage::LetterChallenge { challenge: out, word_index: 0, total: self.words.len() },
    ]
  }

  fn challenge_reply(&self) -> Vec<ServerWsMessage> {
    match &self.letter_game {
      Some(game) => {
        let word = &self.words[game.index];
        vec![ServerWsMessage::LetterChallenge {
          challenge: ChallengeOut::from_state(&word.id, &game.challenge),
          word_index: game.index,
          total: self.words.len(),
        }]
      }
      None => vec![ServerWsMessage::Error { message: "No letter game in progress".into() }],
    }
  }

  fn place_letter(&mut self, letter: char) -> Vec<ServerWsMessage> {
    if let Some(game) = &mut self.letter_game {
      game.challenge.place_letter(letter);
    }
    self.challenge_reply()
  }

  fn clear_guess(&mut self) -> Vec<ServerWsMessage> {
    if let Some(game) = &mut self.letter_game {
      game.challenge.clear_guess();
    }
    self.challenge_reply()
  }

  /// Evaluate the guess. On success, wait out the display delays and either
  /// re-initialize for the next word or exit back to the map.
  async fn confirm_guess(&mut self) -> Vec<ServerWsMessage> {
    let Some(game) = &mut self.letter_game else {
      return vec![ServerWsMessage::Error { message: "No letter game in progress".into() }];
    };
    let outcome = game.challenge.confirm();
    let mut replies = vec![ServerWsMessage::GuessResult { outcome }];
    if outcome != Outcome::Correct {
      return replies;
    }

    let next_index = game.index + 1;
    info!(target: "letter_game", word_index = game.index, correct = true, "Word spelled correctly");
    sleep(self.state.config.timing.advance_delay()).await;

    if next_index < self.words.len() {
      sleep(self.state.config.timing.shuffle_delay()).await;
      let word = &self.words[next_index];
      let challenge = ChallengeState::new(&word.word);
      let out = ChallengeOut::from_state(&word.id, &challenge);
      self.letter_game = Some(LetterGame { index: next_index, challenge });
      replies.push(ServerWsMessage::LetterChallenge {
        challenge: out,
        word_index: next_index,
        total: self.words.len(),
      });
    } else {
      info!(target: "letter_game", "Letter game finished");
      replies.push(self.set_view(View::Map));
    }
    replies
  }

  fn memory_card_reply(&self) -> Vec<ServerWsMessage> {
    match self.words.get(self.card_index) {
      Some(word) => vec![ServerWsMessage::MemoryCard {
        word: word.clone(),
        index: self.card_index,
        total: self.words.len(),
      }],
      None => vec![ServerWsMessage::Error { message: "No memory challenge in progress".into() }],
    }
  }

  async fn start_memory_challenge(&mut self, word_id: Option<String>) -> Vec<ServerWsMessage> {
    if let Err(e) = self.refresh_words().await {
      return vec![e];
    }
    if self.words.is_empty() {
      return vec![ServerWsMessage::Error { message: "No words available".into() }];
    }
    self.card_index = word_id
      .as_deref()
      .and_then(|id| self.words.iter().position(|w| w.id == id))
      .unwrap_or(0);
    let word_id = self.words[self.card_index].id.clone();
    let mut replies = vec![self.set_view(View::MemoryChallenge { word_id })];
    replies.extend(self.memory_card_reply());
    replies
  }

  fn remembered(&mut self) -> Vec<ServerWsMessage> {
    if !matches!(self.view, View::MemoryChallenge { .. }) {
      return vec![ServerWsMessage::Error { message: "No memory challenge in progress".into() }];
    }
    if self.card_index + 1 < self.words.len() {
      self.card_index += 1;
      self.memory_card_reply()
    } else {
      vec![self.set_view(View::Map)]
    }
  }

  /// "Didn't remember" keeps the player on the same card to study more.
  fn forgot(&mut self) -> Vec<ServerWsMessage> {
    if !matches!(self.view, View::MemoryChallenge { .. }) {
      return vec![ServerWsMessage::Error { message: "No memory challenge in progress".into() }];
    }
    info!(target: "wordquest_backend", index = self.card_index, "Card not remembered");
    self.memory_card_reply()
  }

  /// Word-detail "next word": persist mastery + rewards, then advance to
  /// the next word or back to the map. A failed remote write is logged and
  /// the navigation still happens.
  async fn learn_next(&mut self) -> Vec<ServerWsMessage> {
    let View::WordDetail { word_id } = self.view.clone() else {
      return vec![ServerWsMessage::Error { message: "Not on a word detail view".into() }];
    };
    if self.words.is_empty() {
      if let Err(e) = self.refresh_words().await {
        return vec![e];
      }
    }

    let mut replies = Vec::new();
    match logic::complete_word(&self.state, &word_id).await {
      Ok(user) => replies.push(ServerWsMessage::UserUpdated { user }),
      Err(e) => {
        error!(target: "wordquest_backend", %word_id, error = %e, "Error updating progress");
      }
    }

    let current = self.words.iter().position(|w| w.id == word_id);
    let next = match current {
      Some(i) if i + 1 < self.words.len() => Some(self.words[i + 1].id.clone()),
      _ => None,
    };
    match next {
      Some(word_id) => replies.push(self.set_view(View::WordDetail { word_id })),
      None => replies.push(self.set_view(View::Map)),
    }
    replies
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;

  use crate::config::{GameConfig, Timing};
  use crate::router::NavEvent;
  use crate::seeds::DEFAULT_USER_ID;
  use crate::state::AppState;
  use crate::store::MemoryStore;

  fn test_state() -> AppState {
    let config = GameConfig {
      timing: Timing { advance_delay_ms: 0, shuffle_delay_ms: 0 },
      ..GameConfig::default()
    };
    AppState::with_store(Arc::new(MemoryStore::seeded()), config, DEFAULT_USER_ID)
  }

  fn challenge_of(replies: &[ServerWsMessage]) -> (&ChallengeOut, usize) {
    for r in replies {
      if let ServerWsMessage::LetterChallenge { challenge, word_index, .. } = r {
        return (challenge, *word_index);
      }
    }
    panic!("no challenge in replies: {replies:?}");
  }

  fn correct_letter(challenge: &ChallengeOut) -> char {
    challenge.word.chars().nth(challenge.blank_index).expect("blank in range")
  }

  #[tokio::test]
  async fn letter_game_advances_after_correct_guess() {
    let mut session = Session::new(test_state());
    let replies = session.handle(ClientWsMessage::StartLetterGame).await;
    let (challenge, index) = challenge_of(&replies);
    assert_eq!(index, 0);
    assert_eq!(challenge.word, "APPLE");

    let letter = correct_letter(challenge);
    session.handle(ClientWsMessage::PlaceLetter { letter }).await;
    let replies = session.handle(ClientWsMessage::ConfirmGuess).await;
    assert!(matches!(replies[0], ServerWsMessage::GuessResult { outcome: Outcome::Correct }));
    let (next, index) = challenge_of(&replies);
    assert_eq!(index, 1);
    assert_eq!(next.word, "BANANA");
  }

  #[tokio::test]
  async fn letter_game_exits_to_map_after_last_word() {
    let mut session = Session::new(test_state());
    session.handle(ClientWsMessage::StartLetterGame).await;

    for _ in 0..3 {
      // Read the current challenge through a no-op clear.
      let replies = session.handle(ClientWsMessage::ClearGuess).await;
      let (challenge, _) = challenge_of(&replies);
      let letter = correct_letter(challenge);
      session.handle(ClientWsMessage::PlaceLetter { letter }).await;
      session.handle(ClientWsMessage::ConfirmGuess).await;
    }
    assert_eq!(session.view(), &View::Map);
  }

  #[tokio::test]
  async fn wrong_guess_stays_on_word() {
    let mut session = Session::new(test_state());
    let replies = session.handle(ClientWsMessage::StartLetterGame).await;
    let (challenge, _) = challenge_of(&replies);
    let wrong = challenge
      .candidates
      .iter()
      .copied()
      .find(|&c| c != correct_letter(challenge))
      .expect("distractor");

    session.handle(ClientWsMessage::PlaceLetter { letter: wrong }).await;
    let replies = session.handle(ClientWsMessage::ConfirmGuess).await;
    assert!(matches!(
      replies[0],
      ServerWsMessage::GuessResult { outcome: Outcome::Incorrect }
    ));
    assert_eq!(replies.len(), 1);
    assert_eq!(session.view(), &View::LetterGame);
  }

  #[tokio::test]
  async fn leaving_the_game_discards_the_challenge() {
    let mut session = Session::new(test_state());
    session.handle(ClientWsMessage::StartLetterGame).await;
    session
      .handle(ClientWsMessage::Navigate { event: NavEvent::Back })
      .await;
    assert_eq!(session.view(), &View::Map);
    let replies = session.handle(ClientWsMessage::ConfirmGuess).await;
    assert!(matches!(replies[0], ServerWsMessage::Error { .. }));
  }

  #[tokio::test]
  async fn memory_challenge_walks_cards_and_exits() {
    let mut session = Session::new(test_state());
    let replies = session
      .handle(ClientWsMessage::StartMemoryChallenge { word_id: Some("w-banana".into()) })
      .await;
    assert!(replies.iter().any(|r| matches!(
      r,
      ServerWsMessage::MemoryCard { index: 1, .. }
    )));

    // Forgot keeps the same card.
    let replies = session.handle(ClientWsMessage::Forgot).await;
    assert!(matches!(replies[0], ServerWsMessage::MemoryCard { index: 1, .. }));

    let replies = session.handle(ClientWsMessage::Remembered).await;
    assert!(matches!(replies[0], ServerWsMessage::MemoryCard { index: 2, .. }));
    let replies = session.handle(ClientWsMessage::Remembered).await;
    assert!(matches!(replies[0], ServerWsMessage::ViewChanged { .. }));
    assert_eq!(session.view(), &View::Map);
  }

  #[tokio::test]
  async fn learn_next_awards_and_advances() {
    let state = test_state();
    let store = state.store.clone();
    let mut session = Session::new(state);
    session
      .handle(ClientWsMessage::Navigate {
        event: NavEvent::WordDetail { word_id: "w-apple".into() },
      })
      .await;

    let replies = session.handle(ClientWsMessage::LearnNext).await;
    let user = replies
      .iter()
      .find_map(|r| match r {
        ServerWsMessage::UserUpdated { user } => Some(user),
        _ => None,
      })
      .expect("user update");
    // Seed user: 650/1000 xp + 50, 1250 stars + 10.
    assert_eq!(user.xp, 700);
    assert_eq!(user.stars, 1260);
    assert_eq!(user.learned_words, 1251);
    assert_eq!(session.view(), &View::WordDetail { word_id: "w-banana".into() });

    let words = store.words_with_progress(DEFAULT_USER_ID).await.expect("words");
    let apple = words.iter().find(|w| w.id == "w-apple").expect("apple");
    assert_eq!(apple.progress, 100);
  }

  #[tokio::test]
  async fn learn_next_from_last_word_returns_to_map() {
    let mut session = Session::new(test_state());
    session
      .handle(ClientWsMessage::Navigate {
        event: NavEvent::WordDetail { word_id: "w-cat".into() },
      })
      .await;
    session.handle(ClientWsMessage::LearnNext).await;
    assert_eq!(session.view(), &View::Map);
  }
}
