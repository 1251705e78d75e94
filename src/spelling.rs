//! Spelling challenge engine: the letter-bubble mini-game.
//!
//! One `ChallengeState` per word attempt. The engine is pure and synchronous;
//! the surrounding session decides when to re-initialize for the next word.
//!
//! Rules:
//!   - Exactly one letter of the target is blanked: index 2 for words longer
//!     than two letters, otherwise index 1, clamped so a one-letter word
//!     blanks its only slot.
//!   - Six candidate letters are offered: the correct one plus five
//!     distractors drawn from a fixed reserve pool.
//!   - The guess is only evaluated on an explicit confirm; filling a slot
//!     after a wrong confirm resets the outcome to pending.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// Fixed pool the distractor letters are drawn from.
const RESERVE_POOL: [char; 7] = ['X', 'B', 'P', 'L', 'S', 'O', 'K'];

/// Number of letters offered to the player (1 correct + 5 distractors).
const CANDIDATE_COUNT: usize = 6;

/// Tri-state result of the current attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
  Pending,
  Correct,
  Incorrect,
}

/// State of a single word attempt in the letter game.
#[derive(Clone, Debug)]
pub struct ChallengeState {
  /// Upper-cased target word.
  target: Vec<char>,
  /// One slot per target letter; `None` marks the blank awaiting a guess.
  revealed: Vec<Option<char>>,
  /// The fixed index that starts blank and is re-blanked by `clear_guess`.
  blank_index: usize,
  /// Shuffled candidate letters. Stable for the lifetime of the state.
  candidates: Vec<char>,
  outcome: Outcome,
}

impl ChallengeState {
  /// Set up a fresh attempt for `word` using the ambient thread RNG.
  pub fn new(word: &str) -> Self {
    Self::new_with_rng(word, &mut rand::thread_rng())
  }

  /// Set up a fresh attempt for `word`, shuffling candidates with `rng`.
  /// Injectable RNG keeps tests deterministic.
  pub fn new_with_rng<R: Rng + ?Sized>(word: &str, rng: &mut R) -> Self {
    let target: Vec<char> = word.to_uppercase().chars().collect();
    // Clamped so one-letter words blank their only slot. Words come from
    // the remote word table, so the length is not under our control.
    let blank_index = match target.len() {
      0 | 1 => 0,
      2 => 1,
      _ => 2,
    };

    let revealed = target
      .iter()
      .enumerate()
      .map(|(i, &c)| if i == blank_index { None } else { Some(c) })
      .collect();

    let mut candidates: Vec<char> = Vec::new();
    if let Some(&correct) = target.get(blank_index) {
      candidates.push(correct);
      candidates.extend(
        RESERVE_POOL
          .iter()
          .copied()
          .filter(|&c| c != correct)
          .take(CANDIDATE_COUNT - 1),
      );
      candidates.shuffle(rng);
    }

    Self {
      target,
      revealed,
      blank_index,
      candidates,
      outcome: Outcome::Pending,
    }
  }

  pub fn outcome(&self) -> Outcome {
    self.outcome
  }

  pub fn blank_index(&self) -> usize {
    self.blank_index
  }

  pub fn candidates(&self) -> &[char] {
    &self.candidates
  }

  /// Slots as displayed: the blank renders as `None`.
  pub fn revealed(&self) -> &[Option<char>] {
    &self.revealed
  }

  /// The upper-cased target word.
  pub fn target(&self) -> String {
    self.target.iter().collect()
  }

  /// True once every slot holds a letter.
  pub fn is_complete(&self) -> bool {
    self.revealed.iter().all(|slot| slot.is_some())
  }

  /// Fill the blank slot with `letter`. No-op after a correct outcome or
  /// when no slot is empty. Clears a prior incorrect marking.
  pub fn place_letter(&mut self, letter: char) {
    if self.outcome == Outcome::Correct {
      return;
    }
    if let Some(slot) = self.revealed.iter_mut().find(|slot| slot.is_none()) {
      *slot = Some(letter.to_ascii_uppercase());
      self.outcome = Outcome::Pending;
    }
  }

  /// Re-blank the fixed index and reset the outcome. Candidates keep their
  /// order so repeated clears yield identical state.
  pub fn clear_guess(&mut self) {
    self.revealed = self
      .target
      .iter()
      .enumerate()
      .map(|(i, &c)| if i == self.blank_index { None } else { Some(c) })
      .collect();
    self.outcome = Outcome::Pending;
  }

  /// Evaluate the completed guess. No-op while a slot is still empty or
  /// once the outcome is already correct; this is the only place the
  /// outcome reaches a terminal value.
  pub fn confirm(&mut self) -> Outcome {
    if self.outcome == Outcome::Correct || !self.is_complete() {
      return self.outcome;
    }
    let guess: String = self.revealed.iter().flatten().collect();
    let guess_upper = guess.to_uppercase();
    self.outcome = if guess_upper.chars().eq(self.target.iter().copied()) {
      Outcome::Correct
    } else {
      Outcome::Incorrect
    };
    self.outcome
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  fn state_for(word: &str) -> ChallengeState {
    ChallengeState::new_with_rng(word, &mut StdRng::seed_from_u64(7))
  }

  #[test]
  fn blanks_third_letter_of_long_words() {
    let s = state_for("Cat");
    assert_eq!(s.blank_index(), 2);
    assert_eq!(s.revealed(), &[Some('C'), Some('A'), None]);
    assert_eq!(s.outcome(), Outcome::Pending);
  }

  #[test]
  fn blanks_second_letter_of_two_letter_words() {
    let s = state_for("Go");
    assert_eq!(s.blank_index(), 1);
    assert_eq!(s.revealed(), &[Some('G'), None]);
  }

  #[test]
  fn candidates_are_six_distinct_letters_with_correct_exactly_once() {
    // Run a batch of seeds so a lucky shuffle can't hide a duplicate.
    for seed in 0..50 {
      let mut rng = StdRng::seed_from_u64(seed);
      let s = ChallengeState::new_with_rng("Apple", &mut rng);
      assert_eq!(s.candidates().len(), 6);
      let correct = s.candidates().iter().filter(|&&c| c == 'P').count();
      assert_eq!(correct, 1, "seed {seed}: correct letter count");
      let mut sorted = s.candidates().to_vec();
      sorted.sort_unstable();
      sorted.dedup();
      assert_eq!(sorted.len(), 6, "seed {seed}: duplicates in candidates");
    }
  }

  #[test]
  fn pool_collision_does_not_duplicate_correct_letter() {
    // "Rabbit" blanks index 2 = 'B', which is also in the reserve pool.
    let s = state_for("Rabbit");
    let count = s.candidates().iter().filter(|&&c| c == 'B').count();
    assert_eq!(count, 1);
    assert_eq!(s.candidates().len(), 6);
  }

  #[test]
  fn one_letter_word_blanks_its_only_slot() {
    let mut s = state_for("A");
    assert_eq!(s.blank_index(), 0);
    assert_eq!(s.revealed(), &[None]);
    assert_eq!(s.candidates().len(), 6);
    s.place_letter('A');
    assert_eq!(s.confirm(), Outcome::Correct);
  }

  #[test]
  fn empty_word_yields_no_candidates() {
    let s = state_for("");
    assert!(s.revealed().is_empty());
    assert!(s.candidates().is_empty());
    assert_eq!(s.outcome(), Outcome::Pending);
  }

  #[test]
  fn confirm_matches_exact_spelling() {
    let mut s = state_for("Apple");
    s.place_letter('P');
    assert_eq!(s.confirm(), Outcome::Correct);

    let mut s = state_for("Apple");
    s.place_letter('X');
    assert_eq!(s.confirm(), Outcome::Incorrect);
  }

  #[test]
  fn confirm_is_noop_while_incomplete() {
    let mut s = state_for("Apple");
    assert_eq!(s.confirm(), Outcome::Pending);
    assert_eq!(s.outcome(), Outcome::Pending);
  }

  #[test]
  fn confirm_is_noop_after_correct() {
    let mut s = state_for("Cat");
    s.place_letter('T');
    assert_eq!(s.confirm(), Outcome::Correct);
    assert_eq!(s.confirm(), Outcome::Correct);
  }

  #[test]
  fn place_letter_after_incorrect_resets_to_pending() {
    let mut s = state_for("Cat");
    s.place_letter('X');
    assert_eq!(s.confirm(), Outcome::Incorrect);
    let before: Vec<Option<char>> = s.revealed().to_vec();
    s.place_letter('T');
    assert_eq!(s.outcome(), Outcome::Pending);
    // The filled (non-blank) slots must be untouched.
    assert_eq!(s.revealed()[0], before[0]);
    assert_eq!(s.revealed()[1], before[1]);
  }

  #[test]
  fn place_letter_is_noop_after_correct() {
    let mut s = state_for("Cat");
    s.place_letter('T');
    s.confirm();
    let snapshot: Vec<Option<char>> = s.revealed().to_vec();
    s.place_letter('X');
    assert_eq!(s.revealed(), snapshot.as_slice());
    assert_eq!(s.outcome(), Outcome::Correct);
  }

  #[test]
  fn clear_guess_is_idempotent() {
    let mut s = state_for("Banana");
    let candidates = s.candidates().to_vec();
    s.place_letter('X');
    s.confirm();
    s.clear_guess();
    let first: Vec<Option<char>> = s.revealed().to_vec();
    s.clear_guess();
    assert_eq!(s.revealed(), first.as_slice());
    assert_eq!(s.outcome(), Outcome::Pending);
    assert_eq!(s.candidates(), candidates.as_slice());
  }

  #[test]
  fn lower_case_source_words_are_normalized() {
    let mut s = state_for("apple");
    assert_eq!(s.target(), "APPLE");
    s.place_letter('p');
    assert_eq!(s.confirm(), Outcome::Correct);
  }
}
