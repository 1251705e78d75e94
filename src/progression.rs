//! Experience and star accounting.
//!
//! Pure calculators; the caller fetches the user record, applies an award and
//! persists the result. Thresholds grow 20% per level, floored, which for
//! integer thresholds is exactly `t + t / 5`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressionError {
  #[error("invalid argument: {0}")]
  InvalidArgument(String),
}

/// A user's progression triple as stored remotely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
  /// Experience inside the current level. Non-negative.
  pub xp: u64,
  /// Current level, starting at 1.
  pub level: u32,
  /// Experience required to reach the next level.
  pub threshold: u64,
}

/// Apply an experience award, rolling over as many levels as the amount
/// spans in a single call.
pub fn award_xp(input: &Progression, amount: i64) -> Result<Progression, ProgressionError> {
  if amount < 0 {
    return Err(ProgressionError::InvalidArgument(format!(
      "xp award must be non-negative, got {amount}"
    )));
  }

  let mut out = *input;
  out.xp += amount as u64;
  while out.xp >= out.threshold {
    out.xp -= out.threshold;
    out.level += 1;
    out.threshold += out.threshold / 5;
  }
  Ok(out)
}

/// Add stars to the running total. Same contract as `award_xp`.
pub fn award_stars(current: u64, amount: i64) -> Result<u64, ProgressionError> {
  if amount < 0 {
    return Err(ProgressionError::InvalidArgument(format!(
      "star award must be non-negative, got {amount}"
    )));
  }
  Ok(current + amount as u64)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn single_level_up_rolls_remainder() {
    let input = Progression { xp: 90, level: 1, threshold: 100 };
    let out = award_xp(&input, 50).expect("award");
    assert_eq!(out, Progression { xp: 40, level: 2, threshold: 120 });
  }

  #[test]
  fn large_award_spans_multiple_levels() {
    // 0+35 -> 35>=10: xp 25, level 2, threshold 12
    //         25>=12: xp 13, level 3, threshold 14
    //         13<14: stop
    let input = Progression { xp: 0, level: 1, threshold: 10 };
    let out = award_xp(&input, 35).expect("award");
    assert_eq!(out, Progression { xp: 13, level: 3, threshold: 14 });
  }

  #[test]
  fn award_below_threshold_keeps_level() {
    let input = Progression { xp: 10, level: 5, threshold: 200 };
    let out = award_xp(&input, 30).expect("award");
    assert_eq!(out, Progression { xp: 40, level: 5, threshold: 200 });
  }

  #[test]
  fn threshold_growth_matches_floored_multiplier() {
    // floor(t * 1.2) for a few representative values.
    for (t, expected) in [(10u64, 12u64), (11, 13), (12, 14), (100, 120), (121, 145)] {
      let input = Progression { xp: 0, level: 1, threshold: t };
      let out = award_xp(&input, t as i64).expect("award");
      assert_eq!(out.threshold, expected, "threshold {t}");
      assert_eq!(out.level, 2);
    }
  }

  #[test]
  fn negative_xp_award_is_rejected_without_mutation() {
    let input = Progression { xp: 90, level: 1, threshold: 100 };
    let err = award_xp(&input, -1).unwrap_err();
    assert!(matches!(err, ProgressionError::InvalidArgument(_)));
    assert_eq!(input, Progression { xp: 90, level: 1, threshold: 100 });
  }

  #[test]
  fn stars_accumulate() {
    assert_eq!(award_stars(1250, 10).expect("award"), 1260);
    assert_eq!(award_stars(0, 0).expect("award"), 0);
  }

  #[test]
  fn negative_star_award_is_rejected() {
    let err = award_stars(5, -3).unwrap_err();
    assert!(matches!(err, ProgressionError::InvalidArgument(_)));
  }
}
