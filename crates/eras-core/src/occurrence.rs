//! Occurrence — a single historical event card.

use serde::{Deserialize, Serialize};

/// One historical event. `year` is `None` exactly while the occurrence is
/// the undealt current card whose date is hidden from the player; once the
/// server places it on the timeline it always carries a concrete year.
///
/// Immutable once delivered to the client within a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
  /// Unique within a match.
  pub id:      i64,
  pub title:   String,
  pub summary: String,
  pub year:    Option<i32>,
}
