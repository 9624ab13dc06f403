//! Match snapshot and placement result — the wire types of the game API.
//!
//! Every snapshot is server-computed and authoritative. The client never
//! reorders the timeline or speculatively inserts a card; it only replaces
//! its snapshot wholesale with whatever the server returns.

use serde::{Deserialize, Serialize};

use crate::occurrence::Occurrence;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Overall match status, as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
  Ongoing,
  Win,
  Lose,
}

impl MatchStatus {
  /// Derive the status a well-behaved server would report for the given
  /// counters. `Lose` iff no lives remain; `Win` iff the deck and hand are
  /// both empty with at least one life left; `Ongoing` otherwise.
  ///
  /// Used to sanity-check snapshots, never to override them.
  pub fn derive(remaining_deck: u32, hand_len: usize, remaining_life: u32) -> Self {
    if remaining_life == 0 {
      Self::Lose
    } else if remaining_deck == 0 && hand_len == 0 {
      Self::Win
    } else {
      Self::Ongoing
    }
  }
}

// ─── Match ───────────────────────────────────────────────────────────────────

/// A full match snapshot.
///
/// Invariants (server-enforced, checked here only in debug logging):
/// - `timeline` is sorted ascending by year and every entry has a year;
/// - `player_hand` holds zero or one occurrence — the current card;
/// - `status` agrees with [`MatchStatus::derive`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
  pub id:                 i64,
  pub player_hand:        Vec<Occurrence>,
  pub timeline:           Vec<Occurrence>,
  pub remaining_deck:     u32,
  pub remaining_life:     u32,
  pub status:             MatchStatus,
  pub timeline_size_goal: u32,
  /// Cards the player misplaced, kept by the server for the end-of-match
  /// tally. Older servers omit the field.
  #[serde(default)]
  pub mistakes:           Vec<Occurrence>,
}

impl Match {
  /// The sole card in the player's hand awaiting placement, if any.
  pub fn current_card(&self) -> Option<&Occurrence> { self.player_hand.first() }

  /// The status implied by this snapshot's counters (see
  /// [`MatchStatus::derive`]).
  pub fn derived_status(&self) -> MatchStatus {
    MatchStatus::derive(
      self.remaining_deck,
      self.player_hand.len(),
      self.remaining_life,
    )
  }

  /// Total occurrences the player has been dealt so far: everything placed
  /// plus everything misplaced.
  pub fn occurrences_played(&self) -> usize {
    self.timeline.len() + self.mistakes.len()
  }
}

// ─── Placement result ────────────────────────────────────────────────────────

/// The server's verdict on a single placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
  Correct,
  Incorrect,
}

/// Response to a play-card request: the verdict plus the full next snapshot,
/// already reflecting the server's authoritative insert or life decrement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementResult {
  pub status: Verdict,
  #[serde(rename = "match")]
  pub next:   Match,
}

// ─── Tests ───────────────────────────────────────────────────────────────────
