//! Insertion slots and drop targets — the N+1 places a card may land.
//!
//! For a timeline of length `n` there are exactly `n + 1` slots, positions
//! `0..=n`. Slot 0 always means "before the earliest" and slot `n` always
//! means "after the latest", even when the timeline is empty (the first-ever
//! placement uses slot 0). Labels derive purely from the index, never from
//! card content.

// ─── Slot ────────────────────────────────────────────────────────────────────

/// One insertion position on the timeline. Transient — derived fresh each
/// render from the timeline length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionSlot {
  pub position: usize,
}

/// Where a slot sits relative to the placed cards; drives the hint label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotEdge {
  Earliest,
  Between,
  Latest,
}

impl InsertionSlot {
  /// Classify this slot for a timeline of `timeline_len` entries.
  pub fn edge(&self, timeline_len: usize) -> SlotEdge {
    if self.position == 0 {
      SlotEdge::Earliest
    } else if self.position == timeline_len {
      SlotEdge::Latest
    } else {
      SlotEdge::Between
    }
  }
}

/// All slots for a timeline of `timeline_len` entries, in position order.
pub fn insertion_slots(timeline_len: usize) -> Vec<InsertionSlot> {
  (0..=timeline_len)
    .map(|position| InsertionSlot { position })
    .collect()
}

// ─── Drop target ─────────────────────────────────────────────────────────────

/// A slot bound to its transient interaction state. Hover is a purely
/// visual affordance and never touches match state; acceptance is gated on
/// the state machine being open for a placement, enforcing the
/// single-outstanding-turn invariant at the UI layer as well.
#[derive(Debug, Clone, Copy)]
pub struct DropTarget {
  pub slot: InsertionSlot,
  hovered:  bool,
}

impl DropTarget {
  pub fn new(slot: InsertionSlot) -> Self {
    Self {
      slot,
      hovered: false,
    }
  }

  /// Visual-only hover flag.
  pub fn set_hover(&mut self, hovering: bool) { self.hovered = hovering; }

  pub fn is_hovered(&self) -> bool { self.hovered }

  /// Resolve a release over this target into a placement position.
  /// `accepting` is the state machine's gate
  /// ([`MatchStateMachine::accepts_placement`](crate::state::MatchStateMachine::accepts_placement));
  /// when it is false the drop is silently ignored and the dragged card
  /// returns to its origin.
  pub fn resolve_drop(&self, accepting: bool) -> Option<usize> {
    accepting.then_some(self.slot.position)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
