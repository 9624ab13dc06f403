//! Drag session — one active drag gesture, independent of input device.
//!
//! A session begins when the player picks up the current card, tracks the
//! pointer on every move tick, and ends on release. The session owns the
//! [`DragPayload`] exclusively and clears it atomically at session end.
//!
//! Rendering contract: while a session is active the source card widget
//! renders at zero opacity (kept in layout so nothing shifts), and a
//! synthesized preview clone of the card follows the pointer with a fixed
//! rotational offset. The preview is visual-only and never becomes a drop
//! or hover target itself.

use crate::{occurrence::Occurrence, slot::InsertionSlot};

/// Rotation applied to the synthesized drag preview. Purely visual.
pub const PREVIEW_ROTATION_DEG: f32 = 5.0;

// ─── Pointer ─────────────────────────────────────────────────────────────────

/// Which input backend produced the gesture. Selected once at startup by
/// capability probing; the session contract is identical for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
  Mouse,
  Touch,
}

/// A pointer position in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerOffset {
  pub x: f32,
  pub y: f32,
}

// ─── Payload ─────────────────────────────────────────────────────────────────

/// What is being dragged. A tagged variant rather than a bare occurrence so
/// additional draggable kinds can be added without string matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragPayload {
  Card { event: Occurrence },
}

impl DragPayload {
  pub fn event(&self) -> &Occurrence {
    match self {
      Self::Card { event } => event,
    }
  }
}

// ─── Preview ─────────────────────────────────────────────────────────────────

/// Everything the renderer needs to draw the synthesized preview: the card
/// being dragged, where to translate it, and the fixed tilt.
#[derive(Debug, Clone, Copy)]
pub struct DragPreview<'a> {
  pub event:        &'a Occurrence,
  pub offset:       PointerOffset,
  pub rotation_deg: f32,
}

// ─── Session ─────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct ActiveDrag {
  payload: DragPayload,
  kind:    PointerKind,
  /// Unknown until the first move tick arrives; the preview is hidden
  /// until then.
  pointer: Option<PointerOffset>,
}

/// At most one drag gesture at a time. The underlying input device cannot
/// produce two simultaneous primary gestures, so a `begin` while a session
/// is active is ignored rather than an error.
#[derive(Debug, Default)]
pub struct DragSession {
  active: Option<ActiveDrag>,
}

impl DragSession {
  pub fn new() -> Self { Self::default() }

  pub fn is_active(&self) -> bool { self.active.is_some() }

  /// The payload currently in flight, if any. Renderers use this to blank
  /// the source card while the preview is shown.
  pub fn payload(&self) -> Option<&DragPayload> {
    self.active.as_ref().map(|a| &a.payload)
  }

  pub fn pointer_kind(&self) -> Option<PointerKind> {
    self.active.as_ref().map(|a| a.kind)
  }

  /// Start a session for `event`. Ignored when a session is already active.
  pub fn begin(&mut self, event: Occurrence, kind: PointerKind) {
    if self.active.is_some() {
      tracing::debug!("drag begin ignored: session already active");
      return;
    }
    tracing::debug!(card_id = event.id, ?kind, "drag started");
    self.active = Some(ActiveDrag {
      payload: DragPayload::Card { event },
      kind,
      pointer: None,
    });
  }

  /// Record the latest pointer position. Pure state update, called on every
  /// move tick; a no-op when no session is active.
  pub fn update_pointer(&mut self, offset: PointerOffset) {
    if let Some(active) = &mut self.active {
      active.pointer = Some(offset);
    }
  }

  /// Terminate the session. Returns the placement position intent when the
  /// card was released over a slot while the session was still active;
  /// `None` otherwise (cancelled drag, or release outside every slot). The
  /// session is cleared regardless of outcome.
  pub fn end(&mut self, drop_target: Option<InsertionSlot>) -> Option<usize> {
    let active = self.active.take()?;
    let position = drop_target.map(|slot| slot.position);
    tracing::debug!(
      card_id = active.payload.event().id,
      ?position,
      "drag ended"
    );
    position
  }

  /// The synthesized preview to draw this frame, or `None` when no session
  /// is active or the pointer has not moved yet.
  pub fn preview(&self) -> Option<DragPreview<'_>> {
    let active = self.active.as_ref()?;
    let offset = active.pointer?;
    Some(DragPreview {
      event: active.payload.event(),
      offset,
      rotation_deg: PREVIEW_ROTATION_DEG,
    })
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
