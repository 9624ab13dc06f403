//! Pointer input backends — normalises terminal mouse events.
//!
//! Terminals deliver both mouse and touch input through the same escape
//! protocol, but the shape of the streams differs: real mice report a
//! dedicated left-button drag kind, while touch-first emulators tend to
//! report taps on arbitrary buttons and plain motion events mid-gesture.
//! [`PointerSource`] hides the difference behind one capability interface;
//! the backend is chosen once at startup by [`probe`], never per gesture.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use eras_core::drag::{PointerKind, PointerOffset};

/// A normalised pointer gesture step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
  Down(PointerOffset),
  Moved(PointerOffset),
  Up(PointerOffset),
}

/// Capability interface over an input backend. `DragSession` and the
/// session controller only ever see [`PointerEvent`]s.
pub trait PointerSource {
  fn kind(&self) -> PointerKind;

  /// Translate a raw terminal mouse event, or `None` when the event is not
  /// part of a primary gesture (scroll wheel, extra buttons, ...).
  fn translate(&self, event: &MouseEvent) -> Option<PointerEvent>;
}

fn offset(event: &MouseEvent) -> PointerOffset {
  PointerOffset {
    x: f32::from(event.column),
    y: f32::from(event.row),
  }
}

// ─── Mouse ───────────────────────────────────────────────────────────────────

/// Desktop mouse backend: only the left button drives a gesture.
pub struct MouseSource;

impl PointerSource for MouseSource {
  fn kind(&self) -> PointerKind { PointerKind::Mouse }

  fn translate(&self, event: &MouseEvent) -> Option<PointerEvent> {
    match event.kind {
      MouseEventKind::Down(MouseButton::Left) => Some(PointerEvent::Down(offset(event))),
      MouseEventKind::Drag(MouseButton::Left) => Some(PointerEvent::Moved(offset(event))),
      MouseEventKind::Up(MouseButton::Left) => Some(PointerEvent::Up(offset(event))),
      _ => None,
    }
  }
}

// ─── Touch ───────────────────────────────────────────────────────────────────

/// Touch backend: any button counts as the finger, and bare motion events
/// mid-gesture are treated as drag movement.
pub struct TouchSource;

impl PointerSource for TouchSource {
  fn kind(&self) -> PointerKind { PointerKind::Touch }

  fn translate(&self, event: &MouseEvent) -> Option<PointerEvent> {
    match event.kind {
      MouseEventKind::Down(_) => Some(PointerEvent::Down(offset(event))),
      MouseEventKind::Drag(_) | MouseEventKind::Moved => {
        Some(PointerEvent::Moved(offset(event)))
      }
      MouseEventKind::Up(_) => Some(PointerEvent::Up(offset(event))),
      _ => None,
    }
  }
}

// ─── Probing ─────────────────────────────────────────────────────────────────

/// Choose the input backend for this run.
///
/// `ERAS_POINTER=mouse|touch` overrides; otherwise touch-first terminal
/// environments (Termux) get the touch backend and everything else the
/// mouse backend.
pub fn probe() -> Box<dyn PointerSource> {
  let choice = std::env::var("ERAS_POINTER").unwrap_or_default();
  let touch = match choice.as_str() {
    "touch" => true,
    "mouse" => false,
    _ => std::env::var_os("TERMUX_VERSION").is_some(),
  };
  if touch {
    tracing::info!("pointer backend: touch");
    Box::new(TouchSource)
  } else {
    tracing::info!("pointer backend: mouse");
    Box::new(MouseSource)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
