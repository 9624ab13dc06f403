//! Screen geometry — shared by the renderer and pointer hit-testing.
//!
//! The timeline pane lays its content out on a fixed grid: each insertion
//! slot takes one row and each placed event two, alternating
//! `slot 0, event 0, slot 1, event 1, …, slot n`. All functions here are
//! pure so the same arithmetic answers both "where do I draw slot 3" and
//! "which slot is under the pointer".

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};

/// Rows one placed event occupies (title line + summary line).
pub const EVENT_ROWS: u16 = 2;
/// Rows one insertion slot occupies.
pub const SLOT_ROWS: u16 = 1;
/// Vertical stride from one slot to the next.
const STRIDE: u16 = EVENT_ROWS + SLOT_ROWS;

/// Height of the current-card panel at the bottom of the game screen.
pub const CARD_PANEL_ROWS: u16 = 7;

// ─── Screen regions ──────────────────────────────────────────────────────────

/// The fixed vertical split of the game screen.
#[derive(Debug, Clone, Copy)]
pub struct ScreenRegions {
  pub header:         Rect,
  /// The bordered timeline pane.
  pub timeline:       Rect,
  /// The timeline pane minus its border — the scrolling viewport.
  pub timeline_inner: Rect,
  pub card_panel:     Rect,
  pub status:         Rect,
}

pub fn screen_regions(area: Rect) -> ScreenRegions {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1),               // header
      Constraint::Min(0),                  // timeline
      Constraint::Length(CARD_PANEL_ROWS), // current card
      Constraint::Length(1),               // status bar
    ])
    .split(area);

  let timeline = rows[1];
  ScreenRegions {
    header: rows[0],
    timeline,
    timeline_inner: inset(timeline),
    card_panel: rows[2],
    status: rows[3],
  }
}

/// Shrink a rect by a one-cell border on every side.
fn inset(r: Rect) -> Rect {
  Rect {
    x:      r.x.saturating_add(1),
    y:      r.y.saturating_add(1),
    width:  r.width.saturating_sub(2),
    height: r.height.saturating_sub(2),
  }
}

/// The card widget centred inside the card panel.
pub fn card_rect(panel: Rect) -> Rect {
  let width = panel.width.min(44);
  let x = panel.x + (panel.width - width) / 2;
  Rect {
    x,
    y: panel.y,
    width,
    height: panel.height,
  }
}

// ─── Timeline content grid ───────────────────────────────────────────────────

/// Total content rows for a timeline of `timeline_len` events.
pub fn content_height(timeline_len: usize) -> u16 {
  timeline_len as u16 * STRIDE + SLOT_ROWS
}

/// Content row of insertion slot `position`.
pub fn slot_content_row(position: usize) -> u16 { position as u16 * STRIDE }

/// Content row of placed event `index` (its title line).
pub fn event_content_row(index: usize) -> u16 {
  index as u16 * STRIDE + SLOT_ROWS
}

/// Largest useful scroll offset for the given viewport.
pub fn max_scroll(viewport: Rect, timeline_len: usize) -> u16 {
  content_height(timeline_len).saturating_sub(viewport.height)
}

/// Screen rect of a content span, or `None` when it is not fully visible at
/// the current scroll offset. Partially clipped rows are simply not drawn.
fn visible_rect(viewport: Rect, scroll: u16, content_row: u16, rows: u16) -> Option<Rect> {
  if content_row < scroll {
    return None;
  }
  let offset = content_row - scroll;
  if offset + rows > viewport.height {
    return None;
  }
  Some(Rect {
    x:      viewport.x,
    y:      viewport.y + offset,
    width:  viewport.width,
    height: rows,
  })
}

pub fn slot_rect(viewport: Rect, scroll: u16, position: usize) -> Option<Rect> {
  visible_rect(viewport, scroll, slot_content_row(position), SLOT_ROWS)
}

pub fn event_rect(viewport: Rect, scroll: u16, index: usize) -> Option<Rect> {
  visible_rect(viewport, scroll, event_content_row(index), EVENT_ROWS)
}

/// Hit-test a pointer position against the slot grid.
pub fn slot_at(
  viewport: Rect,
  scroll: u16,
  timeline_len: usize,
  x: u16,
  y: u16,
) -> Option<usize> {
  if !viewport.contains(Position::new(x, y)) {
    return None;
  }
  let content_row = y - viewport.y + scroll;
  if content_row % STRIDE != 0 {
    return None;
  }
  let position = usize::from(content_row / STRIDE);
  (position <= timeline_len).then_some(position)
}

/// Adjust `scroll` just enough to bring a content span into view.
pub fn scroll_to_show(scroll: u16, viewport_height: u16, content_row: u16, rows: u16) -> u16 {
  if content_row < scroll {
    content_row
  } else if content_row + rows > scroll + viewport_height {
    (content_row + rows).saturating_sub(viewport_height)
  } else {
    scroll
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
