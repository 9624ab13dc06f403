//! TUI rendering — orchestrates all panes.

pub mod card;
pub mod layout;
pub mod screens;
pub mod timeline;

use chrono::Local;
use eras_core::state::Phase;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::App;

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  match app.machine.phase() {
    Phase::Idle => screens::idle(f, area, &app.status_msg),
    Phase::Loading => screens::loading(f, area),
    Phase::Finished { outcome } => {
      if let Some(snapshot) = app.machine.snapshot() {
        screens::finished(f, area, *outcome, snapshot);
      }
    }
    _ => draw_game(f, app),
  }
}

fn draw_game(f: &mut Frame, app: &App) {
  let regions = &app.regions;

  draw_header(f, regions.header, app);
  timeline::draw(f, app);
  card::draw(f, regions.card_panel, app);
  draw_status(f, regions.status, app);

  // The synthesized drag preview renders topmost and is never a hit target.
  card::draw_preview(f, app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let stats = app
    .machine
    .snapshot()
    .map(|m| {
      format!(
        " eras  ♥ {}  deck {}  goal {}",
        m.remaining_life, m.remaining_deck, m.timeline_size_goal
      )
    })
    .unwrap_or_else(|| " eras".to_string());

  let left = Span::styled(
    stats,
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  // Simple left-right header: pad the middle.
  let left_width = left.content.chars().count() as u16;
  let right_width = right.content.chars().count() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.machine.phase() {
    Phase::AwaitingPlacement if app.drag.is_active() => {
      ("DRAG", "Release over a slot to place  Esc cancel".to_string())
    }
    Phase::AwaitingPlacement => (
      "PLAY",
      "Drag the card, or ↑↓/jk + Enter  PgUp/PgDn scroll  s sync  q quit".to_string(),
    ),
    Phase::Resolving { pending_position } => {
      ("WAIT", format!("Checking slot {pending_position}…"))
    }
    Phase::Feedback { correct: true, .. } => ("NICE", "Correct!".to_string()),
    Phase::Feedback { correct: false, .. } => ("MISS", "Not quite…".to_string()),
    _ => ("", String::new()),
  };

  let status = if app.status_msg.is_empty() {
    hints
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), Style::default().fg(Color::Gray));

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
