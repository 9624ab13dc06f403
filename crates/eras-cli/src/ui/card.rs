//! Current-card panel and the synthesized drag preview.

use eras_core::{occurrence::Occurrence, state::Phase};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph},
};

use super::layout;
use crate::app::App;

/// Render the current card at the bottom of the screen.
///
/// While a drag session is active the card still occupies its slot in the
/// layout but renders empty — the terminal analogue of zero opacity — so
/// nothing shifts when the drag ends.
pub fn draw(f: &mut Frame, panel: Rect, app: &App) {
  let area = layout::card_rect(panel);

  let Some(card) = app.machine.current_card() else {
    return;
  };

  if app.drag.is_active() {
    f.render_widget(
      Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)),
      area,
    );
    return;
  }

  // Feedback colours the frame during the dwell window.
  let (border_color, title) = match app.machine.phase() {
    Phase::Feedback { correct: true, .. } => (Color::Green, " ✓ correct "),
    Phase::Feedback { correct: false, .. } => (Color::Red, " ✗ wrong "),
    _ => (Color::LightBlue, " your card "),
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border_color));
  let inner = block.inner(area);
  f.render_widget(block, area);

  // The current card's year is never revealed to the player; the reveal
  // flag is decided here, at the render boundary, not inferred from data.
  f.render_widget(Paragraph::new(card_lines(card, false)).centered(), inner);
}

/// The synthesized preview that follows the pointer during a drag. It is
/// drawn last (topmost) and never participates in hit-testing; the tilt the
/// pointer contract describes is reduced to an italic face, the closest a
/// cell grid gets to a rotation.
pub fn draw_preview(f: &mut Frame, app: &App) {
  let Some(preview) = app.drag.preview() else {
    return;
  };

  let frame_area = f.area();
  let width = 28.min(frame_area.width);
  let height = 5.min(frame_area.height);
  if width == 0 || height == 0 {
    return;
  }

  // Anchor the preview just right of the pointer, clamped to the frame.
  let x = (preview.offset.x as u16 + 1)
    .min(frame_area.width.saturating_sub(width));
  let y = (preview.offset.y as u16)
    .min(frame_area.height.saturating_sub(height));
  let area = Rect {
    x,
    y,
    width,
    height,
  };

  f.render_widget(Clear, area);
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::LightMagenta))
    .style(Style::default().add_modifier(Modifier::ITALIC));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new(card_lines(preview.event, false)).centered(),
    inner,
  );
}

/// Body lines of a card. `reveal_year` is the explicit per-render decision;
/// the "???" placeholder shows whenever it is false or no year exists.
fn card_lines(card: &Occurrence, reveal_year: bool) -> Vec<Line<'static>> {
  let year_line = match card.year {
    Some(year) if reveal_year => Line::from(Span::styled(
      format!("{year}"),
      Style::default()
        .fg(Color::LightBlue)
        .add_modifier(Modifier::BOLD),
    )),
    _ => Line::from(Span::styled(
      "Year: ???",
      Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC),
    )),
  };

  vec![
    Line::from(Span::styled(
      card.title.clone(),
      Style::default().add_modifier(Modifier::BOLD),
    )),
    Line::from(Span::styled(
      card.summary.clone(),
      Style::default().fg(Color::Gray),
    )),
    year_line,
  ]
}
