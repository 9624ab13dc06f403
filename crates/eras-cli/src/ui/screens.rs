//! Full-screen states: loading, idle/error, victory, game over.

use eras_core::{game::Match, state::Outcome};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::Paragraph,
};

/// Vertically centre `lines` within `area`.
fn centered(f: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
  let top = area.height.saturating_sub(lines.len() as u16) / 2;
  let target = Rect {
    x:      area.x,
    y:      area.y + top,
    width:  area.width,
    height: (lines.len() as u16).min(area.height),
  };
  f.render_widget(Paragraph::new(lines).centered(), target);
}

pub fn loading(f: &mut Frame, area: Rect) {
  centered(
    f,
    area,
    vec![Line::from(Span::styled(
      "Loading game…",
      Style::default().add_modifier(Modifier::BOLD),
    ))],
  );
}

pub fn idle(f: &mut Frame, area: Rect, status_msg: &str) {
  let mut lines = vec![
    Line::from(Span::styled(
      "e r a s",
      Style::default()
        .fg(Color::LightBlue)
        .add_modifier(Modifier::BOLD),
    )),
    Line::default(),
    Line::from("Place each event in its correct spot on the timeline."),
    Line::default(),
    Line::from(Span::styled(
      "[n] new game   [q] quit",
      Style::default().fg(Color::Gray),
    )),
  ];
  if !status_msg.is_empty() {
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
      status_msg.to_string(),
      Style::default().fg(Color::Red),
    )));
  }
  centered(f, area, lines);
}

pub fn finished(f: &mut Frame, area: Rect, outcome: Outcome, snapshot: &Match) {
  let (headline, color) = match outcome {
    Outcome::Win => ("Victory!", Color::Green),
    Outcome::Lose => ("Game over", Color::Red),
  };

  centered(
    f,
    area,
    vec![
      Line::from(Span::styled(
        headline,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
      )),
      Line::default(),
      Line::from(format!("Timeline built: {} events", snapshot.timeline.len())),
      Line::from(format!(
        "Occurrences played: {}",
        snapshot.occurrences_played()
      )),
      Line::default(),
      Line::from(Span::styled(
        "[r] play again   [q] quit",
        Style::default().fg(Color::Gray),
      )),
    ],
  );
}
