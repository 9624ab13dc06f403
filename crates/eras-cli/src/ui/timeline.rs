//! Timeline pane — placed events interleaved with insertion slots.

use eras_core::{
  slot::{SlotEdge, insertion_slots},
  state::Phase,
};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use super::layout;
use crate::app::App;

/// Render the timeline pane.
pub fn draw(f: &mut Frame, app: &App) {
  let Some(snapshot) = app.machine.snapshot() else {
    return;
  };
  let events = &snapshot.timeline;

  let title = format!(" Timeline ({}/{}) ", events.len(), snapshot.timeline_size_goal);
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  f.render_widget(block, app.regions.timeline);

  let viewport = app.regions.timeline_inner;
  let scroll = app.scroll();
  let accepting = app.machine.accepts_placement();

  // The freshly placed card, highlighted during a correct-feedback window.
  let placed_index = match app.machine.phase() {
    Phase::Feedback {
      correct: true,
      revealed_position,
    } => Some(*revealed_position),
    _ => None,
  };

  for slot in insertion_slots(events.len()) {
    let Some(area) = layout::slot_rect(viewport, scroll, slot.position) else {
      continue;
    };
    let hovered = app.hovered_slot() == Some(slot.position);
    let selected = accepting && app.selected_slot == slot.position;
    draw_slot(f, area, slot.edge(events.len()), accepting, hovered || selected);
  }

  for (index, event) in events.iter().enumerate() {
    let Some(area) = layout::event_rect(viewport, scroll, index) else {
      continue;
    };
    draw_event(
      f,
      area,
      event.year,
      &event.title,
      &event.summary,
      placed_index == Some(index),
    );
  }
}

fn draw_slot(f: &mut Frame, area: Rect, edge: SlotEdge, accepting: bool, active: bool) {
  let label = match edge {
    SlotEdge::Earliest => "place here (earliest)",
    SlotEdge::Latest => "place here (latest)",
    SlotEdge::Between => "place here",
  };

  let style = if !accepting {
    Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
  } else if active {
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::Blue)
  };

  let dashes = "┄".repeat((area.width.saturating_sub(label.len() as u16 + 4) / 2) as usize);
  let line = Line::from(Span::styled(
    format!("{dashes}╴ {label} ╶{dashes}"),
    style,
  ));
  f.render_widget(Paragraph::new(line).centered(), area);
}

fn draw_event(
  f: &mut Frame,
  area: Rect,
  year: Option<i32>,
  title: &str,
  summary: &str,
  just_placed: bool,
) {
  // Placed events always carry a year; render a dash defensively if the
  // server ever sends one without.
  let year_text = year.map_or_else(|| "────".into(), |y| format!("{y:>4}"));

  let title_style = if just_placed {
    Style::default()
      .fg(Color::Green)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default().add_modifier(Modifier::BOLD)
  };

  let title_line = Line::from(vec![
    Span::styled(
      format!(" {year_text} "),
      Style::default()
        .fg(Color::Black)
        .bg(if just_placed { Color::Green } else { Color::Magenta }),
    ),
    Span::raw(" "),
    Span::styled(title.to_string(), title_style),
  ]);
  let summary_line = Line::from(Span::styled(
    format!("       {summary}"),
    Style::default().fg(Color::Gray),
  ));

  f.render_widget(Paragraph::new(vec![title_line, summary_line]), area);
}
