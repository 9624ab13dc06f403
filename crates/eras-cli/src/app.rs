//! Session controller — wires pointer gestures, drop resolution, the match
//! state machine, and the feedback dwell together.
//!
//! All state transitions happen here in response to events; nothing polls.
//! Network calls are never awaited in the input path: the controller opens
//! the machine's pending phase, spawns the request, and applies the response
//! from [`tick`](App::tick) on a later frame, so the loading and resolving
//! screens keep drawing and input keeps flowing while a call is in flight.
//! The controller also owns the scheduling the state machine deliberately
//! does not: it stamps every feedback window with its turn generation and
//! only forwards the dwell expiry if that generation is still current.

use std::{
  sync::Arc,
  time::Instant,
};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use eras_core::{
  Error,
  drag::{DragSession, PointerOffset},
  game::{Match, PlacementResult},
  scroll::{AutoScrollConfig, AutoScrollController},
  service::MatchService,
  slot::{DropTarget, InsertionSlot},
  state::{FEEDBACK_DWELL, MatchStateMachine, Phase},
};
use ratatui::layout::Rect;
use tokio::task::{JoinError, JoinHandle};

use crate::{
  client::ApiClient,
  input::{PointerEvent, PointerSource},
  ui::layout::{self, ScreenRegions},
};

/// Auto-scroll tuned to terminal rows: a two-row band at each edge, up to
/// one row per frame at the very edge.
fn autoscroll_config() -> AutoScrollConfig {
  AutoScrollConfig {
    edge_margin: 2.0,
    base_speed:  0.25,
    max_speed:   1.0,
  }
}

// ─── Pending requests ─────────────────────────────────────────────────────────

/// A network call in flight, driven to completion by [`App::tick`]. At most
/// one exists at a time; the machine's pending phase plus this slot
/// serialize all server traffic.
enum Pending {
  Start(JoinHandle<Result<Match, Error>>),
  Place(JoinHandle<Result<PlacementResult, Error>>),
  Resync(JoinHandle<Result<Match, Error>>),
}

impl Pending {
  fn is_finished(&self) -> bool {
    match self {
      Pending::Start(handle) | Pending::Resync(handle) => handle.is_finished(),
      Pending::Place(handle) => handle.is_finished(),
    }
  }
}

/// A panicked or aborted request task degrades into a transport error.
fn flatten<T>(joined: Result<Result<T, Error>, JoinError>) -> Result<T, Error> {
  match joined {
    Ok(result) => result,
    Err(e) => Err(Error::Transport(format!("request task failed: {e}"))),
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub machine:    MatchStateMachine,
  pub drag:       DragSession,
  pub autoscroll: AutoScrollController,

  /// The one in-flight server request, if any.
  pending: Option<Pending>,

  /// Timeline pane scroll position, in fractional rows so slow auto-scroll
  /// frames accumulate.
  scroll_pos: f32,

  /// Drop target under the pointer, carrying the hover affordance.
  hover: Option<DropTarget>,
  /// Slot under the keyboard cursor — the non-pointer input path.
  pub selected_slot: usize,

  /// Pending feedback dwell: when it expires and for which turn.
  feedback_deadline: Option<(Instant, u64)>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Cached geometry of the last drawn frame, used for hit-testing.
  pub regions: ScreenRegions,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,

  /// Input backend chosen at startup.
  pointer: Box<dyn PointerSource>,
}

impl App {
  pub fn new(client: ApiClient, pointer: Box<dyn PointerSource>) -> Self {
    Self {
      machine: MatchStateMachine::new(),
      drag: DragSession::new(),
      autoscroll: AutoScrollController::new(autoscroll_config()),
      pending: None,
      scroll_pos: 0.0,
      hover: None,
      selected_slot: 0,
      feedback_deadline: None,
      status_msg: String::new(),
      regions: layout::screen_regions(Rect::default()),
      client: Arc::new(client),
      pointer,
    }
  }

  // ── Derived views ─────────────────────────────────────────────────────────

  pub fn scroll(&self) -> u16 { self.scroll_pos.max(0.0) as u16 }

  /// Slot currently under the pointer, if its target reports a hover.
  pub fn hovered_slot(&self) -> Option<usize> {
    self
      .hover
      .as_ref()
      .filter(|target| target.is_hovered())
      .map(|target| target.slot.position)
  }

  fn timeline_len(&self) -> usize {
    self.machine.snapshot().map_or(0, |m| m.timeline.len())
  }

  /// Recompute cached geometry for the current terminal size and clamp the
  /// scroll and keyboard cursor to the new bounds.
  pub fn update_layout(&mut self, area: Rect) {
    self.regions = layout::screen_regions(area);
    let max = layout::max_scroll(self.regions.timeline_inner, self.timeline_len());
    self.scroll_pos = self.scroll_pos.clamp(0.0, f32::from(max));
    self.selected_slot = self.selected_slot.min(self.timeline_len());
  }

  // ── Game actions ──────────────────────────────────────────────────────────

  /// Start (or restart) a match. The machine shows `Loading` until the
  /// spawned create-match call completes in [`tick`](Self::tick).
  pub fn start_game(&mut self) {
    if self.pending.is_some() || !self.machine.begin_start() {
      return;
    }
    self.status_msg = "Starting match…".into();
    self.selected_slot = 0;
    self.scroll_pos = 0.0;

    let client = Arc::clone(&self.client);
    self.pending = Some(Pending::Start(tokio::spawn(async move {
      client.create_match().await
    })));
  }

  /// Submit a placement. The machine shows `Resolving` until the spawned
  /// play-card call completes in [`tick`](Self::tick).
  fn place(&mut self, position: usize) {
    if self.pending.is_some() {
      return;
    }
    let Some(request) = self.machine.begin_placement(position) else {
      return;
    };

    let client = Arc::clone(&self.client);
    self.pending = Some(Pending::Place(tokio::spawn(async move {
      client
        .play_card(request.match_id, request.occurrence_id, request.position)
        .await
    })));
  }

  /// Refetch the authoritative snapshot (recovery aid).
  fn resync(&mut self) {
    if self.pending.is_some() {
      return;
    }
    let Some(match_id) = self.machine.begin_resync() else {
      return;
    };

    let client = Arc::clone(&self.client);
    self.pending = Some(Pending::Resync(tokio::spawn(async move {
      client.get_match(match_id).await
    })));
  }

  // ── Per-iteration tick ────────────────────────────────────────────────────

  /// Advance time-driven work: finished server responses, the feedback
  /// dwell expiry, and one auto-scroll frame while a drag is active.
  pub async fn tick(&mut self) {
    self.poll_pending().await;

    if let Some((deadline, turn)) = self.feedback_deadline {
      if Instant::now() >= deadline {
        self.feedback_deadline = None;
        // finish_feedback ignores the call if a newer turn superseded it.
        self.machine.finish_feedback(turn);
        self.selected_slot = self.selected_slot.min(self.timeline_len());
      }
    }

    if self.drag.is_active() {
      if let Some(preview) = self.drag.preview() {
        let viewport = self.regions.timeline_inner;
        let pointer_y = preview.offset.y - f32::from(viewport.y);
        let delta = self
          .autoscroll
          .on_frame(pointer_y, f32::from(viewport.height));
        if delta != 0.0 {
          let max = layout::max_scroll(viewport, self.timeline_len());
          self.scroll_pos = (self.scroll_pos + delta).clamp(0.0, f32::from(max));
        }
      }
    }
  }

  /// Apply the response of a finished request, if one landed since the last
  /// frame. The await completes immediately: the handle is only consumed
  /// once `is_finished` reports true.
  async fn poll_pending(&mut self) {
    if !self.pending.as_ref().is_some_and(Pending::is_finished) {
      return;
    }
    let Some(pending) = self.pending.take() else {
      return;
    };

    match pending {
      Pending::Start(handle) => {
        match self.machine.complete_start(flatten(handle.await)) {
          Ok(()) => self.status_msg.clear(),
          Err(e) => self.status_msg = format!("Error: {e}"),
        }
      }
      Pending::Place(handle) => {
        match self.machine.complete_placement(flatten(handle.await)) {
          Ok(()) => {
            self.status_msg.clear();
            if matches!(self.machine.phase(), Phase::Feedback { .. }) {
              self.feedback_deadline =
                Some((Instant::now() + FEEDBACK_DWELL, self.machine.turn()));
            }
          }
          // The machine is back in AwaitingPlacement with the card
          // un-consumed; the player can simply re-drop.
          Err(e) => self.status_msg = format!("Error: {e}"),
        }
      }
      Pending::Resync(handle) => {
        match self.machine.complete_resync(flatten(handle.await)) {
          Ok(true) => self.status_msg = "Synced.".into(),
          Ok(false) => {}
          Err(e) => self.status_msg = format!("Error: {e}"),
        }
      }
    }
  }

  // ── Pointer input ─────────────────────────────────────────────────────────

  /// Normalise and dispatch a raw terminal mouse event.
  pub fn handle_mouse(&mut self, event: &crossterm::event::MouseEvent) {
    let Some(pointer_event) = self.pointer.translate(event) else {
      return;
    };
    match pointer_event {
      PointerEvent::Down(offset) => self.pointer_down(offset),
      PointerEvent::Moved(offset) => self.pointer_moved(offset),
      PointerEvent::Up(offset) => self.pointer_up(offset),
    }
  }

  fn pointer_down(&mut self, offset: PointerOffset) {
    let (x, y) = (offset.x as u16, offset.y as u16);

    // Picking up the current card starts a drag session.
    let card_area = layout::card_rect(self.regions.card_panel);
    if card_area.contains(ratatui::layout::Position::new(x, y)) {
      if self.machine.accepts_placement() {
        if let Some(card) = self.machine.current_card().cloned() {
          self.drag.begin(card, self.pointer.kind());
          self.drag.update_pointer(offset);
          self.autoscroll.start();
        }
      }
      return;
    }

    // Pressing a slot directly is the click input path.
    if let Some(position) = self.hit_slot(x, y) {
      let target = DropTarget::new(InsertionSlot { position });
      if let Some(position) = target.resolve_drop(self.machine.accepts_placement()) {
        self.place(position);
      }
    }
  }

  fn pointer_moved(&mut self, offset: PointerOffset) {
    self.drag.update_pointer(offset);
    self.hover = self.hit_slot(offset.x as u16, offset.y as u16).map(|position| {
      let mut target = DropTarget::new(InsertionSlot { position });
      target.set_hover(true);
      target
    });
  }

  fn pointer_up(&mut self, offset: PointerOffset) {
    // Tear the scroll loop down before anything else; no frame may outlive
    // the session.
    self.autoscroll.stop();
    self.hover = None;

    if !self.drag.is_active() {
      return;
    }

    let accepted = self
      .hit_slot(offset.x as u16, offset.y as u16)
      .map(|position| DropTarget::new(InsertionSlot { position }))
      .and_then(|target| target.resolve_drop(self.machine.accepts_placement()));

    let intent = self
      .drag
      .end(accepted.map(|position| InsertionSlot { position }));
    if let Some(position) = intent {
      self.place(position);
    }
  }

  fn hit_slot(&self, x: u16, y: u16) -> Option<usize> {
    layout::slot_at(
      self.regions.timeline_inner,
      self.scroll(),
      self.timeline_len(),
      x,
      y,
    )
  }

  // ── Keyboard input ────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }
    if key.code == KeyCode::Char('q') {
      return Ok(false);
    }

    // Esc cancels an in-flight drag; the card returns to its origin.
    if key.code == KeyCode::Esc && self.drag.is_active() {
      self.drag.end(None);
      self.autoscroll.stop();
      self.hover = None;
      return Ok(true);
    }

    match self.machine.phase() {
      Phase::Idle => {
        if matches!(key.code, KeyCode::Char('n' | 'r') | KeyCode::Enter) {
          self.start_game();
        }
      }
      Phase::Finished { .. } => {
        if matches!(key.code, KeyCode::Char('r') | KeyCode::Enter) {
          self.start_game();
        }
      }
      Phase::AwaitingPlacement => self.handle_turn_key(key),
      // Loading / Resolving / Feedback: input is ignored until the machine
      // unlocks; placements would be dropped anyway.
      _ => {}
    }
    Ok(true)
  }

  fn handle_turn_key(&mut self, key: KeyEvent) {
    match key.code {
      // Move the keyboard cursor across slots, keeping it in view.
      KeyCode::Down | KeyCode::Char('j') => {
        if self.selected_slot < self.timeline_len() {
          self.selected_slot += 1;
          self.scroll_selected_into_view();
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        if self.selected_slot > 0 {
          self.selected_slot -= 1;
          self.scroll_selected_into_view();
        }
      }

      // Place the current card at the selected slot.
      KeyCode::Enter => {
        let position = self.selected_slot;
        let target = DropTarget::new(InsertionSlot { position });
        if let Some(position) = target.resolve_drop(self.machine.accepts_placement()) {
          self.place(position);
        }
      }

      // Manual viewport scrolling.
      KeyCode::PageDown => self.scroll_by(5.0),
      KeyCode::PageUp => self.scroll_by(-5.0),

      // Recovery: refetch the snapshot.
      KeyCode::Char('s') => self.resync(),

      _ => {}
    }
  }

  fn scroll_by(&mut self, delta: f32) {
    let max = layout::max_scroll(self.regions.timeline_inner, self.timeline_len());
    self.scroll_pos = (self.scroll_pos + delta).clamp(0.0, f32::from(max));
  }

  fn scroll_selected_into_view(&mut self) {
    let viewport = self.regions.timeline_inner;
    self.scroll_pos = f32::from(layout::scroll_to_show(
      self.scroll(),
      viewport.height,
      layout::slot_content_row(self.selected_slot),
      layout::SLOT_ROWS,
    ));
  }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;
  use crate::{
    client::{ApiClient, ApiConfig},
    input::MouseSource,
  };

  /// Client pointed at a closed port: requests fail fast with a transport
  /// error, which is all these tests need.
  fn test_app() -> App {
    let client = ApiClient::new(ApiConfig {
      base_url: "http://127.0.0.1:9".into(),
    })
    .unwrap();
    let mut app = App::new(client, Box::new(MouseSource));
    app.update_layout(Rect::new(0, 0, 80, 24));
    app
  }

  async fn drive_until_settled(app: &mut App) {
    for _ in 0..500 {
      app.tick().await;
      if !matches!(app.machine.phase(), Phase::Loading | Phase::Resolving { .. }) {
        return;
      }
      tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("request never settled");
  }

  #[tokio::test]
  async fn start_game_keeps_loading_on_screen_while_the_call_is_pending() {
    let mut app = test_app();
    app.start_game();
    // The request is in flight but control is already back with the event
    // loop: the next frame draws the loading screen.
    assert_eq!(*app.machine.phase(), Phase::Loading);

    drive_until_settled(&mut app).await;
    assert_eq!(*app.machine.phase(), Phase::Idle);
    assert!(app.status_msg.starts_with("Error:"));
  }

  #[tokio::test]
  async fn second_start_while_pending_spawns_no_second_request() {
    let mut app = test_app();
    app.start_game();
    app.start_game();
    assert_eq!(*app.machine.phase(), Phase::Loading);

    drive_until_settled(&mut app).await;
    // One failure, one transition back to Idle; a duplicate request would
    // leave a dangling Pending slot.
    assert_eq!(*app.machine.phase(), Phase::Idle);
  }

  #[tokio::test]
  async fn pointer_hover_routes_through_a_drop_target() {
    let mut app = test_app();
    let inner = app.regions.timeline_inner;

    // With no timeline yet, the single earliest slot sits on the first
    // content row.
    app.pointer_moved(PointerOffset {
      x: f32::from(inner.x),
      y: f32::from(inner.y),
    });
    assert_eq!(app.hovered_slot(), Some(0));

    // The row below is not a slot row; the affordance clears.
    app.pointer_moved(PointerOffset {
      x: f32::from(inner.x),
      y: f32::from(inner.y) + 1.0,
    });
    assert_eq!(app.hovered_slot(), None);
  }
}
