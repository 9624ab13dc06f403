//! Match state machine — turn-taking, feedback windows, win/lose
//! transitions.
//!
//! The machine exclusively owns the match snapshot. Every other component
//! reads an immutable snapshot per render and expresses mutations as
//! placement intents routed through the machine.
//!
//! Each network-backed transition is split into a `begin_*` step (opens the
//! pending phase, hands back the request parameters) and a `complete_*` step
//! (applies the response). A caller that must keep rendering while a request
//! is in flight — the terminal client does — issues the request itself
//! between the two, so `Loading` and `Resolving` are observable phases, not
//! blips inside an await. [`start`](MatchStateMachine::start),
//! [`attempt_placement`](MatchStateMachine::attempt_placement) and
//! [`resync`](MatchStateMachine::resync) are the one-call compositions for
//! callers that can block.
//!
//! # Invariants
//!
//! 1. At most one placement request is in flight per match: a placement is
//!    accepted only from [`Phase::AwaitingPlacement`], so rapid double-drops
//!    collapse to a single network call.
//! 2. A transport failure aborts back to the prior stable phase — the
//!    current card is never consumed by a failed request.
//! 3. The feedback dwell expiry carries the turn generation it was scheduled
//!    for; a stale expiry (a newer turn already started) is ignored.

use std::time::Duration;

use crate::{
  game::{Match, MatchStatus, PlacementResult, Verdict},
  occurrence::Occurrence,
  service::MatchService,
};

/// How long the correct/incorrect feedback stays on screen before the next
/// turn unlocks.
pub const FEEDBACK_DWELL: Duration = Duration::from_millis(1000);

// ─── Phases ──────────────────────────────────────────────────────────────────

/// Terminal outcome of a finished match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Win,
  Lose,
}

/// The machine's current phase. Matches are born in `Idle`, spend most of
/// their life bouncing between `AwaitingPlacement`, `Resolving` and
/// `Feedback`, and end in `Finished`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
  /// No match yet (or the last create attempt failed).
  Idle,
  /// The create-match call is pending.
  Loading,
  /// The player may place the current card.
  AwaitingPlacement,
  /// A play-card call is pending for `pending_position`.
  Resolving { pending_position: usize },
  /// The verdict is on display; the dwell expiry will unlock the next turn.
  Feedback {
    correct:           bool,
    revealed_position: usize,
  },
  /// The match is over.
  Finished { outcome: Outcome },
}

/// Wire parameters of a placement accepted by
/// [`MatchStateMachine::begin_placement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementRequest {
  pub match_id:      i64,
  pub occurrence_id: i64,
  pub position:      usize,
}

// ─── Machine ─────────────────────────────────────────────────────────────────

/// Owns the authoritative match snapshot and mediates all placement
/// attempts. Free of timers and I/O beyond the injected [`MatchService`];
/// the controller schedules the dwell expiry and calls
/// [`finish_feedback`](Self::finish_feedback) when it fires.
#[derive(Debug)]
pub struct MatchStateMachine {
  phase:    Phase,
  snapshot: Option<Match>,
  /// Turn generation, bumped on every accepted placement response. Used to
  /// detect stale dwell expiries.
  turn:     u64,
}

impl Default for MatchStateMachine {
  fn default() -> Self { Self::new() }
}

impl MatchStateMachine {
  pub fn new() -> Self {
    Self {
      phase:    Phase::Idle,
      snapshot: None,
      turn:     0,
    }
  }

  // ── Accessors ─────────────────────────────────────────────────────────────

  pub fn phase(&self) -> &Phase { &self.phase }

  /// Read-only view of the current snapshot.
  pub fn snapshot(&self) -> Option<&Match> { self.snapshot.as_ref() }

  /// The current card awaiting placement, if any.
  pub fn current_card(&self) -> Option<&Occurrence> {
    self.snapshot.as_ref().and_then(Match::current_card)
  }

  /// Current turn generation; pass it back to
  /// [`finish_feedback`](Self::finish_feedback) when the dwell expires.
  pub fn turn(&self) -> u64 { self.turn }

  /// Whether drop targets may accept a placement right now. True only in
  /// [`Phase::AwaitingPlacement`], which serializes turns.
  pub fn accepts_placement(&self) -> bool {
    matches!(self.phase, Phase::AwaitingPlacement)
  }

  // ── Transitions (begin/complete pairs) ────────────────────────────────────

  /// Open the create-match window: `Idle | Finished → Loading`. Returns
  /// `false` without side effects from any other phase. The caller issues
  /// the request and feeds the response to
  /// [`complete_start`](Self::complete_start).
  pub fn begin_start(&mut self) -> bool {
    if !matches!(self.phase, Phase::Idle | Phase::Finished { .. }) {
      return false;
    }
    self.phase = Phase::Loading;
    self.snapshot = None;
    true
  }

  /// Apply the create-match response: `Loading → AwaitingPlacement`, or
  /// back to `Idle` on failure (the error propagates; there is no automatic
  /// retry). A response arriving outside `Loading` is ignored.
  pub fn complete_start<E: std::fmt::Display>(
    &mut self,
    response: Result<Match, E>,
  ) -> Result<(), E> {
    if !matches!(self.phase, Phase::Loading) {
      return response.map(|_| ());
    }
    match response {
      Ok(snapshot) => {
        tracing::debug!(match_id = snapshot.id, "match created");
        self.snapshot = Some(snapshot);
        self.phase = Phase::AwaitingPlacement;
        Ok(())
      }
      Err(e) => {
        tracing::warn!(error = %e, "create match failed");
        self.phase = Phase::Idle;
        Err(e)
      }
    }
  }

  /// Open a placement: `AwaitingPlacement → Resolving`, returning the wire
  /// parameters for the play-card call. `None` means the attempt was
  /// silently dropped — turn not open or empty hand. These are expected
  /// races (a second gesture completing before the first turn unlocks),
  /// not faults.
  pub fn begin_placement(&mut self, position: usize) -> Option<PlacementRequest> {
    if !self.accepts_placement() {
      tracing::debug!(position, "placement dropped: turn not open");
      return None;
    }
    let Some(request) = self.snapshot.as_ref().and_then(|m| {
      m.current_card().map(|c| PlacementRequest {
        match_id:      m.id,
        occurrence_id: c.id,
        position,
      })
    }) else {
      tracing::debug!(position, "placement dropped: empty hand");
      return None;
    };

    self.phase = Phase::Resolving {
      pending_position: position,
    };
    Some(request)
  }

  /// Apply the play-card response. On success the machine enters
  /// [`Phase::Feedback`] at the pending position with the new authoritative
  /// snapshot and a bumped turn generation; the caller must schedule
  /// [`finish_feedback`](Self::finish_feedback) after [`FEEDBACK_DWELL`].
  /// On transport failure the machine returns to `AwaitingPlacement` with
  /// the hand un-consumed. A response arriving outside `Resolving` is
  /// ignored.
  pub fn complete_placement<E: std::fmt::Display>(
    &mut self,
    response: Result<PlacementResult, E>,
  ) -> Result<(), E> {
    let Phase::Resolving { pending_position } = &self.phase else {
      tracing::debug!("placement response ignored: none pending");
      return response.map(|_| ());
    };
    let revealed_position = *pending_position;

    match response {
      Ok(result) => {
        let correct = result.status == Verdict::Correct;
        tracing::debug!(revealed_position, correct, "placement resolved");
        self.turn += 1;
        self.snapshot = Some(result.next);
        self.phase = Phase::Feedback {
          correct,
          revealed_position,
        };
        Ok(())
      }
      Err(e) => {
        tracing::warn!(position = revealed_position, error = %e, "play card failed");
        self.phase = Phase::AwaitingPlacement;
        Err(e)
      }
    }
  }

  /// Open a snapshot refresh, returning the match id to fetch. Recovery
  /// aid, not part of the steady-state loop; legal only from
  /// `AwaitingPlacement` so it can never race a pending placement.
  pub fn begin_resync(&self) -> Option<i64> {
    if !self.accepts_placement() {
      return None;
    }
    self.snapshot.as_ref().map(|m| m.id)
  }

  /// Apply a refreshed snapshot without advancing the turn. A response
  /// arriving after the phase moved on is discarded rather than allowed to
  /// clobber newer state.
  pub fn complete_resync<E>(&mut self, response: Result<Match, E>) -> Result<bool, E> {
    if !self.accepts_placement() {
      return response.map(|_| false);
    }
    let snapshot = response?;
    tracing::debug!(match_id = snapshot.id, "snapshot resynced");
    self.snapshot = Some(snapshot);
    Ok(true)
  }

  // ── One-call compositions ─────────────────────────────────────────────────

  /// Start a fresh match: `Idle | Finished → Loading → AwaitingPlacement`,
  /// blocking on the create-match call in between. Returns `Ok(false)`
  /// without side effects when called from any other phase.
  pub async fn start<S: MatchService>(
    &mut self,
    service: &S,
  ) -> Result<bool, S::Error> {
    if !self.begin_start() {
      return Ok(false);
    }
    self.complete_start(service.create_match().await)?;
    Ok(true)
  }

  /// Start over after a finished match, discarding the previous one
  /// entirely. Identical to [`start`](Self::start).
  pub async fn restart<S: MatchService>(
    &mut self,
    service: &S,
  ) -> Result<bool, S::Error> {
    self.start(service).await
  }

  /// Submit the current card at `position`, blocking on the play-card call.
  /// `Ok(false)` means the attempt was silently dropped.
  pub async fn attempt_placement<S: MatchService>(
    &mut self,
    service: &S,
    position: usize,
  ) -> Result<bool, S::Error> {
    let Some(request) = self.begin_placement(position) else {
      return Ok(false);
    };
    let response = service
      .play_card(request.match_id, request.occurrence_id, request.position)
      .await;
    self.complete_placement(response)?;
    Ok(true)
  }

  /// Refresh the snapshot from the server, blocking on the fetch.
  pub async fn resync<S: MatchService>(
    &mut self,
    service: &S,
  ) -> Result<bool, S::Error> {
    let Some(match_id) = self.begin_resync() else {
      return Ok(false);
    };
    self.complete_resync(service.get_match(match_id).await)
  }

  /// Close the feedback window scheduled for turn generation `turn`:
  /// `Feedback → AwaitingPlacement`, or `→ Finished` when the merged
  /// snapshot resolved the match.
  ///
  /// Ignored (returns `false`) when the machine is no longer in `Feedback`
  /// or when `turn` is stale — a dwell timer firing after a newer turn
  /// began must never clobber that turn's state.
  pub fn finish_feedback(&mut self, turn: u64) -> bool {
    if turn != self.turn || !matches!(self.phase, Phase::Feedback { .. }) {
      tracing::debug!(turn, current = self.turn, "stale feedback expiry ignored");
      return false;
    }

    let status = self
      .snapshot
      .as_ref()
      .map(|m| m.status)
      .unwrap_or(MatchStatus::Ongoing);

    self.phase = match status {
      MatchStatus::Win => Phase::Finished {
        outcome: Outcome::Win,
      },
      MatchStatus::Lose => Phase::Finished {
        outcome: Outcome::Lose,
      },
      MatchStatus::Ongoing => Phase::AwaitingPlacement,
    };
    true
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::{
    collections::VecDeque,
    sync::Mutex,
  };

  use super::*;
  use crate::{
    Error,
    game::PlacementResult,
  };

  // ── Scripted service double ───────────────────────────────────────────────

  /// Replays queued responses and records every play-card call.
  #[derive(Default)]
  struct ScriptedService {
    creates:    Mutex<VecDeque<Result<Match, Error>>>,
    gets:       Mutex<VecDeque<Result<Match, Error>>>,
    plays:      Mutex<VecDeque<Result<PlacementResult, Error>>>,
    play_calls: Mutex<Vec<(i64, i64, usize)>>,
  }

  impl ScriptedService {
    fn on_create(&self, response: Result<Match, Error>) {
      self.creates.lock().unwrap().push_back(response);
    }

    fn on_get(&self, response: Result<Match, Error>) {
      self.gets.lock().unwrap().push_back(response);
    }

    fn on_play(&self, response: Result<PlacementResult, Error>) {
      self.plays.lock().unwrap().push_back(response);
    }

    fn play_calls(&self) -> Vec<(i64, i64, usize)> {
      self.play_calls.lock().unwrap().clone()
    }
  }

  impl MatchService for ScriptedService {
    type Error = Error;

    async fn create_match(&self) -> Result<Match, Error> {
      self
        .creates
        .lock()
        .unwrap()
        .pop_front()
        .expect("unexpected create_match call")
    }

    async fn get_match(&self, _match_id: i64) -> Result<Match, Error> {
      self
        .gets
        .lock()
        .unwrap()
        .pop_front()
        .expect("unexpected get_match call")
    }

    async fn play_card(
      &self,
      match_id: i64,
      occurrence_id: i64,
      position: usize,
    ) -> Result<PlacementResult, Error> {
      self
        .play_calls
        .lock()
        .unwrap()
        .push((match_id, occurrence_id, position));
      self
        .plays
        .lock()
        .unwrap()
        .pop_front()
        .expect("unexpected play_card call")
    }
  }

  // ── Fixtures ──────────────────────────────────────────────────────────────

  fn occurrence(id: i64, year: Option<i32>) -> Occurrence {
    Occurrence {
      id,
      title: "X".into(),
      summary: String::new(),
      year,
    }
  }

  /// Opening snapshot: one card in hand, one event already on the timeline.
  fn opening_match() -> Match {
    Match {
      id: 1,
      player_hand: vec![occurrence(10, None)],
      timeline: vec![Occurrence {
        id: 1,
        title: "Y".into(),
        summary: String::new(),
        year: Some(1950),
      }],
      remaining_deck: 5,
      remaining_life: 3,
      status: MatchStatus::Ongoing,
      timeline_size_goal: 6,
      mistakes: vec![],
    }
  }

  fn correct_response() -> PlacementResult {
    PlacementResult {
      status: Verdict::Correct,
      next: Match {
        id: 1,
        player_hand: vec![occurrence(11, None)],
        timeline: vec![
          Occurrence {
            id: 1,
            title: "Y".into(),
            summary: String::new(),
            year: Some(1950),
          },
          occurrence(10, Some(1969)),
        ],
        remaining_deck: 4,
        remaining_life: 3,
        status: MatchStatus::Ongoing,
        timeline_size_goal: 6,
        mistakes: vec![],
      },
    }
  }

  fn incorrect_response(remaining_life: u32) -> PlacementResult {
    let status = MatchStatus::derive(4, 1, remaining_life);
    PlacementResult {
      status: Verdict::Incorrect,
      next: Match {
        id: 1,
        player_hand: if remaining_life == 0 {
          vec![]
        } else {
          vec![occurrence(11, None)]
        },
        timeline: opening_match().timeline,
        remaining_deck: 4,
        remaining_life,
        status,
        timeline_size_goal: 6,
        mistakes: vec![occurrence(10, Some(1969))],
      },
    }
  }

  async fn started_machine(service: &ScriptedService) -> MatchStateMachine {
    service.on_create(Ok(opening_match()));
    let mut machine = MatchStateMachine::new();
    machine.start(service).await.unwrap();
    machine
  }

  // ── start / restart ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn start_transitions_to_awaiting_placement() {
    let service = ScriptedService::default();
    let machine = started_machine(&service).await;
    assert_eq!(*machine.phase(), Phase::AwaitingPlacement);
    assert_eq!(machine.snapshot().unwrap().id, 1);
  }

  #[tokio::test]
  async fn start_failure_falls_back_to_idle() {
    let service = ScriptedService::default();
    service.on_create(Err(Error::Status(502)));

    let mut machine = MatchStateMachine::new();
    let result = machine.start(&service).await;
    assert!(result.is_err());
    assert_eq!(*machine.phase(), Phase::Idle);
    assert!(machine.snapshot().is_none());
  }

  #[tokio::test]
  async fn start_is_a_noop_outside_idle_and_finished() {
    let service = ScriptedService::default();
    let mut machine = started_machine(&service).await;
    // AwaitingPlacement: no second create call may happen.
    assert!(!machine.start(&service).await.unwrap());
    assert_eq!(*machine.phase(), Phase::AwaitingPlacement);
  }

  #[tokio::test]
  async fn restart_from_finished_discards_previous_match() {
    let service = ScriptedService::default();
    let mut machine = started_machine(&service).await;
    service.on_play(Ok(incorrect_response(0)));
    machine.attempt_placement(&service, 0).await.unwrap();
    machine.finish_feedback(machine.turn());
    assert!(matches!(*machine.phase(), Phase::Finished { .. }));

    let mut fresh = opening_match();
    fresh.id = 2;
    service.on_create(Ok(fresh));
    assert!(machine.restart(&service).await.unwrap());
    assert_eq!(machine.snapshot().unwrap().id, 2);
    assert_eq!(*machine.phase(), Phase::AwaitingPlacement);
  }

  // ── Pending phases stay observable between begin and complete ─────────────

  #[test]
  fn begin_start_surfaces_loading_until_the_response_lands() {
    let mut machine = MatchStateMachine::new();
    assert!(machine.begin_start());
    // Renders between the two steps see Loading, not a post-transition
    // phase.
    assert_eq!(*machine.phase(), Phase::Loading);
    // No second create may start while one is pending.
    assert!(!machine.begin_start());

    machine.complete_start::<Error>(Ok(opening_match())).unwrap();
    assert_eq!(*machine.phase(), Phase::AwaitingPlacement);
  }

  #[test]
  fn begin_placement_surfaces_resolving_until_the_response_lands() {
    let mut machine = MatchStateMachine::new();
    machine.begin_start();
    machine.complete_start::<Error>(Ok(opening_match())).unwrap();

    let request = machine.begin_placement(1).unwrap();
    assert_eq!(request, PlacementRequest {
      match_id:      1,
      occurrence_id: 10,
      position:      1,
    });
    assert_eq!(*machine.phase(), Phase::Resolving {
      pending_position: 1,
    });
    assert!(!machine.accepts_placement());

    machine
      .complete_placement::<Error>(Ok(correct_response()))
      .unwrap();
    // The revealed position comes from the pending phase, not the caller.
    assert_eq!(*machine.phase(), Phase::Feedback {
      correct:           true,
      revealed_position: 1,
    });
  }

  #[test]
  fn placement_response_without_a_pending_request_is_ignored() {
    let mut machine = MatchStateMachine::new();
    machine.begin_start();
    machine.complete_start::<Error>(Ok(opening_match())).unwrap();

    machine
      .complete_placement::<Error>(Ok(correct_response()))
      .unwrap();
    assert_eq!(*machine.phase(), Phase::AwaitingPlacement);
    assert_eq!(machine.turn(), 0);
  }

  #[test]
  fn resync_response_after_the_phase_moved_on_is_discarded() {
    let mut machine = MatchStateMachine::new();
    machine.begin_start();
    machine.complete_start::<Error>(Ok(opening_match())).unwrap();
    let match_id = machine.begin_resync().unwrap();
    assert_eq!(match_id, 1);

    // A placement resolves before the resync response arrives.
    machine.begin_placement(1);
    let mut stale = opening_match();
    stale.remaining_life = 1;
    assert!(!machine.complete_resync::<Error>(Ok(stale)).unwrap());
    assert_eq!(machine.snapshot().unwrap().remaining_life, 3);
  }

  // ── Placement ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn placement_submits_current_card_id_and_position() {
    // Dropping card 10 on slot 1 calls play_card(1, 10, 1).
    let service = ScriptedService::default();
    let mut machine = started_machine(&service).await;
    service.on_play(Ok(correct_response()));

    assert!(machine.attempt_placement(&service, 1).await.unwrap());
    assert_eq!(service.play_calls(), vec![(1, 10, 1)]);
  }

  #[tokio::test]
  async fn correct_placement_enters_feedback_then_unlocks() {
    let service = ScriptedService::default();
    let mut machine = started_machine(&service).await;
    service.on_play(Ok(correct_response()));

    machine.attempt_placement(&service, 1).await.unwrap();
    assert_eq!(
      *machine.phase(),
      Phase::Feedback {
        correct:           true,
        revealed_position: 1,
      }
    );
    assert_eq!(machine.snapshot().unwrap().timeline.len(), 2);
    assert_eq!(machine.snapshot().unwrap().remaining_deck, 4);

    assert!(machine.finish_feedback(machine.turn()));
    assert_eq!(*machine.phase(), Phase::AwaitingPlacement);
    assert_eq!(machine.current_card().unwrap().id, 11);
  }

  #[tokio::test]
  async fn incorrect_placement_shows_feedback_and_keeps_timeline() {
    let service = ScriptedService::default();
    let mut machine = started_machine(&service).await;
    service.on_play(Ok(incorrect_response(2)));

    machine.attempt_placement(&service, 0).await.unwrap();
    assert_eq!(
      *machine.phase(),
      Phase::Feedback {
        correct:           false,
        revealed_position: 0,
      }
    );
    assert_eq!(machine.snapshot().unwrap().timeline.len(), 1);
    assert_eq!(machine.snapshot().unwrap().remaining_life, 2);

    machine.finish_feedback(machine.turn());
    assert_eq!(*machine.phase(), Phase::AwaitingPlacement);
  }

  #[tokio::test]
  async fn fatal_placement_finishes_lose_after_dwell() {
    // Last life gone: the post-dwell transition goes to
    // Finished(lose) instead of AwaitingPlacement.
    let service = ScriptedService::default();
    let mut machine = started_machine(&service).await;
    service.on_play(Ok(incorrect_response(0)));

    machine.attempt_placement(&service, 0).await.unwrap();
    assert!(matches!(*machine.phase(), Phase::Feedback { correct: false, .. }));

    machine.finish_feedback(machine.turn());
    assert_eq!(
      *machine.phase(),
      Phase::Finished {
        outcome: Outcome::Lose,
      }
    );
  }

  #[tokio::test]
  async fn winning_snapshot_finishes_win_after_dwell() {
    let service = ScriptedService::default();
    let mut machine = started_machine(&service).await;

    let mut response = correct_response();
    response.next.player_hand.clear();
    response.next.remaining_deck = 0;
    response.next.status = MatchStatus::Win;
    service.on_play(Ok(response));

    machine.attempt_placement(&service, 1).await.unwrap();
    machine.finish_feedback(machine.turn());
    assert_eq!(
      *machine.phase(),
      Phase::Finished {
        outcome: Outcome::Win,
      }
    );
  }

  // ── Guards ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn placement_outside_awaiting_is_dropped() {
    // While one placement is resolving (here: stuck in Feedback), extra
    // attempts make no network calls.
    let service = ScriptedService::default();
    let mut machine = started_machine(&service).await;
    service.on_play(Ok(correct_response()));

    machine.attempt_placement(&service, 1).await.unwrap();
    assert!(!machine.attempt_placement(&service, 0).await.unwrap());
    assert!(!machine.attempt_placement(&service, 2).await.unwrap());
    assert_eq!(service.play_calls().len(), 1);
  }

  #[tokio::test]
  async fn placement_with_empty_hand_is_a_noop() {
    let service = ScriptedService::default();
    let mut empty = opening_match();
    empty.player_hand.clear();
    service.on_create(Ok(empty));

    let mut machine = MatchStateMachine::new();
    machine.start(&service).await.unwrap();
    assert!(!machine.attempt_placement(&service, 0).await.unwrap());
    assert!(service.play_calls().is_empty());
  }

  #[tokio::test]
  async fn placement_failure_returns_to_awaiting_with_hand_intact() {
    let service = ScriptedService::default();
    let mut machine = started_machine(&service).await;
    service.on_play(Err(Error::Transport("connection reset".into())));

    let result = machine.attempt_placement(&service, 1).await;
    assert!(result.is_err());
    assert_eq!(*machine.phase(), Phase::AwaitingPlacement);
    // The card was not consumed; a re-drop submits again.
    assert_eq!(machine.current_card().unwrap().id, 10);

    service.on_play(Ok(correct_response()));
    assert!(machine.attempt_placement(&service, 1).await.unwrap());
  }

  #[tokio::test]
  async fn stale_feedback_expiry_is_ignored() {
    // The first turn's dwell timer fires after the second turn's
    // response arrived. It must not clear the second turn's feedback.
    let service = ScriptedService::default();
    let mut machine = started_machine(&service).await;

    service.on_play(Ok(correct_response()));
    machine.attempt_placement(&service, 1).await.unwrap();
    let first_turn = machine.turn();

    // The first dwell fires on time; second turn begins.
    machine.finish_feedback(first_turn);
    service.on_play(Ok(incorrect_response(2)));
    machine.attempt_placement(&service, 0).await.unwrap();

    // A duplicate/late expiry for the first turn arrives now.
    assert!(!machine.finish_feedback(first_turn));
    assert!(matches!(
      *machine.phase(),
      Phase::Feedback { correct: false, .. }
    ));

    // The correctly-tagged expiry still works.
    assert!(machine.finish_feedback(machine.turn()));
    assert_eq!(*machine.phase(), Phase::AwaitingPlacement);
  }

  #[tokio::test]
  async fn resync_replaces_snapshot_without_advancing_turn() {
    let service = ScriptedService::default();
    let mut machine = started_machine(&service).await;
    let turn_before = machine.turn();

    let mut refreshed = opening_match();
    refreshed.remaining_life = 1;
    service.on_get(Ok(refreshed));

    assert!(machine.resync(&service).await.unwrap());
    assert_eq!(machine.snapshot().unwrap().remaining_life, 1);
    assert_eq!(machine.turn(), turn_before);
    assert_eq!(*machine.phase(), Phase::AwaitingPlacement);
  }

  #[tokio::test]
  async fn resync_outside_awaiting_is_a_noop() {
    let service = ScriptedService::default();
    let mut machine = MatchStateMachine::new();
    assert!(!machine.resync(&service).await.unwrap());
  }

  #[tokio::test]
  async fn finish_feedback_outside_feedback_is_ignored() {
    let service = ScriptedService::default();
    let mut machine = started_machine(&service).await;
    assert!(!machine.finish_feedback(machine.turn()));
    assert_eq!(*machine.phase(), Phase::AwaitingPlacement);
  }
}
