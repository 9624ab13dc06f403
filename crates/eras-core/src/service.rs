//! The `MatchService` trait abstracting the backend match API.
//!
//! Implemented by the HTTP client in `eras-cli`; the state machine depends
//! on this abstraction, not on any concrete transport, so it can be tested
//! with a scripted in-memory double.

use std::future::Future;

use crate::game::{Match, PlacementResult};

/// Abstraction over the backend match/placement API.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes.
pub trait MatchService: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Start a new match and return its initial snapshot.
  fn create_match(
    &self,
  ) -> impl Future<Output = Result<Match, Self::Error>> + Send + '_;

  /// Fetch the current snapshot of an existing match.
  ///
  /// Not part of the steady-state turn loop; used for recovery and
  /// debugging only.
  fn get_match(
    &self,
    match_id: i64,
  ) -> impl Future<Output = Result<Match, Self::Error>> + Send + '_;

  /// Submit a placement of `occurrence_id` at `position` and return the
  /// verdict plus the next authoritative snapshot.
  fn play_card(
    &self,
    match_id: i64,
    occurrence_id: i64,
    position: usize,
  ) -> impl Future<Output = Result<PlacementResult, Self::Error>> + Send + '_;
}
