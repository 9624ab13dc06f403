//! Core session logic for the Eras chronological-ordering card game.
//!
//! This crate is deliberately free of HTTP and UI dependencies. It owns the
//! match state machine, the drag interaction subsystem (drag session, drop
//! targets, auto-scroll), and the [`MatchService`](service::MatchService)
//! trait that abstracts the backend. The terminal client (`eras-cli`)
//! depends on this crate; it depends on nothing proprietary.

pub mod drag;
pub mod error;
pub mod game;
pub mod occurrence;
pub mod scroll;
pub mod service;
pub mod slot;
pub mod state;

pub use error::{Error, Result};
