//! Error types for `eras-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The backend could not be reached at all (DNS, connect, timeout).
  #[error("transport failure: {0}")]
  Transport(String),

  /// The backend answered with a non-2xx status. No structured error
  /// payload is interpreted; the status code is all we surface.
  #[error("request failed with status {0}")]
  Status(u16),

  /// The response body could not be decoded into the expected shape.
  #[error("decoding response: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
