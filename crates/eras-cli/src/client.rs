//! Async HTTP client wrapping the Eras match JSON API.

use std::time::Duration;

use anyhow::{Context, Result};
use eras_core::{
  Error,
  game::{Match, PlacementResult},
  service::MatchService,
};
use reqwest::Client;
use serde::Serialize;

/// Connection settings for the match API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the match JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

/// Request body for the play-card endpoint.
#[derive(Serialize)]
struct PlayCardBody {
  occurrence_id: i64,
  position:      usize,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  async fn decode<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
  ) -> Result<T, Error> {
    if !resp.status().is_success() {
      return Err(Error::Status(resp.status().as_u16()));
    }
    resp
      .json()
      .await
      .map_err(|e| Error::Decode(e.to_string()))
  }
}

impl MatchService for ApiClient {
  type Error = Error;

  /// `GET /api/match/`
  async fn create_match(&self) -> Result<Match, Error> {
    let resp = self
      .client
      .get(self.url("/match/"))
      .send()
      .await
      .map_err(|e| Error::Transport(e.to_string()))?;
    Self::decode(resp).await
  }

  /// `GET /api/match/{id}/`
  async fn get_match(&self, match_id: i64) -> Result<Match, Error> {
    let resp = self
      .client
      .get(self.url(&format!("/match/{match_id}/")))
      .send()
      .await
      .map_err(|e| Error::Transport(e.to_string()))?;
    Self::decode(resp).await
  }

  /// `POST /api/match/{id}/` with `{occurrence_id, position}`
  async fn play_card(
    &self,
    match_id: i64,
    occurrence_id: i64,
    position: usize,
  ) -> Result<PlacementResult, Error> {
    let resp = self
      .client
      .post(self.url(&format!("/match/{match_id}/")))
      .json(&PlayCardBody {
        occurrence_id,
        position,
      })
      .send()
      .await
      .map_err(|e| Error::Transport(e.to_string()))?;
    Self::decode(resp).await
  }
}
