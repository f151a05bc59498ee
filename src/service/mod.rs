//! Remote tournament API: the contracts the board consumes, and an HTTP implementation.

mod remote;

use crate::models::{Bracket, MatchId, Team, TeamId};
use thiserror::Error;

pub use remote::RemoteService;

/// Failures talking to the remote tournament API.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request never completed (connection refused, timeout, ...).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("server answered {status}{}", detail(.message))]
    Rejected {
        status: u16,
        /// The `erro` field of the error body, when the server sent one.
        message: Option<String>,
    },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

fn detail(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

impl ServiceError {
    /// Message meant for users, if the server provided one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ServiceError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Team registry, draw, bracket generator and winner persistence, as one service.
///
/// All state is owned by the implementation; callers treat every answer as authoritative.
#[allow(async_fn_in_trait)]
pub trait TournamentService {
    async fn list_teams(&self) -> Result<Vec<Team>, ServiceError>;

    /// Register a team. The server validates the name and may reject it.
    async fn add_team(&self, name: &str) -> Result<Team, ServiceError>;

    async fn remove_team(&self, team_id: TeamId) -> Result<(), ServiceError>;

    async fn clear_teams(&self) -> Result<(), ServiceError>;

    /// Draw: the given teams in a new random order.
    async fn shuffle(&self, team_ids: &[TeamId]) -> Result<Vec<Team>, ServiceError>;

    /// Initial bracket for the teams, first round seeded in the given order.
    async fn generate_bracket(&self, team_ids: &[TeamId]) -> Result<Bracket, ServiceError>;

    async fn set_winner(&self, match_id: MatchId, winner_id: TeamId) -> Result<(), ServiceError>;

    /// Current authoritative bracket; None when none has been generated.
    async fn fetch_bracket(&self) -> Result<Option<Bracket>, ServiceError>;
}
