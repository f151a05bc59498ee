//! HTTP client for the remote tournament API.

use crate::models::{Bracket, MatchId, Team, TeamId};
use crate::service::{ServiceError, TournamentService};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct AddTeamBody<'a> {
    nome: &'a str,
}

#[derive(Serialize)]
struct TeamIdsBody<'a> {
    equipes_ids: &'a [TeamId],
}

#[derive(Serialize)]
struct SetWinnerBody {
    vencedor_id: TeamId,
}

/// Error body sent by the server on validation failures.
#[derive(Deserialize)]
struct ErrorBody {
    erro: Option<String>,
}

/// Tournament service reached over HTTP at `base_url`.
#[derive(Clone, Debug)]
pub struct RemoteService {
    client: Client,
    base_url: String,
}

impl RemoteService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send the request and return the body of a success response.
    async fn send(&self, request: RequestBuilder) -> Result<String, ServiceError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            return Ok(body);
        }
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.erro);
        log::warn!("Tournament API answered {status}: {body}");
        Err(ServiceError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ServiceError> {
        let body = self.send(request).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl TournamentService for RemoteService {
    async fn list_teams(&self) -> Result<Vec<Team>, ServiceError> {
        self.send_json(self.client.get(self.url("/equipes"))).await
    }

    async fn add_team(&self, name: &str) -> Result<Team, ServiceError> {
        let request = self
            .client
            .post(self.url("/equipes"))
            .json(&AddTeamBody { nome: name });
        self.send_json(request).await
    }

    async fn remove_team(&self, team_id: TeamId) -> Result<(), ServiceError> {
        let request = self.client.delete(self.url(&format!("/equipes/{team_id}")));
        self.send(request).await.map(drop)
    }

    async fn clear_teams(&self) -> Result<(), ServiceError> {
        let request = self.client.delete(self.url("/equipes/limpar"));
        self.send(request).await.map(drop)
    }

    async fn shuffle(&self, team_ids: &[TeamId]) -> Result<Vec<Team>, ServiceError> {
        let request = self
            .client
            .post(self.url("/sorteio"))
            .json(&TeamIdsBody { equipes_ids: team_ids });
        self.send_json(request).await
    }

    async fn generate_bracket(&self, team_ids: &[TeamId]) -> Result<Bracket, ServiceError> {
        let request = self
            .client
            .post(self.url("/chaveamento"))
            .json(&TeamIdsBody { equipes_ids: team_ids });
        self.send_json(request).await
    }

    async fn set_winner(&self, match_id: MatchId, winner_id: TeamId) -> Result<(), ServiceError> {
        let request = self
            .client
            .put(self.url(&format!("/partidas/{match_id}/vencedor")))
            .json(&SetWinnerBody {
                vencedor_id: winner_id,
            });
        self.send(request).await.map(drop)
    }

    async fn fetch_bracket(&self) -> Result<Option<Bracket>, ServiceError> {
        let body = self.send(self.client.get(self.url("/partidas"))).await?;
        Ok(Bracket::from_json(&body)?)
    }
}
