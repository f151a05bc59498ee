//! Board: single owner of the view state (teams, bracket, last error), kept in sync
//! with the tournament service.
//!
//! Every operation records its outcome as one flat message: success clears it, a
//! failure replaces whatever was there before. Nothing is retried.

use crate::logic::{advance_byes, declare_winner, AdvanceError};
use crate::models::{Bracket, MatchId, Team, TeamId};
use crate::service::{ServiceError, TournamentService};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Teams needed before a draw or a bracket makes sense.
pub const MIN_TEAMS: usize = 2;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Team name may not be empty")]
    EmptyTeamName,
    #[error("At least 2 teams are needed to {action}")]
    NotEnoughTeams { action: &'static str },
    #[error("No bracket has been generated yet")]
    NoBracket,
    #[error(transparent)]
    Advance(#[from] AdvanceError),
    /// The service call failed; `message` is what the user gets to see.
    #[error("{message}")]
    Service {
        message: String,
        #[source]
        source: ServiceError,
    },
}

impl BoardError {
    /// Whether the failure came from the tournament service rather than a local check.
    pub fn is_remote(&self) -> bool {
        matches!(self, BoardError::Service { .. })
    }
}

fn service_error(default: &str, source: ServiceError) -> BoardError {
    log::warn!("{default}: {source}");
    let message = source.server_message().unwrap_or(default).to_string();
    BoardError::Service { message, source }
}

/// Matches that have a winner in `after` but not in `before`, in round order.
fn newly_decided(before: &Bracket, after: &Bracket) -> Vec<(MatchId, TeamId)> {
    before
        .rounds()
        .iter()
        .zip(after.rounds())
        .flat_map(|(old, new)| old.matches.iter().zip(&new.matches))
        .filter(|(old, _)| !old.is_decided())
        .filter_map(|(_, new)| new.winner.as_ref().map(|w| (new.id, w.id)))
        .collect()
}

/// Serializable view of the board.
#[derive(Debug, Serialize)]
pub struct BoardView<'a> {
    pub teams: &'a [Team],
    pub bracket: Option<&'a Bracket>,
    pub error: Option<&'a str>,
    pub last_synced: Option<DateTime<Utc>>,
    pub champion: Option<&'a Team>,
    /// Matches a winner may be declared for right now, byes included.
    pub playable: Vec<PlayableMatch<'a>>,
}

#[derive(Debug, Serialize)]
pub struct PlayableMatch<'a> {
    pub round: &'a str,
    pub match_id: MatchId,
}

fn playable_matches(bracket: &Bracket) -> Vec<PlayableMatch<'_>> {
    bracket
        .rounds()
        .iter()
        .enumerate()
        .flat_map(|(round_index, round)| {
            round
                .matches
                .iter()
                .enumerate()
                .filter(move |(position, _)| bracket.is_playable(round_index, *position))
                .map(move |(_, m)| PlayableMatch {
                    round: &round.key,
                    match_id: m.id,
                })
        })
        .collect()
}

pub struct Board<S> {
    service: S,
    teams: Vec<Team>,
    bracket: Option<Bracket>,
    error: Option<String>,
    /// Last time the bracket was taken from the service.
    last_synced: Option<DateTime<Utc>>,
    auto_advance_byes: bool,
}

impl<S: TournamentService> Board<S> {
    pub fn new(service: S, auto_advance_byes: bool) -> Self {
        Self {
            service,
            teams: Vec::new(),
            bracket: None,
            error: None,
            last_synced: None,
            auto_advance_byes,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn bracket(&self) -> Option<&Bracket> {
        self.bracket.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.last_synced
    }

    pub fn snapshot(&self) -> BoardView<'_> {
        BoardView {
            teams: &self.teams,
            bracket: self.bracket.as_ref(),
            error: self.error.as_deref(),
            last_synced: self.last_synced,
            champion: self.bracket.as_ref().and_then(Bracket::champion),
            playable: self
                .bracket
                .as_ref()
                .map(playable_matches)
                .unwrap_or_default(),
        }
    }

    fn record(&mut self, result: Result<(), BoardError>) -> Result<(), BoardError> {
        self.error = result.as_ref().err().map(ToString::to_string);
        result
    }

    fn team_ids(&self) -> Vec<TeamId> {
        self.teams.iter().map(|t| t.id).collect()
    }

    /// Take the service's bracket as the current one.
    fn store_bracket(&mut self, bracket: Option<Bracket>) {
        self.bracket = bracket;
        self.last_synced = Some(Utc::now());
    }

    async fn fetch_bracket(&mut self) -> Result<(), BoardError> {
        let bracket = self
            .service
            .fetch_bracket()
            .await
            .map_err(|e| service_error("Failed to load the bracket", e))?;
        if bracket.is_none() {
            log::info!("The service has no bracket");
        }
        self.store_bracket(bracket);
        Ok(())
    }

    /// Replace the team list with the service's.
    pub async fn load_teams(&mut self) -> Result<(), BoardError> {
        let result = match self.service.list_teams().await {
            Ok(teams) => {
                log::info!("Loaded {} team(s)", teams.len());
                self.teams = teams;
                Ok(())
            }
            Err(e) => Err(service_error("Failed to load teams", e)),
        };
        self.record(result)
    }

    /// Register a team. Blank names are refused without asking the service.
    pub async fn add_team(&mut self, name: &str) -> Result<(), BoardError> {
        let name = name.trim();
        let result = if name.is_empty() {
            Err(BoardError::EmptyTeamName)
        } else {
            match self.service.add_team(name).await {
                Ok(team) => {
                    log::info!("Team added: {} ({})", team.name, team.id);
                    self.teams.push(team);
                    Ok(())
                }
                Err(e) => Err(service_error("Failed to add team", e)),
            }
        };
        self.record(result)
    }

    pub async fn remove_team(&mut self, team_id: TeamId) -> Result<(), BoardError> {
        let result = match self.service.remove_team(team_id).await {
            Ok(()) => {
                self.teams.retain(|t| t.id != team_id);
                log::info!("Team {team_id} removed");
                Ok(())
            }
            Err(e) => Err(service_error("Failed to remove team", e)),
        };
        self.record(result)
    }

    /// Remove every team; the bracket goes with them.
    pub async fn clear_teams(&mut self) -> Result<(), BoardError> {
        let result = match self.service.clear_teams().await {
            Ok(()) => {
                self.teams.clear();
                self.bracket = None;
                log::info!("All teams cleared");
                Ok(())
            }
            Err(e) => Err(service_error("Failed to clear teams", e)),
        };
        self.record(result)
    }

    /// Ask the service to shuffle the teams; the new order is the seeding order.
    pub async fn draw(&mut self) -> Result<(), BoardError> {
        let result = if self.teams.len() < MIN_TEAMS {
            Err(BoardError::NotEnoughTeams {
                action: "run the draw",
            })
        } else {
            let ids = self.team_ids();
            match self.service.shuffle(&ids).await {
                Ok(teams) => {
                    log::info!("Draw done for {} team(s)", teams.len());
                    self.teams = teams;
                    Ok(())
                }
                Err(e) => Err(service_error("Failed to run the draw", e)),
            }
        };
        self.record(result)
    }

    pub async fn generate_bracket(&mut self) -> Result<(), BoardError> {
        let result = if self.teams.len() < MIN_TEAMS {
            Err(BoardError::NotEnoughTeams {
                action: "generate the bracket",
            })
        } else {
            let ids = self.team_ids();
            match self.service.generate_bracket(&ids).await {
                Ok(bracket) => {
                    log::info!("Bracket generated with {} round(s)", bracket.rounds().len());
                    if self.auto_advance_byes {
                        self.resolve_byes(bracket).await
                    } else {
                        self.store_bracket(Some(bracket));
                        Ok(())
                    }
                }
                Err(e) => Err(service_error("Failed to generate the bracket", e)),
            }
        };
        self.record(result)
    }

    /// Advance byes locally, forward each resulting winner to the service, then
    /// re-fetch. Until the re-fetch succeeds the local bracket is shown unsynced.
    async fn resolve_byes(&mut self, generated: Bracket) -> Result<(), BoardError> {
        let resolved = advance_byes(&generated);
        let decided = newly_decided(&generated, &resolved);
        if decided.is_empty() {
            self.store_bracket(Some(resolved));
            return Ok(());
        }
        self.bracket = Some(resolved);
        self.last_synced = None;
        for (match_id, winner_id) in decided {
            self.service
                .set_winner(match_id, winner_id)
                .await
                .map_err(|e| service_error("Failed to record winner", e))?;
        }
        self.fetch_bracket().await
    }

    /// Re-fetch the authoritative bracket. An empty answer clears the local one.
    pub async fn refresh_bracket(&mut self) -> Result<(), BoardError> {
        let result = self.fetch_bracket().await;
        self.record(result)
    }

    /// Declare `team_id` the winner of a match.
    ///
    /// The advancement is applied locally first, then forwarded to the service and
    /// the bracket re-fetched. If the service fails the local view stays as is.
    pub async fn declare_winner(
        &mut self,
        round_key: &str,
        match_id: MatchId,
        team_id: TeamId,
    ) -> Result<(), BoardError> {
        let result = self.apply_winner(round_key, match_id, team_id).await;
        self.record(result)
    }

    async fn apply_winner(
        &mut self,
        round_key: &str,
        match_id: MatchId,
        team_id: TeamId,
    ) -> Result<(), BoardError> {
        let bracket = self.bracket.as_ref().ok_or(BoardError::NoBracket)?;
        let winner = bracket
            .round(round_key)
            .ok_or_else(|| AdvanceError::UnknownRound(round_key.to_string()))?
            .get(match_id)
            .ok_or_else(|| AdvanceError::UnknownMatch {
                round: round_key.to_string(),
                match_id,
            })?
            .team(team_id)
            .cloned()
            .ok_or(AdvanceError::WinnerNotInMatch { match_id, team_id })?;

        let updated = declare_winner(bracket, round_key, match_id, &winner)?;
        self.bracket = Some(updated);
        log::info!("{} declared winner of {round_key} match {match_id}", winner.name);

        self.service
            .set_winner(match_id, team_id)
            .await
            .map_err(|e| service_error("Failed to record winner", e))?;
        self.fetch_bracket().await
    }
}
