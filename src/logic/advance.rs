//! Winner declaration: mark a match decided and move the winner into the next round.

use crate::models::{Bracket, MatchId, Team, TeamId};
use thiserror::Error;

/// Reasons a winner declaration is refused. The input bracket is left untouched.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum AdvanceError {
    #[error("Unknown round {0}")]
    UnknownRound(String),
    #[error("Match {match_id} not found in {round}")]
    UnknownMatch { round: String, match_id: MatchId },
    /// The match already has a winner (double submit, or another client got there first).
    #[error("Match {match_id} in {round} already has a winner")]
    AlreadyDecided { round: String, match_id: MatchId },
    /// The match is still waiting for a team.
    #[error("Match {match_id} in {round} is not ready to be played")]
    NotPlayable { round: String, match_id: MatchId },
    #[error("Team {team_id} does not play in match {match_id}")]
    WinnerNotInMatch { match_id: MatchId, team_id: TeamId },
    /// Both slots of the destination match are already taken.
    #[error("No free slot in match {match_id} of {round}")]
    SlotOccupied { round: String, match_id: MatchId },
}

/// Position in the next round that receives the winner of `match_id`.
pub fn next_slot_index(match_id: MatchId) -> usize {
    (match_id / 2) as usize
}

/// Declare `winner` for match `match_id` of round `round_key`.
///
/// Returns a new bracket in which the match is decided and, unless this is the last
/// round, the winner occupies the first free slot of match `floor(match_id / 2)` in
/// the next round. The first feeder to report fills `team_1`, the second `team_2`.
pub fn declare_winner(
    bracket: &Bracket,
    round_key: &str,
    match_id: MatchId,
    winner: &Team,
) -> Result<Bracket, AdvanceError> {
    let round_index = bracket
        .position(round_key)
        .ok_or_else(|| AdvanceError::UnknownRound(round_key.to_string()))?;
    let round = &bracket.rounds()[round_index];
    let position = round
        .position_of(match_id)
        .ok_or_else(|| AdvanceError::UnknownMatch {
            round: round_key.to_string(),
            match_id,
        })?;
    let current = &round.matches[position];

    if current.is_decided() {
        return Err(AdvanceError::AlreadyDecided {
            round: round_key.to_string(),
            match_id,
        });
    }
    let winner = current
        .team(winner.id)
        .cloned()
        .ok_or(AdvanceError::WinnerNotInMatch {
            match_id,
            team_id: winner.id,
        })?;
    if !bracket.is_playable(round_index, position) {
        return Err(AdvanceError::NotPlayable {
            round: round_key.to_string(),
            match_id,
        });
    }

    let next_index = round_index + 1;
    let destination = next_slot_index(match_id);
    if let Some(next_round) = bracket.rounds().get(next_index) {
        let target = next_round
            .matches
            .get(destination)
            .ok_or_else(|| AdvanceError::UnknownMatch {
                round: next_round.key.clone(),
                match_id: destination as MatchId,
            })?;
        if target.occupants() == 2 {
            return Err(AdvanceError::SlotOccupied {
                round: next_round.key.clone(),
                match_id: target.id,
            });
        }
    }

    let mut updated = bracket.clone();
    if let Some(m) = updated.match_at_mut(round_index, position) {
        m.winner = Some(winner.clone());
    }
    match updated.match_at_mut(next_index, destination) {
        Some(target) => {
            target.fill_slot(winner.clone());
            log::debug!(
                "{} wins {round_key} match {match_id}, advances to slot {destination}",
                winner.name
            );
        }
        None => log::debug!("{} wins {round_key} match {match_id} (last round)", winner.name),
    }
    Ok(updated)
}
