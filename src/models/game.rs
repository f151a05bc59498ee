//! Match (game) and its status within a bracket.

use crate::models::team::{Team, TeamId};
use serde::{Deserialize, Serialize};

/// Position of a match within its round. Round `i + 1` match `p` is fed by
/// round `i` matches `2p` and `2p + 1`.
pub type MatchId = u32;

/// Where a match stands in its lifecycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// At least one slot is still waiting for a team.
    EmptySlots,
    /// Both teams are present and no winner has been declared.
    Playable,
    /// A winner has been declared. Terminal.
    Decided,
}

/// A pairing of up to two teams producing at most one winner.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    #[serde(default, alias = "equipe1")]
    pub team_1: Option<Team>,
    #[serde(default, alias = "equipe2")]
    pub team_2: Option<Team>,
    /// None until declared; never cleared afterwards.
    #[serde(default, alias = "vencedor")]
    pub winner: Option<Team>,
}

impl GameMatch {
    pub fn new(id: MatchId, team_1: Option<Team>, team_2: Option<Team>) -> Self {
        Self {
            id,
            team_1,
            team_2,
            winner: None,
        }
    }

    /// A match with no teams yet (later rounds arrive like this from the generator).
    pub fn empty(id: MatchId) -> Self {
        Self::new(id, None, None)
    }

    /// Status from this match's slots alone. It knows nothing of the bracket, so a
    /// bye is `EmptySlots` here; use [`Bracket::is_playable`] to decide whether a
    /// winner may be declared.
    ///
    /// [`Bracket::is_playable`]: crate::models::Bracket::is_playable
    pub fn status(&self) -> MatchStatus {
        if self.winner.is_some() {
            MatchStatus::Decided
        } else if self.team_1.is_some() && self.team_2.is_some() {
            MatchStatus::Playable
        } else {
            MatchStatus::EmptySlots
        }
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    /// Number of filled slots (0, 1 or 2).
    pub fn occupants(&self) -> usize {
        usize::from(self.team_1.is_some()) + usize::from(self.team_2.is_some())
    }

    /// The team in either slot with the given id.
    pub fn team(&self, team_id: TeamId) -> Option<&Team> {
        self.team_1
            .iter()
            .chain(self.team_2.iter())
            .find(|t| t.id == team_id)
    }

    /// The only team present, when exactly one slot is filled.
    pub fn sole_team(&self) -> Option<&Team> {
        match (&self.team_1, &self.team_2) {
            (Some(t), None) | (None, Some(t)) => Some(t),
            _ => None,
        }
    }

    /// Put a team into the first empty slot. Returns false when both are taken.
    pub(crate) fn fill_slot(&mut self, team: Team) -> bool {
        if self.team_1.is_none() {
            self.team_1 = Some(team);
            true
        } else if self.team_2.is_none() {
            self.team_2 = Some(team);
            true
        } else {
            false
        }
    }
}
