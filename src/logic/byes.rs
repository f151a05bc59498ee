//! Bye resolution: advance teams that have nobody to play.

use crate::logic::advance::declare_winner;
use crate::models::{Bracket, MatchId, Team};

/// Declare the sole occupant the winner of every playable single-team match, until
/// none are left. Covers first-round byes and later matches with a single feeder.
pub fn advance_byes(bracket: &Bracket) -> Bracket {
    let mut current = bracket.clone();
    while let Some((round_key, match_id, team)) = find_bye(&current) {
        match declare_winner(&current, &round_key, match_id, &team) {
            Ok(updated) => {
                log::info!("{} advances on a bye ({round_key} match {match_id})", team.name);
                current = updated;
            }
            Err(e) => {
                log::warn!("Could not advance bye in {round_key} match {match_id}: {e}");
                break;
            }
        }
    }
    current
}

fn find_bye(bracket: &Bracket) -> Option<(String, MatchId, Team)> {
    for (round_index, round) in bracket.rounds().iter().enumerate() {
        for (position, m) in round.matches.iter().enumerate() {
            if !bracket.is_playable(round_index, position) {
                continue;
            }
            if let Some(team) = m.sole_team() {
                return Some((round.key.clone(), m.id, team.clone()));
            }
        }
    }
    None
}
