//! Data structures for the bracket board: teams, matches, rounds and the bracket.

mod bracket;
mod game;
mod team;

pub use bracket::{Bracket, BracketError, Round};
pub use game::{GameMatch, MatchId, MatchStatus};
pub use team::{Team, TeamId};
