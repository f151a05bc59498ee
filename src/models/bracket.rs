//! Bracket and Round: the round-keyed structure of a single-elimination tournament.

use crate::models::game::{GameMatch, MatchId};
use crate::models::team::Team;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Errors raised when a bracket does not have the layout advancement relies on.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum BracketError {
    #[error("bracket has no rounds")]
    NoRounds,
    #[error("round {0} has no matches")]
    EmptyRound(String),
    #[error("round {0} appears more than once")]
    DuplicateRound(String),
    /// Match ids must equal their position in the round.
    #[error("round {round}: match at position {position} has id {id}")]
    MatchIdOutOfPlace {
        round: String,
        position: usize,
        id: MatchId,
    },
    /// Each round must hold half the previous one, rounded up.
    #[error("round {round} has {found} matches, expected {expected}")]
    RoundSizeMismatch {
        round: String,
        expected: usize,
        found: usize,
    },
}

/// One elimination stage.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Round {
    /// Round name as issued by the generator, e.g. `round_1`.
    pub key: String,
    pub matches: Vec<GameMatch>,
}

impl Round {
    pub fn new(key: impl Into<String>, matches: Vec<GameMatch>) -> Self {
        Self {
            key: key.into(),
            matches,
        }
    }

    /// Position of the match with this id, if any.
    pub fn position_of(&self, match_id: MatchId) -> Option<usize> {
        self.matches.iter().position(|m| m.id == match_id)
    }

    pub fn get(&self, match_id: MatchId) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.id == match_id)
    }
}

/// Full bracket. Rounds are kept in elimination order: index 0 is the first round.
///
/// Serialized as a JSON object `{ round_key: [match, ..], .. }` whose key order is the
/// round order. Construction (including deserialization) validates the layout, so
/// `floor(id / 2)` always names an existing match of the next round.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bracket {
    rounds: Vec<Round>,
}

impl Bracket {
    pub fn new(rounds: Vec<Round>) -> Result<Self, BracketError> {
        validate_layout(&rounds)?;
        Ok(Self { rounds })
    }

    /// Parse a bracket document as the tournament API sends it. `{}` means no bracket
    /// has been generated yet.
    pub fn from_json(body: &str) -> Result<Option<Self>, serde_json::Error> {
        let mut reader = serde_json::Deserializer::from_str(body);
        let rounds = (&mut reader).deserialize_map(RoundsVisitor)?;
        reader.end()?;
        if rounds.is_empty() {
            return Ok(None);
        }
        Bracket::new(rounds)
            .map(Some)
            .map_err(<serde_json::Error as de::Error>::custom)
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn round_keys(&self) -> impl Iterator<Item = &str> {
        self.rounds.iter().map(|r| r.key.as_str())
    }

    /// Index of a round in elimination order.
    pub fn position(&self, round_key: &str) -> Option<usize> {
        self.rounds.iter().position(|r| r.key == round_key)
    }

    pub fn round(&self, round_key: &str) -> Option<&Round> {
        self.rounds.iter().find(|r| r.key == round_key)
    }

    /// Key of the round after `round_key`; None for the last round or an unknown key.
    pub fn next_round_key(&self, round_key: &str) -> Option<&str> {
        let idx = self.position(round_key)?;
        self.rounds.get(idx + 1).map(|r| r.key.as_str())
    }

    pub fn match_at(&self, round_index: usize, position: usize) -> Option<&GameMatch> {
        self.rounds.get(round_index)?.matches.get(position)
    }

    pub(crate) fn match_at_mut(
        &mut self,
        round_index: usize,
        position: usize,
    ) -> Option<&mut GameMatch> {
        self.rounds.get_mut(round_index)?.matches.get_mut(position)
    }

    /// How many matches of the previous round feed the match at `position`.
    /// 0 for the first round, otherwise 1 or 2.
    pub fn feeder_count(&self, round_index: usize, position: usize) -> usize {
        if round_index == 0 {
            return 0;
        }
        let previous = self
            .rounds
            .get(round_index - 1)
            .map_or(0, |r| r.matches.len());
        [2 * position, 2 * position + 1]
            .iter()
            .filter(|&&p| p < previous)
            .count()
    }

    /// Whether a winner may be declared for the match at `position`.
    ///
    /// Besides two filled slots, a single occupant counts when nobody else can ever
    /// arrive: a bye in the first round, or a later match with one feeder.
    pub fn is_playable(&self, round_index: usize, position: usize) -> bool {
        let Some(m) = self.match_at(round_index, position) else {
            return false;
        };
        if m.is_decided() {
            return false;
        }
        match m.occupants() {
            2 => true,
            1 => round_index == 0 || self.feeder_count(round_index, position) == 1,
            _ => false,
        }
    }

    /// Winner of the final, once declared.
    pub fn champion(&self) -> Option<&Team> {
        let last = self.rounds.last()?;
        match last.matches.as_slice() {
            [final_match] => final_match.winner.as_ref(),
            _ => None,
        }
    }
}

fn validate_layout(rounds: &[Round]) -> Result<(), BracketError> {
    if rounds.is_empty() {
        return Err(BracketError::NoRounds);
    }
    let mut seen = HashSet::new();
    let mut previous_len: Option<usize> = None;
    for round in rounds {
        if !seen.insert(round.key.as_str()) {
            return Err(BracketError::DuplicateRound(round.key.clone()));
        }
        if round.matches.is_empty() {
            return Err(BracketError::EmptyRound(round.key.clone()));
        }
        for (position, m) in round.matches.iter().enumerate() {
            if m.id as usize != position {
                return Err(BracketError::MatchIdOutOfPlace {
                    round: round.key.clone(),
                    position,
                    id: m.id,
                });
            }
        }
        if let Some(prev) = previous_len {
            let expected = prev.div_ceil(2);
            if round.matches.len() != expected {
                return Err(BracketError::RoundSizeMismatch {
                    round: round.key.clone(),
                    expected,
                    found: round.matches.len(),
                });
            }
        }
        previous_len = Some(round.matches.len());
    }
    Ok(())
}

impl Serialize for Bracket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rounds.len()))?;
        for round in &self.rounds {
            map.serialize_entry(&round.key, &round.matches)?;
        }
        map.end()
    }
}

struct RoundsVisitor;

impl<'de> Visitor<'de> for RoundsVisitor {
    type Value = Vec<Round>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of round names to match lists")
    }

    // Entries arrive in document order, which is the round order.
    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut rounds = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, matches)) = map.next_entry::<String, Vec<GameMatch>>()? {
            rounds.push(Round { key, matches });
        }
        Ok(rounds)
    }
}

impl<'de> Deserialize<'de> for Bracket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rounds = deserializer.deserialize_map(RoundsVisitor)?;
        Bracket::new(rounds).map_err(de::Error::custom)
    }
}
