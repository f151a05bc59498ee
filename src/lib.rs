//! Tournament bracket board: library with models, advancement logic, the remote
//! tournament API client and the board state container.

pub mod board;
pub mod config;
pub mod logic;
pub mod models;
pub mod service;

pub use board::{Board, BoardError, BoardView, PlayableMatch, MIN_TEAMS};
pub use config::{Config, ConfigError};
pub use logic::{advance_byes, declare_winner, next_slot_index, AdvanceError};
pub use models::{Bracket, BracketError, GameMatch, MatchId, MatchStatus, Round, Team, TeamId};
pub use service::{RemoteService, ServiceError, TournamentService};
