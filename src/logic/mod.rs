//! Bracket logic: winner declaration and bye resolution.

mod advance;
mod byes;

pub use advance::{declare_winner, next_slot_index, AdvanceError};
pub use byes::advance_byes;
