//! Dual-arm move scheduling
//!
//! Turns a winning search path into per-arm token streams:
//!
//! 1. [`extract_moves`] groups the path's actions into moves,
//! 2. [`assign`] spreads them over the arms with coincidence waits,
//! 3. [`render`] expands them into tick codes and progress messages.
//!
//! [`replay`] re-executes rendered ticks against a snapshot.

pub mod assign;
pub mod moves;
pub mod render;
pub mod replay;

pub use assign::{assign, Schedule, ScheduledMove};
pub use moves::{extract_moves, Move};
pub use render::{render, token_streams, PlanLine, Token};
pub use replay::{replay, replay_ticks, same_arrangement};

use crate::error::Result;
use crate::world::WorldState;

/// Extract and assign the moves of `path` (start state first)
pub fn schedule_path(path: &[WorldState]) -> Result<Schedule> {
    let moves = extract_moves(path)?;
    Ok(match path.first() {
        Some(start) => assign(&moves, start),
        None => Schedule { arms: Vec::new() },
    })
}
