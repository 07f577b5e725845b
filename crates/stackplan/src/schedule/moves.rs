//! Move extraction
//!
//! Walks a search path (start state first) and groups its single-arm
//! actions into moves: a pickup immediately followed by the drop of the same
//! object is one move; a drop of an object held from the start is a
//! drop-only move; a final pickup that never gets dropped is a pick-only
//! move. Anything else breaks the adjacency invariant of the transition
//! graph and is reported as [`PlanError::MalformedPath`].

use crate::error::{PlanError, Result};
use crate::logic::ObjectId;
use crate::world::{action_between, Action, WorldState};

/// One manipulation unit handed to the arm assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub object: ObjectId,
    /// Column the object is picked from
    pub pick: Option<usize>,
    /// Column the object is dropped onto
    pub drop: Option<usize>,
    /// Object the drop lands on, if any
    pub support: Option<ObjectId>,
    /// Arm that must perform the move (objects held from the start)
    pub pinned: Option<usize>,
    /// Index in the path of the first state this move leaves
    pub step: usize,
}

impl Move {
    /// Number of path states this move spans (2 or 3)
    pub fn span(&self) -> usize {
        if self.pick.is_some() && self.drop.is_some() {
            3
        } else {
            2
        }
    }
}

/// Split a path into moves, in path order.
pub fn extract_moves(path: &[WorldState]) -> Result<Vec<Move>> {
    let mut actions = Vec::with_capacity(path.len().saturating_sub(1));
    for (step, pair) in path.windows(2).enumerate() {
        let action = action_between(&pair[0], &pair[1])
            .ok_or_else(|| PlanError::malformed(step + 1, "states differ by more than one action"))?;
        actions.push(action);
    }

    let mut moves = Vec::new();
    let mut leading = true;
    let mut i = 0;
    while i < actions.len() {
        match actions[i] {
            Action::Drop { arm, column, object } => {
                if !leading {
                    return Err(PlanError::malformed(i + 1, "drop without a preceding pickup"));
                }
                moves.push(Move {
                    object,
                    pick: None,
                    drop: Some(column),
                    support: path[i].top(column),
                    pinned: Some(arm),
                    step: i,
                });
                i += 1;
            }
            Action::Pick { arm, column, object } => {
                leading = false;
                match actions.get(i + 1) {
                    None => {
                        moves.push(Move {
                            object,
                            pick: Some(column),
                            drop: None,
                            support: None,
                            pinned: None,
                            step: i,
                        });
                        i += 1;
                    }
                    Some(&Action::Drop {
                        arm: drop_arm,
                        column: target,
                        object: dropped,
                    }) if drop_arm == arm && dropped == object => {
                        moves.push(Move {
                            object,
                            pick: Some(column),
                            drop: Some(target),
                            support: path[i + 1].top(target),
                            pinned: None,
                            step: i,
                        });
                        i += 2;
                    }
                    Some(_) => {
                        return Err(PlanError::malformed(
                            i + 2,
                            "pickup is not followed by the drop of the same object",
                        ))
                    }
                }
            }
        }
    }
    Ok(moves)
}
