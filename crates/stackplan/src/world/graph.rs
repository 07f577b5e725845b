//! Transition graph over world snapshots
//!
//! Each edge is a macro action: one arm travels to a column and either picks
//! up the top object or drops what it holds. Travel is folded into the edge
//! cost (`1 + distance`) instead of being modelled as separate edges, which
//! keeps the branching factor at most `arms × columns`.
//!
//! While any arm holds an object only the holding arms may act, so every
//! pickup on a path is immediately followed by its drop (except a final
//! pickup that ends the path).

use super::state::WorldState;
use crate::goal;
use crate::logic::ObjectId;
use crate::search::{Cost, Edge, Graph};

/// A single manipulation, as observed between two adjacent snapshots
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Pick {
        arm: usize,
        column: usize,
        object: ObjectId,
    },
    Drop {
        arm: usize,
        column: usize,
        object: ObjectId,
    },
}

impl Action {
    pub fn arm(&self) -> usize {
        match *self {
            Action::Pick { arm, .. } | Action::Drop { arm, .. } => arm,
        }
    }

    pub fn column(&self) -> usize {
        match *self {
            Action::Pick { column, .. } | Action::Drop { column, .. } => column,
        }
    }

    pub fn object(&self) -> ObjectId {
        match *self {
            Action::Pick { object, .. } | Action::Drop { object, .. } => object,
        }
    }
}

/// Cost of an arm at `from` travelling to `to` and manipulating once
pub fn action_cost(from: usize, to: usize) -> Cost {
    1 + from.abs_diff(to) as Cost
}

/// The blocks-world transition graph
#[derive(Debug, Clone, Copy, Default)]
pub struct BlocksGraph;

impl BlocksGraph {
    pub fn new() -> Self {
        BlocksGraph
    }

    /// Pickups available to an empty arm: the top of any non-empty column
    fn pickups(&self, state: &WorldState, arm: usize, out: &mut Vec<Edge<WorldState>>) {
        let pos = state.arm_pos[arm];
        for column in 0..state.columns() {
            if state.stacks[column].is_empty() {
                continue;
            }
            let mut next = state.clone();
            next.apply_pickup(arm, column);
            out.push(Edge {
                from: state.clone(),
                to: next,
                cost: action_cost(pos, column),
            });
        }
    }

    /// Drops available to a holding arm: any column whose top can support
    /// the held object
    fn drops(&self, state: &WorldState, arm: usize, held: ObjectId, out: &mut Vec<Edge<WorldState>>) {
        let catalog = &state.catalog;
        let pos = state.arm_pos[arm];
        for column in 0..state.columns() {
            let support = state.top(column).map(|id| catalog.spec(id));
            if !goal::can_place(catalog.spec(held), support) {
                continue;
            }
            let mut next = state.clone();
            next.apply_drop(arm, column);
            out.push(Edge {
                from: state.clone(),
                to: next,
                cost: action_cost(pos, column),
            });
        }
    }
}

impl Graph for BlocksGraph {
    type Node = WorldState;

    fn outgoing_edges(&self, state: &WorldState) -> Vec<Edge<WorldState>> {
        let mut edges = Vec::new();
        if state.any_holding() {
            for (arm, held) in state.holding.iter().enumerate() {
                if let Some(held) = *held {
                    self.drops(state, arm, held, &mut edges);
                }
            }
        } else {
            for arm in 0..state.arms() {
                self.pickups(state, arm, &mut edges);
            }
        }
        edges
    }
}

/// Identify the single action leading from `prev` to `next`.
///
/// Returns `None` when the snapshots are not related by exactly one pickup
/// or drop of one arm.
pub fn action_between(prev: &WorldState, next: &WorldState) -> Option<Action> {
    if prev.arms() != next.arms() || prev.columns() != next.columns() {
        return None;
    }
    let mut changed = (0..prev.arms()).filter(|&arm| prev.holding[arm] != next.holding[arm]);
    let arm = changed.next()?;
    if changed.next().is_some() {
        return None;
    }
    let others_still = (0..prev.arms())
        .filter(|&other| other != arm)
        .all(|other| prev.arm_pos[other] == next.arm_pos[other]);
    if !others_still {
        return None;
    }

    let column = next.arm_pos[arm];
    let mut expected = prev.clone();
    let action = match (prev.holding[arm], next.holding[arm]) {
        (None, Some(object)) => {
            if expected.apply_pickup(arm, column) != Some(object) {
                return None;
            }
            Action::Pick { arm, column, object }
        }
        (Some(object), None) => {
            expected.apply_drop(arm, column);
            Action::Drop { arm, column, object }
        }
        _ => return None,
    };
    (expected == *next).then_some(action)
}
