//! Per-snapshot geometry shared by the estimators

use crate::goal::{Position, PositionMap};
use crate::logic::ObjectId;
use crate::search::Cost;
use crate::world::WorldState;

/// Lower bound for clearing one object off a column the acting arm has to
/// come back to: pick, carry at least one column, drop, and (with a single
/// arm) walk back.
pub const CLEAR_ONE_ARM: Cost = 4;
/// Pick, carry at least one column, drop: clearing one object when no walk
/// back is forced, e.g. when a second arm may already wait at the column
pub const CLEAR_TWO_ARMS: Cost = 3;

pub(crate) fn distance(a: usize, b: usize) -> Cost {
    a.abs_diff(b) as Cost
}

/// Positions, heights and arm placement of one snapshot
pub struct Layout<'a> {
    pub state: &'a WorldState,
    pub positions: PositionMap,
    /// Cost of clearing one obstruction from a single column
    pub clear_cost: Cost,
}

impl<'a> Layout<'a> {
    pub fn new(state: &'a WorldState) -> Self {
        let clear_cost = if state.arms() == 1 {
            CLEAR_ONE_ARM
        } else {
            CLEAR_TWO_ARMS
        };
        Layout {
            state,
            positions: PositionMap::from_state(state),
            clear_cost,
        }
    }

    pub fn columns(&self) -> usize {
        self.state.columns()
    }

    /// Column of a stacked object
    pub fn column(&self, id: ObjectId) -> Option<usize> {
        match self.positions.object(id) {
            Position::Stacked { column, .. } => Some(column),
            _ => None,
        }
    }

    pub fn row(&self, id: ObjectId) -> Option<usize> {
        match self.positions.object(id) {
            Position::Stacked { row, .. } => Some(row),
            _ => None,
        }
    }

    pub fn is_held(&self, id: ObjectId) -> bool {
        matches!(self.positions.object(id), Position::Held { .. })
    }

    /// Column an object currently occupies; for held objects, the column of
    /// the holding arm
    pub fn spot(&self, id: ObjectId) -> usize {
        match self.positions.object(id) {
            Position::Stacked { column, .. } => column,
            Position::Held { arm } => self.state.arm_pos[arm],
            Position::Floor => 0,
        }
    }

    /// Number of objects stacked on top of `id` (0 when held)
    pub fn above(&self, id: ObjectId) -> usize {
        match self.positions.object(id) {
            Position::Stacked { column, row } => self.state.height(column) - row - 1,
            _ => 0,
        }
    }

    /// Distance from the nearest arm to `column`
    pub fn min_travel(&self, column: usize) -> Cost {
        self.state
            .arm_pos
            .iter()
            .map(|&pos| distance(pos, column))
            .min()
            .unwrap_or(0)
    }

    pub fn held_objects(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.state.holding.iter().flatten().copied()
    }

    /// Held objects outside `except`; each must be dropped before any pickup
    pub fn held_except(&self, except: &[ObjectId]) -> Cost {
        self.held_objects().filter(|id| !except.contains(id)).count() as Cost
    }

    /// Pick up a stacked object: drop whatever is held (outside `except`),
    /// walk the nearest arm over, clear the obstructions and grasp it.
    /// Zero for an object that is already held.
    pub fn acquire(&self, id: ObjectId, except: &[ObjectId]) -> Cost {
        let Some(column) = self.column(id) else {
            return 0;
        };
        self.held_except(except)
            + self.min_travel(column)
            + 1
            + self.clear_cost * self.above(id) as Cost
    }
}
