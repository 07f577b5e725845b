//! World snapshots
//!
//! A [`WorldState`] is an owned, independent snapshot: columns of stacked
//! objects (bottom to top), what each arm holds, and where each arm is. The
//! object catalog is shared between snapshots and excluded from equality.

use crate::error::{PlanError, Result};
use crate::logic::{Catalog, ObjectId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// At most this many arms are supported
pub const MAX_ARMS: usize = 2;

/// Where an object currently is
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// In `column` at `row` (0 = bottom)
    Stacked { column: usize, row: usize },
    /// Held by `arm`
    Held { arm: usize },
}

#[derive(Clone)]
pub struct WorldState {
    /// Columns of objects, bottom to top
    pub stacks: Vec<Vec<ObjectId>>,
    /// Object held by each arm
    pub holding: Vec<Option<ObjectId>>,
    /// Column index of each arm
    pub arm_pos: Vec<usize>,
    /// Shared immutable catalog
    pub catalog: Arc<Catalog>,
}

impl WorldState {
    /// Build a snapshot and check its invariants.
    pub fn new(
        stacks: Vec<Vec<ObjectId>>,
        holding: Vec<Option<ObjectId>>,
        arm_pos: Vec<usize>,
        catalog: Arc<Catalog>,
    ) -> Result<Self> {
        let state = WorldState {
            stacks,
            holding,
            arm_pos,
            catalog,
        };
        state.validate()?;
        Ok(state)
    }

    /// Check that arms are well-formed and every catalog object occurs
    /// exactly once, either in a column or in one arm.
    pub fn validate(&self) -> Result<()> {
        if self.stacks.is_empty() {
            return Err(PlanError::InvalidWorld("world has no columns".into()));
        }
        let arms = self.arm_pos.len();
        if arms == 0 || arms > MAX_ARMS {
            return Err(PlanError::InvalidWorld(format!(
                "expected 1 or {} arms, found {}",
                MAX_ARMS, arms
            )));
        }
        if self.holding.len() != arms {
            return Err(PlanError::InvalidWorld(format!(
                "{} arm positions but {} holding slots",
                arms,
                self.holding.len()
            )));
        }
        if let Some(&pos) = self.arm_pos.iter().find(|&&p| p >= self.stacks.len()) {
            return Err(PlanError::InvalidWorld(format!(
                "arm at column {} outside {} columns",
                pos,
                self.stacks.len()
            )));
        }

        let mut seen = vec![0usize; self.catalog.len()];
        let placed = self.stacks.iter().flatten();
        let held = self.holding.iter().flatten();
        for &id in placed.chain(held) {
            let slot = seen.get_mut(id.0 as usize).ok_or_else(|| {
                PlanError::InvalidWorld(format!("object id {} not in catalog", id.0))
            })?;
            *slot += 1;
        }
        for id in self.catalog.ids() {
            match seen[id.0 as usize] {
                1 => {}
                0 => {
                    return Err(PlanError::InvalidWorld(format!(
                        "object '{}' is neither stacked nor held",
                        self.catalog.name(id)
                    )))
                }
                n => {
                    return Err(PlanError::InvalidWorld(format!(
                        "object '{}' occurs {} times",
                        self.catalog.name(id),
                        n
                    )))
                }
            }
        }
        Ok(())
    }

    pub fn columns(&self) -> usize {
        self.stacks.len()
    }

    pub fn arms(&self) -> usize {
        self.arm_pos.len()
    }

    /// Top object of a column
    pub fn top(&self, column: usize) -> Option<ObjectId> {
        self.stacks[column].last().copied()
    }

    pub fn height(&self, column: usize) -> usize {
        self.stacks[column].len()
    }

    /// Find an object in the columns or the arms
    pub fn locate(&self, id: ObjectId) -> Option<Location> {
        if let Some(arm) = self.holding.iter().position(|h| *h == Some(id)) {
            return Some(Location::Held { arm });
        }
        self.stacks.iter().enumerate().find_map(|(column, stack)| {
            stack
                .iter()
                .position(|&o| o == id)
                .map(|row| Location::Stacked { column, row })
        })
    }

    /// Whether any arm currently holds an object
    pub fn any_holding(&self) -> bool {
        self.holding.iter().any(Option::is_some)
    }

    /// Remove the top of `column` into `arm`, moving the arm there.
    ///
    /// Mutates in place; callers clone the parent first.
    pub(crate) fn apply_pickup(&mut self, arm: usize, column: usize) -> Option<ObjectId> {
        let id = self.stacks[column].pop()?;
        self.holding[arm] = Some(id);
        self.arm_pos[arm] = column;
        Some(id)
    }

    /// Drop the object held by `arm` onto `column`, moving the arm there.
    pub(crate) fn apply_drop(&mut self, arm: usize, column: usize) -> Option<ObjectId> {
        let id = self.holding[arm].take()?;
        self.stacks[column].push(id);
        self.arm_pos[arm] = column;
        Some(id)
    }
}

impl PartialEq for WorldState {
    fn eq(&self, other: &Self) -> bool {
        self.stacks == other.stacks
            && self.holding == other.holding
            && self.arm_pos == other.arm_pos
    }
}

impl Eq for WorldState {}

impl Hash for WorldState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.stacks.hash(state);
        self.holding.hash(state);
        self.arm_pos.hash(state);
    }
}

impl fmt::Debug for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stack) in self.stacks.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "[")?;
            for (j, id) in stack.iter().enumerate() {
                if j > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", self.catalog.name(*id))?;
            }
            write!(f, "]")?;
        }
        for (arm, (pos, held)) in self.arm_pos.iter().zip(&self.holding).enumerate() {
            write!(f, " arm{}@{}", arm, pos)?;
            if let Some(id) = held {
                write!(f, "<{}>", self.catalog.name(*id))?;
            }
        }
        Ok(())
    }
}
