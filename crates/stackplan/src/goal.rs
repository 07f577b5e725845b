//! Goal evaluation
//!
//! A [`PositionMap`] records where every object is in one snapshot. Spatial
//! relations are decided on positions alone by [`is_feasible`]; `holding`
//! literals look at the arms. Held objects satisfy no spatial relation.

use crate::error::{PlanError, Result};
use crate::logic::{Catalog, Entity, Formula, Literal, ObjectId, ObjectSpec, Relation};
use crate::world::physics;
use crate::world::{Location, WorldState};

/// Position of an entity in one snapshot
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Position {
    /// In `column` at `row` (0 = bottom)
    Stacked { column: usize, row: usize },
    /// The floor; takes its column from the other side of a relation
    Floor,
    /// In the grip of `arm`
    Held { arm: usize },
}

/// Positions of every object of one snapshot, indexed by [`ObjectId`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionMap {
    positions: Vec<Position>,
}

impl PositionMap {
    pub fn from_state(state: &WorldState) -> Self {
        let mut positions = vec![Position::Floor; state.catalog.len()];
        for (column, stack) in state.stacks.iter().enumerate() {
            for (row, id) in stack.iter().enumerate() {
                positions[id.0 as usize] = Position::Stacked { column, row };
            }
        }
        for (arm, held) in state.holding.iter().enumerate() {
            if let Some(id) = held {
                positions[id.0 as usize] = Position::Held { arm };
            }
        }
        PositionMap { positions }
    }

    pub fn object(&self, id: ObjectId) -> Position {
        self.positions[id.0 as usize]
    }

    pub fn get(&self, entity: Entity) -> Position {
        match entity {
            Entity::Object(id) => self.object(id),
            Entity::Floor => Position::Floor,
        }
    }
}

impl From<Location> for Position {
    fn from(location: Location) -> Self {
        match location {
            Location::Stacked { column, row } => Position::Stacked { column, row },
            Location::Held { arm } => Position::Held { arm },
        }
    }
}

/// Resolve a position to `(column, row)`; the floor sits at row -1 of the
/// partner's column.
fn coordinates(pos: Position, partner: Position) -> Option<(i64, i64)> {
    match (pos, partner) {
        (Position::Stacked { column, row }, _) => Some((column as i64, row as i64)),
        (Position::Floor, Position::Stacked { column, .. }) => Some((column as i64, -1)),
        _ => None,
    }
}

/// Whether `relation` holds between two positions.
///
/// `holding` is not positional and always yields `false` here.
pub fn is_feasible(relation: Relation, p1: Position, p2: Position) -> bool {
    let (Some((c1, r1)), Some((c2, r2))) = (coordinates(p1, p2), coordinates(p2, p1)) else {
        return false;
    };
    match relation {
        Relation::LeftOf => c1 < c2,
        Relation::RightOf => c1 > c2,
        Relation::OnTop | Relation::Inside => c1 == c2 && r1 - r2 == 1,
        Relation::Under => c1 == c2 && r1 < r2,
        Relation::Above => c1 == c2 && r1 > r2,
        Relation::Beside => (c1 - c2).abs() == 1,
        Relation::Holding => false,
    }
}

/// Whether the relation of `literal` holds, ignoring polarity
fn relation_holds(literal: &Literal, state: &WorldState, positions: &PositionMap) -> bool {
    if literal.relation == Relation::Holding {
        return match literal.first() {
            Entity::Object(id) => state.holding.contains(&Some(id)),
            Entity::Floor => false,
        };
    }
    is_feasible(
        literal.relation,
        positions.get(literal.first()),
        positions.get(literal.second()),
    )
}

pub fn literal_satisfied(literal: &Literal, state: &WorldState, positions: &PositionMap) -> bool {
    relation_holds(literal, state, positions) == literal.polarity
}

/// Number of literals of `conjunction` that do not hold
pub fn unsatisfied_count(conjunction: &[Literal], state: &WorldState, positions: &PositionMap) -> usize {
    conjunction
        .iter()
        .filter(|lit| !literal_satisfied(lit, state, positions))
        .count()
}

pub fn conjunction_satisfied(conjunction: &[Literal], state: &WorldState, positions: &PositionMap) -> bool {
    conjunction
        .iter()
        .all(|lit| literal_satisfied(lit, state, positions))
}

/// A formula holds iff at least one of its conjunctions holds
pub fn formula_satisfied(formula: &Formula, state: &WorldState) -> bool {
    let positions = PositionMap::from_state(state);
    formula
        .conjunctions
        .iter()
        .any(|conj| conjunction_satisfied(conj, state, &positions))
}

/// Physical placement check used by the transition graph
pub fn can_place(held: &ObjectSpec, support: Option<&ObjectSpec>) -> bool {
    physics::can_support(held, support)
}

/// Check that a formula is well-formed against a catalog: non-empty, every
/// literal with the right arity, every object known, and `holding` never
/// applied to the floor.
pub fn validate_formula(formula: &Formula, catalog: &Catalog) -> Result<()> {
    if formula.conjunctions.is_empty() {
        return Err(PlanError::InvalidGoal("goal has no conjunctions".into()));
    }
    for literal in formula.conjunctions.iter().flatten() {
        if literal.args.len() != literal.relation.arity() {
            return Err(PlanError::InvalidGoal(format!(
                "{} takes {} argument(s), got {}",
                literal.relation.name(),
                literal.relation.arity(),
                literal.args.len()
            )));
        }
        if literal.relation == Relation::Holding && literal.first() == Entity::Floor {
            return Err(PlanError::InvalidGoal("cannot hold the floor".into()));
        }
        for arg in &literal.args {
            if let Entity::Object(id) = arg {
                if id.0 as usize >= catalog.len() {
                    return Err(PlanError::UngroundedReference {
                        name: format!("#{}", id.0),
                    });
                }
            }
        }
    }
    Ok(())
}
