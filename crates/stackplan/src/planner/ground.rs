//! Input grounding
//!
//! Compiles named JSON input into interned snapshots and formulas. Every
//! object name must be declared in the world's object table; the literal
//! argument `floor` denotes the floor.

use crate::config::PlannerConfig;
use crate::error::{PlanError, Result};
use crate::goal::validate_formula;
use crate::json::{LiteralJson, ProblemJson, WorldJson};
use crate::logic::{Catalog, Entity, Formula, Literal, ObjectId, Relation};
use crate::world::WorldState;
use std::sync::Arc;

/// A grounded planning problem
#[derive(Debug, Clone)]
pub struct Problem {
    pub state: WorldState,
    pub goal: Formula,
    pub config: PlannerConfig,
}

fn lookup(catalog: &Catalog, name: &str) -> Result<ObjectId> {
    catalog.get(name).ok_or_else(|| PlanError::UngroundedReference {
        name: name.to_string(),
    })
}

/// Build a snapshot from its JSON description
pub fn ground_world(world: &WorldJson) -> Result<WorldState> {
    let mut catalog = Catalog::new();
    for (name, spec) in &world.objects {
        catalog.insert(name, spec.clone())?;
    }

    let stacks = world
        .stacks
        .iter()
        .map(|stack| stack.iter().map(|name| lookup(&catalog, name)).collect())
        .collect::<Result<Vec<Vec<ObjectId>>>>()?;

    let arm_pos = if world.arms.is_empty() {
        vec![0]
    } else {
        world.arms.clone()
    };
    let mut holding = world
        .holding
        .iter()
        .map(|held| held.as_deref().map(|name| lookup(&catalog, name)).transpose())
        .collect::<Result<Vec<Option<ObjectId>>>>()?;
    if holding.is_empty() {
        holding = vec![None; arm_pos.len()];
    }

    WorldState::new(stacks, holding, arm_pos, Arc::new(catalog))
}

/// Resolve one literal against the catalog
pub fn ground_literal(literal: &LiteralJson, catalog: &Catalog) -> Result<Literal> {
    let relation = Relation::parse(&literal.relation)
        .ok_or_else(|| PlanError::InvalidGoal(format!("unknown relation '{}'", literal.relation)))?;
    if literal.args.len() != relation.arity() {
        return Err(PlanError::InvalidGoal(format!(
            "{} takes {} argument(s), got {}",
            relation.name(),
            relation.arity(),
            literal.args.len()
        )));
    }
    let args = literal
        .args
        .iter()
        .map(|name| match name.as_str() {
            "floor" => Ok(Entity::Floor),
            _ => lookup(catalog, name).map(Entity::Object),
        })
        .collect::<Result<Vec<Entity>>>()?;
    Ok(Literal {
        polarity: literal.polarity,
        relation,
        args,
    })
}

/// Resolve a goal in DNF against the catalog
pub fn ground_goal(goal: &[Vec<LiteralJson>], catalog: &Catalog) -> Result<Formula> {
    let conjunctions = goal
        .iter()
        .map(|conj| conj.iter().map(|lit| ground_literal(lit, catalog)).collect())
        .collect::<Result<Vec<Vec<Literal>>>>()?;
    let formula = Formula::new(conjunctions);
    validate_formula(&formula, catalog)?;
    Ok(formula)
}

/// Ground a whole problem file; `config` defaults when absent
pub fn ground_problem(problem: &ProblemJson) -> Result<Problem> {
    let state = ground_world(&problem.world)?;
    let goal = ground_goal(&problem.goal, &state.catalog)?;
    Ok(Problem {
        state,
        goal,
        config: problem.config.clone().unwrap_or_default(),
    })
}
