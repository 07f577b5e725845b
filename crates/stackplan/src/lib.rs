//! Stackplan: an A* planner for a block-stacking world
//!
//! This library plans pick and drop sequences that satisfy goals in
//! disjunctive normal form over spatial relations, then schedules the
//! resulting moves across one or two robot arms.

pub mod config;
pub mod error;
pub mod goal;
pub mod heuristic;
pub mod json;
pub mod logic;
pub mod planner;
pub mod schedule;
pub mod search;
pub mod world;

pub use config::PlannerConfig;
pub use error::{PlanError, Result};

// Re-export logic types
pub use logic::{Catalog, Entity, Form, Formula, Literal, ObjectId, ObjectSpec, Relation, Size};

pub use world::{Action, BlocksGraph, Location, WorldState};

pub use goal::{formula_satisfied, is_feasible, Position, PositionMap};

pub use heuristic::{DecomposedEstimator, Estimator, FocusedEstimator, HeuristicContext};

pub use search::{search, Cost, Edge, Graph, SearchBudget, SearchError, SearchProfile, SearchResult};

pub use schedule::{replay, replay_ticks, same_arrangement, PlanLine, Schedule, Token};

pub use json::{LiteralJson, PlanJson, PlanStatus, ProblemJson, WorldJson};

pub use planner::{ground_goal, ground_problem, ground_world, plan, Plan, PlanOutcome, Planner, Problem};
