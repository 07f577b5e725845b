//! Objects, relations and goal formulas
//!
//! This module provides the fundamental symbolic types shared by the world
//! model, the goal evaluator and the heuristics.

pub mod catalog;
pub mod literal;

// Re-export commonly used types
pub use catalog::{Catalog, Form, ObjectId, ObjectSpec, Size};
pub use literal::{Conjunction, Entity, Formula, Literal, LiteralDisplay, Relation};
