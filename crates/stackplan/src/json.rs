//! JSON serialization types for problems and plans

use crate::config::PlannerConfig;
use crate::logic::ObjectSpec;
use crate::schedule::PlanLine;
use crate::search::{Cost, SearchProfile};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// JSON representation of a world snapshot, with objects named
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldJson {
    /// Columns of object names, bottom to top
    pub stacks: Vec<Vec<String>>,
    /// Object held by each arm; defaults to empty grippers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub holding: Vec<Option<String>>,
    /// Column of each arm; defaults to a single arm at column 0
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arms: Vec<usize>,
    /// Object attributes by name, in catalog order
    pub objects: IndexMap<String, ObjectSpec>,
}

fn positive() -> bool {
    true
}

/// JSON representation of a literal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralJson {
    #[serde(default = "positive")]
    pub polarity: bool,
    pub relation: String,
    /// Object names, or "floor"
    pub args: Vec<String>,
}

/// A planning problem: world, goal in DNF, optional configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemJson {
    pub world: WorldJson,
    /// Disjunction of conjunctions
    pub goal: Vec<Vec<LiteralJson>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<PlannerConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Planned,
    AlreadySatisfied,
}

/// JSON representation of a planning outcome
#[derive(Debug, Clone, Serialize)]
pub struct PlanJson {
    pub status: PlanStatus,
    /// Tick codes only
    pub tokens: Vec<String>,
    /// Tick codes interleaved with progress messages
    pub lines: Vec<PlanLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Cost>,
    pub attempts: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<SearchProfile>,
}
