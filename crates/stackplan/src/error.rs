//! Error types for the planner

use crate::search::SearchError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Search timed out after {attempts} attempt(s)")]
    Timeout { attempts: usize },

    #[error("No plan reaches the goal")]
    NoPath,

    #[error("Ungrounded reference: no object named '{name}'")]
    UngroundedReference { name: String },

    #[error("Invalid goal: {0}")]
    InvalidGoal(String),

    #[error("Invalid world: {0}")]
    InvalidWorld(String),

    #[error("Malformed path at step {step}: {reason}")]
    MalformedPath { step: usize, reason: String },

    #[error("Illegal action at tick {tick} for arm {arm}: {reason}")]
    IllegalAction {
        tick: usize,
        arm: usize,
        reason: String,
    },
}

impl PlanError {
    pub(crate) fn malformed(step: usize, reason: impl Into<String>) -> Self {
        PlanError::MalformedPath {
            step,
            reason: reason.into(),
        }
    }
}

impl From<SearchError> for PlanError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Timeout { .. } => PlanError::Timeout { attempts: 1 },
            SearchError::NoPath { .. } => PlanError::NoPath,
        }
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
