//! Planning driver
//!
//! Validates the goal, short-circuits goals that already hold, runs A*
//! attempts with an escalating per-literal penalty, and hands the winning
//! path to the scheduler.

pub mod ground;

pub use ground::{ground_goal, ground_problem, ground_world, Problem};

use crate::config::PlannerConfig;
use crate::error::{PlanError, Result};
use crate::goal::{formula_satisfied, validate_formula};
use crate::heuristic::HeuristicContext;
use crate::json::{PlanJson, PlanStatus};
use crate::logic::Formula;
use crate::schedule::{render, schedule_path, PlanLine};
use crate::search::{search, Cost, SearchBudget, SearchError, SearchProfile};
use crate::world::{BlocksGraph, WorldState};
use tracing::{debug, info, warn};

/// A successful plan
#[derive(Debug, Clone)]
pub struct Plan {
    /// Retry messages, then the rendered ticks with progress messages
    pub lines: Vec<PlanLine>,
    /// Total edge cost of the winning path
    pub cost: Cost,
    /// Number of search attempts run, including the winning one
    pub attempts: usize,
    /// Winning search path, start state first
    pub path: Vec<WorldState>,
    pub profiles: Vec<SearchProfile>,
}

impl Plan {
    /// Tick codes only
    pub fn tokens(&self) -> Vec<&str> {
        self.lines.iter().filter_map(PlanLine::tick).collect()
    }

    /// Last state of the winning path
    pub fn final_state(&self) -> Option<&WorldState> {
        self.path.last()
    }
}

#[derive(Debug, Clone)]
pub enum PlanOutcome {
    /// The goal held in the initial snapshot; no search was run
    AlreadySatisfied,
    Planned(Plan),
}

impl PlanOutcome {
    pub fn is_already_satisfied(&self) -> bool {
        matches!(self, PlanOutcome::AlreadySatisfied)
    }

    pub fn plan(&self) -> Option<&Plan> {
        match self {
            PlanOutcome::Planned(plan) => Some(plan),
            PlanOutcome::AlreadySatisfied => None,
        }
    }

    pub fn to_json(&self) -> PlanJson {
        match self {
            PlanOutcome::AlreadySatisfied => PlanJson {
                status: PlanStatus::AlreadySatisfied,
                tokens: Vec::new(),
                lines: Vec::new(),
                cost: None,
                attempts: 0,
                profiles: Vec::new(),
            },
            PlanOutcome::Planned(plan) => PlanJson {
                status: PlanStatus::Planned,
                tokens: plan.tokens().into_iter().map(str::to_string).collect(),
                lines: plan.lines.clone(),
                cost: Some(plan.cost),
                attempts: plan.attempts,
                profiles: plan.profiles.clone(),
            },
        }
    }
}

/// Message added to the output for every timed-out attempt that is retried
fn retry_message(penalty: u32) -> String {
    format!(
        "Search is taking long; retrying with a looser estimate (penalty {})",
        penalty
    )
}

/// Blocks-world planner
pub struct Planner {
    pub config: PlannerConfig,
    graph: BlocksGraph,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Planner {
            config,
            graph: BlocksGraph::new(),
        }
    }

    fn budget(&self) -> SearchBudget {
        SearchBudget {
            timeout: Some(self.config.timeout),
            max_expansions: self.config.max_expansions,
            enable_profiling: self.config.enable_profiling,
        }
    }

    /// Plan from `state` until `goal` holds.
    ///
    /// # Errors
    /// [`PlanError::Timeout`] when every attempt runs out of budget,
    /// [`PlanError::NoPath`] when no reachable state satisfies the goal, and
    /// the validation errors of [`validate_formula`].
    pub fn plan(&self, goal: &Formula, state: &WorldState) -> Result<PlanOutcome> {
        validate_formula(goal, &state.catalog)?;
        if formula_satisfied(goal, state) {
            info!("goal already satisfied");
            return Ok(PlanOutcome::AlreadySatisfied);
        }

        let budget = self.budget();
        let attempts = self.config.max_attempts.max(1);
        let mut messages = Vec::new();
        let mut profiles = Vec::new();

        for attempt in 0..attempts {
            let penalty = self.config.penalty_for_attempt(attempt);
            let ctx = HeuristicContext::new(goal, penalty);
            info!(attempt = attempt + 1, penalty, "starting search attempt");

            let result = search(
                &self.graph,
                state.clone(),
                |s| ctx.is_goal(s),
                |s| ctx.estimate(s),
                &budget,
            );
            match result {
                Ok(found) => {
                    info!(
                        attempt = attempt + 1,
                        cost = found.cost,
                        steps = found.path.len(),
                        "plan found"
                    );
                    profiles.extend(found.profile);
                    let mut path = Vec::with_capacity(found.path.len() + 1);
                    path.push(state.clone());
                    path.extend(found.path);

                    let schedule = schedule_path(&path)?;
                    debug!(makespan = schedule.makespan(), "schedule built");
                    let mut lines: Vec<PlanLine> =
                        messages.into_iter().map(PlanLine::Message).collect();
                    lines.extend(render(&schedule, state));
                    return Ok(PlanOutcome::Planned(Plan {
                        lines,
                        cost: found.cost,
                        attempts: attempt + 1,
                        path,
                        profiles,
                    }));
                }
                Err(SearchError::Timeout { expanded }) => {
                    if attempt + 1 == attempts {
                        warn!(attempts, expanded, "every search attempt timed out");
                        return Err(PlanError::Timeout { attempts });
                    }
                    let next = self.config.penalty_for_attempt(attempt + 1);
                    warn!(attempt = attempt + 1, expanded, next_penalty = next, "search timed out");
                    messages.push(retry_message(next));
                }
                Err(SearchError::NoPath { expanded }) => {
                    info!(expanded, "no reachable state satisfies the goal");
                    return Err(PlanError::NoPath);
                }
            }
        }
        Err(PlanError::Timeout { attempts })
    }
}

/// Plan with the default configuration
pub fn plan(goal: &Formula, state: &WorldState) -> Result<PlanOutcome> {
    Planner::new(PlannerConfig::default()).plan(goal, state)
}
