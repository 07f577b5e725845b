//! Generic best-first (A*) search
//!
//! The engine knows nothing about blocks: it explores any [`Graph`] whose
//! nodes are hashable values, guided by a caller-supplied heuristic and goal
//! predicate. Node identity is the graph's own `Eq`/`Hash`, never pointer
//! identity.
//!
//! Ties among entries with equal `f = g + h` are broken by insertion order,
//! earliest first. A node whose route was improved is re-inserted and counts
//! as inserted at the time of the improvement. Closed nodes are reopened
//! when a strictly cheaper route to them turns up.

mod frontier;
pub mod profile;

#[cfg(test)]
mod proptest_tests;

pub use profile::SearchProfile;

use frontier::{Frontier, Offer};
use std::hash::Hash;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// Edge and path costs
pub type Cost = u32;

/// A weighted transition between two nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<N> {
    pub from: N,
    pub to: N,
    pub cost: Cost,
}

/// The node/edge contract the search engine runs on
pub trait Graph {
    type Node: Clone + Eq + Hash;

    /// All transitions leaving `node`
    fn outgoing_edges(&self, node: &Self::Node) -> Vec<Edge<Self::Node>>;
}

/// Limits for a single search attempt, checked once per frontier pop
#[derive(Debug, Clone, Default)]
pub struct SearchBudget {
    pub timeout: Option<Duration>,
    /// Maximum number of pops (0 means no limit)
    pub max_expansions: usize,
    pub enable_profiling: bool,
}

impl SearchBudget {
    pub fn unlimited() -> Self {
        SearchBudget::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        SearchBudget {
            timeout: Some(timeout),
            ..Default::default()
        }
    }
}

/// A successful search: the states after the start, in order
#[derive(Debug, Clone)]
pub struct SearchResult<N> {
    pub path: Vec<N>,
    /// Cost of each edge along `path`
    pub edge_costs: Vec<Cost>,
    pub cost: Cost,
    pub profile: Option<SearchProfile>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("search budget exhausted after {expanded} expansions")]
    Timeout { expanded: usize },

    #[error("frontier exhausted after {expanded} expansions")]
    NoPath { expanded: usize },
}

/// Run A* from `start` until `is_goal` holds for a popped node.
///
/// # Errors
/// [`SearchError::Timeout`] when the budget runs out before a goal is popped,
/// [`SearchError::NoPath`] when the frontier empties.
pub fn search<G, F, H>(
    graph: &G,
    start: G::Node,
    mut is_goal: F,
    mut heuristic: H,
    budget: &SearchBudget,
) -> Result<SearchResult<G::Node>, SearchError>
where
    G: Graph,
    F: FnMut(&G::Node) -> bool,
    H: FnMut(&G::Node) -> Cost,
{
    let started = Instant::now();
    let mut profile = SearchProfile::default();
    let h0 = heuristic(&start);
    let mut frontier = Frontier::new(start, h0);
    let mut pops = 0usize;

    while let Some(entry) = frontier.pop() {
        pops += 1;
        let over_pops = budget.max_expansions > 0 && pops > budget.max_expansions;
        let over_time = budget.timeout.is_some_and(|t| started.elapsed() > t);
        if over_pops || over_time {
            debug!(
                expanded = profile.expanded,
                frontier = frontier.open_len(),
                "search budget exhausted"
            );
            return Err(SearchError::Timeout {
                expanded: profile.expanded,
            });
        }

        if !frontier.is_current(&entry) {
            profile.stale_skips += 1;
            continue;
        }

        let node = frontier.node(entry.id).clone();
        if is_goal(&node) {
            let (path, edge_costs) = frontier.reconstruct(entry.id);
            let cost = frontier.record(entry.id).g;
            profile.elapsed = started.elapsed();
            debug!(
                cost,
                length = path.len(),
                expanded = profile.expanded,
                generated = profile.generated,
                "goal reached"
            );
            return Ok(SearchResult {
                path,
                edge_costs,
                cost,
                profile: budget.enable_profiling.then_some(profile),
            });
        }

        frontier.close(entry.id);
        profile.expanded += 1;

        for edge in graph.outgoing_edges(&node) {
            profile.generated += 1;
            let g = entry.g.saturating_add(edge.cost);
            match frontier.offer(edge.to, entry.id, edge.cost, g, &mut heuristic) {
                Offer::Inserted => profile.inserted += 1,
                Offer::Improved => profile.improved += 1,
                Offer::Reopened => profile.reopened += 1,
                Offer::Rejected => {}
            }
        }
        profile.max_frontier = profile.max_frontier.max(frontier.open_len());
    }

    debug!(expanded = profile.expanded, "frontier exhausted");
    Err(SearchError::NoPath {
        expanded: profile.expanded,
    })
}
