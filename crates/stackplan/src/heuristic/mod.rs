//! Lower-bound estimates of the remaining plan cost
//!
//! Two independent estimators are combined by maximum:
//!
//! - [`DecomposedEstimator`] sums per-column dig depths, literal demands and
//!   matched horizontal moves over a whole conjunction;
//! - [`FocusedEstimator`] prices each literal on its own and keeps the
//!   hardest one.
//!
//! Both take the minimum over the conjunctions of the goal. With a zero
//! penalty both are admissible, and so is their maximum. A positive
//! `penalty_per_literal` is added once per unsatisfied literal; it breaks
//! admissibility and is only used by retry attempts.

pub mod decomposed;
pub mod focused;
pub mod layout;

pub use decomposed::DecomposedEstimator;
pub use focused::FocusedEstimator;
pub use layout::Layout;

use crate::goal::{self, unsatisfied_count};
use crate::logic::{Formula, Literal};
use crate::search::Cost;
use crate::world::WorldState;
use tracing::trace;

/// A lower bound on the cost of satisfying one conjunction
pub trait Estimator {
    /// Short label used in traces and diagnostics
    fn name(&self) -> &'static str;

    /// Cost of the conjunction in the snapshot behind `layout`; zero when
    /// every literal already holds
    fn conjunction_cost(&self, layout: &Layout, conjunction: &[Literal]) -> Cost;
}

/// Everything one search attempt needs to evaluate states.
///
/// Passed explicitly into each attempt so retries with different penalties
/// never share mutable configuration.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicContext<'f> {
    pub formula: &'f Formula,
    pub penalty_per_literal: Cost,
}

impl<'f> HeuristicContext<'f> {
    pub fn new(formula: &'f Formula, penalty_per_literal: Cost) -> Self {
        HeuristicContext {
            formula,
            penalty_per_literal,
        }
    }

    /// Goal predicate for the search
    pub fn is_goal(&self, state: &WorldState) -> bool {
        goal::formula_satisfied(self.formula, state)
    }

    /// `max(A, B)`
    pub fn estimate(&self, state: &WorldState) -> Cost {
        let layout = Layout::new(state);
        let a = self.formula_cost(&DecomposedEstimator, &layout);
        let b = self.formula_cost(&FocusedEstimator, &layout);
        a.max(b)
    }

    /// Estimator A alone
    pub fn decomposed(&self, state: &WorldState) -> Cost {
        self.cost_with(&DecomposedEstimator, state)
    }

    /// Estimator B alone
    pub fn focused(&self, state: &WorldState) -> Cost {
        self.cost_with(&FocusedEstimator, state)
    }

    /// Formula cost under a single estimator
    pub fn cost_with(&self, estimator: &dyn Estimator, state: &WorldState) -> Cost {
        self.formula_cost(estimator, &Layout::new(state))
    }

    /// Minimum over conjunctions, with the penalty for unsatisfied literals
    fn formula_cost(&self, estimator: &dyn Estimator, layout: &Layout) -> Cost {
        let cost = self
            .formula
            .conjunctions
            .iter()
            .map(|conj| {
                let open = unsatisfied_count(conj, layout.state, &layout.positions) as Cost;
                estimator
                    .conjunction_cost(layout, conj)
                    .saturating_add(self.penalty_per_literal.saturating_mul(open))
            })
            .min()
            .unwrap_or(0);
        trace!(estimator = estimator.name(), cost, "estimated");
        cost
    }
}
