//! Decomposed bound
//!
//! Sums the work a whole conjunction demands without charging shared work
//! twice:
//!
//! - per column, a *dig depth*: the number of top objects that must be
//!   picked off it, the running maximum over all literals touching that
//!   column (never the sum);
//! - per literal object, a demand level: `2` for pick and drop, `1` for a
//!   final pickup or for putting down a held object;
//! - horizontal travel for `leftof` / `rightof` / `beside`, matched greedily
//!   over disjoint object pairs, deepest need first;
//! - arm travel to the nearest column that has to be dug.
//!
//! Obstructions that are not literal objects cost [`CLEAR_TWO_ARMS`] each:
//! pick, carry at least one column, drop. The walk back is not charged even
//! with a single arm, since the next work may lie elsewhere.

use super::layout::{distance, Layout, CLEAR_TWO_ARMS};
use super::Estimator;
use crate::goal::literal_satisfied;
use crate::logic::{Entity, Literal, ObjectId, Relation};
use crate::search::Cost;

/// Estimator A: per-column dig depths plus matched horizontal moves
#[derive(Debug, Clone, Copy, Default)]
pub struct DecomposedEstimator;

impl Estimator for DecomposedEstimator {
    fn name(&self) -> &'static str {
        "decomposed"
    }

    fn conjunction_cost(&self, layout: &Layout, conjunction: &[Literal]) -> Cost {
        let mut demand = Demand::new(layout);
        for lit in conjunction {
            if !literal_satisfied(lit, layout.state, &layout.positions) {
                demand.add(lit);
            }
        }
        demand.cost()
    }
}

/// Relative placement still needed between two objects
#[derive(Debug, Clone, Copy)]
struct Spread {
    a: ObjectId,
    b: ObjectId,
    /// Columns the pair must be pulled apart (or together) by
    need: Cost,
}

struct Demand<'l, 'a> {
    layout: &'l Layout<'a>,
    /// Objects to remove from the top of each column
    dig: Vec<usize>,
    /// Demand level per object
    level: Vec<Cost>,
    spreads: Vec<Spread>,
    negative_open: bool,
}

impl<'l, 'a> Demand<'l, 'a> {
    fn new(layout: &'l Layout<'a>) -> Self {
        Demand {
            layout,
            dig: vec![0; layout.columns()],
            level: vec![0; layout.state.catalog.len()],
            spreads: Vec::new(),
            negative_open: false,
        }
    }

    fn demand(&mut self, id: ObjectId, level: Cost) {
        let slot = &mut self.level[id.as_u16() as usize];
        *slot = (*slot).max(level);
    }

    /// Everything down to `depth` objects from the top of `column` has to go
    fn dig_to(&mut self, column: usize, depth: usize) {
        self.dig[column] = self.dig[column].max(depth);
    }

    /// `id` must be picked up: dig down to it and charge `level`
    fn pick(&mut self, id: ObjectId, level: Cost) {
        if let Some(column) = self.layout.column(id) {
            self.dig_to(column, self.layout.above(id) + 1);
        }
        self.demand(id, level);
    }

    /// `id` must end up somewhere else: stacked objects are picked and
    /// dropped, held ones put down
    fn relocate(&mut self, id: ObjectId) {
        let level = if self.layout.is_held(id) { 1 } else { 2 };
        self.pick(id, level);
    }

    /// Nothing may stay on top of `id`
    fn uncover(&mut self, id: ObjectId) {
        match self.layout.column(id) {
            Some(column) => self.dig_to(column, self.layout.above(id)),
            None => self.demand(id, 1),
        }
    }

    /// A held object has to be put down
    fn release(&mut self, id: ObjectId) {
        if self.layout.is_held(id) {
            self.demand(id, 1);
        }
    }

    fn add(&mut self, lit: &Literal) {
        if !lit.polarity {
            self.negative_open = true;
            return;
        }
        use Entity::{Floor, Object};
        match (lit.relation, lit.first(), lit.args.get(1).copied()) {
            (Relation::Holding, Object(x), _) => self.pick(x, 1),
            (Relation::OnTop | Relation::Inside, Object(a), Some(Object(b))) => {
                self.relocate(a);
                self.uncover(b);
            }
            (Relation::OnTop | Relation::Inside, Object(a), Some(Floor)) => self.relocate(a),
            (Relation::Above, Object(x), Some(Object(y))) => {
                self.relocate(x);
                self.release(y);
            }
            (Relation::Under, Object(y), Some(Object(x))) => {
                self.relocate(x);
                self.release(y);
            }
            (Relation::Above, Object(x), Some(Floor)) | (Relation::Under, Floor, Some(Object(x))) => {
                self.release(x)
            }
            (Relation::LeftOf, Object(a), Some(Object(b))) => self.spread(a, b, Relation::LeftOf),
            (Relation::RightOf, Object(a), Some(Object(b))) => self.spread(b, a, Relation::LeftOf),
            (Relation::Beside, Object(a), Some(Object(b))) => self.spread(a, b, Relation::Beside),
            _ => {}
        }
    }

    fn spread(&mut self, a: ObjectId, b: ObjectId, relation: Relation) {
        self.release(a);
        self.release(b);
        let (pa, pb) = (self.layout.spot(a), self.layout.spot(b));
        let need = match relation {
            Relation::LeftOf => (pa + 1).saturating_sub(pb) as Cost,
            _ => match distance(pa, pb) {
                0 => 1,
                d => d - 1,
            },
        };
        self.spreads.push(Spread { a, b, need });
    }

    fn cost(mut self) -> Cost {
        let layout = self.layout;
        let objects = self.level.len();
        let mut counted = vec![false; objects];
        let mut obstruction = vec![false; objects];
        let mut total: Cost = 0;
        let mut carried: Cost = 0;
        let mut approach: Cost = 0;

        for (column, &depth) in self.dig.iter().enumerate() {
            if depth == 0 {
                continue;
            }
            approach = approach.max(layout.min_travel(column));
            let stack = &layout.state.stacks[column];
            for id in &stack[stack.len() - depth..] {
                let slot = id.as_u16() as usize;
                counted[slot] = true;
                if self.level[slot] > 0 {
                    total += self.level[slot];
                } else {
                    obstruction[slot] = true;
                    total += CLEAR_TWO_ARMS;
                    carried += 1;
                }
            }
        }

        let digging = self.dig.iter().any(|&d| d > 0);
        for id in layout.held_objects() {
            let slot = id.as_u16() as usize;
            if self.level[slot] > 0 {
                counted[slot] = true;
                total += self.level[slot];
            } else if digging {
                // must be put down before anything is picked up
                total += 1;
            }
        }

        self.spreads.sort_by(|x, y| y.need.cmp(&x.need));
        let mut used = vec![false; objects];
        for spread in &self.spreads {
            let (a, b) = (spread.a.as_u16() as usize, spread.b.as_u16() as usize);
            if used[a] || used[b] {
                continue;
            }
            used[a] = true;
            used[b] = true;
            let already = obstruction[a] as Cost + obstruction[b] as Cost;
            let extra = spread.need.saturating_sub(already);
            total += extra;
            carried += extra;
            if !counted[a] && !counted[b] {
                // one of the two gets picked and dropped
                total += 2;
            }
        }

        total += approach.saturating_sub(carried);
        if self.negative_open {
            total = total.max(1);
        }
        total
    }
}
