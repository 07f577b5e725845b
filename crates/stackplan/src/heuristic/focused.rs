//! Single-literal focus bound
//!
//! Each unsatisfied literal gets a closed-form cost of achieving it alone; a
//! conjunction costs as much as its hardest literal. Costs count primitive
//! actions: every pick and drop is one action plus the columns travelled.

use super::layout::{distance, Layout, CLEAR_TWO_ARMS};
use super::Estimator;
use crate::goal::literal_satisfied;
use crate::logic::{Entity, Literal, ObjectId, Relation};
use crate::search::Cost;

/// Estimator B: the hardest literal of a conjunction
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusedEstimator;

impl Estimator for FocusedEstimator {
    fn name(&self) -> &'static str {
        "focused"
    }

    fn conjunction_cost(&self, layout: &Layout, conjunction: &[Literal]) -> Cost {
        conjunction
            .iter()
            .filter(|lit| !literal_satisfied(lit, layout.state, &layout.positions))
            .map(|lit| literal_cost(layout, lit))
            .max()
            .unwrap_or(0)
    }
}

/// Arrangement constraints on the column an object ends up in
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Side {
    /// The moving object must end left of the anchor
    Left,
    Right,
    Beside,
}

impl Side {
    fn accepts(self, target: usize, anchor: usize) -> bool {
        match self {
            Side::Left => target < anchor,
            Side::Right => target > anchor,
            Side::Beside => target.abs_diff(anchor) == 1,
        }
    }

    fn mirrored(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Beside => Side::Beside,
        }
    }
}

/// Cost of one unsatisfied literal
fn literal_cost(layout: &Layout, lit: &Literal) -> Cost {
    if !lit.polarity {
        return 1;
    }
    use Entity::{Floor, Object};
    match lit.relation {
        Relation::Holding => match lit.first() {
            Object(x) => layout.acquire(x, &[]),
            Floor => 0,
        },
        Relation::OnTop | Relation::Inside => match (lit.first(), lit.second()) {
            (Object(a), Object(b)) => place_on(layout, a, b),
            (Object(a), Floor) => place_on_floor(layout, a),
            _ => 0,
        },
        Relation::Above => match (lit.first(), lit.second()) {
            (Object(x), Object(y)) => raise_above(layout, x, y),
            (Object(x), Floor) => layout.is_held(x) as Cost,
            _ => 0,
        },
        Relation::Under => match (lit.first(), lit.second()) {
            (Object(a), Object(b)) => raise_above(layout, b, a),
            (Floor, Object(b)) => layout.is_held(b) as Cost,
            _ => 0,
        },
        Relation::LeftOf | Relation::RightOf | Relation::Beside => {
            let side = match lit.relation {
                Relation::LeftOf => Side::Left,
                Relation::RightOf => Side::Right,
                _ => Side::Beside,
            };
            match (lit.first(), lit.second()) {
                (Object(a), Object(b)) => arrange(layout, a, b, side),
                _ => 0,
            }
        }
    }
}

/// `ontop(a, b)` / `inside(a, b)`
fn place_on(layout: &Layout, a: ObjectId, b: ObjectId) -> Cost {
    match (layout.column(a), layout.column(b)) {
        (None, None) => 2,
        (None, Some(cb)) => {
            let covering = layout.above(b) as Cost;
            if covering == 0 {
                1 + distance(layout.spot(a), cb).min(2)
            } else {
                // put a down, clear b, pick a up again, drop it
                3 + 2 * covering + layout.held_except(&[a])
            }
        }
        (Some(_), None) => layout.acquire(a, &[b]) + 2,
        (Some(ca), Some(cb)) if ca == cb => {
            let (ra, rb) = (layout.row(a), layout.row(b));
            if ra > rb {
                // a sits higher with something in between: a leaves and
                // comes back once the gap is cleared
                let others = layout.above(b).saturating_sub(1) as Cost;
                layout.held_except(&[]) + layout.min_travel(ca) + 4 + layout.clear_cost * others
            } else {
                // b is one of the obstructions on a
                layout.acquire(a, &[]) + 1
            }
        }
        (Some(ca), Some(cb)) => {
            layout.acquire(a, &[]) + 1 + 2 * layout.above(b) as Cost + distance(ca, cb).min(2)
        }
    }
}

/// `ontop(a, floor)`: a must end at the bottom of some column
fn place_on_floor(layout: &Layout, a: ObjectId) -> Cost {
    let columns = 0..layout.columns();
    match layout.column(a) {
        None => {
            let lowest = columns.map(|c| layout.state.height(c)).min().unwrap_or(0) as Cost;
            if lowest == 0 {
                1
            } else {
                3 + 2 * lowest + layout.held_except(&[a])
            }
        }
        Some(ca) => {
            let row = layout.row(a).unwrap_or(0);
            if row == 0 {
                return 0;
            }
            let to_clear = columns
                .map(|c| if c == ca { row } else { layout.state.height(c) })
                .min()
                .unwrap_or(0) as Cost;
            layout.acquire(a, &[]) + 1 + 2 * to_clear
        }
    }
}

/// `above(x, y)`: x has to be picked and dropped somewhere over y
fn raise_above(layout: &Layout, x: ObjectId, y: ObjectId) -> Cost {
    match (layout.column(x), layout.column(y)) {
        (None, None) => 2,
        (None, Some(cy)) => 1 + distance(layout.spot(x), cy).min(2),
        (Some(_), None) => layout.acquire(x, &[y]) + 2,
        (Some(cx), Some(cy)) if cx == cy => layout.acquire(x, &[]) + 1,
        (Some(cx), Some(cy)) => layout.acquire(x, &[]) + 1 + distance(cx, cy).min(2),
    }
}

/// Pick up and put down one object, travel aside
fn relocate(layout: &Layout, x: ObjectId) -> Cost {
    if layout.is_held(x) {
        1
    } else {
        layout.acquire(x, &[]) + 1
    }
}

/// Columns `from` must travel to reach a column accepted by `side`
fn displacement(layout: &Layout, from: usize, anchor: usize, side: Side) -> Option<Cost> {
    (0..layout.columns())
        .filter(|&t| side.accepts(t, anchor))
        .map(|t| distance(from, t))
        .min()
}

/// Whether `upper` is stacked somewhere above `lower` in the same column
fn stacked_over(layout: &Layout, upper: ObjectId, lower: ObjectId) -> bool {
    layout.column(upper).is_some()
        && layout.column(upper) == layout.column(lower)
        && layout.row(upper) > layout.row(lower)
}

/// `leftof` / `rightof` / `beside`: move a, move b, or move both
fn arrange(layout: &Layout, a: ObjectId, b: ObjectId, side: Side) -> Cost {
    let mut best = move_both(layout, a, b);

    // a moves, b stays put
    if let Some(cb) = layout.column(b) {
        if !stacked_over(layout, b, a) {
            if let Some(d) = displacement(layout, layout.spot(a), cb, side) {
                best = best.min(relocate(layout, a) + d);
            }
        }
    }
    // b moves, a stays put
    if let Some(ca) = layout.column(a) {
        if !stacked_over(layout, a, b) {
            if let Some(d) = displacement(layout, layout.spot(b), ca, side.mirrored()) {
                best = best.min(relocate(layout, b) + d);
            }
        }
    }
    best
}

fn move_both(layout: &Layout, a: ObjectId, b: ObjectId) -> Cost {
    let held = layout.held_except(&[]);
    match (layout.column(a), layout.column(b)) {
        (None, None) => 2,
        (Some(c), None) => held + layout.min_travel(c) + layout.clear_cost * layout.above(a) as Cost + 2,
        (None, Some(c)) => held + layout.min_travel(c) + layout.clear_cost * layout.above(b) as Cost + 2,
        (Some(ca), Some(cb)) if ca == cb => {
            let lower = if layout.row(a) < layout.row(b) { a } else { b };
            held + layout.min_travel(ca) + layout.clear_cost * layout.above(lower) as Cost + 2
        }
        (Some(ca), Some(cb)) => {
            // two columns: the arm may clear one while passing the other
            let covering = (layout.above(a) + layout.above(b)) as Cost;
            held + layout.min_travel(ca).min(layout.min_travel(cb)) + CLEAR_TWO_ARMS * covering + 4
        }
    }
}
