//! Greedy two-arm assignment
//!
//! Moves are taken in path order and handed to the arm that becomes free
//! first (ties go to arm 0); the last move always goes to arm 0 when arm 0
//! may take it. Time is counted in ticks: every travel step, manipulation or
//! no-op occupies one tick of its arm.
//!
//! A move never starts before the other arm's latest move started. Combined
//! with the four coincidence checks against that latest move, every column
//! sees its manipulations in path order, one per tick.

use super::moves::Move;
use crate::world::WorldState;
use tracing::debug;

/// A move placed on one arm's timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledMove {
    pub mv: Move,
    pub arm: usize,
    /// First tick this move may use
    pub start: u64,
    /// No-op ticks inserted after `start` to avoid the other arm
    pub wait: u64,
    /// Column the arm stands at when the move starts
    pub origin: usize,
    /// Tick of the pickup
    pub pick_tick: Option<u64>,
    /// Tick of the drop
    pub drop_tick: Option<u64>,
}

impl ScheduledMove {
    /// First tick after the move
    pub fn end(&self) -> u64 {
        let last = self.drop_tick.or(self.pick_tick).unwrap_or(self.start + self.wait);
        last + 1
    }

    /// Column the arm stands at after the move
    pub fn destination(&self) -> usize {
        self.mv.drop.or(self.mv.pick).unwrap_or(self.origin)
    }
}

/// Per-arm bookkeeping
#[derive(Debug, Clone)]
struct ArmClock {
    busy_until: u64,
    /// Tick after the latest pickup
    last_pickup_time: u64,
    position: usize,
    holding: bool,
    latest: Option<ScheduledMove>,
}

/// Moves per arm, each list in execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub arms: Vec<Vec<ScheduledMove>>,
}

impl Schedule {
    /// Number of ticks until every arm is done
    pub fn makespan(&self) -> u64 {
        self.arms
            .iter()
            .filter_map(|moves| moves.last())
            .map(ScheduledMove::end)
            .max()
            .unwrap_or(0)
    }

    /// All scheduled moves in path order
    pub fn in_path_order(&self) -> Vec<ScheduledMove> {
        let mut all: Vec<ScheduledMove> = self.arms.iter().flatten().copied().collect();
        all.sort_by_key(|s| s.mv.step);
        all
    }
}

/// Delay needed so that `tick` lands at or after `not_before`
fn delay(tick: u64, not_before: u64) -> u64 {
    not_before.saturating_sub(tick)
}

/// Coincidence wait of a move against the other arm's latest move
fn coincidence_wait(mv: &Move, natural_pick: Option<u64>, natural_drop: Option<u64>, other: &ArmClock) -> u64 {
    let Some(theirs) = other.latest else {
        return 0;
    };
    let mut wait = 0;
    if let (Some(col), Some(tick)) = (mv.pick, natural_pick) {
        // (a) both pick from the same column
        if theirs.mv.pick == Some(col) {
            wait = wait.max(delay(tick, other.last_pickup_time));
        }
        // (b) we pick where they drop
        if theirs.mv.drop == Some(col) {
            wait = wait.max(delay(tick, other.busy_until));
        }
    }
    if let (Some(col), Some(tick)) = (mv.drop, natural_drop) {
        // (c) both drop onto the same column
        if theirs.mv.drop == Some(col) {
            wait = wait.max(delay(tick, other.busy_until));
        }
        // (d) we drop where they pick
        if theirs.mv.pick == Some(col) {
            wait = wait.max(delay(tick, other.last_pickup_time));
        }
    }
    wait
}

/// Lay out a move on `arm` starting no earlier than `start`
fn place(mv: Move, arm: usize, clock: &ArmClock, other: Option<&ArmClock>, start: u64) -> ScheduledMove {
    let origin = clock.position;
    let to_pick = mv.pick.map(|col| origin.abs_diff(col) as u64);
    let natural_pick = to_pick.map(|t| start + t);
    let carry_from = mv.pick.unwrap_or(origin);
    let natural_drop = mv.drop.map(|col| {
        let base = natural_pick.map_or(start, |p| p + 1);
        base + carry_from.abs_diff(col) as u64
    });
    let wait = other.map_or(0, |o| coincidence_wait(&mv, natural_pick, natural_drop, o));
    ScheduledMove {
        mv,
        arm,
        start,
        wait,
        origin,
        pick_tick: natural_pick.map(|t| t + wait),
        drop_tick: natural_drop.map(|t| t + wait),
    }
}

/// Assign moves to arms.
///
/// `start` supplies the arm count and initial positions. With one arm every
/// move goes to arm 0 without waits.
pub fn assign(moves: &[Move], start: &WorldState) -> Schedule {
    let mut clocks: Vec<ArmClock> = (0..start.arms())
        .map(|arm| ArmClock {
            busy_until: 0,
            last_pickup_time: 0,
            position: start.arm_pos[arm],
            holding: start.holding[arm].is_some(),
            latest: None,
        })
        .collect();
    let mut arms: Vec<Vec<ScheduledMove>> = vec![Vec::new(); clocks.len()];

    for (index, mv) in moves.iter().enumerate() {
        let eligible = |arm: usize, clock: &ArmClock| -> bool {
            match mv.pinned {
                Some(pinned) => pinned == arm,
                None => !clock.holding,
            }
        };
        let last = index + 1 == moves.len();
        let forced = (last && eligible(0, &clocks[0])).then_some(0);
        let arm = forced
            .or_else(|| {
                clocks
                    .iter()
                    .enumerate()
                    .filter(|(arm, clock)| eligible(*arm, *clock))
                    .min_by_key(|(arm, clock)| (clock.busy_until, *arm))
                    .map(|(arm, _)| arm)
            })
            .unwrap_or(0);

        let other_index = (clocks.len() == 2).then_some(1 - arm);
        let other = other_index.map(|o| &clocks[o]);
        let other_started = other.and_then(|o| o.latest).map_or(0, |s| s.start);
        let begin = clocks[arm].busy_until.max(other_started);
        let scheduled = place(*mv, arm, &clocks[arm], other, begin);

        debug!(
            step = mv.step,
            arm,
            start = scheduled.start,
            wait = scheduled.wait,
            "move assigned"
        );

        let clock = &mut clocks[arm];
        clock.busy_until = scheduled.end();
        if let Some(p) = scheduled.pick_tick {
            clock.last_pickup_time = p + 1;
        }
        clock.position = scheduled.destination();
        clock.holding = match (mv.pick, mv.drop) {
            (_, Some(_)) => false,
            (Some(_), None) => true,
            (None, None) => clock.holding,
        };
        clock.latest = Some(scheduled);
        arms[arm].push(scheduled);
    }

    Schedule { arms }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{Catalog, Form, ObjectId, ObjectSpec, Size};
    use std::sync::Arc;

    fn world(arms: usize) -> WorldState {
        let mut catalog = Catalog::new();
        let a = catalog.insert("a", ObjectSpec::new(Form::Brick, Size::Large, "red")).unwrap();
        WorldState::new(
            vec![vec![a], vec![], vec![], vec![], vec![]],
            vec![None; arms],
            vec![0; arms],
            Arc::new(catalog),
        )
        .unwrap()
    }

    fn combined(step: usize, pick: usize, drop: usize) -> Move {
        Move {
            object: ObjectId(0),
            pick: Some(pick),
            drop: Some(drop),
            support: None,
            pinned: None,
            step,
        }
    }

    #[test]
    fn test_single_arm_runs_back_to_back() {
        let moves = [combined(0, 0, 2), combined(2, 2, 4)];
        let schedule = assign(&moves, &world(1));
        let placed = &schedule.arms[0];
        assert_eq!(placed.len(), 2);
        assert_eq!((placed[0].pick_tick, placed[0].drop_tick), (Some(0), Some(3)));
        assert_eq!(placed[1].start, 4);
        assert_eq!((placed[1].pick_tick, placed[1].drop_tick), (Some(4), Some(7)));
        assert_eq!(schedule.makespan(), 8);
    }

    #[test]
    fn test_same_column_waits_for_other_arm() {
        // Both moves drop onto column 2
        let moves = [combined(0, 0, 2), combined(2, 1, 2), combined(4, 4, 3)];
        let schedule = assign(&moves, &world(2));
        let first = schedule.arms[0][0];
        let second = schedule.arms[1][0];
        assert_eq!(first.drop_tick, Some(3));
        // arm 1 would reach column 2 at tick 3 as well
        assert!(second.drop_tick.unwrap() > first.drop_tick.unwrap());
        assert_eq!(second.wait, 1);
    }

    #[test]
    fn test_last_move_goes_to_arm_zero() {
        let moves = [combined(0, 0, 1), combined(2, 3, 4)];
        let schedule = assign(&moves, &world(2));
        assert_eq!(schedule.arms[0].len(), 2);
        assert!(schedule.arms[1].is_empty());
    }

    #[test]
    fn test_pinned_drop_goes_to_holding_arm() {
        let mut catalog = Catalog::new();
        let a = catalog.insert("a", ObjectSpec::new(Form::Brick, Size::Large, "red")).unwrap();
        let state = WorldState::new(
            vec![vec![], vec![]],
            vec![None, Some(a)],
            vec![0, 1],
            Arc::new(catalog),
        )
        .unwrap();
        let drop = Move {
            object: a,
            pick: None,
            drop: Some(0),
            support: None,
            pinned: Some(1),
            step: 0,
        };
        let schedule = assign(&[drop], &state);
        assert!(schedule.arms[0].is_empty());
        assert_eq!(schedule.arms[1][0].drop_tick, Some(1));
    }
}
