//! Dual-arm scheduling: per-tick column exclusivity and replay fidelity

use proptest::prelude::*;
use stackplan::schedule::{assign, extract_moves, render, schedule_path, token_streams, Token};
use stackplan::{
    replay, replay_ticks, same_arrangement, BlocksGraph, Catalog, Cost, Form, Graph, ObjectId,
    ObjectSpec, Size, WorldState,
};
use std::sync::Arc;

fn catalog() -> (Arc<Catalog>, Vec<ObjectId>) {
    let mut catalog = Catalog::new();
    let ids = vec![
        catalog.insert("slab", ObjectSpec::new(Form::Brick, Size::Large, "blue")).unwrap(),
        catalog.insert("crate", ObjectSpec::new(Form::Box, Size::Large, "red")).unwrap(),
        catalog.insert("brick", ObjectSpec::new(Form::Brick, Size::Small, "green")).unwrap(),
        catalog.insert("ball", ObjectSpec::new(Form::Ball, Size::Small, "white")).unwrap(),
    ];
    (Arc::new(catalog), ids)
}

/// Apply the edge in which `arm` manipulates `column`
fn act(state: &WorldState, arm: usize, column: usize) -> WorldState {
    BlocksGraph::new()
        .outgoing_edges(state)
        .into_iter()
        .map(|edge| edge.to)
        .find(|next| next.arm_pos[arm] == column && next.holding[arm] != state.holding[arm])
        .unwrap_or_else(|| panic!("arm {} cannot act on column {} in {}", arm, column, state))
}

/// Follow graph edges chosen by `choices`
fn random_walk(start: &WorldState, choices: &[usize]) -> (Vec<WorldState>, Cost) {
    let graph = BlocksGraph::new();
    let mut path = vec![start.clone()];
    let mut cost = 0;
    for &choice in choices {
        let mut edges = graph.outgoing_edges(path.last().unwrap());
        if edges.is_empty() {
            break;
        }
        let edge = edges.swap_remove(choice % edges.len());
        cost += edge.cost;
        path.push(edge.to);
    }
    (path, cost)
}

/// Build a world from a column index per object
fn arrange(columns: usize, placement: &[usize], arm_pos: Vec<usize>) -> WorldState {
    let (catalog, ids) = catalog();
    let mut stacks = vec![Vec::new(); columns];
    for (id, &column) in ids.iter().zip(placement) {
        stacks[column % columns].push(*id);
    }
    let arms = arm_pos.len();
    let arm_pos = arm_pos.into_iter().map(|p| p % columns).collect();
    WorldState::new(stacks, vec![None; arms], arm_pos, catalog).unwrap()
}

#[test]
fn test_disjoint_moves_need_no_wait() {
    let (catalog, ids) = catalog();
    let (slab, bx) = (ids[0], ids[1]);
    let (brick, ball) = (ids[2], ids[3]);
    let start = WorldState::new(
        vec![vec![slab], vec![], vec![bx], vec![brick], vec![ball]],
        vec![None, None],
        vec![0, 4],
        catalog,
    )
    .unwrap();

    // slab 0 -> 1, brick 3 -> 2 (into the crate), slab 1 -> 0
    let s1 = act(&start, 0, 0);
    let s2 = act(&s1, 0, 1);
    let s3 = act(&s2, 1, 3);
    let s4 = act(&s3, 1, 2);
    let s5 = act(&s4, 0, 1);
    let s6 = act(&s5, 0, 0);
    let path = vec![start.clone(), s1, s2, s3, s4, s5, s6];

    let moves = extract_moves(&path).unwrap();
    assert_eq!(moves.len(), 3);
    let schedule = assign(&moves, &start);

    let first = schedule.arms[0][0];
    let second = schedule.arms[1][0];
    assert_eq!((first.mv.pick, first.mv.drop), (Some(0), Some(1)));
    assert_eq!((second.mv.pick, second.mv.drop), (Some(3), Some(2)));
    assert_eq!(first.wait, 0);
    assert_eq!(second.wait, 0);
    assert_eq!(second.start, 0);

    let end = replay(&start, &render(&schedule, &start)).unwrap();
    assert!(same_arrangement(&end, path.last().unwrap()));
}

#[test]
fn test_no_column_is_shared_within_a_tick() {
    let (catalog, ids) = catalog();
    let (slab, bx) = (ids[0], ids[1]);
    let (brick, ball) = (ids[2], ids[3]);
    let start = WorldState::new(
        vec![vec![slab, brick], vec![bx], vec![ball], vec![]],
        vec![None, None],
        vec![0, 2],
        catalog,
    )
    .unwrap();

    // brick 0 -> 3, ball 2 -> 1 (into the crate), slab 0 -> 2, brick 3 -> 0
    let mut path = vec![start.clone()];
    for (arm, column) in [(0, 0), (0, 3), (1, 2), (1, 1), (0, 0), (0, 2), (1, 3), (1, 0)] {
        let next = act(path.last().unwrap(), arm, column);
        path.push(next);
    }

    let schedule = schedule_path(&path).unwrap();
    let streams = token_streams(&schedule);
    assert_eq!(streams.len(), 2);
    assert_eq!(streams[0].len(), streams[1].len());

    // Track arm positions tick by tick
    let mut pos = start.arm_pos.clone();
    for tick in 0..streams[0].len() {
        let mut touched = Vec::new();
        for (arm, stream) in streams.iter().enumerate() {
            match stream[tick] {
                Token::Left => pos[arm] -= 1,
                Token::Right => pos[arm] += 1,
                Token::Pick | Token::Drop => touched.push(pos[arm]),
                Token::Noop => {}
            }
        }
        assert!(
            touched.len() < 2 || touched[0] != touched[1],
            "both arms manipulate column {} at tick {}",
            touched[0],
            tick
        );
    }

    let lines = render(&schedule, &start);
    let end = replay(&start, &lines).unwrap();
    assert!(same_arrangement(&end, path.last().unwrap()));
}

#[test]
fn test_trailing_pickup_stays_in_hand() {
    let (catalog, ids) = catalog();
    let start = WorldState::new(
        vec![vec![ids[0]], vec![ids[1]], vec![ids[2], ids[3]]],
        vec![None],
        vec![1],
        catalog,
    )
    .unwrap();
    let s1 = act(&start, 0, 0);
    let s2 = act(&s1, 0, 1);
    let s3 = act(&s2, 0, 2);
    let path = vec![start.clone(), s1, s2, s3];

    let schedule = schedule_path(&path).unwrap();
    let ticks: Vec<String> = render(&schedule, &start)
        .iter()
        .filter_map(|line| line.tick().map(str::to_string))
        .collect();
    assert_eq!(ticks, vec!["l", "p", "r", "d", "r", "p"]);
    let end = replay_ticks(&start, &ticks).unwrap();
    assert_eq!(&end, path.last().unwrap());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn two_arm_schedules_replay_to_the_path_end(
        columns in 3usize..=5,
        placement in proptest::collection::vec(0usize..5, 4),
        arms in (0usize..5, 0usize..5),
        choices in proptest::collection::vec(0usize..64, 0..14),
    ) {
        let start = arrange(columns, &placement, vec![arms.0, arms.1]);
        let (path, _) = random_walk(&start, &choices);
        let schedule = schedule_path(&path).unwrap();
        let lines = render(&schedule, &start);
        let end = replay(&start, &lines);
        prop_assert!(end.is_ok(), "replay failed: {:?}", end);
        prop_assert!(same_arrangement(&end.unwrap(), path.last().unwrap()));
    }

    #[test]
    fn single_arm_ticks_match_path_cost(
        columns in 3usize..=5,
        placement in proptest::collection::vec(0usize..5, 4),
        arm in 0usize..5,
        choices in proptest::collection::vec(0usize..64, 0..14),
    ) {
        let start = arrange(columns, &placement, vec![arm]);
        let (path, cost) = random_walk(&start, &choices);
        let schedule = schedule_path(&path).unwrap();
        let lines = render(&schedule, &start);
        let ticks = lines.iter().filter(|line| line.tick().is_some()).count();
        prop_assert_eq!(ticks as Cost, cost);
        let end = replay(&start, &lines).unwrap();
        prop_assert_eq!(&end, path.last().unwrap());
    }
}
