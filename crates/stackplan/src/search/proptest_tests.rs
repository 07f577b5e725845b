//! Property-based tests for the search engine using proptest.

use super::tests::TableGraph;
use super::{search, Cost, SearchBudget, SearchError};
use proptest::prelude::*;

const NODES: u32 = 7;
const INF: Cost = Cost::MAX / 4;

/// Random edge list over a fixed node range
fn arb_edges() -> impl Strategy<Value = Vec<(u32, u32, Cost)>> {
    proptest::collection::vec((0..NODES, 0..NODES, 0..12u32), 0..24)
}

/// All-pairs shortest distances (Floyd-Warshall)
fn distances(edges: &[(u32, u32, Cost)]) -> Vec<Vec<Cost>> {
    let n = NODES as usize;
    let mut dist = vec![vec![INF; n]; n];
    for (i, row) in dist.iter_mut().enumerate() {
        row[i] = 0;
    }
    for &(a, b, c) in edges {
        let cell = &mut dist[a as usize][b as usize];
        *cell = (*cell).min(c);
    }
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                let via = dist[i][k].saturating_add(dist[k][j]);
                if via < dist[i][j] {
                    dist[i][j] = via;
                }
            }
        }
    }
    dist
}

proptest! {
    #[test]
    fn path_cost_is_sum_of_edges_and_optimal(edges in arb_edges(), goal in 0..NODES) {
        let graph = TableGraph::new(&edges);
        let dist = distances(&edges);
        let result = search(&graph, 0, |&n| n == goal, |_| 0, &SearchBudget::unlimited());

        match result {
            Ok(found) => {
                prop_assert_eq!(found.edge_costs.iter().sum::<Cost>(), found.cost);
                prop_assert_eq!(found.cost, dist[0][goal as usize]);

                // Every step is a real edge with the recorded cost
                let mut prev = 0;
                for (node, cost) in found.path.iter().zip(&found.edge_costs) {
                    prop_assert!(edges.contains(&(prev, *node, *cost)));
                    prev = *node;
                }
                prop_assert_eq!(prev, goal);
            }
            Err(SearchError::NoPath { .. }) => {
                prop_assert!(dist[0][goal as usize] >= INF);
            }
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }

    #[test]
    fn exact_heuristic_keeps_optimality(edges in arb_edges(), goal in 0..NODES) {
        let graph = TableGraph::new(&edges);
        let dist = distances(&edges);
        let h = |n: &u32| {
            let d = dist[*n as usize][goal as usize];
            if d >= INF { 0 } else { d }
        };
        if let Ok(found) = search(&graph, 0, |&n| n == goal, h, &SearchBudget::unlimited()) {
            prop_assert_eq!(found.cost, dist[0][goal as usize]);
        }
    }
}
