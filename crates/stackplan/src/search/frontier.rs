//! Open/closed bookkeeping for best-first search
//!
//! Nodes are interned into an `IndexSet` so the heap only carries small
//! integer handles. Decrease-key is implemented by pushing a fresh heap entry
//! and recording the improved `g` on the node; entries whose `g` no longer
//! matches the node's record are stale and skipped on pop.

use super::Cost;
use indexmap::IndexSet;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

/// Per-node search record
#[derive(Debug, Clone)]
pub(crate) struct NodeRecord {
    /// Best known cost from start
    pub g: Cost,
    /// Cached heuristic value
    pub h: Cost,
    /// Predecessor node and the cost of the edge from it
    pub parent: Option<(usize, Cost)>,
    pub closed: bool,
}

/// Heap entry, ordered so that `BinaryHeap` pops the lowest `f` first and,
/// among equal `f`, the earliest inserted entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OpenEntry {
    pub f: Cost,
    pub seq: u64,
    pub id: usize,
    pub g: Cost,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Outcome of offering a route to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Offer {
    /// First sighting; node was inserted
    Inserted,
    /// Strictly cheaper route to an open node; node was re-prioritized
    Improved,
    /// Strictly cheaper route to a closed node; node is open again
    Reopened,
    /// No improvement
    Rejected,
}

pub(crate) struct Frontier<N> {
    nodes: IndexSet<N>,
    records: Vec<NodeRecord>,
    heap: BinaryHeap<OpenEntry>,
    next_seq: u64,
}

impl<N: Hash + Eq + Clone> Frontier<N> {
    pub fn new(start: N, h: Cost) -> Self {
        let mut frontier = Frontier {
            nodes: IndexSet::new(),
            records: Vec::new(),
            heap: BinaryHeap::new(),
            next_seq: 0,
        };
        frontier.nodes.insert(start);
        frontier.records.push(NodeRecord {
            g: 0,
            h,
            parent: None,
            closed: false,
        });
        frontier.push(0, 0, h);
        frontier
    }

    fn push(&mut self, id: usize, g: Cost, h: Cost) {
        let entry = OpenEntry {
            f: g.saturating_add(h),
            seq: self.next_seq,
            id,
            g,
        };
        self.next_seq += 1;
        self.heap.push(entry);
    }

    /// Pop the best entry. Stale entries are returned too; check with
    /// [`Frontier::is_current`].
    pub fn pop(&mut self) -> Option<OpenEntry> {
        self.heap.pop()
    }

    /// Whether an entry still reflects its node's best known route
    pub fn is_current(&self, entry: &OpenEntry) -> bool {
        let record = &self.records[entry.id];
        !record.closed && record.g == entry.g
    }

    pub fn close(&mut self, id: usize) {
        self.records[id].closed = true;
    }

    pub fn node(&self, id: usize) -> &N {
        &self.nodes[id]
    }

    pub fn record(&self, id: usize) -> &NodeRecord {
        &self.records[id]
    }

    /// Offer a route `parent --cost--> node` with total cost `g`.
    ///
    /// `heuristic` is only evaluated on first sighting. A strictly cheaper
    /// route to a closed node reopens it, so an admissible but inconsistent
    /// heuristic still yields optimal paths.
    pub fn offer(
        &mut self,
        node: N,
        parent: usize,
        cost: Cost,
        g: Cost,
        heuristic: impl FnOnce(&N) -> Cost,
    ) -> Offer {
        if let Some(id) = self.nodes.get_index_of(&node) {
            let record = &mut self.records[id];
            if g >= record.g {
                return Offer::Rejected;
            }
            let reopened = std::mem::replace(&mut record.closed, false);
            record.g = g;
            record.parent = Some((parent, cost));
            let h = record.h;
            self.push(id, g, h);
            return if reopened { Offer::Reopened } else { Offer::Improved };
        }

        let h = heuristic(&node);
        let (id, _) = self.nodes.insert_full(node);
        self.records.push(NodeRecord {
            g,
            h,
            parent: Some((parent, cost)),
            closed: false,
        });
        self.push(id, g, h);
        Offer::Inserted
    }

    /// Number of heap entries (including stale ones)
    pub fn open_len(&self) -> usize {
        self.heap.len()
    }

    /// Follow predecessor links from `id` back to the start.
    ///
    /// Returns the nodes after the start and the cost of each edge, both in
    /// path order.
    pub fn reconstruct(&self, mut id: usize) -> (Vec<N>, Vec<Cost>) {
        let mut path = Vec::new();
        let mut costs = Vec::new();
        while let Some((parent, cost)) = self.records[id].parent {
            path.push(self.node(id).clone());
            costs.push(cost);
            id = parent;
        }
        path.reverse();
        costs.reverse();
        (path, costs)
    }
}
