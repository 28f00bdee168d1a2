use crate::types::{AdjId, NodeId};

/// Cyclic lists of adjacency entries around every node.
///
/// `succ`/`pred` are indexed by adjacency entry, `first`/`degree` by node.
/// Entries that are allocated but not linked yet hold `usize::MAX`.
#[derive(Debug, Clone, Default)]
pub struct RotationSystem {
    pub succ: Vec<AdjId>,
    pub pred: Vec<AdjId>,
    pub first: Vec<Option<AdjId>>,
    pub degree: Vec<usize>,
}

impl RotationSystem {
    pub fn with_nodes(n: usize) -> Self {
        Self {
            succ: vec![],
            pred: vec![],
            first: vec![None; n],
            degree: vec![0; n],
        }
    }

    /// Makes room for adjacency entries up to `adj` (inclusive), disconnected.
    pub fn reserve_entry(&mut self, adj: AdjId) {
        if self.succ.len() <= adj {
            self.succ.resize(adj + 1, usize::MAX);
            self.pred.resize(adj + 1, usize::MAX);
        }
    }

    pub fn link(&mut self, a: AdjId, b: AdjId) {
        self.succ[a] = b;
        self.pred[b] = a;
    }

    /// Appends `adj` at the end of the cyclic list of `node` (right before the first entry).
    pub fn push_back(&mut self, node: NodeId, adj: AdjId) {
        self.reserve_entry(adj);
        match self.first[node] {
            None => {
                self.first[node] = Some(adj);
                self.link(adj, adj);
            }
            Some(first) => {
                let last = self.pred[first];
                self.link(last, adj);
                self.link(adj, first);
            }
        }
        self.degree[node] += 1;
    }

    /// Inserts `adj` into the cyclic list of `node` directly after `after`.
    pub fn insert_after(&mut self, node: NodeId, adj: AdjId, after: AdjId) {
        self.reserve_entry(adj);
        let next = self.succ[after];
        self.link(after, adj);
        self.link(adj, next);
        self.degree[node] += 1;
    }

    pub fn iter(&self, node: NodeId) -> RotationIter<'_> {
        RotationIter {
            rotation: self,
            first: self.first[node],
            current: self.first[node],
        }
    }
}

/// Iterates the entries around one node, starting at its first entry.
pub struct RotationIter<'a> {
    rotation: &'a RotationSystem,
    first: Option<AdjId>,
    current: Option<AdjId>,
}

impl Iterator for RotationIter<'_> {
    type Item = AdjId;

    fn next(&mut self) -> Option<Self::Item> {
        let adj = self.current?;
        let next = self.rotation.succ[adj];
        self.current = if Some(next) == self.first {
            None
        } else {
            Some(next)
        };
        Some(adj)
    }
}
