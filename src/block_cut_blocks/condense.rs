use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use log::trace;

use crate::{
    block_cut::{BcNodeKind, BlockCutTree},
    embedding::Embedding,
    error::AugmentationError,
    types::EdgeId,
};

impl BlockCutTree {
    /// Returns the tree path from `a` to `b` (both included, resolved), or `None` when the
    /// nodes lie in different trees.
    pub fn find_path(&mut self, a: usize, b: usize) -> Option<Vec<usize>> {
        let a = self.find(a);
        let b = self.find(b);

        let mut up_from_a = vec![a];
        let mut position = HashMap::new();
        position.insert(a, 0);
        let mut x = a;
        while let Some(p) = self.parent(x) {
            position.insert(p, up_from_a.len());
            up_from_a.push(p);
            x = p;
        }

        let mut up_from_b = Vec::new();
        let mut y = b;
        let nca = loop {
            if let Some(&i) = position.get(&y) {
                break i;
            }
            up_from_b.push(y);
            y = self.parent(y)?;
        };

        up_from_a.truncate(nca + 1);
        up_from_a.extend(up_from_b.into_iter().rev());
        Some(up_from_a)
    }

    /// Tells the tree that `eid` was inserted into `graph`. All blocks on the tree path between
    /// the endpoints are merged into one block, cut vertices inside the path either survive with
    /// a smaller degree or become normal vertices of the merged block.
    ///
    /// Returns the block that contains the new edge.
    pub fn update_inserted_edge(
        &mut self,
        graph: &Embedding,
        eid: EdgeId,
    ) -> Result<usize, AugmentationError> {
        let (s, t) = graph.endpoints(eid);
        let sb = self.bcproper_vertex(s);
        let tb = self.bcproper_vertex(t);
        let mut path = self.find_path(sb, tb).ok_or_else(|| {
            AugmentationError::InconsistentDecomposition(format!(
                "no tree path between the ends of edge {eid} ({s}, {t})"
            ))
        })?;

        // endpoints that are cut vertices keep their C-nodes
        if path.len() > 1 && self.kind[path[0]] == BcNodeKind::Cut {
            path.remove(0);
        }
        if path.len() > 1 && self.kind[path[path.len() - 1]] == BcNodeKind::Cut {
            path.pop();
        }

        let block = self.condense_path(&path);
        if self.edge_block.len() <= eid {
            self.edge_block.resize(eid + 1, None);
        }
        self.edge_block[eid] = Some(block);
        self.min_edge[block] = self.min_edge[block].min(eid);
        Ok(block)
    }

    /// Merges a path B, C, B, ..., B of resolved tree nodes into a single block.
    fn condense_path(&mut self, path: &[usize]) -> usize {
        if path.len() == 1 {
            return path[0];
        }

        let mut on_path = FixedBitSet::with_capacity(self.capacity());
        for &x in path {
            on_path.insert(x);
        }
        // the only node of the path whose parent is not on the path
        let mut top = path[0];
        for &x in path {
            match self.parent(x) {
                Some(p) if on_path.contains(p) => {}
                _ => top = x,
            }
        }
        let top_parent = self.parent(top);

        let mut degree: isize = 0;
        let mut min_edge = usize::MAX;
        let mut merged = Vec::with_capacity(path.len());
        let mut top_survives = false;
        for &x in path {
            match self.kind[x] {
                BcNodeKind::Block => {
                    degree += self.degree[x] as isize;
                    min_edge = min_edge.min(self.min_edge[x]);
                    merged.push(x);
                }
                BcNodeKind::Cut => {
                    degree -= 2;
                    if self.degree[x] > 2 {
                        self.degree[x] -= 1;
                        degree += 1;
                        top_survives |= x == top;
                    } else {
                        merged.push(x);
                    }
                }
            }
        }

        for w in merged.windows(2) {
            self.owner.union(w[0], w[1]);
        }
        let block = self.find(merged[0]);
        trace!("merged tree nodes {:?} into block {}", merged, block);

        self.kind[block] = BcNodeKind::Block;
        self.cut_vertex[block] = None;
        self.degree[block] = degree as usize;
        self.min_edge[block] = min_edge;
        self.parent[block] = if top_survives { Some(top) } else { top_parent };
        block
    }
}
