use fixedbitset::FixedBitSet;
use hashbrown::HashMap;

use crate::{
    embedding::Embedding,
    error::EmbeddingError,
    types::{AdjId, EdgeId, NodeId},
};

/// Subgraph of an embedded graph induced by a set of active nodes.
///
/// The copy inherits the rotation order of the original graph, so every face of the original
/// whose nodes are all active appears in the copy as well. Nodes and edges keep references to
/// their originals.
#[derive(Debug, Clone)]
pub struct GraphCopy {
    pub embedding: Embedding,
    orig_node: Vec<NodeId>,
    orig_edge: Vec<EdgeId>,
    copy_edge: HashMap<EdgeId, EdgeId>,
}

impl GraphCopy {
    /// `active` lists the active nodes in the order they get their copy ids,
    /// `is_active` marks the same nodes.
    pub fn from_active_nodes(original: &Embedding, active: &[NodeId], is_active: &FixedBitSet) -> Self {
        let copy_node: HashMap<NodeId, NodeId> =
            active.iter().enumerate().map(|(i, &v)| (v, i)).collect();

        let mut ends = Vec::new();
        let mut orig_edge = Vec::new();
        let mut copy_edge = HashMap::new();
        for &v in active {
            for adj in original.adj_entries(v) {
                let eid = original.the_edge(adj);
                if !is_active.contains(original.twin_node(adj)) || copy_edge.contains_key(&eid) {
                    continue;
                }
                let (s, t) = original.endpoints(eid);
                copy_edge.insert(eid, ends.len());
                orig_edge.push(eid);
                ends.push([copy_node[&s], copy_node[&t]]);
            }
        }

        // same cyclic order as in the original, starting at the original first entry
        let rotations: Vec<Vec<AdjId>> = active
            .iter()
            .map(|&v| {
                original
                    .adj_entries(v)
                    .filter_map(|adj| {
                        copy_edge
                            .get(&original.the_edge(adj))
                            .map(|&ce| 2 * ce + (adj & 1))
                    })
                    .collect()
            })
            .collect();

        GraphCopy {
            embedding: Embedding::from_parts(ends, &rotations),
            orig_node: active.to_vec(),
            orig_edge,
            copy_edge,
        }
    }

    pub fn original_node(&self, v: NodeId) -> NodeId {
        self.orig_node[v]
    }

    pub fn original_edge(&self, eid: EdgeId) -> EdgeId {
        self.orig_edge[eid]
    }

    pub fn copy_of_edge(&self, orig: EdgeId) -> Option<EdgeId> {
        self.copy_edge.get(&orig).copied()
    }

    /// Registers `copy` as the copy of the original edge `orig`.
    pub fn set_edge(&mut self, orig: EdgeId, copy: EdgeId) {
        if self.orig_edge.len() <= copy {
            self.orig_edge.resize(copy + 1, usize::MAX);
        }
        self.orig_edge[copy] = orig;
        self.copy_edge.insert(orig, copy);
    }

    /// Entry of the original graph corresponding to the copy entry `adj`.
    pub fn original_adj(&self, original: &Embedding, adj: AdjId) -> AdjId {
        let orig = original.adj_source(self.original_edge(self.embedding.the_edge(adj)));
        if original.the_node(orig) != self.original_node(self.embedding.the_node(adj)) {
            original.twin(orig)
        } else {
            orig
        }
    }

    /// Copy entry corresponding to the original entry `orig_adj`, if its edge was copied.
    pub fn copy_adj(&self, original: &Embedding, orig_adj: AdjId) -> Option<AdjId> {
        let copy = self.copy_of_edge(original.the_edge(orig_adj))?;
        let adj = self.embedding.adj_source(copy);
        if self.original_node(self.embedding.the_node(adj)) != original.the_node(orig_adj) {
            Some(self.embedding.twin(adj))
        } else {
            Some(adj)
        }
    }

    /// Splits the face of `adj_src` and `adj_tgt` in the copy and the corresponding face of the
    /// original. Returns the new edges `(copy, original)`.
    pub fn split_face_mirrored(
        &mut self,
        original: &mut Embedding,
        adj_src: AdjId,
        adj_tgt: AdjId,
    ) -> Result<(EdgeId, EdgeId), EmbeddingError> {
        let orig_src = self.original_adj(original, adj_src);
        let orig_tgt = self.original_adj(original, adj_tgt);
        let copy = self.embedding.split_face(adj_src, adj_tgt)?;
        let orig = original.split_face(orig_src, orig_tgt)?;
        self.set_edge(orig, copy);
        Ok((copy, orig))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Triangle 0,1,2 with a leaf 3 attached to 0 and a leaf 4 attached to 1.
    fn triangle_with_leaves() -> Embedding {
        Embedding::from_rotations(&[vec![1, 3, 2], vec![2, 4, 0], vec![0, 1], vec![0], vec![1]])
            .unwrap()
    }

    #[test]
    fn test_copy_keeps_rotation_and_references() {
        let g = triangle_with_leaves();
        let active = vec![3, 0, 1];
        let mut is_active = FixedBitSet::with_capacity(g.node_count());
        for &v in &active {
            is_active.insert(v);
        }
        let copy = GraphCopy::from_active_nodes(&g, &active, &is_active);

        assert_eq!(copy.embedding.node_count(), 3);
        assert_eq!(copy.embedding.edge_count(), 2);
        assert_eq!(copy.original_node(0), 3);
        // node 0 of the original is copy node 1; its copy rotation skips the edge to 2
        let around: Vec<_> = copy
            .embedding
            .neighbors(1)
            .map(|w| copy.original_node(w))
            .collect();
        assert_eq!(around, vec![1, 3]);

        for eid in 0..copy.embedding.edge_count() {
            let orig = copy.original_edge(eid);
            assert_eq!(copy.copy_of_edge(orig), Some(eid));
            for adj in [copy.embedding.adj_source(eid), copy.embedding.adj_target(eid)] {
                let orig_adj = copy.original_adj(&g, adj);
                assert_eq!(g.the_node(orig_adj), copy.original_node(copy.embedding.the_node(adj)));
                assert_eq!(copy.copy_adj(&g, orig_adj), Some(adj));
            }
        }
    }

    #[test]
    fn test_split_face_mirrored() {
        let mut g = triangle_with_leaves();
        let active: Vec<NodeId> = (0..g.node_count()).collect();
        let mut is_active = FixedBitSet::with_capacity(g.node_count());
        is_active.insert_range(..);
        let mut copy = GraphCopy::from_active_nodes(&g, &active, &is_active);

        // the entries 3->0 and 4->1 lie on the outer face
        let a3 = copy.embedding.first_adj(3).unwrap();
        let a4 = copy
            .embedding
            .face_entries(copy.embedding.right_face(a3))
            .into_iter()
            .find(|&a| copy.embedding.the_node(a) == 4)
            .unwrap();
        let faces_before = g.face_count();
        let (ce, oe) = copy.split_face_mirrored(&mut g, a3, a4).unwrap();

        assert_eq!(g.endpoints(oe), (3, 4));
        assert_eq!(copy.original_edge(ce), oe);
        assert_eq!(g.face_count(), faces_before + 1);
        assert!(g.is_planar());
        assert!(copy.embedding.is_planar());
    }
}
