use fixedbitset::FixedBitSet;
use hashbrown::{HashMap, HashSet};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;

use crate::{
    EdgeLabel, UnGraph,
    embedding_blocks::{
        faces::{FaceSet, face_cycle_succ, get_faces},
        rotation::{RotationIter, RotationSystem},
    },
    error::EmbeddingError,
    types::{AdjId, DiGraph, EdgeId, FaceId, NodeId},
};

/// A graph together with a fixed combinatorial embedding.
///
/// Edge `e` owns the adjacency entries `2e` (at its source) and `2e + 1` (at its target),
/// so the twin of an entry is `adj ^ 1`. The rotation system orders the entries around every
/// node and the faces are kept up to date by [`Embedding::split_face`], the only mutation
/// after construction.
#[derive(Debug, Clone, Default)]
pub struct Embedding {
    ends: Vec<[NodeId; 2]>,
    rotation: RotationSystem,
    faces: FaceSet,
}

impl Embedding {
    /// Builds an embedding from edges and, for every node, its adjacency entries in cyclic order.
    pub(crate) fn from_parts(ends: Vec<[NodeId; 2]>, rotations: &[Vec<AdjId>]) -> Self {
        let mut rotation = RotationSystem::with_nodes(rotations.len());
        if !ends.is_empty() {
            rotation.reserve_entry(2 * ends.len() - 1);
        }
        for (u, entries) in rotations.iter().enumerate() {
            for &adj in entries {
                rotation.push_back(u, adj);
            }
        }
        let faces = get_faces(&rotation);
        Embedding {
            ends,
            rotation,
            faces,
        }
    }

    /// Builds an embedding from a rotation system: `rotations[u]` lists the neighbours of `u`
    /// in cyclic order. Every edge has to be listed at both endpoints.
    ///
    /// ```
    /// use planar_augmentation::embedding::Embedding;
    ///
    /// // 0 -- 1
    /// // |    |
    /// // 3 -- 2
    /// let square = Embedding::from_rotations(&[vec![1, 3], vec![2, 0], vec![3, 1], vec![0, 2]]).unwrap();
    /// assert_eq!(square.face_count(), 2);
    /// ```
    pub fn from_rotations(rotations: &[Vec<NodeId>]) -> Result<Self, EmbeddingError> {
        let n = rotations.len();
        let mut ends = Vec::new();
        let mut edge_of = HashMap::new();

        for (u, neighbors) in rotations.iter().enumerate() {
            for &v in neighbors {
                if v >= n {
                    return Err(EmbeddingError::UnknownNode(v));
                }
                if v == u {
                    return Err(EmbeddingError::SelfLoop(u));
                }
                if u < v {
                    if edge_of.insert((u, v), ends.len()).is_some() {
                        return Err(EmbeddingError::DuplicateEdge(u, v));
                    }
                    ends.push([u, v]);
                }
            }
        }

        let mut seen = FixedBitSet::with_capacity(2 * ends.len());
        let mut adj_rotations = vec![Vec::new(); n];
        for (u, neighbors) in rotations.iter().enumerate() {
            for &v in neighbors {
                let eid = *edge_of
                    .get(&(u.min(v), u.max(v)))
                    .ok_or(EmbeddingError::MissingTwin(v, u))?;
                let adj = if ends[eid][0] == u { 2 * eid } else { 2 * eid + 1 };
                if seen.put(adj) {
                    return Err(EmbeddingError::DuplicateEdge(u, v));
                }
                adj_rotations[u].push(adj);
            }
        }
        for (eid, &[u, v]) in ends.iter().enumerate() {
            if !seen.contains(2 * eid + 1) {
                return Err(EmbeddingError::MissingTwin(u, v));
            }
        }

        Ok(Self::from_parts(ends, &adj_rotations))
    }

    /// Reads the rotation system of a directed graph in which both directions of every edge are
    /// present; the order of `graph.edges(u)` is the cyclic order around `u`.
    pub fn from_digraph(graph: &DiGraph) -> Result<Self, EmbeddingError> {
        let rotations: Vec<Vec<NodeId>> = graph
            .node_indices()
            .map(|u| graph.edges(u).map(|e| e.target().index()).collect())
            .collect();
        Self::from_rotations(&rotations)
    }

    pub fn node_count(&self) -> usize {
        self.rotation.first.len()
    }

    pub fn edge_count(&self) -> usize {
        self.ends.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.first.len()
    }

    pub fn source(&self, eid: EdgeId) -> NodeId {
        self.ends[eid][0]
    }

    pub fn target(&self, eid: EdgeId) -> NodeId {
        self.ends[eid][1]
    }

    pub fn endpoints(&self, eid: EdgeId) -> (NodeId, NodeId) {
        (self.ends[eid][0], self.ends[eid][1])
    }

    pub fn adj_source(&self, eid: EdgeId) -> AdjId {
        2 * eid
    }

    pub fn adj_target(&self, eid: EdgeId) -> AdjId {
        2 * eid + 1
    }

    pub fn twin(&self, adj: AdjId) -> AdjId {
        adj ^ 1
    }

    pub fn the_edge(&self, adj: AdjId) -> EdgeId {
        adj / 2
    }

    /// Node the entry is attached to.
    pub fn the_node(&self, adj: AdjId) -> NodeId {
        self.ends[adj / 2][adj & 1]
    }

    pub fn twin_node(&self, adj: AdjId) -> NodeId {
        self.the_node(adj ^ 1)
    }

    pub fn first_adj(&self, u: NodeId) -> Option<AdjId> {
        self.rotation.first[u]
    }

    pub fn cyclic_succ(&self, adj: AdjId) -> AdjId {
        self.rotation.succ[adj]
    }

    pub fn cyclic_pred(&self, adj: AdjId) -> AdjId {
        self.rotation.pred[adj]
    }

    pub fn degree(&self, u: NodeId) -> usize {
        self.rotation.degree[u]
    }

    pub fn adj_entries(&self, u: NodeId) -> RotationIter<'_> {
        self.rotation.iter(u)
    }

    pub fn neighbors(&self, u: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adj_entries(u).map(move |adj| self.twin_node(adj))
    }

    pub fn find_edge(&self, u: NodeId, v: NodeId) -> Option<EdgeId> {
        self.adj_entries(u)
            .find(|&adj| self.twin_node(adj) == v)
            .map(|adj| self.the_edge(adj))
    }

    pub fn right_face(&self, adj: AdjId) -> FaceId {
        self.faces.right_face[adj]
    }

    pub fn left_face(&self, adj: AdjId) -> FaceId {
        self.faces.right_face[adj ^ 1]
    }

    pub fn face_cycle_succ(&self, adj: AdjId) -> AdjId {
        face_cycle_succ(&self.rotation, adj)
    }

    /// Some entry whose right face is `face`.
    pub fn face_first_adj(&self, face: FaceId) -> AdjId {
        self.faces.first[face]
    }

    pub fn face_size(&self, face: FaceId) -> usize {
        self.faces.size[face]
    }

    /// Entries of `face` in face-cycle order.
    pub fn face_entries(&self, face: FaceId) -> Vec<AdjId> {
        let start = self.faces.first[face];
        let mut entries = vec![start];
        let mut adj = self.face_cycle_succ(start);
        while adj != start {
            entries.push(adj);
            adj = self.face_cycle_succ(adj);
        }
        entries
    }

    /// Inserts a new edge from the node of `adj_src` to the node of `adj_tgt`. Its entries are
    /// placed directly after `adj_src` and `adj_tgt` in the respective rotations, which splits
    /// their common right face into two faces.
    ///
    /// The face of `adj_src` keeps its id, the other part gets a new one.
    pub fn split_face(&mut self, adj_src: AdjId, adj_tgt: AdjId) -> Result<EdgeId, EmbeddingError> {
        if adj_src == adj_tgt {
            return Err(EmbeddingError::SameAdjEntry(adj_src));
        }
        let face = self.right_face(adj_src);
        if face != self.right_face(adj_tgt) {
            return Err(EmbeddingError::FaceMismatch(adj_src, adj_tgt));
        }

        let u = self.the_node(adj_src);
        let v = self.the_node(adj_tgt);
        let eid = self.ends.len();
        self.ends.push([u, v]);
        self.rotation.insert_after(u, 2 * eid, adj_src);
        self.rotation.insert_after(v, 2 * eid + 1, adj_tgt);

        let new_face = self.face_count();
        self.faces.relabel_cycle(&self.rotation, adj_src, face);
        self.faces.relabel_cycle(&self.rotation, adj_tgt, new_face);

        Ok(eid)
    }

    /// Checks Euler's formula for every connected component. A rotation system of a connected
    /// graph is planar iff `n - m + f = 2`.
    pub fn is_planar(&self) -> bool {
        let n = self.node_count();
        let mut components = UnionFind::<usize>::new(n);
        for &[u, v] in &self.ends {
            components.union(u, v);
        }
        let mut roots = FixedBitSet::with_capacity(n);
        let mut nontrivial_nodes = 0;
        for u in 0..n {
            if self.degree(u) > 0 {
                nontrivial_nodes += 1;
                roots.insert(components.find(u));
            }
        }
        let nontrivial_components = roots.count_ones(..);
        nontrivial_nodes + self.face_count() == 2 * nontrivial_components + self.edge_count()
    }

    /// Fails on the first self-loop or repeated edge. Embeddings read with
    /// [`Embedding::from_rotations`] are simple, [`Embedding::split_face`] may break that.
    pub fn check_simple(&self) -> Result<(), EmbeddingError> {
        let mut seen = HashSet::with_capacity(self.edge_count());
        for &[u, v] in &self.ends {
            if u == v {
                return Err(EmbeddingError::SelfLoop(u));
            }
            if !seen.insert((u.min(v), u.max(v))) {
                return Err(EmbeddingError::DuplicateEdge(u.min(v), u.max(v)));
            }
        }
        Ok(())
    }

    /// Returns neighbours of `u` in cyclic order, starting at its first entry.
    pub fn rotation_of(&self, u: NodeId) -> Vec<NodeId> {
        self.neighbors(u).collect()
    }

    /// Exports the graph into petgraph, labelling `augmented` edges as [`EdgeLabel::Augmented`].
    pub fn to_ungraph(&self, augmented: &[EdgeId]) -> UnGraph {
        let mut marked = FixedBitSet::with_capacity(self.edge_count());
        for &eid in augmented {
            marked.insert(eid);
        }

        let mut graph = UnGraph::with_capacity(self.node_count(), self.edge_count());
        let nodes: Vec<_> = (0..self.node_count())
            .map(|u| graph.add_node(u as u32))
            .collect();
        for (eid, &[u, v]) in self.ends.iter().enumerate() {
            let label = if marked.contains(eid) {
                EdgeLabel::Augmented
            } else {
                EdgeLabel::Real
            };
            graph.add_edge(nodes[u], nodes[v], label);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Embedding {
        Embedding::from_rotations(&[vec![1, 3], vec![2, 0], vec![3, 1], vec![0, 2]]).unwrap()
    }

    #[test]
    fn test_from_rotations_square() {
        let g = square();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.face_count(), 2);
        assert!(g.is_planar());
        assert_eq!(g.rotation_of(0), vec![1, 3]);
    }

    #[test]
    fn test_from_rotations_errors() {
        assert_eq!(
            Embedding::from_rotations(&[vec![0]]).unwrap_err(),
            EmbeddingError::SelfLoop(0)
        );
        assert_eq!(
            Embedding::from_rotations(&[vec![1], vec![]]).unwrap_err(),
            EmbeddingError::MissingTwin(0, 1)
        );
        assert_eq!(
            Embedding::from_rotations(&[vec![], vec![0]]).unwrap_err(),
            EmbeddingError::MissingTwin(0, 1)
        );
        assert_eq!(
            Embedding::from_rotations(&[vec![1, 1], vec![0, 0]]).unwrap_err(),
            EmbeddingError::DuplicateEdge(0, 1)
        );
        assert_eq!(
            Embedding::from_rotations(&[vec![5]]).unwrap_err(),
            EmbeddingError::UnknownNode(5)
        );
    }

    #[test]
    fn test_twins_and_faces() {
        let g = square();
        for adj in 0..2 * g.edge_count() {
            assert_eq!(g.twin(g.twin(adj)), adj);
            assert_eq!(g.left_face(adj), g.right_face(g.twin(adj)));
            assert_eq!(g.right_face(g.face_cycle_succ(adj)), g.right_face(adj));
        }
    }

    #[test]
    fn test_split_face_square() {
        let mut g = square();
        // entries at 0 and 2 on the same face
        let a0 = g.first_adj(0).unwrap();
        let face = g.right_face(a0);
        let a2 = g
            .face_entries(face)
            .into_iter()
            .find(|&a| g.the_node(a) == 2)
            .unwrap();
        let eid = g.split_face(a0, a2).unwrap();

        assert_eq!(g.endpoints(eid), (0, 2));
        assert_eq!(g.face_count(), 3);
        assert!(g.is_planar());
        assert_eq!(g.cyclic_succ(a0), g.adj_source(eid));
        assert_eq!(g.cyclic_succ(a2), g.adj_target(eid));
        assert_eq!(g.face_size(0) + g.face_size(1) + g.face_size(2), 2 * g.edge_count());
        assert_ne!(g.left_face(g.adj_source(eid)), g.right_face(g.adj_source(eid)));
    }

    #[test]
    fn test_split_face_mismatch() {
        let mut g = square();
        let a = g.adj_source(0);
        let b = g.twin(a);
        assert_ne!(g.right_face(a), g.right_face(b));
        assert_eq!(g.split_face(a, b), Err(EmbeddingError::FaceMismatch(a, b)));
        assert_eq!(g.split_face(a, a), Err(EmbeddingError::SameAdjEntry(a)));
    }

    #[test]
    fn test_check_simple() {
        let mut g = square();
        assert_eq!(g.check_simple(), Ok(()));
        // a second edge 0 - 1 inside the outer face
        let a0 = g.first_adj(0).unwrap();
        let a1 = g
            .face_entries(g.right_face(a0))
            .into_iter()
            .find(|&a| g.the_node(a) == 1)
            .unwrap();
        g.split_face(a0, a1).unwrap();
        assert_eq!(g.check_simple(), Err(EmbeddingError::DuplicateEdge(0, 1)));
    }

    #[test]
    fn test_non_planar_rotation() {
        // K4 with a twisted rotation at one vertex is a torus embedding
        let good = Embedding::from_rotations(&[
            vec![1, 2, 3],
            vec![0, 3, 2],
            vec![0, 1, 3],
            vec![0, 2, 1],
        ])
        .unwrap();
        assert!(good.is_planar());
        let twisted = Embedding::from_rotations(&[
            vec![1, 2, 3],
            vec![0, 2, 3],
            vec![0, 1, 3],
            vec![0, 1, 2],
        ])
        .unwrap();
        assert!(!twisted.is_planar());
    }

    #[test]
    fn test_to_ungraph_labels() {
        let g = square();
        let un = g.to_ungraph(&[1]);
        assert_eq!(un.node_count(), 4);
        let labels: Vec<_> = un.edge_references().map(|e| e.weight().clone()).collect();
        assert_eq!(labels.iter().filter(|&l| *l == EdgeLabel::Augmented).count(), 1);
    }

    #[test]
    fn test_from_digraph() {
        let mut d = DiGraph::new();
        let a = d.add_node(0);
        let b = d.add_node(1);
        d.add_edge(a, b, EdgeLabel::Real);
        d.add_edge(b, a, EdgeLabel::Real);
        let g = Embedding::from_digraph(&d).unwrap();
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.face_count(), 1);
    }
}
