//! Planar biconnectivity augmentation with a fixed embedding.
//!
//! Every face of the input whose boundary walk passes a node more than once is augmented on its
//! own: the nodes of its boundary induce a working copy, the copy is decomposed into a
//! block-cut tree rooted at the block of a designated face edge, and pendants of the tree are
//! connected by chords inside the face until the copy is biconnected. The chords are mirrored
//! into the input, which therefore keeps its embedding; faces that need no augmentation are
//! left untouched.
//!
//! ```
//! use planar_augmentation::{augmentation::augment, block_cut::is_biconnected, embedding::Embedding};
//!
//! // 1 - 0 - 2
//! let mut path = Embedding::from_rotations(&[vec![1, 2], vec![0], vec![0]]).unwrap();
//! let inserted = augment(&mut path).unwrap();
//! assert_eq!(inserted.len(), 1);
//! assert!(is_biconnected(&path));
//! ```

use fixedbitset::FixedBitSet;
use log::debug;
use petgraph::algo::connected_components;

use crate::{
    augmentation_blocks::context::FaceAugmenter,
    block_cut::is_biconnected,
    embedding::Embedding,
    embedding_blocks::graph_copy::GraphCopy,
    error::AugmentationError,
    types::{AdjId, EdgeId, FaceId, NodeId},
};

/// Switches for the consistency checks of [`augment_with_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AugmentationConfig {
    /// Check the planarity of the working copy after every inserted edge and the label
    /// bookkeeping before every round.
    pub verify_each_step: bool,
    /// Check that the result is biconnected and planar.
    pub verify_result: bool,
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        AugmentationConfig {
            verify_each_step: false,
            verify_result: true,
        }
    }
}

impl AugmentationConfig {
    pub fn verify_each_step(mut self, verify: bool) -> Self {
        self.verify_each_step = verify;
        self
    }

    pub fn verify_result(mut self, verify: bool) -> Self {
        self.verify_result = verify;
        self
    }
}

/// Boundary of a face, collected by walking along the entries that have the face on their left.
pub(crate) struct FaceBoundary {
    /// Nodes in the order of their first visit.
    pub(crate) nodes: Vec<NodeId>,
    /// Whether some node was visited twice, i.e. the face touches a cut vertex.
    pub(crate) repeated: bool,
    /// First entry after the start of the walk whose edge separates the face from another
    /// face. The start of the walk when the embedding has a single face.
    pub(crate) outer: AdjId,
}

/// Walks `face` and marks its nodes in `is_active`, which is expected to be empty.
pub(crate) fn face_boundary(graph: &Embedding, face: FaceId, is_active: &mut FixedBitSet) -> FaceBoundary {
    let first = graph.twin(graph.face_first_adj(face));
    let mut nodes = vec![];
    let mut repeated = false;
    let mut outer = (graph.face_count() == 1).then_some(first);

    let mut adj = first;
    for _ in 0..graph.face_size(face) {
        let v = graph.the_node(adj);
        if is_active.put(v) {
            repeated = true;
        } else {
            nodes.push(v);
        }
        if outer.is_none() && adj != first && graph.left_face(adj) != graph.right_face(adj) {
            outer = Some(adj);
        }
        adj = graph.cyclic_succ(graph.twin(adj));
    }

    FaceBoundary {
        nodes,
        repeated,
        outer: outer.unwrap_or(first),
    }
}

/// Augments `graph` to a biconnected planar graph by inserting edges into its faces and
/// returns the inserted edges in insertion order.
///
/// The graph has to be connected, simple and embedded planarly. Uses the default
/// [`AugmentationConfig`].
pub fn augment(graph: &mut Embedding) -> Result<Vec<EdgeId>, AugmentationError> {
    augment_with_config(graph, &AugmentationConfig::default())
}

/// Same as [`augment`] with explicit consistency checks.
pub fn augment_with_config(
    graph: &mut Embedding,
    config: &AugmentationConfig,
) -> Result<Vec<EdgeId>, AugmentationError> {
    augment_faces(graph, config, 0)
}

/// `dfs_start` selects the node of every working copy where the decomposition starts, the
/// result does not depend on it.
pub(crate) fn augment_faces(
    graph: &mut Embedding,
    config: &AugmentationConfig,
    dfs_start: NodeId,
) -> Result<Vec<EdgeId>, AugmentationError> {
    validate(graph)?;

    let face_count = graph.face_count();
    let mut is_active = FixedBitSet::with_capacity(graph.node_count());
    let mut inserted = vec![];
    for face in 0..face_count {
        let boundary = face_boundary(graph, face, &mut is_active);
        debug!(
            "face {}: {} boundary nodes{}",
            face,
            boundary.nodes.len(),
            if boundary.repeated { ", needs augmentation" } else { "" }
        );

        if boundary.repeated {
            let copy = GraphCopy::from_active_nodes(graph, &boundary.nodes, &is_active);
            let outer = copy.copy_adj(graph, boundary.outer).ok_or_else(|| {
                AugmentationError::InconsistentDecomposition(format!(
                    "designated entry {} of face {} is not in the working copy",
                    boundary.outer, face
                ))
            })?;
            let start = dfs_start % copy.embedding.node_count();
            let augmenter = FaceAugmenter::new(graph, copy, outer, start, *config)?;
            let added = augmenter.run()?;
            debug!("face {}: inserted {} edges", face, added.len());
            inserted.extend(added);
        }
        is_active.clear();
    }

    if config.verify_result {
        if !is_biconnected(graph) {
            return Err(AugmentationError::NotBiconnected);
        }
        check_planar(graph)?;
    }
    Ok(inserted)
}

fn check_planar(graph: &Embedding) -> Result<(), AugmentationError> {
    if graph.is_planar() {
        Ok(())
    } else {
        Err(AugmentationError::NotPlanar {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            faces: graph.face_count(),
        })
    }
}

fn validate(graph: &Embedding) -> Result<(), AugmentationError> {
    if graph.node_count() > 1 {
        let components = connected_components(&graph.to_ungraph(&[]));
        if components > 1 {
            return Err(AugmentationError::NotConnected(components));
        }
    }
    graph.check_simple()?;
    check_planar(graph)
}
