/// Enum representing the origin of an edge in an augmented graph.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum EdgeLabel {
    Real,
    Augmented,
}

impl std::fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeLabel::Real => write!(f, "Real"),
            EdgeLabel::Augmented => write!(f, "Augmented"),
        }
    }
}

/// Wrapper for petgraph's graph type.
pub type UnGraph = petgraph::graph::UnGraph<u32, EdgeLabel>;

/// Directed wrapper, used to describe rotation systems: both directions of every edge are present
/// and the order of `edges(u)` is the cyclic order around `u`.
pub type DiGraph = petgraph::graph::DiGraph<u32, EdgeLabel>;

/// Index of a node of an [`crate::embedding::Embedding`].
pub type NodeId = usize;
/// Index of an (undirected) edge of an [`crate::embedding::Embedding`].
pub type EdgeId = usize;
/// Index of an adjacency entry (half-edge). Entry `2e` lies at the source of edge `e`, entry `2e + 1` at its target.
pub type AdjId = usize;
/// Index of a face of an [`crate::embedding::Embedding`].
pub type FaceId = usize;
