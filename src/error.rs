use thiserror::Error;

use crate::types::{AdjId, NodeId};

/// Errors raised by [`crate::embedding::Embedding`] construction and mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmbeddingError {
    #[error("node {0} has a self-loop")]
    SelfLoop(NodeId),
    #[error("({0}, {1}) exists multiple times")]
    DuplicateEdge(NodeId, NodeId),
    #[error("({0}, {1}) does not have a twin in the rotation of {1}")]
    MissingTwin(NodeId, NodeId),
    #[error("node {0} is out of range")]
    UnknownNode(NodeId),
    #[error("adjacency entries {0} and {1} do not lie on the same face")]
    FaceMismatch(AdjId, AdjId),
    #[error("cannot split a face with the same adjacency entry {0} twice")]
    SameAdjEntry(AdjId),
}

/// Errors raised by the augmentation algorithm.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AugmentationError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    #[error("graph is not connected ({0} components)")]
    NotConnected(usize),
    #[error("rotation system is not planar (n={nodes}, m={edges}, f={faces})")]
    NotPlanar {
        nodes: usize,
        edges: usize,
        faces: usize,
    },
    #[error("augmented graph is not biconnected")]
    NotBiconnected,
    #[error("inconsistent block-cut decomposition: {0}")]
    InconsistentDecomposition(String),
}

/// Errors raised while reading a rotation system from text.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("cannot read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}
