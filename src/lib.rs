// #![warn(missing_docs)]

//! # planar_augmentation
//!
//! Makes a connected planar graph biconnected by inserting edges into its faces, without
//! changing the given embedding.
//!
//! Graphs are given as rotation systems ([`embedding::Embedding`]). Every inserted edge is a
//! chord of an existing face, so the result is planar with the same embedding of the input
//! edges, and faces that are already bounded by simple cycles stay untouched. The
//! decomposition into blocks is maintained incrementally in a [`block_cut::BlockCutTree`].
//!
//! Based on [`petgraph`](https://docs.rs/petgraph).
//!
//! ```
//! use planar_augmentation::{augment, input};
//!
//! // star with three leaves
//! let mut g = input::from_str("0: 1 2 3\n1: 0\n2: 0\n3: 0\n").unwrap();
//! let inserted = augment(&mut g).unwrap();
//! assert_eq!(inserted.len(), 3);
//! ```
//!
//! Reference: Gutwenger, Mutzel, Zey: "Planar biconnectivity augmentation with fixed embedding"

pub mod augmentation;
mod augmentation_blocks;
pub mod block_cut;
mod block_cut_blocks;
pub mod debugging;
pub mod embedding;
pub mod embedding_blocks;
pub mod error;
pub mod input;
pub mod output;
#[cfg(test)]
mod testing;
pub mod types;

pub use augmentation::{AugmentationConfig, augment, augment_with_config};
pub use embedding::Embedding;
pub use error::{AugmentationError, EmbeddingError, InputError};
pub use types::EdgeLabel;
pub use types::UnGraph;
