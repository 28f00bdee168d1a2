use hashbrown::HashSet;
use log::{debug, trace, warn};

use super::labels::LabelManager;
use crate::{
    augmentation::AugmentationConfig,
    block_cut::BlockCutTree,
    embedding::Embedding,
    embedding_blocks::graph_copy::GraphCopy,
    error::AugmentationError,
    types::{AdjId, EdgeId, NodeId},
};

/// Bounds the length of a face walk. Every walk of the matching engine visits each adjacency
/// entry a bounded number of times, so running past the limit means the tree and the
/// embedding disagree.
pub(crate) struct WalkGuard {
    steps: usize,
    limit: usize,
    walk: &'static str,
}

impl WalkGuard {
    pub(crate) fn new(graph: &Embedding, walk: &'static str) -> Self {
        WalkGuard {
            steps: 0,
            limit: 8 * graph.edge_count() + 4,
            walk,
        }
    }

    pub(crate) fn step(&mut self) -> Result<(), AugmentationError> {
        self.steps += 1;
        if self.steps > self.limit {
            return Err(AugmentationError::InconsistentDecomposition(format!(
                "{} did not terminate within {} steps",
                self.walk, self.limit
            )));
        }
        Ok(())
    }
}

/// State of the augmentation of a single face: the working copy induced by the boundary nodes,
/// its block-cut tree rooted at the designated block and the label worklist.
///
/// The context is built when the driver enters a face and dropped when it leaves it. Edges are
/// inserted into the copy and into `original` at the same time.
pub(crate) struct FaceAugmenter<'a> {
    pub(crate) original: &'a mut Embedding,
    pub(crate) copy: GraphCopy,
    pub(crate) tree: BlockCutTree,
    pub(crate) labels: LabelManager,
    /// Original edges in insertion order.
    pub(crate) inserted: Vec<EdgeId>,
    pub(crate) config: AugmentationConfig,
    /// Whether the decomposition had to be re-rooted at the designated block.
    pub(crate) rerooted: bool,
    /// Degree-1 blocks of the initial tree, the designated block included. No face needs more
    /// edges than that.
    pub(crate) leaf_blocks: usize,
}

impl<'a> FaceAugmenter<'a> {
    /// `outer` is an entry of the copy whose edge determines the active root; the tree is built
    /// with a DFS from `dfs_start`.
    pub(crate) fn new(
        original: &'a mut Embedding,
        copy: GraphCopy,
        outer: AdjId,
        dfs_start: NodeId,
        config: AugmentationConfig,
    ) -> Result<Self, AugmentationError> {
        let mut tree = BlockCutTree::with_dfs_root(&copy.embedding, dfs_start);
        let root_block = tree
            .bcproper_edge(copy.embedding.the_edge(outer))
            .ok_or_else(|| {
                AugmentationError::InconsistentDecomposition(format!(
                    "designated entry {outer} is not in any block"
                ))
            })?;

        // pendants are classified by their smallest edge so that the result does not depend
        // on where the DFS started
        let mut pendants = Vec::new();
        for x in tree.nodes() {
            if x != root_block && tree.degree(x) == 1 {
                pendants.push((tree.min_edge(x), x));
            }
        }
        radsort::sort_by_key(&mut pendants, |&(min_edge, _)| min_edge);
        let leaf_blocks = pendants.len() + usize::from(tree.degree(root_block) == 1);

        let rerooted = tree.re_root(root_block)? > 0;
        debug!(
            "face context: {} nodes, {} edges, root block {}{}, {} pendants",
            copy.embedding.node_count(),
            copy.embedding.edge_count(),
            root_block,
            if rerooted { " (re-rooted)" } else { "" },
            pendants.len()
        );

        let labels = LabelManager::new(tree.capacity());
        let mut augmenter = FaceAugmenter {
            original,
            copy,
            tree,
            labels,
            inserted: Vec::new(),
            config,
            rerooted,
            leaf_blocks,
        };
        for (_, p) in pendants {
            augmenter.reduce_chain(p)?;
        }
        Ok(augmenter)
    }

    /// The block every pendant is finally connected towards.
    pub(crate) fn act_root(&mut self) -> usize {
        self.tree.root()
    }

    /// Connects pendants until the working copy is biconnected and returns the inserted
    /// original edges.
    pub(crate) fn run(mut self) -> Result<Vec<EdgeId>, AugmentationError> {
        let mut rounds = 0;
        while let Some(l) = self.labels.front() {
            rounds += 1;
            if rounds > self.copy.embedding.node_count() + 1 {
                return Err(AugmentationError::InconsistentDecomposition(format!(
                    "labels left after {rounds} rounds"
                )));
            }
            if self.config.verify_each_step {
                self.check_labels()?;
            }
            trace!("worklist: {:?}", self.worklist_sizes());

            if self.labels.len() == 1 {
                self.connect_single_label(l)?;
                continue;
            }

            let first = self.labels.first_pendant(l).ok_or_else(|| {
                AugmentationError::InconsistentDecomposition(format!("label {l} is empty"))
            })?;
            let matching = match self.find_matching(l, first)? {
                Some(matching) => matching,
                None => {
                    warn!("forward matching from pendant {} is corrupt, searching backwards", first);
                    self.find_matching_rev(first)?
                }
            };
            debug!(
                "matched pendants {} and {}",
                matching.pendant1, matching.pendant2
            );
            self.connect_pendants(matching)?;
        }
        if self.config.verify_each_step && self.inserted.len() > self.leaf_blocks {
            return Err(AugmentationError::InconsistentDecomposition(format!(
                "{} edges inserted for {} leaf blocks",
                self.inserted.len(),
                self.leaf_blocks
            )));
        }
        debug!(
            "face context done after {} rounds, {} edges{}",
            rounds,
            self.inserted.len(),
            if self.rerooted { ", tree was re-rooted" } else { "" }
        );
        Ok(self.inserted)
    }

    /// Every pendant of the tree is in exactly one label of the worklist.
    pub(crate) fn check_labels(&mut self) -> Result<(), AugmentationError> {
        let root = self.act_root();
        let listed: HashSet<usize> = self.labels.worklist().iter().copied().collect();
        let mut pendants = 0;
        for x in self.tree.nodes() {
            if x == root || self.tree.degree(x) != 1 {
                continue;
            }
            pendants += 1;
            match self.labels.belongs_to(x) {
                Some(l) if listed.contains(&l) => {}
                _ => {
                    return Err(AugmentationError::InconsistentDecomposition(format!(
                        "pendant {x} is not in a label"
                    )));
                }
            }
        }
        if pendants != self.labels.pendant_count() {
            return Err(AugmentationError::InconsistentDecomposition(format!(
                "{} pendants in the tree, {} in labels",
                pendants,
                self.labels.pendant_count()
            )));
        }
        Ok(())
    }

    fn worklist_sizes(&self) -> Vec<usize> {
        self.labels
            .worklist()
            .iter()
            .map(|&l| self.labels.size(l))
            .collect()
    }
}
