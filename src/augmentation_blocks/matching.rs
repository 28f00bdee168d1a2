use log::{debug, trace};

use super::{
    context::{FaceAugmenter, WalkGuard},
    labels::LabelId,
};
use crate::{
    block_cut::VertexType,
    error::AugmentationError,
    types::AdjId,
};

/// Two pendants of different labels together with the adjacency entries the connecting edge
/// is inserted after. Both entries lie on the same face of the working copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Matching {
    pub pendant1: usize,
    pub pendant2: usize,
    pub adj1: AdjId,
    pub adj2: AdjId,
}

fn missing(what: String) -> AugmentationError {
    AugmentationError::InconsistentDecomposition(what)
}

impl FaceAugmenter<'_> {
    /// Graph vertex through which the pendant hangs on the rest of the tree.
    pub(crate) fn pendant_cut_vertex(&mut self, pendant: usize) -> Result<usize, AugmentationError> {
        self.tree
            .parent_cut_vertex(pendant)
            .ok_or_else(|| missing(format!("pendant {pendant} does not hang on a cut vertex")))
    }

    /// Locates the last edge of `pendant` at its cut vertex in clockwise order.
    ///
    /// Returns an entry at a vertex of the pendant that lies on the face right of that edge,
    /// and the entry following the edge at the cut vertex.
    pub(crate) fn leave_pendant(&mut self, pendant: usize) -> Result<(AdjId, AdjId), AugmentationError> {
        let cut_v = self.pendant_cut_vertex(pendant)?;
        let g = &self.copy.embedding;
        let mut guard = WalkGuard::new(g, "leaving a pendant");

        let mut adj = g
            .first_adj(cut_v)
            .ok_or_else(|| missing(format!("cut vertex {cut_v} is isolated")))?;
        let mut last_in_pendant = None;
        if self.tree.bcproper_edge(g.the_edge(adj)) == Some(pendant) {
            while self.tree.bcproper_vertex(g.twin_node(adj)) == pendant {
                last_in_pendant = Some(g.twin(adj));
                adj = g.cyclic_succ(adj);
                guard.step()?;
            }
        } else {
            while self.tree.bcproper_vertex(g.twin_node(adj)) != pendant {
                adj = g.cyclic_pred(adj);
                guard.step()?;
            }
            last_in_pendant = Some(g.twin(adj));
            adj = g.cyclic_succ(adj);
        }

        let last_in_pendant = last_in_pendant
            .ok_or_else(|| missing(format!("pendant {pendant} has no edge at {cut_v}")))?;
        Ok((g.cyclic_pred(last_in_pendant), adj))
    }

    /// Walks the face from the first pendant of `l` and returns the first pendant of another
    /// label. Pendants of `l` passed on the way become the new first pendant.
    ///
    /// Returns `None` when the walk runs around a dominating tree of the root block, in which
    /// case the reverse search has to be used.
    pub(crate) fn find_matching(
        &mut self,
        l: LabelId,
        first: usize,
    ) -> Result<Option<Matching>, AugmentationError> {
        let root = self.act_root();
        let (mut adj_v1, mut adj) = self.leave_pendant(first)?;
        let mut pendant1 = first;

        let g = &self.copy.embedding;
        let mut guard = WalkGuard::new(g, "forward matching search");
        let mut cutv_bf_node = None;
        let mut dominating_tree = false;

        loop {
            guard.step()?;
            let v = g.the_node(adj);
            match self.tree.type_of_vertex(v) {
                VertexType::CutVertex => {
                    if !dominating_tree {
                        if cutv_bf_node == Some(v) {
                            dominating_tree = true;
                        } else if cutv_bf_node.is_none()
                            && self.tree.bcproper_edge(g.the_edge(adj)) == Some(root)
                        {
                            cutv_bf_node = Some(v);
                        }
                    }
                }
                VertexType::Normal => {
                    let act = self.tree.bcproper_vertex(v);
                    if self.tree.degree(act) == 1 && act != root && act != pendant1 {
                        match self.labels.belongs_to(act) {
                            Some(other) if other == l => {
                                trace!("pendant {} of the same label becomes first", act);
                                adj_v1 = g.cyclic_pred(adj);
                                pendant1 = act;
                                self.labels.move_to_front(act);
                                if dominating_tree {
                                    cutv_bf_node = None;
                                }
                            }
                            Some(_) => {
                                if dominating_tree && cutv_bf_node.is_some() {
                                    debug!("dominating tree around {:?} below pendant {}", cutv_bf_node, first);
                                    return Ok(None);
                                }
                                return Ok(Some(Matching {
                                    pendant1,
                                    pendant2: act,
                                    adj1: adj_v1,
                                    adj2: g.cyclic_pred(adj),
                                }));
                            }
                            None => {}
                        }
                    }
                }
            }
            adj = g.cyclic_succ(g.twin(adj));
        }
    }

    /// Same search as [`FaceAugmenter::find_matching`] in the opposite direction, starting at
    /// `first`. Pendants of the same label passed on the way are moved to the back.
    pub(crate) fn find_matching_rev(&mut self, first: usize) -> Result<Matching, AugmentationError> {
        let root = self.act_root();
        let mut pendant1 = self.tree.find(first);
        let l = self
            .labels
            .belongs_to(pendant1)
            .ok_or_else(|| missing(format!("pendant {pendant1} has no label")))?;
        let cut_v = self.pendant_cut_vertex(pendant1)?;

        let g = &self.copy.embedding;
        let mut guard = WalkGuard::new(g, "reverse matching search");
        let mut adj = g
            .first_adj(cut_v)
            .ok_or_else(|| missing(format!("cut vertex {cut_v} is isolated")))?;
        let mut adj_v1 = None;
        if self.tree.bcproper_edge(g.the_edge(adj)) == Some(pendant1) {
            while self.tree.bcproper_edge(g.the_edge(adj)) == Some(pendant1) {
                adj_v1 = Some(g.twin(adj));
                adj = g.cyclic_pred(adj);
                guard.step()?;
            }
        } else {
            while self.tree.bcproper_edge(g.the_edge(adj)) != Some(pendant1) {
                adj = g.cyclic_succ(adj);
                guard.step()?;
            }
            adj_v1 = Some(g.twin(adj));
            adj = g.cyclic_pred(adj);
        }
        let mut adj_v1 = adj_v1
            .ok_or_else(|| missing(format!("pendant {pendant1} has no edge at {cut_v}")))?;

        loop {
            guard.step()?;
            let v = g.the_node(adj);
            if self.tree.type_of_vertex(v) == VertexType::Normal {
                let act = self.tree.bcproper_vertex(v);
                if self.tree.degree(act) == 1 && act != root {
                    match self.labels.belongs_to(act) {
                        Some(other) if other == l => {
                            adj_v1 = adj;
                            pendant1 = act;
                            self.labels.move_to_back(act);
                        }
                        Some(_) => {
                            return Ok(Matching {
                                pendant1,
                                pendant2: act,
                                adj1: adj_v1,
                                adj2: adj,
                            });
                        }
                        None => {}
                    }
                }
            }
            adj = g.cyclic_pred(g.twin(adj));
        }
    }
}
