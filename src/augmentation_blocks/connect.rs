use fixedbitset::FixedBitSet;
use log::debug;

use super::{
    context::{FaceAugmenter, WalkGuard},
    labels::LabelId,
    matching::Matching,
};
use crate::{
    block_cut::VertexType,
    error::AugmentationError,
    types::{AdjId, EdgeId},
};

fn inconsistent(what: String) -> AugmentationError {
    AugmentationError::InconsistentDecomposition(what)
}

impl FaceAugmenter<'_> {
    /// Inserts a chord after `adj1` and `adj2` into the copy and the original graph and merges
    /// the tree path between its ends. Returns the copy edge.
    pub(crate) fn insert_chord(&mut self, adj1: AdjId, adj2: AdjId) -> Result<EdgeId, AugmentationError> {
        let (copy_edge, orig_edge) = self.copy.split_face_mirrored(self.original, adj1, adj2)?;
        self.inserted.push(orig_edge);
        let block = self.tree.update_inserted_edge(&self.copy.embedding, copy_edge)?;

        let (s, t) = self.original.endpoints(orig_edge);
        debug!("inserted edge {} ({}, {}), merged into block {}", orig_edge, s, t, block);

        if self.config.verify_each_step && !self.copy.embedding.is_planar() {
            return Err(inconsistent(format!(
                "working copy is not planar after inserting ({s}, {t})"
            )));
        }
        Ok(copy_edge)
    }

    /// Connects two pendants of different labels and repairs the worklist.
    pub(crate) fn connect_pendants(&mut self, matching: Matching) -> Result<(), AugmentationError> {
        let copy_edge = self.insert_chord(matching.adj1, matching.adj2)?;

        let l1 = self.labels.belongs_to(matching.pendant1);
        let l2 = self.labels.belongs_to(matching.pendant2);
        self.labels.delete_pendant(matching.pendant1);
        self.labels.delete_pendant(matching.pendant2);
        if let Some(l2) = l2 {
            self.refresh_label(l2)?;
        }
        if let Some(l1) = l1 {
            self.refresh_label(l1)?;
        }

        let root = self.act_root();
        let block = self
            .tree
            .bcproper_edge(copy_edge)
            .ok_or_else(|| inconsistent(format!("inserted edge {copy_edge} has no block")))?;
        // the merged block is a new pendant when the path did not reach a branching node
        if block != root && self.tree.degree(block) == 1 && self.labels.belongs_to(block).is_none() {
            self.reduce_chain(block)?;
        }
        Ok(())
    }

    /// Puts a label that lost pendants back into shape: empty labels go away, a single pendant
    /// is classified again, larger labels move to their new place in the worklist.
    fn refresh_label(&mut self, l: LabelId) -> Result<(), AugmentationError> {
        match self.labels.first_pendant(l) {
            None => self.labels.delete_label(l),
            Some(p) if self.labels.size(l) == 1 => {
                self.labels.delete_label(l);
                self.reduce_chain(p)?;
            }
            Some(_) => {
                self.labels.remove_label(l);
                self.labels.insert_label(l);
            }
        }
        Ok(())
    }

    /// Handles the last label. Its pendants are chained in the order in which they appear on
    /// the face of the first pendant, starting at a normal vertex of the active root. The end
    /// of the chain is closed towards the root as well.
    ///
    /// The sweep runs around the whole face: contacts with the root between two pendants do
    /// not end it, since subtrees of the same cut vertex may lie on both sides of the root.
    pub(crate) fn connect_single_label(&mut self, l: LabelId) -> Result<(), AugmentationError> {
        let root = self.act_root();
        let first = self
            .labels
            .first_pendant(l)
            .ok_or_else(|| inconsistent(format!("label {l} is empty")))?;
        let first = self.tree.find(first);
        let (start_adj, _) = self.leave_pendant(first)?;

        let g = &self.copy.embedding;
        let mut guard = WalkGuard::new(g, "single label sweep");
        let mut cycle = vec![start_adj];
        let mut adj = g.face_cycle_succ(start_adj);
        while adj != start_adj {
            guard.step()?;
            cycle.push(adj);
            adj = g.face_cycle_succ(adj);
        }

        let mut seen = FixedBitSet::with_capacity(self.tree.capacity());
        let tree = &mut self.tree;
        let labels = &self.labels;
        let mut classify = |a: AdjId| -> Option<Contact> {
            let v = g.the_node(a);
            if tree.type_of_vertex(v) != VertexType::Normal {
                return None;
            }
            let x = tree.bcproper_vertex(v);
            if x == root {
                return Some(Contact::Root);
            }
            if tree.degree(x) == 1 && labels.belongs_to(x) == Some(l) {
                return Some(Contact::Pendant(x));
            }
            None
        };

        let anchor = (0..cycle.len())
            .find(|&i| classify(cycle[i]) == Some(Contact::Root))
            .ok_or_else(|| {
                inconsistent(format!("face of pendant {first} does not touch the root {root}"))
            })?;
        let mut pendants = vec![];
        let mut closing = None;
        for j in 1..cycle.len() {
            let a = cycle[(anchor + j) % cycle.len()];
            match classify(a) {
                Some(Contact::Pendant(x)) => {
                    if !seen.put(x) {
                        pendants.push(a);
                        closing = None;
                    }
                }
                Some(Contact::Root) if closing.is_none() && !pendants.is_empty() => {
                    closing = Some(a);
                }
                _ => {}
            }
        }

        let size = self.labels.size(l);
        if pendants.len() != size {
            return Err(inconsistent(format!(
                "label {} has {} pendants, {} found on the face",
                l,
                size,
                pendants.len()
            )));
        }
        debug!(
            "closing the last label {} ({}, {} pendants from pendant {})",
            l,
            self.labels.label(l).stop_cause,
            size,
            first
        );

        if pendants.len() == 1 {
            self.insert_chord(cycle[anchor], pendants[0])?;
        } else {
            let mut chain = vec![cycle[anchor]];
            chain.extend(pendants);

            let mut first_chord = None;
            for w in chain.windows(2) {
                let copy_edge = self.insert_chord(w[0], w[1])?;
                if first_chord.is_none() {
                    first_chord = Some(copy_edge);
                }
            }
            let target = match (closing, first_chord) {
                (Some(a), _) => a,
                // the anchor is now on the other side of the first chord
                (None, Some(copy_edge)) => self.copy.embedding.adj_source(copy_edge),
                (None, None) => {
                    return Err(inconsistent(format!("label {l} produced no chain")));
                }
            };
            let last = chain[chain.len() - 1];
            self.insert_chord(last, target)?;
        }

        self.labels.delete_label(l);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Contact {
    Root,
    Pendant(usize),
}
