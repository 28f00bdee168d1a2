use log::debug;

use super::{context::FaceAugmenter, labels::StopCause};
use crate::{block_cut::BcNodeKind, error::AugmentationError};

impl FaceAugmenter<'_> {
    /// Walks from `v` to the root. Returns why the walk stopped and the last C-node it passed
    /// (or stopped at).
    fn follow_path(&mut self, v: Option<usize>) -> (StopCause, Option<usize>) {
        let mut last = None;
        let mut node = v.map(|x| self.tree.find(x));

        while let Some(x) = node {
            let is_cut = self.tree.kind(x) == BcNodeKind::Cut;
            if self.tree.degree(x) > 2 {
                if is_cut {
                    return (StopCause::CDegree, Some(x));
                }
                if self.tree.parent(x).is_none() {
                    return (StopCause::Root, last);
                }
                return (StopCause::BDegree, last);
            }
            if is_cut {
                last = Some(x);
            }
            node = self.tree.parent(x);
        }
        (StopCause::Root, last)
    }

    /// Classifies the pendant `p` and adds it to the label of the node it reduces to.
    pub(crate) fn reduce_chain(&mut self, p: usize) -> Result<(), AugmentationError> {
        let parent = self.tree.parent(p);
        let (stop_cause, last) = self.follow_path(parent);
        let last = last.ok_or_else(|| {
            AugmentationError::InconsistentDecomposition(format!(
                "pendant {p} has no cut vertex above it"
            ))
        })?;

        let (head, parent) = match stop_cause {
            StopCause::CDegree | StopCause::Root => (last, None),
            StopCause::BDegree => {
                let parent = self.tree.parent(last).ok_or_else(|| {
                    AugmentationError::InconsistentDecomposition(format!(
                        "cut vertex node {last} has no parent"
                    ))
                })?;
                (last, Some(parent))
            }
        };
        let anchor = parent.unwrap_or(head);

        match self.labels.label_anchored_at(&mut self.tree, anchor) {
            Some(l) => {
                self.labels.add_pendant(p, l);
                if stop_cause != StopCause::BDegree {
                    self.labels.set_stop_cause(l, stop_cause);
                }
            }
            None => {
                self.labels.new_label(head, parent, p, stop_cause);
            }
        }
        debug!("pendant {} reduced to {} ({})", p, anchor, stop_cause);
        Ok(())
    }
}
