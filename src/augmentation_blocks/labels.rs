use std::fmt;

use crate::block_cut::BlockCutTree;

pub(crate) type LabelId = usize;

/// Why the walk from a pendant towards the root stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCause {
    /// Reached a C-node of tree degree greater than two.
    CDegree,
    /// Reached a non-root B-node of tree degree greater than two.
    BDegree,
    /// Reached the root.
    Root,
}

impl fmt::Display for StopCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopCause::CDegree => write!(f, "CDegree"),
            StopCause::BDegree => write!(f, "BDegree"),
            StopCause::Root => write!(f, "Root"),
        }
    }
}

/// Pendants that reduce to the same tree node.
#[derive(Debug, Clone)]
pub struct Label {
    /// Last C-node on the path from the pendants upwards.
    pub head: usize,
    /// The B-node above `head`, only for [`StopCause::BDegree`].
    pub parent: Option<usize>,
    pub stop_cause: StopCause,
    first: usize,
    last: usize,
    len: usize,
}

impl Label {
    /// Tree node the label is keyed on (possibly merged since).
    pub fn anchor(&self) -> usize {
        self.parent.unwrap_or(self.head)
    }
}

/// Worklist of labels, ordered by descending number of pendants.
///
/// Pendants of a label form a doubly linked list threaded through arrays indexed by tree node,
/// the same node is never in two labels.
#[derive(Debug, Clone)]
pub struct LabelManager {
    labels: Vec<Label>,
    worklist: Vec<LabelId>,
    belongs_to: Vec<Option<LabelId>>,
    prev: Vec<usize>,
    next: Vec<usize>,
}

impl LabelManager {
    /// `capacity` is the number of tree node slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            labels: vec![],
            worklist: vec![],
            belongs_to: vec![None; capacity],
            prev: vec![usize::MAX; capacity],
            next: vec![usize::MAX; capacity],
        }
    }

    pub fn len(&self) -> usize {
        self.worklist.len()
    }

    pub fn front(&self) -> Option<LabelId> {
        self.worklist.first().copied()
    }

    pub fn label(&self, l: LabelId) -> &Label {
        &self.labels[l]
    }

    pub fn size(&self, l: LabelId) -> usize {
        self.labels[l].len
    }

    pub fn set_stop_cause(&mut self, l: LabelId, stop_cause: StopCause) {
        self.labels[l].stop_cause = stop_cause;
    }

    pub fn belongs_to(&self, pendant: usize) -> Option<LabelId> {
        self.belongs_to[pendant]
    }

    pub fn first_pendant(&self, l: LabelId) -> Option<usize> {
        let label = &self.labels[l];
        (label.len > 0).then_some(label.first)
    }

    pub fn pendants(&self, l: LabelId) -> Vec<usize> {
        let label = &self.labels[l];
        let mut pendants = Vec::with_capacity(label.len);
        let mut p = label.first;
        for _ in 0..label.len {
            pendants.push(p);
            p = self.next[p];
        }
        pendants
    }

    /// Labels in worklist order.
    pub fn worklist(&self) -> &[LabelId] {
        &self.worklist
    }

    /// Label in the worklist whose anchor currently resolves to `x`.
    pub fn label_anchored_at(&self, tree: &mut BlockCutTree, x: usize) -> Option<LabelId> {
        let x = tree.find(x);
        self.worklist
            .iter()
            .copied()
            .find(|&l| tree.find(self.labels[l].anchor()) == x)
    }

    /// Creates a label holding `pendant` and appends it to the worklist.
    pub fn new_label(
        &mut self,
        head: usize,
        parent: Option<usize>,
        pendant: usize,
        stop_cause: StopCause,
    ) -> LabelId {
        let l = self.labels.len();
        self.labels.push(Label {
            head,
            parent,
            stop_cause,
            first: usize::MAX,
            last: usize::MAX,
            len: 0,
        });
        self.push_back(l, pendant);
        self.worklist.push(l);
        l
    }

    /// Inserts `l` in front of the first label that is not larger.
    pub fn insert_label(&mut self, l: LabelId) {
        let size = self.labels[l].len;
        let position = self
            .worklist
            .iter()
            .position(|&other| self.labels[other].len <= size)
            .unwrap_or(self.worklist.len());
        self.worklist.insert(position, l);
    }

    /// Takes `l` out of the worklist, its pendants stay attached.
    pub fn remove_label(&mut self, l: LabelId) {
        self.worklist.retain(|&other| other != l);
    }

    /// Takes `l` out of the worklist and detaches its pendants.
    pub fn delete_label(&mut self, l: LabelId) {
        self.remove_label(l);
        for p in self.pendants(l) {
            self.belongs_to[p] = None;
            self.prev[p] = usize::MAX;
            self.next[p] = usize::MAX;
        }
        let label = &mut self.labels[l];
        label.len = 0;
        label.first = usize::MAX;
        label.last = usize::MAX;
    }

    /// Appends `pendant` to `l` and moves `l` to its new position in the worklist.
    pub fn add_pendant(&mut self, pendant: usize, l: LabelId) {
        self.push_back(l, pendant);
        self.remove_label(l);
        self.insert_label(l);
    }

    /// Removes `pendant` from its label; the label keeps its worklist position.
    pub fn delete_pendant(&mut self, pendant: usize) {
        if let Some(l) = self.belongs_to[pendant].take() {
            self.unlink(l, pendant);
        }
    }

    pub fn move_to_front(&mut self, pendant: usize) {
        if let Some(l) = self.belongs_to[pendant] {
            self.unlink(l, pendant);
            self.push_front(l, pendant);
        }
    }

    pub fn move_to_back(&mut self, pendant: usize) {
        if let Some(l) = self.belongs_to[pendant] {
            self.unlink(l, pendant);
            self.push_back(l, pendant);
        }
    }

    /// Total number of pendants over all labels in the worklist.
    pub fn pendant_count(&self) -> usize {
        self.worklist.iter().map(|&l| self.labels[l].len).sum()
    }

    fn push_back(&mut self, l: LabelId, pendant: usize) {
        let label = &mut self.labels[l];
        if label.len == 0 {
            label.first = pendant;
        } else {
            self.next[label.last] = pendant;
            self.prev[pendant] = label.last;
        }
        label.last = pendant;
        label.len += 1;
        self.belongs_to[pendant] = Some(l);
    }

    fn push_front(&mut self, l: LabelId, pendant: usize) {
        let label = &mut self.labels[l];
        if label.len == 0 {
            label.last = pendant;
        } else {
            self.prev[label.first] = pendant;
            self.next[pendant] = label.first;
        }
        label.first = pendant;
        label.len += 1;
        self.belongs_to[pendant] = Some(l);
    }

    fn unlink(&mut self, l: LabelId, pendant: usize) {
        let p = self.prev[pendant];
        let n = self.next[pendant];
        let label = &mut self.labels[l];
        if p == usize::MAX {
            label.first = n;
        } else {
            self.next[p] = n;
        }
        if n == usize::MAX {
            label.last = p;
        } else {
            self.prev[n] = p;
        }
        label.len -= 1;
        self.prev[pendant] = usize::MAX;
        self.next[pendant] = usize::MAX;
    }
}
