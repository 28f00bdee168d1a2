use fixedbitset::FixedBitSet;

use super::rotation::RotationSystem;
use crate::types::{AdjId, FaceId};

/// Faces of a rotation system.
///
/// Every adjacency entry belongs to exactly one face, the face on its right. The face cycle
/// of `a` continues with `pred(twin(a))`.
#[derive(Debug, Clone, Default)]
pub struct FaceSet {
    pub right_face: Vec<FaceId>,
    /// Some entry of each face.
    pub first: Vec<AdjId>,
    pub size: Vec<usize>,
}

pub fn face_cycle_succ(rotation: &RotationSystem, adj: AdjId) -> AdjId {
    rotation.pred[adj ^ 1]
}

/// Assumes that every entry of `rotation` is linked.
pub fn get_faces(rotation: &RotationSystem) -> FaceSet {
    let entries = rotation.succ.len();
    let mut faces = FaceSet {
        right_face: vec![usize::MAX; entries],
        first: vec![],
        size: vec![],
    };
    let mut used = FixedBitSet::with_capacity(entries);

    for start in 0..entries {
        if used.contains(start) {
            continue;
        }
        let face = faces.first.len();
        let mut size = 0;
        let mut adj = start;
        loop {
            used.insert(adj);
            faces.right_face[adj] = face;
            size += 1;
            adj = face_cycle_succ(rotation, adj);
            if adj == start {
                break;
            }
        }
        faces.first.push(start);
        faces.size.push(size);
    }

    faces
}

impl FaceSet {
    /// Walks the cycle through `start` and labels it with `face`. Returns the cycle length.
    pub fn relabel_cycle(&mut self, rotation: &RotationSystem, start: AdjId, face: FaceId) -> usize {
        if self.right_face.len() < rotation.succ.len() {
            self.right_face.resize(rotation.succ.len(), usize::MAX);
        }
        let mut size = 0;
        let mut adj = start;
        loop {
            self.right_face[adj] = face;
            size += 1;
            adj = face_cycle_succ(rotation, adj);
            if adj == start {
                break;
            }
        }
        if face == self.first.len() {
            self.first.push(start);
            self.size.push(size);
        } else {
            self.first[face] = start;
            self.size[face] = size;
        }
        size
    }
}
