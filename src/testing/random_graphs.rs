use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::embedding::Embedding;
use crate::types::NodeId;

/// Inserts `items` as a contiguous run at a random position of a cyclic order.
fn insert_at(rng: &mut StdRng, rotation: &mut Vec<NodeId>, items: &[NodeId]) {
    let position = rng.random_range(0..=rotation.len());
    rotation.splice(position..position, items.iter().copied());
}

/// Hangs the nodes `from..rotations.len()` below random earlier nodes, each placed into a
/// random angle of its parent.
fn attach_trees(rng: &mut StdRng, rotations: &mut [Vec<NodeId>], from: usize) {
    for i in from.max(1)..rotations.len() {
        let j = rng.random_range(0..i);
        insert_at(rng, &mut rotations[j], &[i]);
        rotations[i].push(j);
    }
}

/// Tree on `n` nodes with a random rotation system.
pub fn random_tree(n: usize, seed: usize) -> Embedding {
    let mut rng = StdRng::seed_from_u64(seed as u64);
    let mut rotations = vec![vec![]; n];
    attach_trees(&mut rng, &mut rotations, 1);
    Embedding::from_rotations(&rotations).unwrap()
}

/// Graph on `n` nodes whose blocks are bridges and cycles of length at most 6. Every new block
/// is put into a random angle of the node it is attached to.
pub fn random_cactus(n: usize, seed: usize) -> Embedding {
    let mut rng = StdRng::seed_from_u64(seed as u64);
    let mut rotations: Vec<Vec<NodeId>> = vec![vec![]];

    while rotations.len() < n {
        let v = rng.random_range(0..rotations.len());
        let len = rng.random_range(1..=(n - rotations.len()).min(5));
        let first = rotations.len();
        let last = first + len - 1;
        if len == 1 {
            insert_at(&mut rng, &mut rotations[v], &[first]);
            rotations.push(vec![v]);
            continue;
        }
        // cycle v, first, ..., last
        insert_at(&mut rng, &mut rotations[v], &[first, last]);
        for u in first..=last {
            let prev = if u == first { v } else { u - 1 };
            let next = if u == last { v } else { u + 1 };
            rotations.push(vec![prev, next]);
        }
    }

    Embedding::from_rotations(&rotations).unwrap()
}

/// Outerplanar graph on a random cycle with random chords, plus random trees hanging into
/// arbitrary angles. `n` has to be at least 3.
pub fn random_outerplanar_with_trees(n: usize, seed: usize) -> Embedding {
    let mut rng = StdRng::seed_from_u64(seed as u64);
    let k = 3 + rng.random_range(0..=(n - 3) / 2);
    let cycle: Vec<Vec<NodeId>> = (0..k).map(|i| vec![(i + 1) % k, (i + k - 1) % k]).collect();
    let mut g = Embedding::from_rotations(&cycle).unwrap();

    // face 0 is never split, so it keeps all cycle nodes on its boundary
    for _ in 0..k {
        let face = rng.random_range(1..g.face_count());
        let entries = g.face_entries(face);
        let a = entries[rng.random_range(0..entries.len())];
        let b = entries[rng.random_range(0..entries.len())];
        let (u, v) = (g.the_node(a), g.the_node(b));
        if u != v && g.find_edge(u, v).is_none() {
            g.split_face(a, b).unwrap();
        }
    }

    let mut rotations: Vec<Vec<NodeId>> = (0..k).map(|u| g.rotation_of(u)).collect();
    rotations.resize(n, vec![]);
    attach_trees(&mut rng, &mut rotations, k);
    Embedding::from_rotations(&rotations).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_cut::is_biconnected;

    #[test]
    fn test_generators_are_planar_and_connected() {
        for seed in 0..30 {
            let n = 3 + seed % 17;
            for g in [
                random_tree(n, seed),
                random_cactus(n, seed),
                random_outerplanar_with_trees(n, seed),
            ] {
                assert_eq!(g.node_count(), n);
                assert!(g.is_planar());
                assert_eq!(g.check_simple(), Ok(()));
                assert_eq!(
                    petgraph::algo::connected_components(&g.to_ungraph(&[])),
                    1
                );
            }
        }
    }

    #[test]
    fn test_outerplanar_core_is_biconnected() {
        for seed in 0..20 {
            // without room for trees the whole graph is the cycle with chords
            let g = random_outerplanar_with_trees(3, seed);
            assert!(is_biconnected(&g));
            assert_eq!(g.edge_count(), 3);
        }
    }
}
