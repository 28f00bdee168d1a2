use log::trace;

use crate::{block_cut::BlockCutTree, error::AugmentationError};

impl BlockCutTree {
    /// Makes `new_root` the root of the tree by reversing the parent links on the path from the
    /// current root. Returns the number of reversed links.
    pub fn re_root(&mut self, new_root: usize) -> Result<usize, AugmentationError> {
        let old_root = self.root();
        let new_root = self.find(new_root);
        if old_root == new_root {
            return Ok(0);
        }

        let path = self.find_path(old_root, new_root).ok_or_else(|| {
            AugmentationError::InconsistentDecomposition(format!(
                "tree node {new_root} is not reachable from the root {old_root}"
            ))
        })?;
        for w in path.windows(2) {
            self.parent[w[0]] = Some(w[1]);
            self.parent[w[1]] = None;
        }
        self.root = new_root;
        trace!("re-rooted block-cut tree from {} to {}", old_root, new_root);
        Ok(path.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use crate::block_cut::{BcNodeKind, BlockCutTree};
    use crate::embedding::Embedding;

    /// 1 - 0 - 2 - 3
    fn path_graph() -> Embedding {
        Embedding::from_rotations(&[vec![1, 2], vec![0], vec![0, 3], vec![2]]).unwrap()
    }

    fn assert_rooted_at(bct: &mut BlockCutTree, root: usize) {
        assert_eq!(bct.root(), root);
        assert_eq!(bct.parent(root), None);
        let nodes = bct.nodes();
        for &x in &nodes {
            // every node reaches the root
            let mut y = x;
            let mut steps = 0;
            while let Some(p) = bct.parent(y) {
                assert_ne!(bct.kind(p), bct.kind(y));
                y = p;
                steps += 1;
                assert!(steps <= nodes.len());
            }
            assert_eq!(y, root);
        }
    }

    #[test]
    fn test_re_root_to_leaf() {
        let g = path_graph();
        let mut bct = BlockCutTree::new(&g);
        let leaf = bct.bcproper_vertex(3);
        assert_eq!(bct.kind(leaf), BcNodeKind::Block);

        let reversed = bct.re_root(leaf).unwrap();
        assert!(reversed > 0);
        assert_rooted_at(&mut bct, leaf);

        let other = bct.bcproper_vertex(1);
        bct.re_root(other).unwrap();
        assert_rooted_at(&mut bct, other);
    }

    #[test]
    fn test_re_root_to_root_is_noop() {
        let g = path_graph();
        let mut bct = BlockCutTree::new(&g);
        let root = bct.root();
        assert_eq!(bct.re_root(root).unwrap(), 0);
        assert_rooted_at(&mut bct, root);
    }

    #[test]
    fn test_re_root_after_merge() {
        let mut g = path_graph();
        let mut bct = BlockCutTree::new(&g);
        // close the triangle 0, 1, 2
        let a1 = g.first_adj(1).unwrap();
        let a2 = g.adj_entries(2).find(|&a| g.twin_node(a) == 0).unwrap();
        let eid = g.split_face(a1, a2).unwrap();
        let block = bct.update_inserted_edge(&g, eid).unwrap();

        let leaf = bct.bcproper_vertex(3);
        bct.re_root(leaf).unwrap();
        assert_rooted_at(&mut bct, leaf);
        bct.re_root(block).unwrap();
        assert_rooted_at(&mut bct, block);
    }
}
