use fixedbitset::FixedBitSet;
use petgraph::algo::connected_components;
use petgraph::unionfind::UnionFind;

use crate::{
    embedding::Embedding,
    types::{EdgeId, NodeId},
};

/// Kind of a node of the block-cut tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BcNodeKind {
    /// A biconnected component or a bridge.
    Block,
    /// A cut vertex.
    Cut,
}

/// Kind of a graph vertex with respect to the current decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexType {
    Normal,
    CutVertex,
}

/// Blocks of a graph as sets of edges, plus the cut vertex flags.
#[derive(Debug, Clone)]
pub struct BlockDecomposition {
    pub blocks: Vec<Vec<EdgeId>>,
    pub is_cut: Vec<bool>,
}

fn discover(u: NodeId, time: &mut usize, preorder: &mut [usize], low: &mut [usize], vertex_stack: &mut Vec<NodeId>) {
    preorder[u] = *time;
    low[u] = *time;
    *time += 1;
    vertex_stack.push(u);
}

/// Depth-first search from `root` with an explicit stack of `(vertex, parent edge, remaining
/// rotation)` frames. `low[u]` is the lowest preorder vertex reachable from the subtree of u
/// [lowpoint].
fn dfs(
    graph: &Embedding,
    root: NodeId,
    time: &mut usize,
    preorder: &mut [usize],
    low: &mut [usize],
    vertex_stack: &mut Vec<NodeId>,
    // block is defined by set of edges, this way we avoid problem with cut vertices multi membership
    blocks: &mut Vec<Vec<EdgeId>>,
    is_cut: &mut [bool],
) {
    // whether a tree child of the vertex has been finished already
    let mut has_child = FixedBitSet::with_capacity(preorder.len());
    discover(root, time, preorder, low, vertex_stack);
    let mut stack = vec![(root, None, graph.adj_entries(root))];

    while let Some((u, parent_edge, adjs)) = stack.last_mut() {
        let (u, parent_edge) = (*u, *parent_edge);
        if let Some(adj) = adjs.next() {
            let v = graph.twin_node(adj);
            let e = graph.the_edge(adj);
            if preorder[v] == usize::MAX {
                discover(v, time, preorder, low, vertex_stack);
                stack.push((v, Some(e), graph.adj_entries(v)));
            } else if Some(e) != parent_edge {
                // back edge
                low[u] = low[u].min(preorder[v]);
            }
            continue;
        }

        stack.pop();
        let Some(pe) = parent_edge else {
            continue;
        };
        let (s, t) = graph.endpoints(pe);
        let p = s ^ t ^ u;
        low[p] = low[p].min(low[u]);
        if low[u] >= preorder[p] {
            // the root is a cut vertex only with a second tree child
            let p_has_parent = stack.last().is_some_and(|(_, pe, _)| pe.is_some());
            if p_has_parent || has_child.contains(p) {
                is_cut[p] = true;
            }
            let mut block = Vec::new();
            while let Some(w) = vertex_stack.pop() {
                // every edge is taken from its endpoint with the higher preorder
                block.extend(
                    graph
                        .adj_entries(w)
                        .filter(|&adj| preorder[graph.twin_node(adj)] < preorder[w])
                        .map(|adj| graph.the_edge(adj)),
                );
                if w == u {
                    break;
                }
            }
            blocks.push(block);
        }
        has_child.insert(p);
    }
}

/// Splits a connected graph into blocks, starting the DFS at `start`.
pub fn get_block_decomposition(graph: &Embedding, start: NodeId) -> BlockDecomposition {
    let n = graph.node_count();
    let mut time = 0;
    let mut preorder = vec![usize::MAX; n];
    let mut low = vec![usize::MAX; n];
    let mut vertex_stack = Vec::with_capacity(n);
    let mut is_cut = vec![false; n];
    let mut blocks = Vec::new();

    let order = std::iter::once(start).chain((0..n).filter(|&u| u != start));
    for u in order {
        if u < n && preorder[u] == usize::MAX {
            dfs(
                graph,
                u,
                &mut time,
                &mut preorder,
                &mut low,
                &mut vertex_stack,
                &mut blocks,
                &mut is_cut,
            );
            vertex_stack.clear();
        }
    }

    BlockDecomposition { blocks, is_cut }
}

/// Checks that the graph is connected and has no cut vertex. A single edge is biconnected.
pub fn is_biconnected(graph: &Embedding) -> bool {
    if graph.node_count() == 0 {
        return true;
    }
    let BlockDecomposition { is_cut, .. } = get_block_decomposition(graph, 0);
    !is_cut.contains(&true) && connected_components(&graph.to_ungraph(&[])) == 1
}

/// Rooted block-cut tree of a connected graph that can be updated when edges are inserted.
///
/// Tree nodes are indices into an arena. Inserting an edge merges the nodes on the tree path
/// between its endpoints; merged nodes keep their indices and are resolved through
/// [`BlockCutTree::find`], so every query resolves its argument first. Parent links are
/// stored unresolved as well.
#[derive(Debug, Clone)]
pub struct BlockCutTree {
    pub(crate) kind: Vec<BcNodeKind>,
    pub(crate) degree: Vec<usize>,
    pub(crate) parent: Vec<Option<usize>>,
    /// Graph vertex of a C-node.
    pub(crate) cut_vertex: Vec<Option<NodeId>>,
    /// Smallest graph edge of a B-node, usize::MAX for C-nodes.
    pub(crate) min_edge: Vec<EdgeId>,
    pub(crate) owner: UnionFind<usize>,
    /// C-node of a cut vertex, B-node of any other vertex.
    pub(crate) vertex_node: Vec<usize>,
    pub(crate) edge_block: Vec<Option<usize>>,
    pub(crate) root: usize,
}

impl BlockCutTree {
    pub fn new(graph: &Embedding) -> Self {
        Self::with_dfs_root(graph, 0)
    }

    /// Builds the tree from a DFS started at `start`. The tree is rooted at the last block
    /// found by the DFS, i.e. a block containing `start`.
    pub fn with_dfs_root(graph: &Embedding, start: NodeId) -> Self {
        let n = graph.node_count();
        let decomposition = get_block_decomposition(graph, start);
        let block_count = decomposition.blocks.len();

        let mut kind = vec![BcNodeKind::Block; block_count];
        let mut cut_vertex = vec![None; block_count];
        let mut min_edge = vec![usize::MAX; block_count];
        let mut vertex_node = vec![usize::MAX; n];
        let mut edge_block = vec![None; graph.edge_count()];

        for u in 0..n {
            if decomposition.is_cut[u] {
                vertex_node[u] = kind.len();
                kind.push(BcNodeKind::Cut);
                cut_vertex.push(Some(u));
                min_edge.push(usize::MAX);
            }
        }

        let mut adj = vec![Vec::new(); kind.len()];
        let mut in_block = FixedBitSet::with_capacity(n);
        for (b, block) in decomposition.blocks.iter().enumerate() {
            in_block.clear();
            for &eid in block {
                edge_block[eid] = Some(b);
                min_edge[b] = min_edge[b].min(eid);
                let (s, t) = graph.endpoints(eid);
                for w in [s, t] {
                    if in_block.put(w) {
                        continue;
                    }
                    if decomposition.is_cut[w] {
                        let c = vertex_node[w];
                        adj[b].push(c);
                        adj[c].push(b);
                    } else {
                        vertex_node[w] = b;
                    }
                }
            }
        }

        // isolated vertices form their own trivial block
        for u in 0..n {
            if vertex_node[u] == usize::MAX {
                vertex_node[u] = kind.len();
                kind.push(BcNodeKind::Block);
                cut_vertex.push(None);
                min_edge.push(usize::MAX);
                adj.push(Vec::new());
            }
        }

        let size = kind.len();
        let root = if block_count > 0 { block_count - 1 } else { size.saturating_sub(1) };
        let mut parent = vec![None; size];
        let mut visited = FixedBitSet::with_capacity(size);
        let mut stack = Vec::new();
        if size > 0 {
            visited.insert(root);
            stack.push(root);
        }
        while let Some(x) = stack.pop() {
            for &y in &adj[x] {
                if !visited.put(y) {
                    parent[y] = Some(x);
                    stack.push(y);
                }
            }
        }

        BlockCutTree {
            degree: adj.iter().map(|a| a.len()).collect(),
            kind,
            parent,
            cut_vertex,
            min_edge,
            owner: UnionFind::new(size),
            vertex_node,
            edge_block,
            root,
        }
    }

    /// Number of arena slots, including merged ones.
    pub fn capacity(&self) -> usize {
        self.kind.len()
    }

    /// Resolves a possibly merged tree node to its current representative.
    pub fn find(&mut self, x: usize) -> usize {
        self.owner.find_mut(x)
    }

    /// Current tree nodes, i.e. representatives.
    pub fn nodes(&mut self) -> Vec<usize> {
        (0..self.capacity()).filter(|&x| self.find(x) == x).collect()
    }

    pub fn root(&mut self) -> usize {
        self.find(self.root)
    }

    pub fn parent(&mut self, x: usize) -> Option<usize> {
        let x = self.find(x);
        self.parent[x].map(|p| self.find(p))
    }

    pub fn degree(&mut self, x: usize) -> usize {
        let x = self.find(x);
        self.degree[x]
    }

    pub fn kind(&mut self, x: usize) -> BcNodeKind {
        let x = self.find(x);
        self.kind[x]
    }

    /// Graph vertex of a C-node, `None` for B-nodes.
    pub fn cut_vertex(&mut self, x: usize) -> Option<NodeId> {
        let x = self.find(x);
        self.cut_vertex[x]
    }

    /// Cut vertex through which `x` hangs on its parent.
    pub fn parent_cut_vertex(&mut self, x: usize) -> Option<NodeId> {
        let p = self.parent(x)?;
        self.cut_vertex[p]
    }

    /// The C-node of a cut vertex, otherwise the B-node containing the vertex.
    pub fn bcproper_vertex(&mut self, v: NodeId) -> usize {
        self.find(self.vertex_node[v])
    }

    /// The B-node containing the edge, `None` for edges the tree was never told about.
    pub fn bcproper_edge(&mut self, eid: EdgeId) -> Option<usize> {
        let b = self.edge_block.get(eid).copied().flatten()?;
        Some(self.find(b))
    }

    pub fn type_of_vertex(&mut self, v: NodeId) -> VertexType {
        match self.kind(self.vertex_node[v]) {
            BcNodeKind::Block => VertexType::Normal,
            BcNodeKind::Cut => VertexType::CutVertex,
        }
    }

    /// Smallest graph edge contained in the block `x`.
    pub fn min_edge(&mut self, x: usize) -> EdgeId {
        let x = self.find(x);
        self.min_edge[x]
    }
}

#[cfg(test)]
mod dfs_tests {
    use super::*;

    fn assert_decomposition(g: &Embedding, expected_is_cut: &[bool], expected_blocks: &[Vec<usize>]) {
        let BlockDecomposition { mut blocks, is_cut } = get_block_decomposition(g, 0);
        for block in &mut blocks {
            block.sort();
        }
        let mut expected_blocks_sorted = expected_blocks.to_vec();
        for block in &mut expected_blocks_sorted {
            block.sort();
        }
        blocks.sort();
        expected_blocks_sorted.sort();
        assert_eq!(is_cut, expected_is_cut);
        assert_eq!(blocks, expected_blocks_sorted);
    }

    #[test]
    fn test_dfs_single_edge() {
        let g = Embedding::from_rotations(&[vec![1], vec![0]]).unwrap();
        assert_decomposition(&g, &[false, false], &[vec![0]]);
    }

    #[test]
    fn test_dfs_triangle() {
        let g = Embedding::from_rotations(&[vec![1, 2], vec![2, 0], vec![0, 1]]).unwrap();
        assert_decomposition(&g, &[false, false, false], &[vec![0, 1, 2]]);
    }

    #[test]
    fn test_dfs_with_cut_vertex() {
        // 0 - 1 - 2
        let g = Embedding::from_rotations(&[vec![1], vec![0, 2], vec![1]]).unwrap();
        assert_decomposition(&g, &[false, true, false], &[vec![0], vec![1]]);
    }

    #[test]
    fn test_dfs_root_cut_vertex() {
        // 1 - 0 - 2
        let g = Embedding::from_rotations(&[vec![1, 2], vec![0], vec![0]]).unwrap();
        assert_decomposition(&g, &[true, false, false], &[vec![0], vec![1]]);
    }

    #[test]
    fn test_dfs_complex_graph() {
        // 1----\        /---- 4
        // |     0 ---- 3      |
        // 2----/        \---- 5
        let g = Embedding::from_rotations(&[
            vec![1, 3, 2],
            vec![2, 0],
            vec![0, 1],
            vec![4, 5, 0],
            vec![5, 3],
            vec![3, 4],
        ])
        .unwrap();
        // edges: (0,1)=0 (0,3)=1 (0,2)=2 (1,2)=3 (3,4)=4 (3,5)=5 (4,5)=6
        assert_decomposition(
            &g,
            &[true, false, false, true, false, false],
            &[vec![0, 2, 3], vec![4, 5, 6], vec![1]],
        );
    }

    #[test]
    fn test_dfs_long_path() {
        let n: usize = 200_000;
        let rotations: Vec<Vec<usize>> = (0..n)
            .map(|i| (i.saturating_sub(1)..(i + 2).min(n)).filter(|&j| j != i).collect())
            .collect();
        let g = Embedding::from_rotations(&rotations).unwrap();
        for start in [0, n / 2, n - 1] {
            let BlockDecomposition { blocks, is_cut } = get_block_decomposition(&g, start);
            assert_eq!(blocks.len(), n - 1);
            assert!(blocks.iter().all(|block| block.len() == 1));
            assert_eq!(is_cut.iter().filter(|&&cut| cut).count(), n - 2);
            assert!(!is_cut[0] && !is_cut[n - 1]);
        }
        assert!(!is_biconnected(&g));
    }
}

#[cfg(test)]
mod bc_tests {
    use super::*;

    /// 1 - 0 - 2 - 3
    fn path_graph() -> Embedding {
        Embedding::from_rotations(&[vec![1, 2], vec![0], vec![0, 3], vec![2]]).unwrap()
    }

    #[test]
    fn test_bc_single_edge() {
        let g = Embedding::from_rotations(&[vec![1], vec![0]]).unwrap();
        let mut bct = BlockCutTree::new(&g);
        assert_eq!(bct.nodes(), vec![0]);
        assert_eq!(bct.root(), 0);
        assert_eq!(bct.parent(0), None);
        assert_eq!(bct.type_of_vertex(0), VertexType::Normal);
    }

    #[test]
    fn test_bc_path() {
        let g = path_graph();
        let mut bct = BlockCutTree::new(&g);
        // three bridges and two cut vertices
        let nodes = bct.nodes();
        assert_eq!(nodes.len(), 5);
        let blocks = nodes.iter().filter(|&&x| bct.kind(x) == BcNodeKind::Block).count();
        assert_eq!(blocks, 3);
        assert_eq!(bct.type_of_vertex(0), VertexType::CutVertex);
        assert_eq!(bct.type_of_vertex(2), VertexType::CutVertex);
        assert_eq!(bct.type_of_vertex(3), VertexType::Normal);

        let c0 = bct.bcproper_vertex(0);
        assert_eq!(bct.cut_vertex(c0), Some(0));
        assert_eq!(bct.degree(c0), 2);

        // exactly one root, every other node has a parent of the other kind
        let roots = nodes.iter().filter(|&&x| bct.parent(x).is_none()).count();
        assert_eq!(roots, 1);
        for &x in &nodes {
            if let Some(p) = bct.parent(x) {
                assert_ne!(bct.kind(x), bct.kind(p));
            }
        }
        let root = bct.root();
        assert_eq!(bct.kind(root), BcNodeKind::Block);
    }

    #[test]
    fn test_bcproper_edge() {
        let g = path_graph();
        let mut bct = BlockCutTree::new(&g);
        for eid in 0..g.edge_count() {
            let b = bct.bcproper_edge(eid).unwrap();
            assert_eq!(bct.kind(b), BcNodeKind::Block);
            assert_eq!(bct.min_edge(b), eid);
        }
        assert_eq!(bct.bcproper_edge(17), None);
    }

    #[test]
    fn test_is_biconnected() {
        assert!(is_biconnected(&Embedding::default()));
        assert!(is_biconnected(
            &Embedding::from_rotations(&[vec![1], vec![0]]).unwrap()
        ));
        assert!(is_biconnected(
            &Embedding::from_rotations(&[vec![1, 2], vec![2, 0], vec![0, 1]]).unwrap()
        ));
        assert!(!is_biconnected(&path_graph()));
        // two isolated nodes
        assert!(!is_biconnected(
            &Embedding::from_rotations(&[vec![], vec![]]).unwrap()
        ));
    }
}
