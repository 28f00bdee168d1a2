use dot::{Edges, GraphWalk, Id, LabelText, Labeller, Nodes, Style};

use crate::block_cut::{BcNodeKind, BlockCutTree};

type Node = usize;
type Edge = (Node, Node);

struct Tree {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    kind: Vec<BcNodeKind>,
    label: Vec<String>,
    root: Node,
}

impl<'a> Labeller<'a, Node, Edge> for Tree {
    fn graph_id(&'a self) -> Id<'a> {
        Id::new("BC").expect("identifier is alphanumeric")
    }

    fn node_id(&'a self, n: &Node) -> Id<'a> {
        Id::new(format!("N{}", n)).expect("identifier is alphanumeric")
    }

    fn node_label(&'a self, n: &Node) -> LabelText<'a> {
        LabelText::label(self.label[*n].clone())
    }

    fn node_shape(&'a self, n: &Node) -> Option<LabelText<'a>> {
        match self.kind[*n] {
            BcNodeKind::Block => Some(LabelText::label("box")),
            BcNodeKind::Cut => Some(LabelText::label("circle")),
        }
    }

    fn node_style(&'a self, n: &Node) -> Style {
        if *n == self.root { Style::Bold } else { Style::None }
    }
}

impl<'a> GraphWalk<'a, Node, Edge> for Tree {
    fn nodes(&'a self) -> Nodes<'a, Node> {
        self.nodes.as_slice().into()
    }

    fn edges(&'a self) -> Edges<'a, Edge> {
        self.edges.as_slice().into()
    }

    fn source(&'a self, e: &Edge) -> Node {
        e.0
    }

    fn target(&'a self, e: &Edge) -> Node {
        e.1
    }
}

/// Renders the current block-cut tree in DOT format: B-nodes are boxes labelled with their
/// smallest edge and tree degree, C-nodes are circles labelled with their vertex. The root is
/// drawn bold and edges point from a child to its parent.
pub fn draw_bc_tree(tree: &mut BlockCutTree) -> String {
    let nodes = tree.nodes();
    let root = tree.root();
    let capacity = tree.capacity();

    let mut kind = vec![BcNodeKind::Block; capacity];
    let mut label = vec![String::new(); capacity];
    let mut edges = Vec::new();
    for &x in &nodes {
        kind[x] = tree.kind(x);
        label[x] = match tree.cut_vertex(x) {
            Some(v) => format!("C{} (v{})", x, v),
            None => format!("B{}\nmin edge {}\ndeg {}", x, tree.min_edge(x), tree.degree(x)),
        };
        if let Some(p) = tree.parent(x) {
            edges.push((x, p));
        }
    }

    let graph = Tree {
        nodes,
        edges,
        kind,
        label,
        root,
    };
    let mut buffer = Vec::new();
    match dot::render(&graph, &mut buffer) {
        Ok(()) => String::from_utf8_lossy(&buffer).into_owned(),
        Err(e) => format!("// cannot render the block-cut tree: {e}\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::Embedding;

    #[test]
    fn test_draw_bc_tree() {
        // 1 - 0 - 2
        let g = Embedding::from_rotations(&[vec![1, 2], vec![0], vec![0]]).unwrap();
        let mut tree = BlockCutTree::new(&g);
        let dot = draw_bc_tree(&mut tree);
        assert!(dot.starts_with("digraph BC"));
        assert_eq!(dot.matches("shape=\"box\"").count(), 2);
        assert_eq!(dot.matches("shape=\"circle\"").count(), 1);
        assert_eq!(dot.matches(" -> ").count(), 2);
        assert!(dot.contains("(v0)"));
    }
}
