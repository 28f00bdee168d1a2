use crate::{EdgeLabel, UnGraph};
use petgraph::visit::EdgeRef;

/// Returns a graph in DOT format.
///
/// It shows your nodes labels, not petgraph's internal indices.
///
/// Real edges are solid, edges added by the augmentation are dashed and red.
///
/// Intended to be used with `neato`.
pub fn draw_graph(graph: &UnGraph) -> String {
    let mut output = String::from("graph {\n");
    output.push_str("  mode=sgd;\n");
    output.push_str("  maxiter=1000;\n");
    output.push_str("  node [shape=circle, style=filled, fillcolor=lightblue];\n");

    for node_idx in graph.node_indices() {
        output.push_str(&format!(
            "  {} [label=\"{}\"];\n",
            node_idx.index(),
            graph[node_idx]
        ));
    }

    for edge in graph.edge_references() {
        let (a, b) = (edge.source().index(), edge.target().index());
        let style = match edge.weight() {
            EdgeLabel::Augmented => "style=dashed, color=red",
            EdgeLabel::Real => "style=solid",
        };
        output.push_str(&format!("  {} -- {} [{}];\n", a, b, style));
    }
    output.push_str("}\n");
    output
}

/// Writes the graph to a file in DOT format.
pub fn to_dot_file(graph: &UnGraph, path: &str) -> std::io::Result<()> {
    to_file(&draw_graph(graph), path)
}

/// Writes a string to a file.
pub fn to_file(content: &str, path: &str) -> std::io::Result<()> {
    std::fs::write(path, content)
}
