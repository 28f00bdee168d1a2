use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};

use crate::{embedding::Embedding, error::InputError, types::NodeId};

/// Reads an embedded graph from a file.
///
/// The file describes a rotation system:
/// - one line per node in format "u: v1 v2 ... vk", listing the neighbours of `u` in cyclic
///   order,
/// - nodes are numbered from 0 to |V|-1, nodes without a line are isolated,
/// - empty lines and everything after `#` are ignored.
///
/// <div class="warning">
///
/// > Every edge has to be listed at both of its endpoints.
/// > Multi-edges and self-loops are rejected.
///
/// </div>
///
/// Example input (a triangle with a leaf):
/// ```text
/// # triangle 0, 1, 2
/// 0: 1 3 2
/// 1: 2 0
/// 2: 0 1
/// 3: 0
/// ```
pub fn from_file(path: &str) -> Result<Embedding, InputError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    parse_rotation_system(reader)
}

/// This is equivalent to [`from_file`], but takes string as an input.
pub fn from_str(input: &str) -> Result<Embedding, InputError> {
    let cursor = Cursor::new(input);
    let reader = BufReader::new(cursor);
    parse_rotation_system(reader)
}

fn parse_node(token: &str, line: usize) -> Result<NodeId, InputError> {
    token.parse().map_err(|_| InputError::Syntax {
        line,
        message: format!("'{token}' is not a node index"),
    })
}

fn parse_rotation_system<R: BufRead>(reader: R) -> Result<Embedding, InputError> {
    let mut rotations: Vec<Vec<NodeId>> = Vec::new();
    let mut listed = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line?;
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        let (node, neighbors) = line.split_once(':').ok_or_else(|| InputError::Syntax {
            line: line_no,
            message: "expected 'u: v1 v2 ...'".to_string(),
        })?;
        let u = parse_node(node.trim(), line_no)?;
        let neighbors = neighbors
            .split_whitespace()
            .map(|token| parse_node(token, line_no))
            .collect::<Result<Vec<_>, _>>()?;

        let max_node = neighbors.iter().copied().fold(u, usize::max);
        if rotations.len() <= max_node {
            rotations.resize(max_node + 1, vec![]);
            listed.resize(max_node + 1, false);
        }
        if listed[u] {
            return Err(InputError::Syntax {
                line: line_no,
                message: format!("node {u} is listed twice"),
            });
        }
        listed[u] = true;
        rotations[u] = neighbors;
    }

    Ok(Embedding::from_rotations(&rotations)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmbeddingError;

    #[test]
    fn test_from_str() {
        let input = "# square\n0: 1 3\n1: 2 0\n\n2: 3 1 # comment\n3: 0 2\n";
        let graph = from_str(input).unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.face_count(), 2);
        assert_eq!(graph.rotation_of(2), vec![3, 1]);
    }

    #[test]
    fn test_from_str_errors() {
        assert!(matches!(
            from_str("0 1\n"),
            Err(InputError::Syntax { line: 1, .. })
        ));
        assert!(matches!(
            from_str("0: 1\n1: x\n"),
            Err(InputError::Syntax { line: 2, .. })
        ));
        assert!(matches!(
            from_str("0: 1\n0: 1\n"),
            Err(InputError::Syntax { line: 2, .. })
        ));
        assert!(matches!(
            from_str("0: 1\n"),
            Err(InputError::Embedding(EmbeddingError::MissingTwin(0, 1)))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            from_file("this/file/does/not/exist.txt"),
            Err(InputError::Io(_))
        ));
    }
}
