// Flowdata
// Copyright (C) 2025 Flowdata Contributors

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Pipeline graph representation and content fingerprinting

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single named operation in a pipeline graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpNode {
    /// Unique node name within the graph
    pub name: String,
    /// Operation kind (e.g. "map", "batch", "prefetch")
    pub op: String,
    /// Names of the nodes this node consumes
    pub inputs: Vec<String>,
}

impl OpNode {
    /// Create a node with no inputs
    pub fn new(name: impl Into<String>, op: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            op: op.into(),
            inputs: Vec::new(),
        }
    }

    /// Attach input node names
    pub fn with_inputs(mut self, inputs: Vec<String>) -> Self {
        self.inputs = inputs;
        self
    }
}

/// A data-processing pipeline graph: an ordered list of op nodes
///
/// The optimizer treats this structure as opaque; it only ever hands it to
/// the rewrite engine and fingerprints it for caching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineGraph {
    nodes: Vec<OpNode>,
}

impl PipelineGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node to the graph
    pub fn add_node(&mut self, node: OpNode) {
        self.nodes.push(node);
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> &[OpNode] {
        &self.nodes
    }

    /// Number of nodes in the graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Content fingerprint of the graph, used by the rewrite engine for
    /// downstream caching. Equal graphs always produce equal fingerprints.
    pub fn fingerprint(&self) -> GraphFingerprint {
        let bytes = bincode::serde::encode_to_vec(self, bincode::config::standard()).expect("pipeline graph is always encodable");
        GraphFingerprint(*blake3::hash(&bytes).as_bytes())
    }
}

/// Content-derived identifier of a pipeline graph
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphFingerprint([u8; 32]);

impl GraphFingerprint {
    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for GraphFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for GraphFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GraphFingerprint({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> PipelineGraph {
        let mut graph = PipelineGraph::new();
        graph.add_node(OpNode::new("source", "range"));
        graph.add_node(OpNode::new("mapped", "map").with_inputs(vec!["source".to_string()]));
        graph
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let graph = sample_graph();
        assert_eq!(graph.fingerprint(), graph.fingerprint());
        assert_eq!(sample_graph().fingerprint(), graph.fingerprint());
    }

    #[test]
    fn test_fingerprint_changes_with_content() {
        let graph = sample_graph();
        let mut extended = graph.clone();
        extended.add_node(OpNode::new("batched", "batch").with_inputs(vec!["mapped".to_string()]));
        assert_ne!(graph.fingerprint(), extended.fingerprint());
    }

    #[test]
    fn test_fingerprint_display_is_hex() {
        let rendered = sample_graph().fingerprint().to_string();
        assert_eq!(rendered.len(), 64);
        assert!(rendered.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_empty_graph() {
        let graph = PipelineGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
    }
}
