//! Graph data structures supplied by the host.

use serde::Deserialize;

/// A node as supplied by the host.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in links.
	pub id: String,
	/// Optional display name, shown as the node's label.
	#[serde(default)]
	pub name: Option<String>,
	/// Opaque payload handed back to the host on selection.
	#[serde(default)]
	pub text: Option<String>,
	/// Optional CSS color override (e.g., "#ff0000" or "rgb(255, 0, 0)").
	#[serde(default)]
	pub color: Option<String>,
	/// Collision radius override. Also scales the node's repulsion mass.
	#[serde(default)]
	pub radius: Option<f64>,
	/// Initial position. Nodes without one are placed on a spiral.
	#[serde(default)]
	pub x: Option<f64>,
	/// See `x`.
	#[serde(default)]
	pub y: Option<f64>,
}

impl GraphNode {
	/// Node with just an id.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			..Default::default()
		}
	}
}

/// An edge between two nodes.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphLink {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Spring rest length override.
	#[serde(default)]
	pub distance: Option<f64>,
}

impl GraphLink {
	/// Link using the default rest length.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			distance: None,
		}
	}
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphData {
	/// Nodes; ids must be unique.
	pub nodes: Vec<GraphNode>,
	/// Links; endpoints must name existing nodes.
	pub links: Vec<GraphLink>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_minimal_json() {
		let data: GraphData = serde_json::from_str(
			r#"{
				"nodes": [{ "id": "1", "name": "Node 1", "text": "Hello" }, { "id": "2" }],
				"links": [{ "source": "1", "target": "2" }]
			}"#,
		)
		.unwrap();
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.nodes[0].text.as_deref(), Some("Hello"));
		assert_eq!(data.nodes[1], GraphNode::new("2"));
		assert_eq!(data.links[0], GraphLink::new("1", "2"));
	}
}
