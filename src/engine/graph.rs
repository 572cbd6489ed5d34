//! Authoritative node and link records.
//!
//! The model is validated once at construction and never changes shape
//! afterwards. The simulation mutates the physics fields of each [`Node`]
//! in place and the interaction controller writes the pin; nothing else
//! writes to a node.

use std::collections::HashMap;
use std::f64::consts::PI;

use log::info;

use super::config::GraphConfig;
use super::error::{ConfigError, Result};
use super::types::{GraphData, GraphNode};

/// Radius of the innermost ring of the initial spiral placement.
const INITIAL_RADIUS: f64 = 10.0;

/// A node in the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Unique key within the graph.
	pub id: String,
	/// Display label.
	pub name: Option<String>,
	/// Detail text handed to the host on selection.
	pub text: Option<String>,
	/// Display hint; the renderer falls back to its default fill.
	pub color: Option<String>,
	/// Drawn and hit-tested radius in graph units.
	pub radius: f64,
	/// Repulsion weight, `(radius / node_radius)²` for nodes that set their own
	/// radius and 1 otherwise.
	pub mass: f64,
	/// Graph-space position, written by the simulation.
	pub x: f64,
	/// See `x`.
	pub y: f64,
	/// Velocity carried between ticks.
	pub vx: f64,
	/// See `vx`.
	pub vy: f64,
	/// Fixed position overriding the physics while set.
	pub pin: Option<(f64, f64)>,
}

impl Node {
	/// Name if present, otherwise the id.
	pub fn label(&self) -> &str {
		self.name.as_deref().unwrap_or(&self.id)
	}

	/// Whether the physics is currently overridden.
	pub fn is_pinned(&self) -> bool {
		self.pin.is_some()
	}

	/// Graph-space `(x, y)`.
	pub fn position(&self) -> (f64, f64) {
		(self.x, self.y)
	}

	/// Converts back to the host-facing record, carrying the current position.
	pub fn to_data(&self) -> GraphNode {
		GraphNode {
			id: self.id.clone(),
			name: self.name.clone(),
			text: self.text.clone(),
			color: self.color.clone(),
			radius: Some(self.radius),
			x: Some(self.x),
			y: Some(self.y),
		}
	}
}

/// A spring between two nodes, resolved to node indices.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
	/// Source id as given by the host.
	pub source_id: String,
	/// Target id as given by the host.
	pub target_id: String,
	/// Index of the source node.
	pub source: usize,
	/// Index of the target node.
	pub target: usize,
	/// Rest length.
	pub distance: f64,
}

impl Link {
	/// Both ends on the same node.
	pub fn is_self_link(&self) -> bool {
		self.source == self.target
	}
}

/// Validated set of nodes and links with an id index.
#[derive(Clone, Debug)]
pub struct GraphModel {
	nodes: Vec<Node>,
	links: Vec<Link>,
	index: HashMap<String, usize>,
	degree: Vec<usize>,
}

impl GraphModel {
	/// Builds the model, placing nodes without a position on a spiral around
	/// `center`.
	///
	/// Rejects invalid `config` defaults first. Then fails on the first
	/// duplicate id, non-positive radius, dangling link endpoint or
	/// non-positive link distance, in input order.
	pub fn new(data: &GraphData, config: &GraphConfig, center: (f64, f64)) -> Result<Self> {
		config.validate()?;
		let mut index = HashMap::with_capacity(data.nodes.len());
		let mut nodes = Vec::with_capacity(data.nodes.len());

		for (i, node) in data.nodes.iter().enumerate() {
			if index.insert(node.id.clone(), i).is_some() {
				return Err(ConfigError::DuplicateNode {
					id: node.id.clone(),
				});
			}

			let radius = node.radius.unwrap_or(config.node_radius);
			if !(radius > 0.0 && radius.is_finite()) {
				return Err(ConfigError::InvalidRadius {
					id: node.id.clone(),
					radius,
				});
			}
			let mass = match node.radius {
				Some(r) => (r / config.node_radius).powi(2),
				None => 1.0,
			};

			let (sx, sy) = spiral_position(i, center);
			nodes.push(Node {
				id: node.id.clone(),
				name: node.name.clone(),
				text: node.text.clone(),
				color: node.color.clone(),
				radius,
				mass,
				x: node.x.unwrap_or(sx),
				y: node.y.unwrap_or(sy),
				vx: 0.0,
				vy: 0.0,
				pin: None,
			});
		}

		let mut links = Vec::with_capacity(data.links.len());
		let mut degree = vec![0; nodes.len()];

		for (i, link) in data.links.iter().enumerate() {
			let resolve = |id: &str| {
				index
					.get(id)
					.copied()
					.ok_or_else(|| ConfigError::MissingEndpoint {
						link: i,
						source_id: link.source.clone(),
						target_id: link.target.clone(),
						missing: id.to_string(),
					})
			};
			let source = resolve(&link.source)?;
			let target = resolve(&link.target)?;

			let distance = link.distance.unwrap_or(config.link_distance);
			if !(distance > 0.0 && distance.is_finite()) {
				return Err(ConfigError::InvalidDistance { link: i, distance });
			}

			degree[source] += 1;
			degree[target] += 1;
			links.push(Link {
				source_id: link.source.clone(),
				target_id: link.target.clone(),
				source,
				target,
				distance,
			});
		}

		info!("graph model: {} nodes, {} links", nodes.len(), links.len());

		Ok(Self {
			nodes,
			links,
			index,
			degree,
		})
	}

	/// Nodes in input order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Links in input order.
	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// True for a graph with no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Node at an index.
	pub fn node(&self, idx: usize) -> Option<&Node> {
		self.nodes.get(idx)
	}

	/// O(1) lookup by id.
	pub fn find_node(&self, id: &str) -> Option<&Node> {
		self.index_of(id).map(|idx| &self.nodes[idx])
	}

	/// Index of the node with this id.
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Number of link endpoints at this node. Self-links count twice.
	pub fn degree(&self, idx: usize) -> usize {
		self.degree.get(idx).copied().unwrap_or(0)
	}

	/// Fixes a node at `(x, y)`. Returns false if the index is out of range.
	pub fn pin(&mut self, idx: usize, x: f64, y: f64) -> bool {
		match self.nodes.get_mut(idx) {
			Some(node) => {
				node.pin = Some((x, y));
				true
			}
			None => false,
		}
	}

	/// Releases a pin so the node moves freely again.
	pub fn unpin(&mut self, idx: usize) -> bool {
		match self.nodes.get_mut(idx) {
			Some(node) => {
				node.pin = None;
				true
			}
			None => false,
		}
	}

	pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
		&mut self.nodes
	}

	/// Mutable nodes alongside the read-only links and degrees.
	pub(crate) fn parts_mut(&mut self) -> (&mut [Node], &[Link], &[usize]) {
		(self.nodes.as_mut_slice(), self.links.as_slice(), self.degree.as_slice())
	}
}

/// Phyllotaxis placement: evenly spread, deterministic, no coincident points.
fn spiral_position(i: usize, (cx, cy): (f64, f64)) -> (f64, f64) {
	let angle_step = PI * (3.0 - 5f64.sqrt());
	let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
	let angle = i as f64 * angle_step;
	(cx + radius * angle.cos(), cy + radius * angle.sin())
}
