//! The four layout forces.
//!
//! Each force reads node positions and adds into node velocities (centering
//! shifts positions directly). Forces never integrate; that is the
//! simulation's job. Applied in order: links, repulsion, centering,
//! collision.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::config::ForceConfig;
use super::graph::{GraphModel, Link, Node};
use super::quadtree::{CellKind, QuadTree, Visit};

/// Tiny random offsets used to separate coincident nodes.
#[derive(Clone, Debug)]
pub struct Jiggle(SmallRng);

impl Jiggle {
	/// Seeded so layouts are reproducible.
	pub fn new(seed: u64) -> Self {
		Self(SmallRng::seed_from_u64(seed))
	}

	/// Non-zero offset in `(-5e-7, 5e-7)`.
	pub fn next(&mut self) -> f64 {
		loop {
			let offset = (self.0.r#gen::<f64>() - 0.5) * 1e-6;
			if offset != 0.0 {
				return offset;
			}
		}
	}
}

/// Force parameters plus the jitter source and centering target.
#[derive(Clone, Debug)]
pub struct ForceModel {
	config: ForceConfig,
	center: (f64, f64),
	jiggle: Jiggle,
}

impl ForceModel {
	/// Forces pulling toward `center`.
	pub fn new(config: ForceConfig, center: (f64, f64)) -> Self {
		let jiggle = Jiggle::new(config.seed);
		Self {
			config,
			center,
			jiggle,
		}
	}

	/// Parameters in use.
	pub fn config(&self) -> &ForceConfig {
		&self.config
	}

	/// Current centering target.
	pub fn center(&self) -> (f64, f64) {
		self.center
	}

	/// Moves the centering target, e.g. after a resize.
	pub fn set_center(&mut self, x: f64, y: f64) {
		self.center = (x, y);
	}

	/// Accumulates every force for one tick at energy `alpha`.
	pub fn apply(&mut self, graph: &mut GraphModel, alpha: f64) {
		let (nodes, links, degree) = graph.parts_mut();

		for _ in 0..self.config.link_iterations {
			apply_links(nodes, links, degree, &self.config, alpha, &mut self.jiggle);
		}
		apply_repulsion(nodes, &self.config, alpha, &mut self.jiggle);
		apply_centering(nodes, self.center, self.config.center_strength);
		for _ in 0..self.config.collision_iterations {
			apply_collision(nodes, &self.config, &mut self.jiggle);
		}
	}
}

/// Springs pulling each link toward its rest length.
///
/// Uses velocity-predicted positions. The correction is split between the
/// endpoints by degree so well-connected nodes move less.
pub fn apply_links(
	nodes: &mut [Node],
	links: &[Link],
	degree: &[usize],
	config: &ForceConfig,
	alpha: f64,
	jiggle: &mut Jiggle,
) {
	for link in links {
		if link.is_self_link() {
			continue;
		}
		let (s, t) = (link.source, link.target);
		let (ds, dt) = (degree[s] as f64, degree[t] as f64);
		let strength = config.link_strength / ds.min(dt);
		let bias = ds / (ds + dt);

		let (source, target) = (&nodes[s], &nodes[t]);
		let mut x = target.x + target.vx - source.x - source.vx;
		let mut y = target.y + target.vy - source.y - source.vy;
		if x == 0.0 {
			x = jiggle.next();
		}
		if y == 0.0 {
			y = jiggle.next();
		}
		let l = (x * x + y * y).sqrt();
		let k = (l - link.distance) / l * alpha * strength;
		x *= k;
		y *= k;

		nodes[t].vx -= x * bias;
		nodes[t].vy -= y * bias;
		nodes[s].vx += x * (1.0 - bias);
		nodes[s].vy += y * (1.0 - bias);
	}
}

/// Inverse-square many-body force, approximated with a Barnes–Hut tree.
pub fn apply_repulsion(nodes: &mut [Node], config: &ForceConfig, alpha: f64, jiggle: &mut Jiggle) {
	if nodes.len() < 2 {
		return;
	}
	let tree = QuadTree::build(
		nodes.iter().map(|n| (n.x, n.y)).collect(),
		nodes.iter().map(|n| config.charge_strength * n.mass).collect(),
	);
	let theta2 = config.theta * config.theta;
	let dmin2 = config.distance_min * config.distance_min;
	let dmax2 = config.distance_max * config.distance_max;

	for (i, node) in nodes.iter_mut().enumerate() {
		let (xi, yi) = (node.x, node.y);
		let (mut ax, mut ay) = (0.0, 0.0);
		let mut push = |mut x: f64, mut y: f64, charge: f64, jiggle: &mut Jiggle| {
			let mut l = x * x + y * y;
			if l >= dmax2 {
				return;
			}
			if x == 0.0 {
				x = jiggle.next();
				l += x * x;
			}
			if y == 0.0 {
				y = jiggle.next();
				l += y * y;
			}
			if l < dmin2 {
				l = (dmin2 * l).sqrt();
			}
			let w = charge * alpha / l;
			ax += x * w;
			ay += y * w;
		};

		tree.visit(|cell| match &cell.kind {
			CellKind::Branch(_) => {
				let (x, y) = (cell.cx - xi, cell.cy - yi);
				if cell.size * cell.size < theta2 * (x * x + y * y) {
					push(x, y, cell.charge, jiggle);
					Visit::Skip
				} else {
					Visit::Descend
				}
			}
			CellKind::Leaf(members) => {
				for &j in members.iter().filter(|&&j| j != i) {
					let (xj, yj) = tree.point(j);
					push(xj - xi, yj - yi, tree.charge(j), jiggle);
				}
				Visit::Skip
			}
		});

		node.vx += ax;
		node.vy += ay;
	}
}

/// Shifts every free node by the same amount so their centroid moves toward
/// `center`. Pinned nodes neither count toward the centroid nor move.
pub fn apply_centering(nodes: &mut [Node], (cx, cy): (f64, f64), strength: f64) {
	let (mut sx, mut sy, mut n) = (0.0, 0.0, 0usize);
	for node in nodes.iter().filter(|n| !n.is_pinned()) {
		sx += node.x;
		sy += node.y;
		n += 1;
	}
	if n == 0 {
		return;
	}
	let dx = (sx / n as f64 - cx) * strength;
	let dy = (sy / n as f64 - cy) * strength;
	for node in nodes.iter_mut().filter(|n| !n.is_pinned()) {
		node.x -= dx;
		node.y -= dy;
	}
}

/// Pushes apart any pair whose collision circles overlap, on
/// velocity-predicted positions. Smaller nodes take more of the push.
pub fn apply_collision(nodes: &mut [Node], config: &ForceConfig, jiggle: &mut Jiggle) {
	let factor = config.collision_factor;
	for i in 0..nodes.len() {
		let ri = nodes[i].radius * factor;
		let xi = nodes[i].x + nodes[i].vx;
		let yi = nodes[i].y + nodes[i].vy;

		for j in (i + 1)..nodes.len() {
			let rj = nodes[j].radius * factor;
			let r = ri + rj;
			let mut x = xi - (nodes[j].x + nodes[j].vx);
			let mut y = yi - (nodes[j].y + nodes[j].vy);
			let mut l = x * x + y * y;
			if l >= r * r {
				continue;
			}
			if x == 0.0 {
				x = jiggle.next();
				l += x * x;
			}
			if y == 0.0 {
				y = jiggle.next();
				l += y * y;
			}
			let d = l.sqrt();
			let k = (r - d) / d * config.collision_strength;
			x *= k;
			y *= k;

			let share = (rj * rj) / (ri * ri + rj * rj);
			nodes[i].vx += x * share;
			nodes[i].vy += y * share;
			nodes[j].vx -= x * (1.0 - share);
			nodes[j].vy -= y * (1.0 - share);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::config::GraphConfig;
	use crate::engine::types::{GraphData, GraphLink, GraphNode};

	fn at(id: &str, x: f64, y: f64) -> GraphNode {
		GraphNode {
			x: Some(x),
			y: Some(y),
			..GraphNode::new(id)
		}
	}

	fn model(nodes: Vec<GraphNode>, links: Vec<GraphLink>) -> GraphModel {
		GraphModel::new(&GraphData { nodes, links }, &GraphConfig::default(), (0.0, 0.0)).unwrap()
	}

	fn velocities(graph: &GraphModel) -> Vec<(f64, f64)> {
		graph.nodes().iter().map(|n| (n.vx, n.vy)).collect()
	}

	#[test]
	fn repulsion_pushes_pair_apart_symmetrically() {
		let mut graph = model(vec![at("a", 0.0, 0.0), at("b", 10.0, 0.0)], vec![]);
		let mut jiggle = Jiggle::new(1);
		apply_repulsion(graph.nodes_mut(), &ForceConfig::default(), 1.0, &mut jiggle);
		let v = velocities(&graph);
		assert!(v[0].0 < 0.0 && v[1].0 > 0.0);
		assert!((v[0].0 + v[1].0).abs() < 1e-12);
		// -100 * 1 / 100 * 10 = -10
		assert!((v[0].0 + 10.0).abs() < 1e-9);
	}

	#[test]
	fn coincident_nodes_get_finite_separating_velocity() {
		let mut graph = model(vec![at("a", 5.0, 5.0), at("b", 5.0, 5.0)], vec![]);
		let mut jiggle = Jiggle::new(7);
		apply_repulsion(graph.nodes_mut(), &ForceConfig::default(), 1.0, &mut jiggle);
		apply_collision(graph.nodes_mut(), &ForceConfig::default(), &mut jiggle);
		for (vx, vy) in velocities(&graph) {
			assert!(vx.is_finite() && vy.is_finite());
		}
		let v = velocities(&graph);
		assert!(v[0] != v[1]);
	}

	#[test]
	fn barnes_hut_stays_close_to_exact_sum() {
		let nodes: Vec<_> = (0..40)
			.map(|i| {
				let a = i as f64 * 0.7;
				at(&i.to_string(), a.cos() * (20.0 + i as f64 * 3.0), a.sin() * (20.0 + i as f64 * 3.0))
			})
			.collect();
		let mut exact = model(nodes.clone(), vec![]);
		let mut approx = model(nodes, vec![]);
		let exact_config = ForceConfig {
			theta: 0.0,
			..Default::default()
		};
		apply_repulsion(exact.nodes_mut(), &exact_config, 1.0, &mut Jiggle::new(1));
		apply_repulsion(approx.nodes_mut(), &ForceConfig::default(), 1.0, &mut Jiggle::new(1));

		let (mut total_err, mut total_norm) = (0.0, 0.0);
		for (e, a) in velocities(&exact).iter().zip(velocities(&approx)) {
			total_norm += (e.0 * e.0 + e.1 * e.1).sqrt();
			total_err += ((e.0 - a.0).powi(2) + (e.1 - a.1).powi(2)).sqrt();
		}
		assert!(total_err < 0.15 * total_norm, "error {total_err} vs magnitude {total_norm}");
	}

	#[test]
	fn stretched_link_pulls_endpoints_together() {
		let mut graph = model(
			vec![at("a", 0.0, 0.0), at("b", 100.0, 0.0)],
			vec![GraphLink::new("a", "b")],
		);
		let links = graph.links().to_vec();
		apply_links(graph.nodes_mut(), &links, &[1, 1], &ForceConfig::default(), 1.0, &mut Jiggle::new(1));
		let v = velocities(&graph);
		// (100 - 50) / 100 * 100 = 50, split evenly
		assert!((v[0].0 - 25.0).abs() < 1e-9);
		assert!((v[1].0 + 25.0).abs() < 1e-9);
	}

	#[test]
	fn compressed_link_pushes_endpoints_apart() {
		let mut graph = model(
			vec![at("a", 0.0, 0.0), at("b", 10.0, 0.0)],
			vec![GraphLink::new("a", "b")],
		);
		let links = graph.links().to_vec();
		apply_links(graph.nodes_mut(), &links, &[1, 1], &ForceConfig::default(), 1.0, &mut Jiggle::new(1));
		let v = velocities(&graph);
		assert!(v[0].0 < 0.0 && v[1].0 > 0.0);
	}

	#[test]
	fn higher_degree_endpoint_moves_less() {
		let mut graph = model(
			vec![at("hub", 0.0, 0.0), at("leaf", 100.0, 0.0), at("x", 0.0, 50.0), at("y", 0.0, -50.0)],
			vec![GraphLink::new("hub", "leaf"), GraphLink::new("hub", "x"), GraphLink::new("hub", "y")],
		);
		let links = graph.links()[..1].to_vec();
		apply_links(graph.nodes_mut(), &links, &[3, 1, 1, 1], &ForceConfig::default(), 1.0, &mut Jiggle::new(1));
		let v = velocities(&graph);
		assert!(v[0].0.abs() < v[1].0.abs());
	}

	#[test]
	fn self_link_contributes_nothing() {
		let mut graph = model(vec![at("a", 3.0, 4.0)], vec![GraphLink::new("a", "a")]);
		let links = graph.links().to_vec();
		apply_links(graph.nodes_mut(), &links, &[2], &ForceConfig::default(), 1.0, &mut Jiggle::new(1));
		assert_eq!(velocities(&graph), vec![(0.0, 0.0)]);
	}

	#[test]
	fn centering_moves_free_centroid_onto_target() {
		let mut graph = model(
			vec![at("a", 0.0, 0.0), at("b", 20.0, 10.0), at("pinned", 500.0, 500.0)],
			vec![],
		);
		graph.pin(2, 500.0, 500.0);
		apply_centering(graph.nodes_mut(), (100.0, 100.0), 1.0);
		let n = graph.nodes();
		assert_eq!((n[0].x, n[0].y), (90.0, 95.0));
		assert_eq!((n[1].x, n[1].y), (110.0, 105.0));
		assert_eq!((n[2].x, n[2].y), (500.0, 500.0));
	}

	#[test]
	fn overlapping_nodes_are_pushed_apart() {
		let mut graph = model(vec![at("a", 0.0, 0.0), at("b", 4.0, 0.0)], vec![]);
		apply_collision(graph.nodes_mut(), &ForceConfig::default(), &mut Jiggle::new(1));
		let v = velocities(&graph);
		// radii 7.5 each, overlap of 11 split evenly
		assert!((v[0].0 + 5.5).abs() < 1e-9);
		assert!((v[1].0 - 5.5).abs() < 1e-9);
	}

	#[test]
	fn separated_nodes_do_not_collide() {
		let mut graph = model(vec![at("a", 0.0, 0.0), at("b", 40.0, 0.0)], vec![]);
		apply_collision(graph.nodes_mut(), &ForceConfig::default(), &mut Jiggle::new(1));
		assert_eq!(velocities(&graph), vec![(0.0, 0.0), (0.0, 0.0)]);
	}
}
