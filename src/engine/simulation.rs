//! Integration loop and energy schedule.
//!
//! Each tick clamps pinned nodes, accumulates the forces at the current
//! `alpha`, integrates velocity into position with damping, then decays
//! `alpha` toward `alpha_target`. Once `alpha` drops below `alpha_min` the
//! simulation stops itself; a drag reheats it.

use log::debug;

use super::config::SimulationConfig;
use super::forces::ForceModel;
use super::graph::{GraphModel, Node};

/// Whether the simulation is ticking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Status {
	/// Idle; ticks are refused.
	#[default]
	Stopped,
	/// Ticking on every frame.
	Running,
}

/// Fixed-step clock converting wall-clock frames into a tick count.
///
/// Backlog beyond `max_per_frame` ticks is dropped, so a slow frame slows
/// the layout down instead of stalling the next frame.
#[derive(Clone, Debug)]
pub struct TickClock {
	interval_ms: f64,
	max_per_frame: u32,
	last: Option<f64>,
	backlog: f64,
}

impl TickClock {
	/// `rate` ticks per second, at most `max_per_frame` at once.
	pub fn new(rate: f64, max_per_frame: u32) -> Self {
		Self {
			interval_ms: 1000.0 / rate.max(1.0),
			max_per_frame: max_per_frame.max(1),
			last: None,
			backlog: 0.0,
		}
	}

	/// Ticks owed at `now_ms`. The first call after a reset owes one.
	pub fn due(&mut self, now_ms: f64) -> u32 {
		let Some(last) = self.last.replace(now_ms) else {
			return 1;
		};
		self.backlog += (now_ms - last).max(0.0);
		let owed = (self.backlog / self.interval_ms).floor();
		let ticks = owed.min(self.max_per_frame as f64);
		self.backlog -= ticks * self.interval_ms;
		if owed > ticks {
			self.backlog = self.backlog.min(self.interval_ms);
		}
		ticks as u32
	}

	/// Forgets the last frame time and any backlog.
	pub fn reset(&mut self) {
		self.last = None;
		self.backlog = 0.0;
	}
}

/// The force simulation: energy state, force model and clock.
#[derive(Clone, Debug)]
pub struct Simulation {
	config: SimulationConfig,
	forces: ForceModel,
	clock: TickClock,
	alpha: f64,
	alpha_target: f64,
	status: Status,
	ticks: u64,
}

impl Simulation {
	/// A stopped simulation at full energy.
	pub fn new(config: SimulationConfig, forces: ForceModel) -> Self {
		let clock = TickClock::new(config.tick_rate, config.max_ticks_per_frame);
		Self {
			config,
			forces,
			clock,
			alpha: 1.0,
			alpha_target: 0.0,
			status: Status::Stopped,
			ticks: 0,
		}
	}

	/// Schedule parameters.
	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	/// Forces applied each tick.
	pub fn forces(&self) -> &ForceModel {
		&self.forces
	}

	/// Mutable forces, e.g. to move the centre.
	pub fn forces_mut(&mut self) -> &mut ForceModel {
		&mut self.forces
	}

	/// Current energy in `[0, 1]`.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Energy that alpha decays toward.
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Run state.
	pub fn status(&self) -> Status {
		self.status
	}

	/// Shorthand for `status() == Status::Running`.
	pub fn is_running(&self) -> bool {
		self.status == Status::Running
	}

	/// Total ticks integrated since construction.
	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	/// Overrides the current energy, clamped to `[0, 1]`.
	pub fn set_alpha(&mut self, alpha: f64) {
		self.alpha = alpha.clamp(0.0, 1.0);
	}

	/// Resumes ticking from the current alpha. No-op while running.
	pub fn start(&mut self) {
		if self.status == Status::Running {
			return;
		}
		self.status = Status::Running;
		self.clock.reset();
		debug!("simulation started at alpha {:.4}", self.alpha);
	}

	/// Halts ticking. Safe to call in any state.
	pub fn stop(&mut self) {
		if self.status == Status::Stopped {
			return;
		}
		self.status = Status::Stopped;
		debug!("simulation stopped after {} ticks", self.ticks);
	}

	/// Holds energy at `target` so the layout keeps responding, restarting
	/// if needed. Alpha then climbs toward the target through the normal
	/// decay step.
	pub fn reheat(&mut self, target: f64) {
		self.alpha_target = target.clamp(0.0, 1.0);
		self.alpha = self.alpha.max(self.config.alpha_min);
		debug!("simulation reheated toward {:.3}", self.alpha_target);
		self.start();
	}

	/// Lets the layout settle again after a reheat.
	pub fn cool(&mut self) {
		self.alpha_target = 0.0;
		debug!("simulation cooling");
	}

	/// Ticks owed by the clock at `now_ms`, or zero while stopped.
	pub fn due_ticks(&mut self, now_ms: f64) -> u32 {
		if self.is_running() {
			self.clock.due(now_ms)
		} else {
			0
		}
	}

	/// Advances one step. Returns false without doing anything when stopped.
	pub fn tick(&mut self, graph: &mut GraphModel) -> bool {
		if !self.is_running() {
			return false;
		}

		graph.nodes_mut().iter_mut().for_each(clamp_pin);
		self.forces.apply(graph, self.alpha);

		let retain = self.config.velocity_decay;
		for node in graph.nodes_mut() {
			if node.pin.is_some() {
				clamp_pin(node);
			} else {
				node.vx *= retain;
				node.vy *= retain;
				node.x += node.vx;
				node.y += node.vy;
			}
		}

		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
		self.ticks += 1;

		if self.alpha < self.config.alpha_min {
			debug!("simulation converged at alpha {:.5}", self.alpha);
			self.stop();
		}
		true
	}

	/// Ticks synchronously until the simulation stops or `max_ticks` have run.
	/// Returns the number of ticks run.
	pub fn settle(&mut self, graph: &mut GraphModel, max_ticks: usize) -> usize {
		let mut run = 0;
		while run < max_ticks && self.tick(graph) {
			run += 1;
		}
		run
	}
}

fn clamp_pin(node: &mut Node) {
	if let Some((fx, fy)) = node.pin {
		node.x = fx;
		node.y = fy;
		node.vx = 0.0;
		node.vy = 0.0;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::config::{ForceConfig, GraphConfig};
	use crate::engine::types::{GraphData, GraphLink, GraphNode};

	const CENTER: (f64, f64) = (400.0, 300.0);

	fn pentagon() -> GraphData {
		GraphData {
			nodes: ["1", "2", "3", "4", "5"].into_iter().map(GraphNode::new).collect(),
			links: [("1", "2"), ("1", "3"), ("2", "4"), ("3", "5"), ("4", "5")]
				.into_iter()
				.map(|(s, t)| GraphLink::new(s, t))
				.collect(),
		}
	}

	fn setup(data: &GraphData) -> (GraphModel, Simulation) {
		let graph_config = GraphConfig {
			node_radius: 7.0,
			link_distance: 50.0,
		};
		let graph = GraphModel::new(data, &graph_config, CENTER).unwrap();
		let forces = ForceModel::new(ForceConfig::default(), CENTER);
		let mut sim = Simulation::new(SimulationConfig::default(), forces);
		sim.start();
		(graph, sim)
	}

	fn distance(graph: &GraphModel, a: usize, b: usize) -> f64 {
		let (na, nb) = (&graph.nodes()[a], &graph.nodes()[b]);
		((na.x - nb.x).powi(2) + (na.y - nb.y).powi(2)).sqrt()
	}

	#[test]
	fn converges_in_finite_ticks() {
		let (mut graph, mut sim) = setup(&pentagon());
		let ran = sim.settle(&mut graph, 10_000);
		assert!(ran < 10_000);
		assert!(ran > 250, "ran {ran}");
		assert!(!sim.is_running());
		assert!(sim.alpha() < sim.config().alpha_min);
		for node in graph.nodes() {
			assert!(node.x.is_finite() && node.y.is_finite());
		}
	}

	#[test]
	fn linked_pairs_sit_nearer_rest_length_than_unlinked_pairs() {
		let data = pentagon();
		let (mut graph, mut sim) = setup(&data);
		sim.settle(&mut graph, 10_000);

		let mut linked = Vec::new();
		let mut unlinked = Vec::new();
		for a in 0..graph.len() {
			for b in (a + 1)..graph.len() {
				let is_linked = graph
					.links()
					.iter()
					.any(|l| (l.source, l.target) == (a, b) || (l.source, l.target) == (b, a));
				let deviation = (distance(&graph, a, b) - 50.0).abs();
				if is_linked {
					linked.push(deviation);
				} else {
					unlinked.push(deviation);
				}
			}
		}
		let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
		assert!(mean(&linked) < mean(&unlinked));
	}

	#[test]
	fn layout_centroid_sits_on_center() {
		let (mut graph, mut sim) = setup(&pentagon());
		sim.settle(&mut graph, 10_000);
		let n = graph.len() as f64;
		let cx = graph.nodes().iter().map(|n| n.x).sum::<f64>() / n;
		let cy = graph.nodes().iter().map(|n| n.y).sum::<f64>() / n;
		assert!((cx - CENTER.0).abs() < 1.0 && (cy - CENTER.1).abs() < 1.0);
	}

	#[test]
	fn pinned_node_never_moves() {
		let (mut graph, mut sim) = setup(&pentagon());
		graph.pin(2, 123.0, 456.0);
		sim.reheat(0.3);
		for _ in 0..500 {
			sim.tick(&mut graph);
			let node = &graph.nodes()[2];
			assert_eq!((node.x, node.y), (123.0, 456.0));
			assert_eq!((node.vx, node.vy), (0.0, 0.0));
		}
		assert!(sim.is_running());
	}

	#[test]
	fn reheat_raises_energy_and_cool_lets_it_settle() {
		let (mut graph, mut sim) = setup(&pentagon());
		sim.settle(&mut graph, 10_000);
		let settled = sim.alpha();

		sim.reheat(0.3);
		assert!(sim.is_running());
		assert_eq!(sim.alpha_target(), 0.3);
		for _ in 0..50 {
			sim.tick(&mut graph);
		}
		assert!(sim.alpha() > settled);
		assert!(sim.alpha() <= 0.3);

		sim.cool();
		assert_eq!(sim.alpha_target(), 0.0);
		let ran = sim.settle(&mut graph, 10_000);
		assert!(ran < 10_000);
		assert!(!sim.is_running());
	}

	#[test]
	fn stop_is_idempotent_and_stopped_ticks_do_nothing() {
		let (mut graph, mut sim) = setup(&pentagon());
		sim.stop();
		sim.stop();
		assert_eq!(sim.status(), Status::Stopped);
		let before = graph.nodes().to_vec();
		assert!(!sim.tick(&mut graph));
		assert_eq!(graph.nodes(), before.as_slice());
		assert_eq!(sim.ticks(), 0);
	}

	#[test]
	fn empty_graph_still_converges() {
		let (mut graph, mut sim) = setup(&GraphData::default());
		assert!(sim.settle(&mut graph, 10_000) < 10_000);
	}

	#[test]
	fn clock_caps_catch_up_and_drops_backlog() {
		let mut clock = TickClock::new(60.0, 4);
		assert_eq!(clock.due(0.0), 1);
		assert_eq!(clock.due(1000.0 / 60.0 + 0.01), 1);
		assert_eq!(clock.due(1000.0 / 60.0 + 0.01), 0);
		// a one-second stall only owes the cap
		assert_eq!(clock.due(1100.0), 4);
		assert!(clock.due(1101.0) <= 1);
	}

	#[test]
	fn stopped_simulation_owes_no_ticks() {
		let (_, mut sim) = setup(&pentagon());
		sim.stop();
		assert_eq!(sim.due_ticks(0.0), 0);
		sim.start();
		assert_eq!(sim.due_ticks(0.0), 1);
	}
}
