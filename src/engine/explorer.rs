//! Composition root wiring model, simulation, viewport, input and paint.

use log::{info, warn};

use super::config::ExplorerConfig;
use super::error::Result;
use super::forces::ForceModel;
use super::graph::{GraphModel, Node};
use super::interaction::{InteractionController, PointerEvent, Scene, SelectionState};
use super::queue::{Task, TaskQueue};
use super::render::{FrameStamp, RenderSync, Surface};
use super::simulation::Simulation;
use super::types::GraphData;
use super::viewport::ViewportController;

/// An explorable graph bound to one kind of drawing surface.
///
/// The host feeds it pointer events as they arrive and calls
/// [`frame`](Self::frame) once per display refresh. Everything runs on the
/// caller's thread; a frame drains queued input before the ticks it owes,
/// then advances the view animation and paints.
pub struct Explorer<S: Surface> {
	graph: GraphModel,
	simulation: Simulation,
	viewport: ViewportController,
	interaction: InteractionController,
	render: RenderSync<S>,
	queue: TaskQueue,
	surface_revision: u64,
}

impl<S: Surface> Explorer<S> {
	/// Validates `config` and `data` and starts the simulation.
	pub fn new(data: &GraphData, config: ExplorerConfig) -> Result<Self> {
		config.validate()?;
		let center = (config.width / 2.0, config.height / 2.0);

		let graph = GraphModel::new(data, &config.graph, center)?;
		let viewport = ViewportController::new(config.viewport, config.width, config.height)?;
		let interaction =
			InteractionController::new(config.interaction, config.simulation.drag_alpha_target);
		let mut simulation = Simulation::new(config.simulation, ForceModel::new(config.forces, center));
		simulation.start();

		info!(
			"explorer ready: {} nodes on a {}x{} surface",
			graph.len(),
			config.width,
			config.height
		);

		Ok(Self {
			graph,
			simulation,
			viewport,
			interaction,
			render: RenderSync::new(),
			queue: TaskQueue::new(),
			surface_revision: 0,
		})
	}

	/// Registers the selection-change callback, replacing any previous one.
	pub fn set_on_select(&mut self, callback: impl FnMut(Option<&Node>) + 'static) {
		self.interaction.set_on_select(Box::new(callback));
	}

	/// Queues a task for the next frame.
	pub fn enqueue(&mut self, task: Task) {
		self.queue.push(task);
	}

	/// Queues a pointer event for the next frame.
	pub fn pointer(&mut self, event: PointerEvent) {
		self.enqueue(Task::Pointer(event));
	}

	/// Queues a resize behind any pending input.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.enqueue(Task::Resize { width, height });
	}

	/// Runs one display frame at `now_ms`. Returns whether anything was
	/// painted.
	pub fn frame(&mut self, now_ms: f64, surface: &mut S) -> bool {
		let due = self.simulation.due_ticks(now_ms);
		self.queue.push_ticks(due);
		while let Some(task) = self.queue.pop() {
			self.run(task, now_ms);
		}
		self.viewport.step(now_ms);

		let stamp = FrameStamp {
			ticks: self.simulation.ticks(),
			view: self.viewport.revision(),
			selection: self.interaction.selection().revision(),
			surface: self.surface_revision,
		};
		self.render.paint(
			surface,
			&self.graph,
			self.viewport.transform(),
			self.interaction.selection(),
			stamp,
		)
	}

	fn run(&mut self, task: Task, now_ms: f64) {
		match task {
			Task::Pointer(event) => {
				let scene = Scene {
					graph: &mut self.graph,
					simulation: &mut self.simulation,
					viewport: &mut self.viewport,
				};
				self.interaction.handle(&event, scene, now_ms);
			}
			Task::Tick => {
				self.simulation.tick(&mut self.graph);
			}
			Task::Resize { width, height } => self.apply_resize(width, height),
		}
	}

	fn apply_resize(&mut self, width: f64, height: f64) {
		if !(width > 0.0 && height > 0.0) {
			warn!("ignoring resize to {}x{}", width, height);
			return;
		}
		self.viewport.resize(width, height);
		self.simulation.forces_mut().set_center(width / 2.0, height / 2.0);
		self.surface_revision += 1;
		info!("surface resized to {}x{}", width, height);
	}

	/// Halts the simulation. Input and view animation keep working, and a
	/// later press on a node restarts the layout the same way a drag always
	/// reheats it. Panning, zooming and clicking empty canvas leave it
	/// stopped.
	pub fn stop(&mut self) {
		self.simulation.stop();
	}

	/// Removes every primitive from `surface`.
	pub fn detach(&mut self, surface: &mut S) {
		self.render.detach(surface);
	}

	/// Nodes and links with their current positions.
	pub fn graph(&self) -> &GraphModel {
		&self.graph
	}

	/// Energy and run state of the layout.
	pub fn simulation(&self) -> &Simulation {
		&self.simulation
	}

	/// Pan and zoom state.
	pub fn viewport(&self) -> &ViewportController {
		&self.viewport
	}

	/// Current selection.
	pub fn selection(&self) -> &SelectionState {
		self.interaction.selection()
	}

	/// Gesture state.
	pub fn interaction(&self) -> &InteractionController {
		&self.interaction
	}

	/// Number of tasks waiting for the next frame.
	pub fn pending(&self) -> usize {
		self.queue.len()
	}
}
