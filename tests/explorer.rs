//! End-to-end behaviour of the explorer through its public API.

#![allow(unused_crate_dependencies)]

use std::cell::RefCell;
use std::rc::Rc;

use graph_explorer::engine::{
	CircleStyle, ConfigError, Explorer, ExplorerConfig, Fill, GraphData, GraphLink, GraphNode,
	LineCoords, Node, PointerEvent, Surface,
};

const FRAME_MS: f64 = 17.0;

#[derive(Clone, Debug, PartialEq)]
struct Circle {
	cx: f64,
	cy: f64,
	r: f64,
	highlighted: bool,
	label: String,
}

#[derive(Default)]
struct Recording {
	circles: Vec<Option<Circle>>,
	lines: Vec<Option<LineCoords>>,
	frames: usize,
}

impl Recording {
	fn live_circles(&self) -> usize {
		self.circles.iter().flatten().count()
	}

	fn highlighted(&self) -> Vec<usize> {
		self.circles
			.iter()
			.enumerate()
			.filter(|(_, c)| c.as_ref().is_some_and(|c| c.highlighted))
			.map(|(i, _)| i)
			.collect()
	}
}

impl Surface for Recording {
	type Circle = usize;
	type Line = usize;

	fn create_circle(&mut self) -> usize {
		self.circles.push(None);
		self.circles.len() - 1
	}

	fn create_line(&mut self) -> usize {
		self.lines.push(None);
		self.lines.len() - 1
	}

	fn remove_circle(&mut self, circle: usize) {
		self.circles[circle] = None;
	}

	fn remove_line(&mut self, line: usize) {
		self.lines[line] = None;
	}

	fn update_circle(&mut self, circle: &usize, style: &CircleStyle<'_>) {
		self.circles[*circle] = Some(Circle {
			cx: style.cx,
			cy: style.cy,
			r: style.r,
			highlighted: style.fill == Fill::Highlight,
			label: style.label.to_string(),
		});
	}

	fn update_line(&mut self, line: &usize, coords: LineCoords) {
		self.lines[*line] = Some(coords);
	}

	fn present(&mut self) {
		self.frames += 1;
	}
}

fn ring() -> GraphData {
	GraphData {
		nodes: (1..=5)
			.map(|i| GraphNode {
				text: Some(format!("Hello Node {i}")),
				..GraphNode::new(i.to_string())
			})
			.collect(),
		links: [("1", "2"), ("1", "3"), ("2", "4"), ("3", "5"), ("4", "5")]
			.into_iter()
			.map(|(s, t)| GraphLink::new(s, t))
			.collect(),
	}
}

struct Harness {
	explorer: Explorer<Recording>,
	surface: Recording,
	now: f64,
	selections: Rc<RefCell<Vec<Option<String>>>>,
}

impl Harness {
	fn new() -> Self {
		Self::with_data(ring())
	}

	fn with_data(data: GraphData) -> Self {
		let mut config = ExplorerConfig::default();
		config.graph.node_radius = 7.0;
		let mut explorer = Explorer::new(&data, config).unwrap();

		let selections = Rc::new(RefCell::new(Vec::new()));
		let sink = selections.clone();
		explorer.set_on_select(move |node: Option<&Node>| {
			sink.borrow_mut().push(node.map(|n| n.id.clone()));
		});

		let mut harness = Self {
			explorer,
			surface: Recording::default(),
			now: 0.0,
			selections,
		};
		harness.frame();
		harness
	}

	fn frame(&mut self) -> bool {
		let painted = self.explorer.frame(self.now, &mut self.surface);
		self.now += FRAME_MS;
		painted
	}

	fn frames(&mut self, count: usize) {
		for _ in 0..count {
			self.frame();
		}
	}

	fn settle(&mut self) {
		for _ in 0..5_000 {
			if !self.explorer.simulation().is_running() {
				return;
			}
			self.frame();
		}
		panic!("layout never settled");
	}

	fn surface_pos(&self, id: &str) -> (f64, f64) {
		let node = self.explorer.graph().find_node(id).unwrap();
		self.explorer.viewport().transform().apply(node.position())
	}

	fn click(&mut self, (x, y): (f64, f64)) {
		self.explorer.pointer(PointerEvent::down(x, y));
		self.explorer.pointer(PointerEvent::up(x, y));
		self.frame();
	}
}

#[test]
fn rejects_invalid_input_without_building() {
	let mut data = ring();
	data.links.push(GraphLink::new("5", "6"));
	let result = Explorer::<Recording>::new(&data, ExplorerConfig::default());
	assert!(matches!(
		result,
		Err(ConfigError::MissingEndpoint { link: 5, ref missing, .. }) if missing == "6"
	));

	let config = ExplorerConfig {
		width: 0.0,
		..Default::default()
	};
	assert!(matches!(
		Explorer::<Recording>::new(&ring(), config),
		Err(ConfigError::InvalidCanvas { .. })
	));
}

#[test]
fn zero_default_radius_is_rejected_even_when_nodes_bring_their_own() {
	let mut data = ring();
	for node in &mut data.nodes {
		node.radius = Some(5.0);
	}
	let mut config = ExplorerConfig::default();
	config.graph.node_radius = 0.0;
	assert!(matches!(
		Explorer::<Recording>::new(&data, config),
		Err(ConfigError::InvalidDefault { field: "node_radius", .. })
	));
}

#[test]
fn first_frame_creates_every_primitive() {
	let h = Harness::new();
	assert_eq!(h.surface.live_circles(), 5);
	assert_eq!(h.surface.lines.iter().flatten().count(), 5);
	assert_eq!(h.surface.frames, 1);
	assert!(h.explorer.simulation().is_running());
	let first = h.surface.circles[0].as_ref().unwrap();
	assert_eq!(first.r, 7.0);
	let labels: Vec<_> = h.surface.circles.iter().flatten().map(|c| c.label.as_str()).collect();
	assert_eq!(labels, ["1", "2", "3", "4", "5"]);
}

#[test]
fn named_nodes_are_labelled_by_name() {
	let mut data = ring();
	data.nodes[2].name = Some("Third".to_string());
	let h = Harness::with_data(data);
	let labels: Vec<_> = h.surface.circles.iter().flatten().map(|c| c.label.as_str()).collect();
	assert_eq!(labels, ["1", "2", "Third", "4", "5"]);
}

#[test]
fn settles_then_stops_painting() {
	let mut h = Harness::new();
	h.settle();
	assert!(!h.frame());
	let painted = h.surface.frames;
	h.frames(10);
	assert_eq!(h.surface.frames, painted);

	let graph = h.explorer.graph();
	let n = graph.len() as f64;
	let cx = graph.nodes().iter().map(|n| n.x).sum::<f64>() / n;
	let cy = graph.nodes().iter().map(|n| n.y).sum::<f64>() / n;
	assert!((cx - 400.0).abs() < 1.0 && (cy - 300.0).abs() < 1.0);
}

#[test]
fn clicking_a_node_selects_highlights_and_centers_it() {
	let mut h = Harness::new();
	h.settle();

	let target = h.surface_pos("1");
	h.click(target);
	assert_eq!(h.explorer.selection().selected_id(), Some("1"));
	assert_eq!(*h.selections.borrow(), vec![Some("1".to_string())]);
	assert_eq!(h.surface.highlighted(), vec![0]);

	h.frames(60);
	assert!(!h.explorer.viewport().is_animating());
	let (sx, sy) = h.surface_pos("1");
	assert!((sx - 400.0).abs() < 0.5 && (sy - 300.0).abs() < 0.5, "{sx}, {sy}");
	assert_eq!(h.explorer.viewport().transform().k, 1.0);

	h.click(h.surface_pos("4"));
	h.click((5.0, 5.0));
	assert_eq!(
		*h.selections.borrow(),
		vec![Some("1".to_string()), Some("4".to_string()), None]
	);
	assert!(h.surface.highlighted().is_empty());
}

#[test]
fn dragging_a_node_pins_it_under_the_pointer() {
	let mut h = Harness::new();
	let start = h.surface_pos("3");
	h.explorer.pointer(PointerEvent::down(start.0, start.1));
	h.explorer.pointer(PointerEvent::moved(100.0, 100.0));
	h.frames(30);

	let node = h.explorer.graph().find_node("3").unwrap();
	assert_eq!(node.position(), (100.0, 100.0));
	assert_eq!(h.explorer.interaction().dragged_node(), Some("3"));
	assert!(h.explorer.simulation().is_running());

	h.explorer.pointer(PointerEvent::up(100.0, 100.0));
	h.frame();
	assert!(h.explorer.interaction().is_idle());
	assert!(!h.explorer.graph().find_node("3").unwrap().is_pinned());
	assert!(h.selections.borrow().is_empty());
	h.settle();
}

#[test]
fn resize_moves_the_layout_centre() {
	let mut h = Harness::new();
	h.explorer.resize(1000.0, 800.0);
	assert_eq!(h.explorer.pending(), 1);
	assert!(h.frame());
	assert_eq!(h.explorer.viewport().size(), (1000.0, 800.0));

	h.settle();
	let graph = h.explorer.graph();
	let n = graph.len() as f64;
	let cx = graph.nodes().iter().map(|n| n.x).sum::<f64>() / n;
	let cy = graph.nodes().iter().map(|n| n.y).sum::<f64>() / n;
	assert!((cx - 500.0).abs() < 1.0 && (cy - 400.0).abs() < 1.0);
}

#[test]
fn stop_halts_ticking_until_a_node_is_pressed() {
	let mut h = Harness::new();
	h.explorer.stop();
	h.explorer.stop();
	let ticks = h.explorer.simulation().ticks();
	h.frames(20);
	assert_eq!(h.explorer.simulation().ticks(), ticks);

	h.click((5.0, 5.0));
	h.explorer.pointer(PointerEvent::down(700.0, 500.0));
	h.explorer.pointer(PointerEvent::moved(650.0, 480.0));
	h.explorer.pointer(PointerEvent::up(650.0, 480.0));
	h.frames(5);
	assert!(!h.explorer.simulation().is_running());
	assert_eq!(h.explorer.simulation().ticks(), ticks);

	h.click(h.surface_pos("2"));
	assert_eq!(h.explorer.selection().selected_id(), Some("2"));
	assert!(h.explorer.simulation().is_running());
	h.frames(5);
	assert!(h.explorer.simulation().ticks() > ticks);
	h.settle();
}

#[test]
fn detach_clears_the_surface() {
	let mut h = Harness::new();
	h.explorer.detach(&mut h.surface);
	assert_eq!(h.surface.live_circles(), 0);
	assert!(h.frame());
	assert_eq!(h.surface.live_circles(), 5);
}
