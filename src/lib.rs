//! graph-explorer: interactive force-directed node-link graph explorer.
//!
//! The [`engine`] module holds the headless layout, viewport and gesture
//! logic; [`components`] wraps it in a canvas-backed leptos component. The
//! [`App`] here is the demo shell: it loads data from the page, shows the
//! graph and prints the selected node's text beside it.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod engine;

pub use components::force_graph::ForceGraphCanvas;
pub use engine::{ExplorerConfig, GraphData, GraphLink, GraphNode};

/// Node radius used by the demo page.
pub const DEMO_NODE_RADIUS: f64 = 7.0;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("graph-explorer: logging initialized");
}

/// Parses the JSON body of the `<script>` element with the given id.
fn load_script_json<T: DeserializeOwned>(id: &str) -> Option<T> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<T>(&json_text) {
		Ok(value) => Some(value),
		Err(e) => {
			warn!("graph-explorer: failed to parse #{}: {}", id, e);
			None
		}
	}
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...] }
fn load_graph_data() -> Option<GraphData> {
	let data: GraphData = load_script_json("graph-data")?;
	info!(
		"graph-explorer: loaded {} nodes, {} links",
		data.nodes.len(),
		data.links.len()
	);
	Some(data)
}

/// Load the configuration from a script element with id="graph-config",
/// falling back to [`demo_config`]. A page config replaces the demo values
/// entirely; fields it omits take the library defaults.
fn load_config() -> ExplorerConfig {
	load_script_json("graph-config").unwrap_or_else(demo_config)
}

/// Library defaults with the demo's larger nodes.
pub fn demo_config() -> ExplorerConfig {
	let mut config = ExplorerConfig::default();
	config.graph.node_radius = DEMO_NODE_RADIUS;
	config
}

/// Five-node ring shown when the page supplies no data.
pub fn sample_graph() -> GraphData {
	let nodes = (1..=5)
		.map(|i| GraphNode {
			name: Some(format!("Node {i}")),
			text: Some(format!("Hello Node {i}")),
			..GraphNode::new(i.to_string())
		})
		.collect();
	let links = [("1", "2"), ("1", "3"), ("2", "4"), ("3", "5"), ("4", "5")]
		.into_iter()
		.map(|(s, t)| GraphLink::new(s, t))
		.collect();
	GraphData { nodes, links }
}

/// Main application component.
/// Loads graph data from the DOM and shows the selected node's text.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_else(sample_graph);
	let graph_signal = Signal::derive(move || graph_data.clone());
	let config = load_config();
	let (width, height) = (config.width, config.height);

	let selected = RwSignal::new(None::<GraphNode>);
	let on_select = Callback::new(move |node: Option<GraphNode>| selected.set(node));
	let detail = move || match selected.get() {
		Some(node) => node
			.text
			.unwrap_or_else(|| "No text available for this node.".to_string()),
		None => "Select a node to view details".to_string(),
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Graph Explorer" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="app-container">
			<div class="graph-container">
				<ForceGraphCanvas
					data=graph_signal
					width=Some(width)
					height=Some(height)
					config=config
					on_node_select=Some(on_select)
				/>
			</div>
			<div class="text-container">
				<h3 class="node-text">{detail}</h3>
			</div>
		</div>
	}
}
