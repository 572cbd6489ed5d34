//! Graph explorer canvas component.
//!
//! Renders an interactive node-link graph on an HTML canvas with:
//! - Force-directed layout that settles on its own
//! - Pan, wheel zoom and node dragging
//! - Click-to-select with the viewport easing onto the selected node
//! - Node labels showing each node's name, or its id when unnamed
//! - Configurable theming
//!
//! # Example
//!
//! ```ignore
//! use graph_explorer::{ForceGraphCanvas, GraphData, GraphNode, GraphLink};
//!
//! let data = GraphData {
//!     nodes: vec![GraphNode::new("a"), GraphNode::new("b")],
//!     links: vec![GraphLink::new("a", "b")],
//! };
//!
//! view! {
//!     <ForceGraphCanvas
//!         data=data
//!         on_node_select=Callback::new(|node| log::info!("{:?}", node))
//!     />
//! }
//! ```

mod canvas;
mod component;
pub mod theme;

pub use canvas::{CanvasSurface, CircleId, LineId};
pub use component::ForceGraphCanvas;
pub use theme::Theme;
