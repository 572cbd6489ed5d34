//! Leptos component wrapping the graph explorer canvas.
//!
//! The component creates an HTML canvas element and forwards mouse and wheel
//! events to an [`Explorer`] as surface-local pointer events. An animation
//! loop runs via `requestAnimationFrame`, handing each frame timestamp to
//! [`Explorer::frame`], which ticks the simulation, runs queued input and
//! repaints the [`CanvasSurface`] when anything changed.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::canvas::CanvasSurface;
use super::theme::Theme;
use crate::engine::{
	Explorer, ExplorerConfig, GraphData, GraphNode, Modifiers, Node, PointerEvent, PointerKind,
	WheelMode,
};

/// The explorer together with the surface it paints.
struct GraphContext {
	explorer: Explorer<CanvasSurface>,
	surface: CanvasSurface,
}

type SharedContext = Rc<RefCell<Option<GraphContext>>>;

/// Renders an explorable node-link graph on a canvas element.
///
/// Pass graph data via the reactive `data` signal. The component sizes itself
/// to its parent container by default; set `fullscreen = true` to fill the
/// viewport and resize automatically with the window. Explicit `width`/`height`
/// override automatic sizing. `on_node_select` receives the clicked node, or
/// `None` when a click on empty canvas clears the selection.
#[component]
pub fn ForceGraphCanvas(
	/// Nodes and links to lay out.
	#[prop(into)]
	data: Signal<GraphData>,
	/// Fill the window and follow its size.
	#[prop(default = false)]
	fullscreen: bool,
	/// Canvas width in pixels.
	#[prop(default = None)]
	width: Option<f64>,
	/// Canvas height in pixels.
	#[prop(default = None)]
	height: Option<f64>,
	/// Overrides `config.graph.node_radius`.
	#[prop(default = None)]
	node_radius: Option<f64>,
	/// Engine tuning.
	#[prop(optional)]
	config: ExplorerConfig,
	/// Palette and label style.
	#[prop(optional)]
	theme: Theme,
	/// Called with the new selection whenever it changes.
	#[prop(default = None)]
	on_node_select: Option<Callback<Option<GraphNode>>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let graph_data = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("no window, graph canvas not started");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.filter(|w| *w > 0.0)
						.unwrap_or(config.width)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.filter(|h| *h > 0.0)
						.unwrap_or(config.height)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = context_2d(&canvas) else {
			error!("canvas has no 2d context");
			return;
		};

		let mut explorer_config = config.clone();
		explorer_config.width = w;
		explorer_config.height = h;
		if let Some(r) = node_radius {
			explorer_config.graph.node_radius = r;
		}

		let mut explorer = match Explorer::new(&graph_data, explorer_config) {
			Ok(explorer) => explorer,
			Err(e) => {
				error!("graph explorer rejected its input: {}", e);
				return;
			}
		};
		explorer.set_on_select(move |node: Option<&Node>| {
			if let Some(callback) = on_node_select {
				callback.run(node.map(Node::to_data));
			}
		});

		let mut surface = CanvasSurface::new(ctx, w, h, theme.clone());
		if let Some(mut old) = context_init.borrow_mut().take() {
			old.explorer.detach(&mut old.surface);
		}
		explorer.frame(0.0, &mut surface);
		*context_init.borrow_mut() = Some(GraphContext { explorer, surface });

		if fullscreen && resize_cb_init.borrow().is_none() {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.surface.resize(nw, nh);
					c.explorer.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		if animate_init.borrow().is_some() {
			return;
		}
		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move |now: f64| {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.explorer.frame(now, &mut c.surface);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let pointer = move |kind: PointerKind, ev: &MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let rect = canvas.get_bounding_client_rect();
		let event = PointerEvent {
			kind,
			x: ev.client_x() as f64 - rect.left(),
			y: ev.client_y() as f64 - rect.top(),
			modifiers: Modifiers {
				ctrl: ev.ctrl_key(),
				shift: ev.shift_key(),
				alt: ev.alt_key(),
				meta: ev.meta_key(),
			},
		};
		match context.try_borrow_mut() {
			Ok(mut c) => {
				if let Some(c) = c.as_mut() {
					c.explorer.pointer(event);
				}
			}
			Err(_) => warn!("pointer event dropped while a frame was running"),
		}
	};

	let on_mousedown = {
		let pointer = pointer.clone();
		move |ev: MouseEvent| pointer(PointerKind::Down, &ev)
	};
	let on_mousemove = {
		let pointer = pointer.clone();
		move |ev: MouseEvent| pointer(PointerKind::Move, &ev)
	};
	let on_mouseup = {
		let pointer = pointer.clone();
		move |ev: MouseEvent| pointer(PointerKind::Up, &ev)
	};
	let on_mouseleave = {
		let pointer = pointer.clone();
		move |ev: MouseEvent| pointer(PointerKind::Leave, &ev)
	};
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let mode = match ev.delta_mode() {
			WheelEvent::DOM_DELTA_LINE => WheelMode::Line,
			WheelEvent::DOM_DELTA_PAGE => WheelMode::Page,
			_ => WheelMode::Pixel,
		};
		let kind = PointerKind::Wheel {
			delta_y: ev.delta_y(),
			mode,
		};
		pointer(kind, &ev);
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	let w = window.inner_width().ok()?.as_f64()?;
	let h = window.inner_height().ok()?.as_f64()?;
	Some((w, h))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}
