use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use leptos::ev;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::{ClickGate, DOUBLE_CLICK_MS, ForceGraphState, PointerClick};
use super::types::{LayoutParams, NodeEvent};
use crate::knowledge::KnowledgeGraph;

fn canvas_size(
	window: &Window,
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	let inner = |v: Result<JsValue, JsValue>, fallback: f64| {
		v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
	};
	if fullscreen {
		(
			inner(window.inner_width(), 800.0),
			inner(window.inner_height(), 600.0),
		)
	} else {
		(
			width.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_width() as f64)
					.unwrap_or(800.0)
			}),
			height.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_height() as f64)
					.unwrap_or(600.0)
			}),
		)
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// Tick and draw once per frame until the canvas leaves the document.
///
/// Each frame schedules the next with a one-shot callback, so nothing keeps the
/// state alive after the last frame has run.
fn animate(
	state: Rc<RefCell<Option<ForceGraphState>>>,
	ctx: CanvasRenderingContext2d,
	canvas: HtmlCanvasElement,
) {
	request_animation_frame(move || {
		if !canvas.is_connected() {
			log::debug!("canvas unmounted, stopping animation");
			return;
		}
		if let Some(s) = state.borrow_mut().as_mut() {
			if s.animation_running {
				s.tick(0.016);
			}
			render::render(s, &ctx);
		}
		animate(state, ctx, canvas);
	});
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Canvas renderer for a [`KnowledgeGraph`]. The layout is rebuilt from scratch
/// whenever `data` changes.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<KnowledgeGraph>,
	#[prop(default = LayoutParams::default())] layout: LayoutParams,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] on_node_click: Option<Callback<NodeEvent>>,
	#[prop(optional)] on_node_double_click: Option<Callback<NodeEvent>>,
	#[prop(optional)] on_background_click: Option<Callback<()>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let (state_init, running_init) = (state.clone(), Rc::new(Cell::new(false)));

	Effect::new(move |_| {
		let graph = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = canvas_size(&window, &canvas, fullscreen, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		log::debug!(
			"laying out {} nodes, {} links",
			graph.nodes.len(),
			graph.links.len()
		);
		*state_init.borrow_mut() = Some(ForceGraphState::new(&graph, &layout, w, h));

		// one loop per mount; later runs only swap the state
		if running_init.replace(true) {
			return;
		}
		let Some(ctx) = context_2d(&canvas) else {
			log::error!("canvas has no 2d context");
			return;
		};
		animate(state_init.clone(), ctx, canvas);
	});

	if fullscreen {
		let state_resize = state.clone();
		let resize = window_event_listener(ev::resize, move |_| {
			let (Some(win), Some(canvas)) = (web_sys::window(), canvas_ref.get_untracked()) else {
				return;
			};
			let canvas: HtmlCanvasElement = canvas.into();
			let (nw, nh) = canvas_size(&win, &canvas, true, None, None);
			canvas.set_width(nw as u32);
			canvas.set_height(nh as u32);
			if let Some(s) = state_resize.borrow_mut().as_mut() {
				s.resize(nw, nh);
			}
		});
		on_cleanup(move || resize.remove());
	}

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let (Some((x, y)), Some(s)) =
			(local_point(canvas_ref, &ev), state_md.borrow_mut().as_mut())
		{
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let (Some((x, y)), Some(s)) =
			(local_point(canvas_ref, &ev), state_mm.borrow_mut().as_mut())
		{
			s.pointer_move(x, y);
		}
	};

	let gate = Rc::new(RefCell::new(ClickGate::default()));
	let (state_mu, gate_mu) = (state.clone(), gate.clone());
	let on_mouseup = move |ev: MouseEvent| {
		let clicked = {
			let mut guard = state_mu.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			match s.pointer_up() {
				Some(PointerClick::Node(idx)) => s.key_of(idx).cloned().map(Some),
				Some(PointerClick::Background) => Some(None),
				None => None,
			}
		};
		// callbacks run after the state borrow is released
		match clicked {
			// second press of a double-click; dblclick handles it
			Some(Some(_)) if ev.detail() > 1 => gate_mu.borrow_mut().cancel(),
			Some(Some(key)) => {
				let Some(cb) = on_node_click else {
					return;
				};
				let event = NodeEvent {
					key: key.clone(),
					x: ev.client_x() as f64,
					y: ev.client_y() as f64,
				};
				let ticket = gate_mu.borrow_mut().hold(key);
				let gate = gate_mu.clone();
				set_timeout(
					move || {
						if gate.borrow_mut().release(&ticket) {
							cb.run(event);
						}
					},
					Duration::from_millis(DOUBLE_CLICK_MS),
				);
			}
			Some(None) => {
				if let Some(cb) = on_background_click {
					cb.run(());
				}
			}
			None => {}
		}
	};

	let state_dc = state.clone();
	let on_dblclick = move |ev: MouseEvent| {
		gate.borrow_mut().cancel();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let key = state_dc
			.borrow()
			.as_ref()
			.and_then(|s| s.node_at_position(x, y).and_then(|idx| s.key_of(idx).cloned()));
		if let (Some(key), Some(cb)) = (key, on_node_double_click) {
			cb.run(NodeEvent {
				key,
				x: ev.client_x() as f64,
				y: ev.client_y() as f64,
			});
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(s) = state_ml.borrow_mut().as_mut() {
			s.pointer_leave();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let (Some((x, y)), Some(s)) =
			(local_point(canvas_ref, &ev), state_wh.borrow_mut().as_mut())
		{
			s.zoom_at(x, y, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:dblclick=on_dblclick
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
