//! One self-contained graph instance: fetch, assemble, filter, render, focus.

use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use log::error;
use wasm_bindgen::JsCast;

use super::force_graph::{ForceGraphCanvas, NodeEvent};
use super::node_preview::NodePreview;
use super::type_filter::{GraphLegend, TypeFilterBar};
use crate::api::{HttpGraphClient, load_source};
use crate::config::AppConfig;
use crate::knowledge::focus::view_in_graph;
use crate::knowledge::{
	Anchor, FocusAction, FocusController, GraphMode, GraphRequest, KnowledgeGraph,
	TypeFilterSet, assemble, filter,
};
use crate::settings::ViewMode;

/// Latest graph plus the flags the shell shows around it.
///
/// An error leaves `graph` empty; the view renders that the same way as "no data yet".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphLoad {
	pub graph: KnowledgeGraph,
	pub loading: bool,
	pub error: Option<String>,
}

impl GraphLoad {
	pub fn ready(graph: KnowledgeGraph) -> Self {
		Self {
			graph,
			loading: false,
			error: None,
		}
	}

	pub fn failed(message: String) -> Self {
		Self {
			graph: KnowledgeGraph::default(),
			loading: false,
			error: Some(message),
		}
	}
}

/// Escape typed into a field belongs to that field.
fn is_text_entry(tag_name: &str) -> bool {
	matches!(tag_name.to_ascii_lowercase().as_str(), "input" | "textarea" | "select")
}

fn from_text_entry(ev: &web_sys::KeyboardEvent) -> bool {
	ev.target()
		.and_then(|t| t.dyn_into::<web_sys::Element>().ok())
		.is_some_and(|el| is_text_entry(&el.tag_name()))
}

#[component]
pub fn GraphView(
	/// What to load; `None` shows the empty state.
	#[prop(into)]
	request: Signal<Option<GraphRequest>>,
	mode: GraphMode,
	/// Shared with the owner so it can open and close full-screen.
	#[prop(optional)]
	fullscreen: Option<RwSignal<bool>>,
	/// False while another instance sits on top of this one.
	#[prop(optional, into)]
	interactive: Option<Signal<bool>>,
	#[prop(optional, into)] view_mode: Option<Signal<ViewMode>>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let client = HttpGraphClient::new(&config.api.base_url);
	let graph_config = config.graph.clone();
	let layout = config.graph.layout;

	let controller = RwSignal::new(FocusController::new(mode));
	let filter_set = RwSignal::new(TypeFilterSet::default());
	let load = RwSignal::new(GraphLoad::default());
	let pending_nav = RwSignal::new(None::<String>);

	Effect::new(move |_| {
		if let Some(fs) = fullscreen {
			let on = fs.get();
			controller.update(|c| c.set_fullscreen(on));
		}
	});

	let (fetch_client, fetch_config) = (client.clone(), graph_config.clone());
	Effect::new(move |_| {
		let Some(request) = request.get() else {
			controller.update(|c| c.cancel());
			load.set(GraphLoad::default());
			return;
		};
		let Some(ticket) = controller.try_update(|c| c.dispatch(request.clone())) else {
			return;
		};
		load.update(|l| {
			l.loading = true;
			l.error = None;
		});

		let (client, graph_config) = (fetch_client.clone(), fetch_config.clone());
		spawn_local(async move {
			let result = load_source(&client, &request).await;
			let current = controller
				.try_with_untracked(|c| c.accepts(&ticket))
				.unwrap_or(false);
			if !current {
				return;
			}
			let next = match result {
				Ok(source) => GraphLoad::ready(assemble(&source, &graph_config)),
				Err(err) => {
					error!("graph fetch failed for {request:?}: {err}");
					GraphLoad::failed(err.to_string())
				}
			};
			let _ = load.try_set(next);
		});
	});

	let navigate = use_navigate();
	Effect::new(move |_| {
		if let Some(route) = pending_nav.get() {
			pending_nav.set(None);
			navigate(&route, Default::default());
		}
	});

	let is_interactive = move || interactive.map(|s| s.get()).unwrap_or(true);
	let key_handle = window_event_listener(ev::keydown, move |ev| {
		if ev.key() != "Escape" || !is_interactive() || from_text_entry(&ev) {
			return;
		}
		let action = controller.try_update(|c| c.on_escape());
		if action == Some(FocusAction::FullscreenExited) {
			if let Some(fs) = fullscreen {
				fs.set(false);
			}
		}
	});
	on_cleanup(move || key_handle.remove());

	let visible = Signal::derive(move || {
		load.with(|l| filter_set.with(|f| filter::apply(&l.graph, f)))
	});
	let all_categories = Signal::derive(move || load.with(|l| l.graph.categories.clone()));
	let visible_categories = Signal::derive(move || visible.with(|g| g.categories.clone()));

	let on_node_click = Callback::new(move |ev: NodeEvent| {
		controller.update(|c| {
			c.on_node_click(&ev.key, Anchor { x: ev.x, y: ev.y });
		});
	});
	let on_node_double_click = Callback::new(move |ev: NodeEvent| {
		if let Some(FocusAction::Navigate(route)) =
			controller.try_update(|c| c.on_node_double_click(&ev.key))
		{
			pending_nav.set(Some(route));
		}
	});
	let on_background_click = Callback::new(move |_: ()| {
		controller.update(|c| {
			c.on_background_click();
		});
	});
	let close_preview = Callback::new(move |_: ()| {
		controller.update(|c| {
			c.close_preview();
		});
	});
	let preview = Memo::new(move |_| controller.with(|c| c.preview().cloned()));
	let is_fullscreen = move || fullscreen.map(|fs| fs.get()).unwrap_or(false);
	let show_list = move || view_mode.map(|m| m.get() == ViewMode::List).unwrap_or(false);

	view! {
		<div class="graph-view" class:graph-view-fullscreen=is_fullscreen>
			<div class="graph-toolbar">
				<TypeFilterBar categories=all_categories filter=filter_set />
				<GraphLegend categories=visible_categories />
			</div>
			<div class="graph-stage">
				{move || {
					let state = load.with(|l| (l.loading, l.error.clone(), l.graph.is_empty()));
					match state {
						(true, _, _) => view! { <div class="graph-spinner">"Loading…"</div> }.into_any(),
						(false, Some(err), _) => {
							view! {
								<div class="graph-empty graph-error">
									"Could not load the graph: " {err}
								</div>
							}
								.into_any()
						}
						(false, None, true) => {
							view! { <div class="graph-empty">"No related data"</div> }.into_any()
						}
						(false, None, false) => ().into_any(),
					}
				}}
				{move || {
					if show_list() {
						view! { <NodeList graph=visible /> }.into_any()
					} else {
						let fs = is_fullscreen();
						view! {
							<ForceGraphCanvas
								data=visible
								layout=layout
								fullscreen=fs
								height=if fs { None } else { height }
								on_node_click=on_node_click
								on_node_double_click=on_node_double_click
								on_background_click=on_background_click
							/>
						}
							.into_any()
					}
				}}
			</div>
			<NodePreview preview=preview mode=mode on_close=close_preview />
		</div>
	}
}

#[component]
fn NodeList(graph: Signal<KnowledgeGraph>) -> impl IntoView {
	view! {
		<ul class="graph-node-list">
			{move || {
				graph
					.with(|g| {
						g.nodes
							.iter()
							.map(|n| {
								let color = g.color_of(n).to_string();
								let href = view_in_graph(&n.entity);
								view! {
									<li>
										<span class="type-dot" style:background-color=color></span>
										<span class="node-type">{n.entity.entity_type.style().label}</span>
										<a href=href>{n.display_name.clone()}</a>
									</li>
								}
							})
							.collect_view()
					})
			}}
		</ul>
	}
}
