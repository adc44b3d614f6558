//! `/graph`: the knowledge graph explorer.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::Title;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::api::payload::TagCount;
use crate::api::{GraphQuery, HttpGraphClient};
use crate::components::graph_view::GraphView;
use crate::config::{AppConfig, GraphConfig};
use crate::knowledge::entity::encode_component;
use crate::knowledge::{GraphMode, GraphRequest, TagInput, TraceDirection, parse_key};
use crate::settings::{BrowserStorage, ViewMode};

/// What a focused explorer shows around its focus entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TraceMode {
	/// Direct relations in both directions.
	#[default]
	Edges,
	Backward,
	Forward,
}

impl TraceMode {
	pub const ALL: [TraceMode; 3] = [TraceMode::Edges, TraceMode::Backward, TraceMode::Forward];

	pub fn as_str(self) -> &'static str {
		match self {
			TraceMode::Edges => "edges",
			TraceMode::Backward => "backward",
			TraceMode::Forward => "forward",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			TraceMode::Edges => "Relations",
			TraceMode::Backward => "Upstream lineage",
			TraceMode::Forward => "Downstream lineage",
		}
	}

	fn parse(raw: &str) -> Self {
		TraceMode::ALL
			.into_iter()
			.find(|m| m.as_str() == raw)
			.unwrap_or_default()
	}
}

/// Query parameters the explorer is driven by, blank values treated as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExplorerQuery {
	pub focus: Option<String>,
	pub target: Option<String>,
	pub tag: Option<String>,
}

impl ExplorerQuery {
	fn new(focus: Option<String>, target: Option<String>, tag: Option<String>) -> Self {
		let clean = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
		Self {
			focus: clean(focus),
			target: clean(target),
			tag: clean(tag),
		}
	}
}

/// Pick the graph request for the explorer's current parameters.
///
/// A tag wins over everything; a focus with a target asks for paths; a focus
/// alone follows the trace mode; nothing at all shows the overview.
pub fn explorer_request(query: &ExplorerQuery, trace: TraceMode, config: &GraphConfig) -> GraphRequest {
	if let Some(tag) = &query.tag {
		return GraphRequest::Tagged {
			tag: tag.trim().to_string(),
			entity_type: None,
		};
	}
	let Some(focus) = query.focus.as_deref().map(parse_key) else {
		return GraphRequest::Overview {
			node_limit: config.node_limit,
			edge_limit: config.edge_limit,
		};
	};
	if let Some(target) = query.target.as_deref().map(parse_key) {
		return GraphRequest::Path {
			source: focus,
			target,
			max_depth: config.path_depth,
		};
	}
	match trace {
		TraceMode::Edges => GraphRequest::Edges {
			entity: focus,
			include_bidirectional: true,
		},
		TraceMode::Backward | TraceMode::Forward => GraphRequest::Lineage {
			entity: focus,
			direction: if trace == TraceMode::Forward {
				TraceDirection::Forward
			} else {
				TraceDirection::Backward
			},
			max_depth: config.trace_depth,
		},
	}
}

fn tag_route(tag: &str) -> String {
	format!("/graph?tag={}", encode_component(tag))
}

#[component]
pub fn GraphExplorer() -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let client = HttpGraphClient::new(&config.api.base_url);
	let graph_config = config.graph.clone();

	let query = use_query_map();
	let params = Memo::new(move |_| {
		query.with(|q| ExplorerQuery::new(q.get("focus"), q.get("target"), q.get("tag")))
	});
	let trace = RwSignal::new(TraceMode::default());
	let request = Signal::derive(move || {
		Some(params.with(|p| explorer_request(p, trace.get(), &graph_config)))
	});

	let view_mode = RwSignal::new(ViewMode::load(&BrowserStorage));
	let fullscreen = RwSignal::new(false);

	let tags = RwSignal::new(Vec::<TagCount>::new());
	spawn_local(async move {
		match client.all_tags().await {
			Ok(list) => {
				let _ = tags.try_set(list);
			}
			Err(err) => log::warn!("tag list unavailable: {err}"),
		}
	});

	let tag_input = RwSignal::new(TagInput::default());
	let navigate = use_navigate();
	let commit = move |tag: Option<String>| {
		if let Some(tag) = tag {
			navigate(&tag_route(&tag), Default::default());
			tag_input.update(|t| t.finish());
		}
	};
	let commit_on_key = commit.clone();

	view! {
		<Title text="Knowledge graph" />
		<div class="graph-explorer">
			<header class="explorer-toolbar">
				<select
					class="trace-mode"
					prop:value=move || trace.get().as_str()
					on:change=move |ev| trace.set(TraceMode::parse(&event_target_value(&ev)))
				>
					{TraceMode::ALL
						.into_iter()
						.map(|m| view! { <option value=m.as_str()>{m.label()}</option> })
						.collect_view()}
				</select>
				<input
					class="tag-input"
					placeholder="Filter by tag"
					prop:value=move || tag_input.with(|t| t.text().to_string())
					on:focus=move |_| tag_input.update(|t| t.begin())
					on:input=move |ev| {
						let text = event_target_value(&ev);
						tag_input.update(|t| t.input(&text));
					}
					on:keydown=move |ev| match ev.key().as_str() {
						"Enter" => commit_on_key(tag_input.try_update(|t| t.submit()).flatten()),
						"Escape" => {
							ev.stop_propagation();
							tag_input.update(|t| t.cancel());
						}
						_ => {}
					}
					on:blur=move |_| commit(tag_input.try_update(|t| t.blur()).flatten())
				/>
				<button on:click=move |_| {
					view_mode.update(|m| {
						*m = m.toggled();
						m.save(&BrowserStorage);
					});
				}>
					{move || match view_mode.get() {
						ViewMode::Graph => "List view",
						ViewMode::List => "Graph view",
					}}
				</button>
				<button on:click=move |_| fullscreen.update(|f| *f = !*f)>"Full screen"</button>
			</header>
			<ul class="tag-cloud">
				{move || {
					tags.get()
						.into_iter()
						.map(|t| {
							view! {
								<li>
									<a class="tag-chip" href=tag_route(&t.name)>
										{t.name.clone()}
										<span class="tag-count">{t.count}</span>
									</a>
								</li>
							}
						})
						.collect_view()
				}}
			</ul>
			<GraphView
				request=request
				mode=GraphMode::Explorer
				fullscreen=fullscreen
				view_mode=view_mode
			/>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::knowledge::{EntityRef, EntityType};

	fn query(focus: Option<&str>, target: Option<&str>, tag: Option<&str>) -> ExplorerQuery {
		let own = |v: Option<&str>| v.map(str::to_string);
		ExplorerQuery::new(own(focus), own(target), own(tag))
	}

	#[test]
	fn no_parameters_show_overview() {
		let config = GraphConfig::default();
		let req = explorer_request(&query(None, None, None), TraceMode::Edges, &config);
		assert_eq!(
			req,
			GraphRequest::Overview {
				node_limit: 200,
				edge_limit: 500
			}
		);
	}

	#[test]
	fn blank_focus_counts_as_absent() {
		let config = GraphConfig::default();
		let req = explorer_request(&query(Some("  "), None, None), TraceMode::Forward, &config);
		assert!(matches!(req, GraphRequest::Overview { .. }));
	}

	#[test]
	fn focus_follows_trace_mode() {
		let config = GraphConfig::default();
		let q = query(Some("factor:momentum_20d"), None, None);
		let momentum = EntityRef::new(EntityType::Factor, "momentum_20d");

		assert_eq!(
			explorer_request(&q, TraceMode::Edges, &config),
			GraphRequest::Edges {
				entity: momentum.clone(),
				include_bidirectional: true
			}
		);
		assert_eq!(
			explorer_request(&q, TraceMode::Backward, &config),
			GraphRequest::Lineage {
				entity: momentum,
				direction: TraceDirection::Backward,
				max_depth: config.trace_depth
			}
		);
	}

	#[test]
	fn focus_with_target_asks_for_paths() {
		let config = GraphConfig::default();
		let q = query(Some("data:btc_1h"), Some("strategy:S1"), None);
		assert_eq!(
			explorer_request(&q, TraceMode::Backward, &config),
			GraphRequest::Path {
				source: EntityRef::new(EntityType::Data, "btc_1h"),
				target: EntityRef::new(EntityType::Strategy, "S1"),
				max_depth: 4
			}
		);
	}

	#[test]
	fn tag_overrides_focus() {
		let config = GraphConfig::default();
		let q = query(Some("data:btc_1h"), None, Some(" momentum "));
		assert_eq!(
			explorer_request(&q, TraceMode::Edges, &config),
			GraphRequest::Tagged {
				tag: "momentum".into(),
				entity_type: None
			}
		);
	}

	#[test]
	fn trace_mode_names_round_trip() {
		for m in TraceMode::ALL {
			assert_eq!(TraceMode::parse(m.as_str()), m);
		}
		assert_eq!(TraceMode::parse("sideways"), TraceMode::Edges);
	}

	#[test]
	fn tag_links_are_encoded() {
		assert_eq!(tag_route("high vol"), "/graph?tag=high+vol");
	}
}
