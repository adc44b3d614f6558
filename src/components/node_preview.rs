use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use crate::api::{GraphQuery, HttpGraphClient};
use crate::config::AppConfig;
use crate::knowledge::focus::{FetchGuard, Preview, view_in_graph};
use crate::knowledge::{EntityRef, GraphMode};

#[derive(Clone, Debug, PartialEq)]
enum TagState {
	Loading,
	Loaded(Vec<String>),
	Failed,
}

/// Popover for the previewed vertex: its tags and where to go from here.
#[component]
pub fn NodePreview(
	#[prop(into)] preview: Signal<Option<Preview>>,
	mode: GraphMode,
	on_close: Callback<()>,
) -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let client = HttpGraphClient::new(&config.api.base_url);
	let guard = RwSignal::new(FetchGuard::<EntityRef>::default());
	let tags = RwSignal::new(TagState::Loading);

	Effect::new(move |_| {
		let Some(entity) = preview.with(|p| p.as_ref().map(|p| p.entity.clone())) else {
			guard.update(|g| g.cancel());
			return;
		};
		let Some(ticket) = guard.try_update(|g| g.dispatch(entity.clone())) else {
			return;
		};
		tags.set(TagState::Loading);
		let client = client.clone();
		spawn_local(async move {
			let result = client.entity_tags(&entity).await;
			if !guard.try_with_untracked(|g| g.accepts(&ticket)).unwrap_or(false) {
				return;
			}
			let next = match result {
				Ok(resp) => TagState::Loaded(resp.tags),
				Err(err) => {
					log::warn!("tags for {}:{} unavailable: {err}", entity.entity_type, entity.id);
					TagState::Failed
				}
			};
			let _ = tags.try_set(next);
		});
	});

	let navigate = use_navigate();
	move || {
		let p = preview.get()?;
		let open_route = p.entity.route();
		let graph_route = view_in_graph(&p.entity);
		let (nav_open, nav_graph) = (navigate.clone(), navigate.clone());
		Some(view! {
			<div
				class="node-preview"
				style:left=format!("{}px", p.anchor.x + 12.0)
				style:top=format!("{}px", p.anchor.y + 12.0)
			>
				<div class="node-preview-header">
					<span class="node-preview-type">{p.entity.entity_type.style().label}</span>
					<span class="node-preview-id">{p.entity.id.clone()}</span>
					<button class="node-preview-close" on:click=move |_| on_close.run(())>
						"×"
					</button>
				</div>
				<div class="node-preview-tags">
					{move || match tags.get() {
						TagState::Loading => view! { <span class="muted">"Loading tags…"</span> }.into_any(),
						TagState::Failed => view! { <span class="muted">"Tags unavailable"</span> }.into_any(),
						TagState::Loaded(list) if list.is_empty() => {
							view! { <span class="muted">"No tags"</span> }.into_any()
						}
						TagState::Loaded(list) => {
							list.into_iter()
								.map(|tag| view! { <span class="tag-chip">{tag}</span> })
								.collect_view()
								.into_any()
						}
					}}
				</div>
				<div class="node-preview-actions">
					<button on:click=move |_| {
						on_close.run(());
						nav_open(&open_route, Default::default());
					}>"Open"</button>
					<button on:click=move |_| {
						on_close.run(());
						nav_graph(&graph_route, Default::default());
					}>"View in graph"</button>
				</div>
				{(mode == GraphMode::Explorer)
					.then(|| view! { <p class="node-preview-hint">"Double-click a node to open it"</p> })}
			</div>
		})
	}
}
