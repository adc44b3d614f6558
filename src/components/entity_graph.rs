use leptos::prelude::*;
use leptos_router::components::A;

use super::graph_view::GraphView;
use crate::knowledge::focus::view_in_graph;
use crate::knowledge::{EntityRef, GraphMode, GraphRequest};

/// Focused sub-graph embedded in an entity's detail panel.
///
/// "Expand" mounts a second, independent view full-screen on top of the inline one.
#[component]
pub fn EntityGraphPanel(#[prop(into)] entity: Signal<EntityRef>) -> impl IntoView {
	let expanded = RwSignal::new(false);
	let request = Signal::derive(move || {
		Some(GraphRequest::Edges {
			entity: entity.get(),
			include_bidirectional: true,
		})
	});
	let inline_active = Signal::derive(move || !expanded.get());

	view! {
		<section class="entity-graph-panel">
			<header class="panel-header">
				<h3>"Related"</h3>
				<button on:click=move |_| expanded.set(true)>"Expand"</button>
				<A href=move || view_in_graph(&entity.get())>"View in graph"</A>
			</header>
			<GraphView
				request=request
				mode=GraphMode::Inline
				interactive=inline_active
				height=Some(320.0)
			/>
			<Show when=move || expanded.get()>
				<div class="graph-overlay-fullscreen">
					<button class="overlay-close" on:click=move |_| expanded.set(false)>
						"×"
					</button>
					<GraphView request=request mode=GraphMode::Explorer fullscreen=expanded />
				</div>
			</Show>
		</section>
	}
}
