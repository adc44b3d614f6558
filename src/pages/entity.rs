use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::hooks::use_query_map;

use crate::components::entity_graph::EntityGraphPanel;
use crate::knowledge::{EntityRef, EntityType};

/// Detail page for one entity type; the entity comes from `?focus=`.
#[component]
pub fn EntityPage(entity_type: EntityType) -> impl IntoView {
	let query = use_query_map();
	let focus = Memo::new(move |_| {
		query
			.with(|q| q.get("focus"))
			.filter(|id| !id.trim().is_empty())
			.map(|id| EntityRef::new(entity_type, id))
	});
	let label = entity_type.style().label;

	view! {
		<Title text=label />
		<div class="entity-page">
			<h1>{label}</h1>
			{move || match focus.get() {
				Some(entity) => {
					view! {
						<h2 class="entity-id">{entity.id.clone()}</h2>
						<EntityGraphPanel entity=entity />
					}
						.into_any()
				}
				None => view! { <p class="muted">"Select an entity to see its relations."</p> }.into_any(),
			}}
		</div>
	}
}
