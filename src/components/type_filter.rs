use leptos::prelude::*;

use crate::knowledge::{Category, TypeFilterSet};

/// One chip per filterable type present in the unfiltered graph.
#[component]
pub fn TypeFilterBar(
	#[prop(into)] categories: Signal<Vec<Category>>,
	filter: RwSignal<TypeFilterSet>,
) -> impl IntoView {
	view! {
		<div class="type-filter">
			{move || {
				categories
					.get()
					.into_iter()
					.filter(|c| !c.entity_type.is_always_shown())
					.map(|c| {
						let t = c.entity_type;
						let active = move || filter.with(|f| f.is_enabled(t));
						view! {
							<button
								class="type-chip"
								class:inactive=move || !active()
								style:border-color=c.color.clone()
								on:click=move |_| filter.update(|f| f.toggle(t))
							>
								{c.label}
							</button>
						}
					})
					.collect_view()
			}}
		</div>
	}
}

#[component]
pub fn GraphLegend(#[prop(into)] categories: Signal<Vec<Category>>) -> impl IntoView {
	view! {
		<ul class="graph-legend">
			{move || {
				categories
					.get()
					.into_iter()
					.map(|c| {
						view! {
							<li>
								<span class="type-dot" style:background-color=c.color></span>
								{c.label}
							</li>
						}
					})
					.collect_view()
			}}
		</ul>
	}
}
