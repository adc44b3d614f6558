//! Research knowledge graph: a Leptos client-side app over the research backend's graph API.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

pub mod api;
pub mod components;
pub mod config;
pub mod error;
pub mod knowledge;
mod pages;
pub mod settings;

use crate::config::AppConfig;
use crate::knowledge::EntityType;
use crate::pages::entity::EntityPage;
use crate::pages::graph::GraphExplorer;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Explorer at `/graph`, one detail page per entity type, 404 otherwise.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();
	let config = AppConfig::default();
	info!("research API at {}", config.api.base_url);
	provide_context(config);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />
		<Title text="Research graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=|| view! { <Redirect path="/graph" /> } />
				<Route path=path!("/graph") view=GraphExplorer />
				<Route path=path!("/data") view=|| view! { <EntityPage entity_type=EntityType::Data /> } />
				<Route path=path!("/factors") view=|| view! { <EntityPage entity_type=EntityType::Factor /> } />
				<Route
					path=path!("/strategies")
					view=|| view! { <EntityPage entity_type=EntityType::Strategy /> }
				/>
				<Route path=path!("/notes") view=|| view! { <EntityPage entity_type=EntityType::Note /> } />
				<Route
					path=path!("/research")
					view=|| view! { <EntityPage entity_type=EntityType::Research /> }
				/>
				<Route
					path=path!("/experiences")
					view=|| view! { <EntityPage entity_type=EntityType::Experience /> }
				/>
			</Routes>
		</Router>
	}
}
