//! HTTP implementation of [`GraphQuery`].
//!
//! Uses web-sys fetch in the browser and reqwest everywhere else.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::GraphQuery;
use super::payload::{
	EdgesResponse, EntityTagsResponse, LineageResponse, OverviewResponse, PathResponse, TagCount,
	TaggedEntity,
};
use crate::error::{FetchError, Result};
use crate::knowledge::entity::{EntityRef, EntityType, encode_component};
use crate::knowledge::source::TraceDirection;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpGraphClient {
	base_url: String,
}

impl HttpGraphClient {
	pub fn new(base_url: &str) -> Self {
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
		}
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	fn url(&self, path: &str, query: &[(&str, String)]) -> String {
		let mut url = format!("{}{}", self.base_url, path);
		if !query.is_empty() {
			let encoded = url::form_urlencoded::Serializer::new(String::new())
				.extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())))
				.finish();
			url.push('?');
			url.push_str(&encoded);
		}
		url
	}

	fn entity_path(prefix: &str, entity: &EntityRef) -> String {
		format!(
			"{prefix}/{}/{}",
			entity.entity_type,
			encode_segment(&entity.id)
		)
	}

	#[cfg(target_arch = "wasm32")]
	async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
		use wasm_bindgen::JsCast;
		use wasm_bindgen_futures::JsFuture;
		use web_sys::{Request, RequestInit, RequestMode, Response};

		let opts = RequestInit::new();
		opts.set_method("GET");
		opts.set_mode(RequestMode::Cors);

		let request = Request::new_with_str_and_init(url, &opts)
			.map_err(|e| FetchError::Request(format!("{e:?}")))?;
		let window = web_sys::window().ok_or_else(|| FetchError::Request("no window".into()))?;
		let resp_value = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(|e| FetchError::Request(format!("{e:?}")))?;
		let resp: Response = resp_value
			.dyn_into()
			.map_err(|_| FetchError::Request("response is not a Response".into()))?;
		if !resp.ok() {
			return Err(FetchError::Status(resp.status()));
		}

		let text = JsFuture::from(
			resp.text()
				.map_err(|e| FetchError::Decode(format!("{e:?}")))?,
		)
		.await
		.map_err(|e| FetchError::Decode(format!("{e:?}")))?;
		let body = text
			.as_string()
			.ok_or_else(|| FetchError::Decode("body is not text".into()))?;
		Ok(serde_json::from_str(&body)?)
	}

	#[cfg(not(target_arch = "wasm32"))]
	async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
		let response = reqwest::get(url)
			.await
			.map_err(|e| FetchError::Request(e.to_string()))?;
		if !response.status().is_success() {
			return Err(FetchError::Status(response.status().as_u16()));
		}
		let body = response
			.text()
			.await
			.map_err(|e| FetchError::Request(e.to_string()))?;
		Ok(serde_json::from_str(&body)?)
	}
}

/// Form encoding writes spaces as `+`, which a path would keep literally.
fn encode_segment(raw: &str) -> String {
	encode_component(raw).replace('+', "%20")
}

#[async_trait(?Send)]
impl GraphQuery for HttpGraphClient {
	async fn overview(&self, node_limit: usize, edge_limit: usize) -> Result<OverviewResponse> {
		let url = self.url(
			"/graph/overview",
			&[
				("node_limit", node_limit.to_string()),
				("edge_limit", edge_limit.to_string()),
			],
		);
		self.get(&url).await
	}

	async fn edges(
		&self,
		entity: &EntityRef,
		include_bidirectional: bool,
	) -> Result<EdgesResponse> {
		let url = self.url(
			&Self::entity_path("/graph/edges", entity),
			&[("include_bidirectional", include_bidirectional.to_string())],
		);
		self.get(&url).await
	}

	async fn trace_lineage(
		&self,
		entity: &EntityRef,
		direction: TraceDirection,
		max_depth: u32,
	) -> Result<LineageResponse> {
		let url = self.url(
			&Self::entity_path("/graph/lineage", entity),
			&[
				("direction", direction.to_string()),
				("max_depth", max_depth.to_string()),
			],
		);
		self.get(&url).await
	}

	async fn find_path(
		&self,
		source: &EntityRef,
		target: &EntityRef,
		max_depth: u32,
	) -> Result<PathResponse> {
		let url = self.url(
			"/graph/path",
			&[
				("source_type", source.entity_type.to_string()),
				("source_id", source.id.clone()),
				("target_type", target.entity_type.to_string()),
				("target_id", target.id.clone()),
				("max_depth", max_depth.to_string()),
			],
		);
		self.get(&url).await
	}

	async fn entity_tags(&self, entity: &EntityRef) -> Result<EntityTagsResponse> {
		let url = self.url(
			&format!("{}/tags", Self::entity_path("/graph/entities", entity)),
			&[],
		);
		self.get(&url).await
	}

	async fn all_tags(&self) -> Result<Vec<TagCount>> {
		let url = self.url("/graph/tags", &[]);
		self.get(&url).await
	}

	async fn entities_by_tag(
		&self,
		tag: &str,
		entity_type: Option<EntityType>,
	) -> Result<Vec<TaggedEntity>> {
		let query: Vec<_> = entity_type
			.map(|t| ("entity_type", t.to_string()))
			.into_iter()
			.collect();
		let url = self.url(
			&format!("/graph/tags/{}/entities", encode_segment(tag)),
			&query,
		);
		self.get(&url).await
	}
}
