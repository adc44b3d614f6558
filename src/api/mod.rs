//! Research backend graph queries.
//!
//! [`GraphQuery`] is the seam to the backend; [`HttpGraphClient`] implements it
//! over HTTP and [`adapter`] shapes its responses into assembler inputs.

pub mod adapter;
mod client;
pub mod payload;

use async_trait::async_trait;

pub use adapter::load_source;
pub use client::HttpGraphClient;
use payload::{
	EdgesResponse, EntityTagsResponse, LineageResponse, OverviewResponse, PathResponse, TagCount,
	TaggedEntity,
};

use crate::error::Result;
use crate::knowledge::entity::{EntityRef, EntityType};
use crate::knowledge::source::TraceDirection;

#[async_trait(?Send)]
pub trait GraphQuery {
	async fn overview(&self, node_limit: usize, edge_limit: usize) -> Result<OverviewResponse>;

	async fn edges(&self, entity: &EntityRef, include_bidirectional: bool)
	-> Result<EdgesResponse>;

	async fn trace_lineage(
		&self,
		entity: &EntityRef,
		direction: TraceDirection,
		max_depth: u32,
	) -> Result<LineageResponse>;

	async fn find_path(
		&self,
		source: &EntityRef,
		target: &EntityRef,
		max_depth: u32,
	) -> Result<PathResponse>;

	async fn entity_tags(&self, entity: &EntityRef) -> Result<EntityTagsResponse>;

	async fn all_tags(&self) -> Result<Vec<TagCount>>;

	async fn entities_by_tag(
		&self,
		tag: &str,
		entity_type: Option<EntityType>,
	) -> Result<Vec<TaggedEntity>>;
}
