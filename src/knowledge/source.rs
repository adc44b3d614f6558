//! Typed assembler inputs, one variant per query that can feed a graph.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::entity::EntityRef;

/// Which way a lineage trace walks from its start entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceDirection {
	/// Towards the inputs the start entity was derived from.
	#[default]
	Backward,
	/// Towards the entities derived from the start entity.
	Forward,
}

impl TraceDirection {
	pub fn as_str(self) -> &'static str {
		match self {
			TraceDirection::Backward => "backward",
			TraceDirection::Forward => "forward",
		}
	}
}

impl fmt::Display for TraceDirection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A directed, labelled relation between two entities.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relation {
	pub source: EntityRef,
	pub target: EntityRef,
	pub relation: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverviewNode {
	pub entity: EntityRef,
	pub degree: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverviewSource {
	pub nodes: Vec<OverviewNode>,
	pub edges: Vec<Relation>,
}

/// Every edge touching one entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeSource {
	pub center: EntityRef,
	pub edges: Vec<Relation>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineageTraceNode {
	pub depth: u32,
	pub entity: EntityRef,
	pub relation: String,
	pub direction: TraceDirection,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineageSource {
	pub start: EntityRef,
	pub direction: TraceDirection,
	pub nodes: Vec<LineageTraceNode>,
}

/// Entities carrying one tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagSource {
	pub tag: String,
	pub entities: Vec<EntityRef>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathStep {
	pub entity: EntityRef,
	/// Relation leading into this step from the previous one.
	pub relation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathSource {
	pub source: EntityRef,
	pub target: EntityRef,
	pub paths: Vec<Vec<PathStep>>,
}

/// Parameters of the query a graph view wants loaded.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GraphRequest {
	Overview {
		node_limit: usize,
		edge_limit: usize,
	},
	Edges {
		entity: EntityRef,
		include_bidirectional: bool,
	},
	Lineage {
		entity: EntityRef,
		direction: TraceDirection,
		max_depth: u32,
	},
	Path {
		source: EntityRef,
		target: EntityRef,
		max_depth: u32,
	},
	Tagged {
		tag: String,
		entity_type: Option<super::entity::EntityType>,
	},
}

impl GraphRequest {
	/// Entity the request is centred on, if any.
	pub fn center(&self) -> Option<&EntityRef> {
		match self {
			GraphRequest::Edges { entity, .. } | GraphRequest::Lineage { entity, .. } => {
				Some(entity)
			}
			GraphRequest::Path { source, .. } => Some(source),
			GraphRequest::Overview { .. } | GraphRequest::Tagged { .. } => None,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphSource {
	Overview(OverviewSource),
	Edges(EdgeSource),
	Lineage(LineageSource),
	Tagged(TagSource),
	Path(PathSource),
}
