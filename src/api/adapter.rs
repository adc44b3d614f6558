//! Shapes raw payloads into assembler inputs.

use log::{debug, warn};

use super::GraphQuery;
use super::payload::{
	EdgesResponse, LineageResponse, OverviewResponse, PathResponse, RawEdge, TaggedEntity,
};
use crate::error::Result;
use crate::knowledge::entity::{EntityRef, EntityType};
use crate::knowledge::source::{
	EdgeSource, GraphRequest, GraphSource, LineageSource, LineageTraceNode, OverviewNode,
	OverviewSource, PathSource, PathStep, Relation, TagSource, TraceDirection,
};

/// Fetch and shape whatever `request` asks for.
pub async fn load_source<Q: GraphQuery + ?Sized>(
	query: &Q,
	request: &GraphRequest,
) -> Result<GraphSource> {
	debug!("loading {request:?}");
	let source = match request {
		GraphRequest::Overview {
			node_limit,
			edge_limit,
		} => GraphSource::Overview(shape_overview(
			query.overview(*node_limit, *edge_limit).await?,
		)),
		GraphRequest::Edges {
			entity,
			include_bidirectional,
		} => GraphSource::Edges(shape_edges(
			entity,
			query.edges(entity, *include_bidirectional).await?,
		)),
		GraphRequest::Lineage {
			entity,
			direction,
			max_depth,
		} => GraphSource::Lineage(shape_lineage(
			entity,
			*direction,
			query.trace_lineage(entity, *direction, *max_depth).await?,
		)),
		GraphRequest::Path {
			source,
			target,
			max_depth,
		} => GraphSource::Path(shape_path(
			source,
			target,
			query.find_path(source, target, *max_depth).await?,
		)),
		GraphRequest::Tagged { tag, entity_type } => GraphSource::Tagged(shape_tagged(
			tag,
			query.entities_by_tag(tag, *entity_type).await?,
		)),
	};
	Ok(source)
}

fn entity(raw_type: &str, id: &str) -> Option<EntityRef> {
	if id.is_empty() {
		warn!("dropping {raw_type} entry with empty id");
		return None;
	}
	Some(EntityRef::new(EntityType::parse_lossy(raw_type), id))
}

fn relation(edge: &RawEdge) -> Option<Relation> {
	Some(Relation {
		source: entity(&edge.source_type, &edge.source_id)?,
		target: entity(&edge.target_type, &edge.target_id)?,
		relation: edge.relation.clone(),
	})
}

pub fn shape_overview(resp: OverviewResponse) -> OverviewSource {
	OverviewSource {
		nodes: resp
			.nodes
			.iter()
			.filter_map(|n| {
				Some(OverviewNode {
					entity: entity(&n.node_type, &n.id)?,
					degree: n.degree,
				})
			})
			.collect(),
		edges: resp.edges.iter().filter_map(relation).collect(),
	}
}

/// The requested entity is the center even if the response echoes it differently.
pub fn shape_edges(requested: &EntityRef, resp: EdgesResponse) -> EdgeSource {
	EdgeSource {
		center: requested.clone(),
		edges: resp.edges.iter().filter_map(relation).collect(),
	}
}

pub fn shape_lineage(
	requested: &EntityRef,
	direction: TraceDirection,
	resp: LineageResponse,
) -> LineageSource {
	let nodes = resp
		.nodes
		.iter()
		.filter_map(|n| {
			Some(LineageTraceNode {
				depth: n.depth,
				entity: entity(&n.node_type, &n.node_id)?,
				relation: n.relation.clone(),
				direction: parse_direction(&n.direction).unwrap_or(direction),
			})
		})
		.collect();
	LineageSource {
		start: requested.clone(),
		direction: parse_direction(&resp.direction).unwrap_or(direction),
		nodes,
	}
}

fn parse_direction(raw: &str) -> Option<TraceDirection> {
	match raw {
		"backward" => Some(TraceDirection::Backward),
		"forward" => Some(TraceDirection::Forward),
		_ => None,
	}
}

pub fn shape_path(source: &EntityRef, target: &EntityRef, resp: PathResponse) -> PathSource {
	PathSource {
		source: source.clone(),
		target: target.clone(),
		paths: resp
			.paths
			.iter()
			.map(|path| {
				path.iter()
					.filter_map(|step| {
						Some(PathStep {
							entity: entity(&step.node_type, &step.node_id)?,
							relation: step.relation.clone(),
						})
					})
					.collect()
			})
			.collect(),
	}
}

pub fn shape_tagged(tag: &str, entities: Vec<TaggedEntity>) -> TagSource {
	TagSource {
		tag: tag.to_string(),
		entities: entities
			.iter()
			.filter_map(|e| entity(&e.entity_type, &e.entity_id))
			.collect(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::payload::{RawNode, RawTraceNode};

	fn raw_edge(st: &str, si: &str, tt: &str, ti: &str) -> RawEdge {
		RawEdge {
			source_type: st.into(),
			source_id: si.into(),
			target_type: tt.into(),
			target_id: ti.into(),
			relation: "r".into(),
		}
	}

	#[test]
	fn empty_ids_are_dropped() {
		let resp = OverviewResponse {
			nodes: vec![
				RawNode {
					node_type: "factor".into(),
					id: "A".into(),
					degree: 1,
				},
				RawNode {
					node_type: "factor".into(),
					id: String::new(),
					degree: 1,
				},
			],
			edges: vec![
				raw_edge("factor", "A", "note", "N"),
				raw_edge("factor", "", "note", "N"),
			],
			..Default::default()
		};
		let src = shape_overview(resp);
		assert_eq!(src.nodes.len(), 1);
		assert_eq!(src.edges.len(), 1);
	}

	#[test]
	fn unknown_types_become_data() {
		let src = shape_tagged(
			"alpha",
			vec![TaggedEntity {
				entity_type: "backtest".into(),
				entity_id: "b1".into(),
			}],
		);
		assert_eq!(src.entities, [EntityRef::new(EntityType::Data, "b1")]);
	}

	#[test]
	fn lineage_direction_falls_back_to_request() {
		let start = EntityRef::new(EntityType::Strategy, "S");
		let resp = LineageResponse {
			direction: "sideways".into(),
			nodes: vec![RawTraceNode {
				depth: 1,
				node_type: "factor".into(),
				node_id: "F".into(),
				relation: "uses".into(),
				direction: String::new(),
			}],
			..Default::default()
		};
		let src = shape_lineage(&start, TraceDirection::Forward, resp);
		assert_eq!(src.direction, TraceDirection::Forward);
		assert_eq!(src.start, start);
		assert_eq!(src.nodes[0].direction, TraceDirection::Forward);
	}
}
