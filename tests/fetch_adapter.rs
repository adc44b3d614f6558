use std::cell::RefCell;

use async_trait::async_trait;
use research_graph::api::payload::{
	EdgesResponse, EntityTagsResponse, LineageResponse, OverviewResponse, PathResponse, RawEdge,
	RawNode, RawPathStep, RawTraceNode, TagCount, TaggedEntity,
};
use research_graph::api::{GraphQuery, load_source};
use research_graph::config::GraphConfig;
use research_graph::error::{FetchError, Result};
use research_graph::knowledge::{
	EntityRef, EntityType, GraphRequest, NodeRole, TraceDirection, assemble,
};

/// Canned backend that records which endpoint each call hit.
#[derive(Default)]
struct MockBackend {
	calls: RefCell<Vec<String>>,
	fail_with: Option<FetchError>,
}

impl MockBackend {
	fn record(&self, call: String) -> Result<()> {
		self.calls.borrow_mut().push(call);
		match &self.fail_with {
			Some(err) => Err(err.clone()),
			None => Ok(()),
		}
	}
}

fn edge(st: &str, si: &str, tt: &str, ti: &str, relation: &str) -> RawEdge {
	RawEdge {
		source_type: st.into(),
		source_id: si.into(),
		target_type: tt.into(),
		target_id: ti.into(),
		relation: relation.into(),
	}
}

fn trace(depth: u32, node_type: &str, node_id: &str) -> RawTraceNode {
	RawTraceNode {
		depth,
		node_type: node_type.into(),
		node_id: node_id.into(),
		relation: "derived_from".into(),
		direction: "backward".into(),
	}
}

#[async_trait(?Send)]
impl GraphQuery for MockBackend {
	async fn overview(&self, node_limit: usize, edge_limit: usize) -> Result<OverviewResponse> {
		self.record(format!("overview {node_limit} {edge_limit}"))?;
		Ok(OverviewResponse {
			nodes: vec![
				RawNode {
					node_type: "factor".into(),
					id: "A".into(),
					degree: 2,
				},
				RawNode {
					node_type: "strategy".into(),
					id: "S".into(),
					degree: 20,
				},
			],
			edges: vec![edge("factor", "A", "strategy", "S", "used_by")],
			..Default::default()
		})
	}

	async fn edges(&self, entity: &EntityRef, include_bidirectional: bool) -> Result<EdgesResponse> {
		self.record(format!("edges {}:{} {include_bidirectional}", entity.entity_type, entity.id))?;
		Ok(EdgesResponse {
			entity_type: entity.entity_type.to_string(),
			entity_id: entity.id.clone(),
			count: 2,
			edges: vec![
				edge("experience", "X", "factor", "A", "validates"),
				edge("note", "N", "experience", "X", "mentions"),
			],
		})
	}

	async fn trace_lineage(
		&self,
		entity: &EntityRef,
		direction: TraceDirection,
		max_depth: u32,
	) -> Result<LineageResponse> {
		self.record(format!("lineage {}:{} {direction} {max_depth}", entity.entity_type, entity.id))?;
		Ok(LineageResponse {
			start_type: entity.entity_type.to_string(),
			start_id: entity.id.clone(),
			direction: direction.to_string(),
			max_depth,
			count: 3,
			nodes: vec![trace(1, "factor", "F"), trace(2, "data", "D1"), trace(2, "data", "D2")],
		})
	}

	async fn find_path(
		&self,
		source: &EntityRef,
		target: &EntityRef,
		max_depth: u32,
	) -> Result<PathResponse> {
		self.record(format!("path {} {} {max_depth}", source.id, target.id))?;
		let step = |t: &str, id: &str, relation: Option<&str>| RawPathStep {
			node_type: t.into(),
			node_id: id.into(),
			relation: relation.map(str::to_string),
		};
		Ok(PathResponse {
			count: 1,
			paths: vec![vec![
				step("data", &source.id, None),
				step("factor", "F", Some("input_of")),
				step("strategy", &target.id, Some("used_by")),
			]],
		})
	}

	async fn entity_tags(&self, entity: &EntityRef) -> Result<EntityTagsResponse> {
		self.record(format!("tags {}", entity.id))?;
		Ok(EntityTagsResponse {
			tags: vec!["momentum".into()],
			count: 1,
		})
	}

	async fn all_tags(&self) -> Result<Vec<TagCount>> {
		self.record("all tags".into())?;
		Ok(vec![TagCount {
			name: "momentum".into(),
			count: 2,
		}])
	}

	async fn entities_by_tag(
		&self,
		tag: &str,
		entity_type: Option<EntityType>,
	) -> Result<Vec<TaggedEntity>> {
		self.record(format!("tagged {tag} {entity_type:?}"))?;
		Ok(vec![
			TaggedEntity {
				entity_type: "factor".into(),
				entity_id: "A".into(),
			},
			TaggedEntity {
				entity_type: "strategy".into(),
				entity_id: String::new(),
			},
		])
	}
}

#[test]
fn overview_request_hits_overview_endpoint() {
	let backend = MockBackend::default();
	let config = GraphConfig::default();
	let request = GraphRequest::Overview {
		node_limit: config.node_limit,
		edge_limit: config.edge_limit,
	};
	let source = pollster::block_on(load_source(&backend, &request)).unwrap();
	let graph = assemble(&source, &config);

	assert_eq!(backend.calls.borrow().as_slice(), ["overview 200 500"]);
	assert_eq!(graph.nodes.len(), 2);
	assert_eq!(graph.node("factor:A").map(|n| n.size), Some(21.0));
	assert_eq!(graph.node("strategy:S").map(|n| n.size), Some(50.0));
	assert_eq!(graph.links.len(), 1);
}

#[test]
fn edges_request_centres_on_the_requested_entity() {
	let backend = MockBackend::default();
	let x = EntityRef::new(EntityType::Experience, "X");
	let request = GraphRequest::Edges {
		entity: x.clone(),
		include_bidirectional: true,
	};
	let source = pollster::block_on(load_source(&backend, &request)).unwrap();
	let graph = assemble(&source, &GraphConfig::default());

	assert_eq!(graph.center().map(|c| c.entity.clone()), Some(x));
	assert_eq!(graph.nodes.len(), 3);
	let incoming = graph.links.iter().find(|l| l.relation == "mentions").unwrap();
	assert_eq!((incoming.source.as_str(), incoming.target.as_str()), ("note:N", "experience:X"));
}

#[test]
fn lineage_request_layers_the_trace() {
	let backend = MockBackend::default();
	let request = GraphRequest::Lineage {
		entity: EntityRef::new(EntityType::Strategy, "S1"),
		direction: TraceDirection::Backward,
		max_depth: 3,
	};
	let source = pollster::block_on(load_source(&backend, &request)).unwrap();
	let graph = assemble(&source, &GraphConfig::default());

	assert_eq!(backend.calls.borrow()[0], "lineage strategy:S1 backward 3");
	let pairs: Vec<_> = graph
		.links
		.iter()
		.map(|l| (l.source.as_str(), l.target.as_str()))
		.collect();
	assert_eq!(
		pairs,
		[
			("factor:F", "strategy:S1"),
			("data:D1", "factor:F"),
			("data:D2", "factor:F")
		]
	);
	assert!(graph.links.iter().all(|l| l.style.dashed));
}

#[test]
fn path_request_marks_both_ends() {
	let backend = MockBackend::default();
	let request = GraphRequest::Path {
		source: EntityRef::new(EntityType::Data, "btc"),
		target: EntityRef::new(EntityType::Strategy, "S1"),
		max_depth: 4,
	};
	let source = pollster::block_on(load_source(&backend, &request)).unwrap();
	let graph = assemble(&source, &GraphConfig::default());

	assert_eq!(graph.node("data:btc").map(|n| n.role), Some(NodeRole::Center));
	assert_eq!(graph.node("strategy:S1").map(|n| n.role), Some(NodeRole::Emphasized));
	assert_eq!(graph.links.len(), 2);
}

#[test]
fn tagged_request_drops_entries_without_ids() {
	let backend = MockBackend::default();
	let request = GraphRequest::Tagged {
		tag: "momentum".into(),
		entity_type: None,
	};
	let source = pollster::block_on(load_source(&backend, &request)).unwrap();
	let graph = assemble(&source, &GraphConfig::default());

	assert_eq!(graph.nodes.len(), 1);
	assert!(graph.links.is_empty());
}

#[test]
fn backend_errors_propagate() {
	let backend = MockBackend {
		fail_with: Some(FetchError::Status(503)),
		..Default::default()
	};
	let request = GraphRequest::Overview {
		node_limit: 10,
		edge_limit: 10,
	};
	let err = pollster::block_on(load_source(&backend, &request)).unwrap_err();
	assert_eq!(err, FetchError::Status(503));
	assert_eq!(err.to_string(), "HTTP 503");
}
