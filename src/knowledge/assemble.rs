//! Turns a [`GraphSource`] into a deduplicated, categorised [`KnowledgeGraph`].

use std::collections::HashSet;

use log::debug;

use super::category::CategoryIndexer;
use super::entity::EntityRef;
use super::graph::{GraphEdge, GraphVertex, KnowledgeGraph, LinkStyle, NodeRole, display_name};
use super::key::{NodeKey, key_of};
use super::lineage;
use super::source::{EdgeSource, GraphSource, OverviewSource, PathSource, TagSource};
use crate::config::GraphConfig;

/// Accumulates one graph: vertices deduplicated by key, links kept as given.
#[derive(Debug, Default)]
pub(crate) struct GraphBuilder {
	indexer: CategoryIndexer,
	seen: HashSet<NodeKey>,
	nodes: Vec<GraphVertex>,
	links: Vec<GraphEdge>,
}

impl GraphBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a vertex unless its key is already present. Returns the key either way.
	pub fn add_node(&mut self, entity: &EntityRef, size: f64, role: NodeRole) -> NodeKey {
		let key = key_of(entity);
		if self.seen.insert(key.clone()) {
			let category = self.indexer.index_of(entity.entity_type);
			self.nodes.push(GraphVertex {
				key: key.clone(),
				entity: entity.clone(),
				display_name: display_name(&entity.id),
				category,
				size,
				role,
			});
		}
		key
	}

	pub fn add_link(&mut self, source: NodeKey, target: NodeKey, relation: &str, style: LinkStyle) {
		self.links.push(GraphEdge {
			source,
			target,
			relation: relation.to_string(),
			style,
		});
	}

	pub fn finish(self) -> KnowledgeGraph {
		KnowledgeGraph {
			categories: self.indexer.categories(),
			nodes: self.nodes,
			links: self.links,
		}
	}
}

pub fn assemble(source: &GraphSource, config: &GraphConfig) -> KnowledgeGraph {
	let graph = match source {
		GraphSource::Overview(src) => assemble_overview(src, config),
		GraphSource::Edges(src) => assemble_edges(src, config),
		GraphSource::Lineage(src) => lineage::layer(src, config),
		GraphSource::Tagged(src) => assemble_tagged(src, config),
		GraphSource::Path(src) => assemble_path(src, config),
	};
	debug!(
		"assembled graph: {} nodes, {} links, {} categories",
		graph.nodes.len(),
		graph.links.len(),
		graph.categories.len()
	);
	graph
}

pub fn assemble_overview(src: &OverviewSource, config: &GraphConfig) -> KnowledgeGraph {
	let mut builder = GraphBuilder::new();
	for node in &src.nodes {
		builder.add_node(
			&node.entity,
			config.degree_size(node.degree),
			NodeRole::Peripheral,
		);
	}
	for edge in &src.edges {
		// endpoints outside the node page still render, at minimum size
		let source = builder.add_node(&edge.source, config.min_size, NodeRole::Peripheral);
		let target = builder.add_node(&edge.target, config.min_size, NodeRole::Peripheral);
		builder.add_link(source, target, &edge.relation, LinkStyle::OVERVIEW);
	}
	builder.finish()
}

pub fn assemble_edges(src: &EdgeSource, config: &GraphConfig) -> KnowledgeGraph {
	let mut builder = GraphBuilder::new();
	let center = builder.add_node(&src.center, config.center_size, NodeRole::Center);
	for edge in &src.edges {
		let source = if edge.source == src.center {
			center.clone()
		} else {
			builder.add_node(&edge.source, config.peripheral_size, NodeRole::Peripheral)
		};
		let target = if edge.target == src.center {
			center.clone()
		} else {
			builder.add_node(&edge.target, config.peripheral_size, NodeRole::Peripheral)
		};
		builder.add_link(source, target, &edge.relation, LinkStyle::RELATION);
	}
	builder.finish()
}

pub fn assemble_tagged(src: &TagSource, config: &GraphConfig) -> KnowledgeGraph {
	let mut builder = GraphBuilder::new();
	for entity in &src.entities {
		builder.add_node(entity, config.peripheral_size, NodeRole::Peripheral);
	}
	builder.finish()
}

pub fn assemble_path(src: &PathSource, config: &GraphConfig) -> KnowledgeGraph {
	let mut builder = GraphBuilder::new();
	builder.add_node(&src.source, config.center_size, NodeRole::Center);
	builder.add_node(&src.target, config.emphasized_size, NodeRole::Emphasized);
	for path in &src.paths {
		let mut previous: Option<NodeKey> = None;
		for step in path {
			let key = builder.add_node(&step.entity, config.peripheral_size, NodeRole::Peripheral);
			if let Some(prev) = previous.take() {
				if prev != key {
					let relation = step.relation.as_deref().unwrap_or_default();
					builder.add_link(prev, key.clone(), relation, LinkStyle::PATH);
				}
			}
			previous = Some(key);
		}
	}
	builder.finish()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::knowledge::entity::EntityType;
	use crate::knowledge::source::{OverviewNode, PathStep, Relation};

	fn ent(t: EntityType, id: &str) -> EntityRef {
		EntityRef::new(t, id)
	}

	fn rel(source: EntityRef, target: EntityRef, relation: &str) -> Relation {
		Relation {
			source,
			target,
			relation: relation.to_string(),
		}
	}

	#[test]
	fn overview_sizes_by_degree() {
		let src = OverviewSource {
			nodes: vec![
				OverviewNode {
					entity: ent(EntityType::Factor, "A"),
					degree: 0,
				},
				OverviewNode {
					entity: ent(EntityType::Strategy, "B"),
					degree: 5,
				},
			],
			edges: vec![rel(
				ent(EntityType::Factor, "A"),
				ent(EntityType::Strategy, "B"),
				"derives",
			)],
		};
		let graph = assemble(&GraphSource::Overview(src), &GraphConfig::default());

		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.links.len(), 1);
		assert_eq!(graph.categories.len(), 2);
		let a = graph.node("factor:A").map(|n| n.size);
		let b = graph.node("strategy:B").map(|n| n.size);
		assert!(b > a);
	}

	#[test]
	fn overview_dedups_nodes_but_keeps_parallel_edges() {
		let a = ent(EntityType::Factor, "A");
		let b = ent(EntityType::Strategy, "B");
		let src = OverviewSource {
			nodes: vec![
				OverviewNode {
					entity: a.clone(),
					degree: 2,
				},
				OverviewNode {
					entity: a.clone(),
					degree: 9,
				},
				OverviewNode {
					entity: b.clone(),
					degree: 2,
				},
			],
			edges: vec![
				rel(a.clone(), b.clone(), "derives"),
				rel(a.clone(), b.clone(), "backtested_by"),
			],
		};
		let graph = assemble_overview(&src, &GraphConfig::default());
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.links.len(), 2);
		// first occurrence wins
		assert_eq!(graph.nodes[0].size, 21.0);
	}

	#[test]
	fn overview_adds_dangling_endpoints() {
		let src = OverviewSource {
			nodes: vec![OverviewNode {
				entity: ent(EntityType::Factor, "A"),
				degree: 1,
			}],
			edges: vec![rel(
				ent(EntityType::Factor, "A"),
				ent(EntityType::Data, "ohlcv"),
				"uses",
			)],
		};
		let graph = assemble_overview(&src, &GraphConfig::default());
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.node("data:ohlcv").map(|n| n.size), Some(20.0));
	}

	#[test]
	fn single_entity_mode_centers_the_queried_entity() {
		let x = ent(EntityType::Experience, "X");
		let src = EdgeSource {
			center: x.clone(),
			edges: vec![
				rel(x.clone(), ent(EntityType::Note, "N1"), "mentions"),
				rel(x.clone(), ent(EntityType::Factor, "F1"), "tests"),
			],
		};
		let graph = assemble(&GraphSource::Edges(src), &GraphConfig::default());

		assert_eq!(graph.nodes.len(), 3);
		assert_eq!(graph.links.len(), 2);
		let center = graph.center().map(|n| n.key.as_str());
		assert_eq!(center, Some("experience:X"));
		assert_eq!(graph.nodes[0].category, 0);
		assert_eq!(graph.categories[0].entity_type, EntityType::Experience);
		assert!(graph.nodes[1..].iter().all(|n| n.role == NodeRole::Peripheral));
	}

	#[test]
	fn incoming_edges_keep_their_direction() {
		let x = ent(EntityType::Factor, "F");
		let src = EdgeSource {
			center: x.clone(),
			edges: vec![rel(ent(EntityType::Strategy, "S"), x.clone(), "uses")],
		};
		let graph = assemble_edges(&src, &GraphConfig::default());
		assert_eq!(graph.links[0].source, "strategy:S");
		assert_eq!(graph.links[0].target, "factor:F");
	}

	#[test]
	fn tagged_mode_has_no_edges() {
		let src = TagSource {
			tag: "momentum".into(),
			entities: vec![
				ent(EntityType::Factor, "A"),
				ent(EntityType::Strategy, "B"),
				ent(EntityType::Factor, "A"),
			],
		};
		let graph = assemble(&GraphSource::Tagged(src), &GraphConfig::default());
		assert_eq!(graph.nodes.len(), 2);
		assert!(graph.links.is_empty());
	}

	#[test]
	fn path_mode_chains_steps_and_emphasizes_target() {
		let s = ent(EntityType::Data, "ohlcv");
		let t = ent(EntityType::Strategy, "S");
		let step = |e: &EntityRef, r: Option<&str>| PathStep {
			entity: e.clone(),
			relation: r.map(str::to_string),
		};
		let f = ent(EntityType::Factor, "F");
		let src = PathSource {
			source: s.clone(),
			target: t.clone(),
			paths: vec![
				vec![step(&s, None), step(&f, Some("feeds")), step(&t, Some("used_by"))],
				vec![step(&s, None), step(&t, Some("backtest"))],
			],
		};
		let graph = assemble(&GraphSource::Path(src), &GraphConfig::default());
		assert_eq!(graph.nodes.len(), 3);
		assert_eq!(graph.links.len(), 3);
		assert_eq!(
			graph.node("strategy:S").map(|n| n.role),
			Some(NodeRole::Emphasized)
		);
		assert_eq!(graph.links[1].relation, "used_by");
	}
}
