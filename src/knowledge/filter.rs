//! Entity-type visibility filter.

use std::collections::{BTreeSet, HashSet};

use log::debug;

use super::category::CategoryIndexer;
use super::entity::EntityType;
use super::graph::KnowledgeGraph;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeFilterSet {
	enabled: BTreeSet<EntityType>,
}

impl Default for TypeFilterSet {
	fn default() -> Self {
		Self {
			enabled: EntityType::filterable().collect(),
		}
	}
}

impl TypeFilterSet {
	/// Flip one type on or off. Always-shown types are left alone.
	pub fn toggle(&mut self, entity_type: EntityType) {
		if entity_type.is_always_shown() {
			return;
		}
		if !self.enabled.remove(&entity_type) {
			self.enabled.insert(entity_type);
		}
	}

	pub fn is_enabled(&self, entity_type: EntityType) -> bool {
		self.enabled.contains(&entity_type)
	}

	pub fn is_visible(&self, entity_type: EntityType) -> bool {
		entity_type.is_always_shown() || self.is_enabled(entity_type)
	}
}

/// Keep the visible nodes, then the edges whose endpoints both survived.
///
/// Categories are re-indexed over the surviving nodes.
pub fn apply(graph: &KnowledgeGraph, filter: &TypeFilterSet) -> KnowledgeGraph {
	let mut indexer = CategoryIndexer::new();
	let nodes: Vec<_> = graph
		.nodes
		.iter()
		.filter(|n| filter.is_visible(n.entity.entity_type))
		.map(|n| {
			let mut node = n.clone();
			node.category = indexer.index_of(n.entity.entity_type);
			node
		})
		.collect();
	let kept: HashSet<&str> = nodes.iter().map(|n| n.key.as_str()).collect();
	let links: Vec<_> = graph
		.links
		.iter()
		.filter(|l| kept.contains(l.source.as_str()) && kept.contains(l.target.as_str()))
		.cloned()
		.collect();
	debug!(
		"type filter kept {}/{} nodes, {}/{} links",
		nodes.len(),
		graph.nodes.len(),
		links.len(),
		graph.links.len()
	);
	KnowledgeGraph {
		categories: indexer.categories(),
		nodes,
		links,
	}
}
