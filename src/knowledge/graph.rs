//! Layout-ready graph produced by the assembler.

use super::entity::{EntityRef, EntityType};
use super::key::NodeKey;

/// Visual role of a vertex within one rendered graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum NodeRole {
	/// The entity the graph is built around.
	Center,
	#[default]
	Peripheral,
	/// Highlighted without being the center, e.g. a path target.
	Emphasized,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphVertex {
	pub key: NodeKey,
	pub entity: EntityRef,
	pub display_name: String,
	/// Index into [`KnowledgeGraph::categories`].
	pub category: usize,
	pub size: f64,
	pub role: NodeRole,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkStyle {
	pub width: f64,
	pub dashed: bool,
	pub opacity: f64,
}

impl LinkStyle {
	pub const OVERVIEW: LinkStyle = LinkStyle {
		width: 1.0,
		dashed: false,
		opacity: 0.6,
	};
	pub const RELATION: LinkStyle = LinkStyle {
		width: 1.5,
		dashed: false,
		opacity: 0.8,
	};
	pub const LINEAGE: LinkStyle = LinkStyle {
		width: 2.0,
		dashed: true,
		opacity: 0.8,
	};
	pub const PATH: LinkStyle = LinkStyle {
		width: 3.0,
		dashed: false,
		opacity: 0.9,
	};
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
	pub source: NodeKey,
	pub target: NodeKey,
	pub relation: String,
	pub style: LinkStyle,
}

/// Legend entry; position in [`KnowledgeGraph::categories`] is the index vertices refer to.
#[derive(Clone, Debug, PartialEq)]
pub struct Category {
	pub entity_type: EntityType,
	pub label: String,
	pub color: String,
}

/// `{nodes, links, categories}` handed to the renderer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KnowledgeGraph {
	pub nodes: Vec<GraphVertex>,
	pub links: Vec<GraphEdge>,
	pub categories: Vec<Category>,
}

impl KnowledgeGraph {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn node(&self, key: &str) -> Option<&GraphVertex> {
		self.nodes.iter().find(|n| n.key == key)
	}

	pub fn center(&self) -> Option<&GraphVertex> {
		self.nodes.iter().find(|n| n.role == NodeRole::Center)
	}

	pub fn color_of(&self, vertex: &GraphVertex) -> &str {
		self.categories
			.get(vertex.category)
			.map(|c| c.color.as_str())
			.unwrap_or(EntityType::Data.style().color)
	}
}

/// Shorten long ids for labels.
pub fn display_name(id: &str) -> String {
	const MAX_CHARS: usize = 24;
	if id.chars().count() <= MAX_CHARS {
		id.to_string()
	} else {
		let mut short: String = id.chars().take(MAX_CHARS - 1).collect();
		short.push('…');
		short
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn long_ids_are_shortened() {
		assert_eq!(display_name("mom_20"), "mom_20");
		let uuid = "0f8fad5b-d9cb-469f-a165-70867728950e";
		let shown = display_name(uuid);
		assert_eq!(shown.chars().count(), 24);
		assert!(shown.ends_with('…'));
	}
}
