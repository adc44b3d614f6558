//! Layered rendering of a depth-annotated lineage trace.
//!
//! Trace nodes are bucketed by depth and each layer is wired to the layer
//! before it. With [`ParentLinking::FirstOfLayer`] a node gets a single edge to
//! the first node of the previous non-empty layer, so the rendered parent is a
//! representative and may differ from the node's parent in the backing trace.

use std::collections::BTreeMap;

use log::debug;

use super::assemble::GraphBuilder;
use super::graph::{KnowledgeGraph, LinkStyle, NodeRole};
use super::key::NodeKey;
use super::source::{LineageSource, LineageTraceNode, TraceDirection};
use crate::config::{GraphConfig, ParentLinking};

pub fn layer(src: &LineageSource, config: &GraphConfig) -> KnowledgeGraph {
	let mut builder = GraphBuilder::new();
	let start = builder.add_node(&src.start, config.center_size, NodeRole::Center);

	let mut buckets: BTreeMap<u32, Vec<&LineageTraceNode>> = BTreeMap::new();
	for node in &src.nodes {
		if node.depth == 0 {
			debug!("ignoring depth-0 trace entry {}", node.entity.id);
			continue;
		}
		buckets.entry(node.depth).or_default().push(node);
	}

	// empty depths never appear in the map, so `previous` only moves on real layers
	let mut previous: Vec<NodeKey> = vec![start];
	for (depth, bucket) in buckets {
		let size = config.depth_size(depth);
		let mut current = Vec::with_capacity(bucket.len());
		for node in bucket {
			let key = builder.add_node(&node.entity, size, NodeRole::Peripheral);
			if current.contains(&key) {
				continue;
			}
			let parents = match config.parent_linking {
				ParentLinking::FirstOfLayer => &previous[..1],
				ParentLinking::AllOfLayer => &previous[..],
			};
			for parent in parents {
				if *parent == key {
					continue;
				}
				let (from, to) = match src.direction {
					TraceDirection::Backward => (key.clone(), parent.clone()),
					TraceDirection::Forward => (parent.clone(), key.clone()),
				};
				builder.add_link(from, to, &node.relation, LinkStyle::LINEAGE);
			}
			current.push(key);
		}
		previous = current;
	}
	builder.finish()
}
