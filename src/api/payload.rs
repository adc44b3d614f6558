//! Wire shapes returned by the research backend's graph endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
	#[serde(rename = "type")]
	pub node_type: String,
	pub id: String,
	#[serde(default)]
	pub degree: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEdge {
	pub source_type: String,
	pub source_id: String,
	pub target_type: String,
	pub target_id: String,
	#[serde(default)]
	pub relation: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
	#[serde(default)]
	pub total_nodes: usize,
	#[serde(default)]
	pub total_edges: usize,
	#[serde(default)]
	pub by_type: BTreeMap<String, usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewResponse {
	pub nodes: Vec<RawNode>,
	pub edges: Vec<RawEdge>,
	#[serde(default)]
	pub stats: GraphStats,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgesResponse {
	pub entity_type: String,
	pub entity_id: String,
	#[serde(default)]
	pub count: usize,
	pub edges: Vec<RawEdge>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTraceNode {
	pub depth: u32,
	pub node_type: String,
	pub node_id: String,
	#[serde(default)]
	pub relation: String,
	#[serde(default)]
	pub direction: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageResponse {
	pub start_type: String,
	pub start_id: String,
	pub direction: String,
	#[serde(default)]
	pub max_depth: u32,
	#[serde(default)]
	pub count: usize,
	pub nodes: Vec<RawTraceNode>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPathStep {
	pub node_type: String,
	pub node_id: String,
	#[serde(default)]
	pub relation: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResponse {
	#[serde(default)]
	pub count: usize,
	pub paths: Vec<Vec<RawPathStep>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTagsResponse {
	pub tags: Vec<String>,
	#[serde(default)]
	pub count: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
	pub name: String,
	#[serde(default)]
	pub count: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedEntity {
	pub entity_type: String,
	pub entity_id: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn overview_tolerates_missing_stats() {
		let json = r#"{"nodes":[{"type":"factor","id":"A","degree":3}],"edges":[]}"#;
		let resp: OverviewResponse = serde_json::from_str(json).unwrap();
		assert_eq!(resp.nodes[0].node_type, "factor");
		assert_eq!(resp.nodes[0].degree, 3);
		assert_eq!(resp.stats, GraphStats::default());
	}

	#[test]
	fn lineage_nodes_decode() {
		let json = r#"{
			"start_type": "strategy", "start_id": "S", "direction": "backward",
			"max_depth": 3, "count": 1,
			"nodes": [{"depth": 1, "node_type": "factor", "node_id": "F",
			           "relation": "uses", "direction": "backward"}]
		}"#;
		let resp: LineageResponse = serde_json::from_str(json).unwrap();
		assert_eq!(resp.nodes[0].node_id, "F");
		assert_eq!(resp.nodes[0].depth, 1);
	}
}
