//! Application configuration, provided to the component tree through context.

use crate::components::force_graph::LayoutParams;

/// How lineage layers are wired to the layer before them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ParentLinking {
	/// One edge per node, to the first node of the previous non-empty layer.
	#[default]
	FirstOfLayer,
	/// One edge per node to every node of the previous non-empty layer.
	AllOfLayer,
}

/// Size and layout knobs for graph assembly.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphConfig {
	/// Overview size is `degree_base + degree * degree_step`, clamped to `[min_size, max_size]`.
	pub degree_base: f64,
	pub degree_step: f64,
	pub min_size: f64,
	pub max_size: f64,
	pub center_size: f64,
	pub peripheral_size: f64,
	pub emphasized_size: f64,
	/// Lineage size is `lineage_base - depth * lineage_step`, floored at `min_size`.
	pub lineage_base: f64,
	pub lineage_step: f64,
	pub parent_linking: ParentLinking,
	pub node_limit: usize,
	pub edge_limit: usize,
	pub trace_depth: u32,
	pub path_depth: u32,
	pub layout: LayoutParams,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			degree_base: 15.0,
			degree_step: 3.0,
			min_size: 20.0,
			max_size: 50.0,
			center_size: 55.0,
			peripheral_size: 30.0,
			emphasized_size: 45.0,
			lineage_base: 45.0,
			lineage_step: 8.0,
			parent_linking: ParentLinking::FirstOfLayer,
			node_limit: 200,
			edge_limit: 500,
			trace_depth: 3,
			path_depth: 4,
			layout: LayoutParams::default(),
		}
	}
}

impl GraphConfig {
	pub fn degree_size(&self, degree: u32) -> f64 {
		(self.degree_base + degree as f64 * self.degree_step).clamp(self.min_size, self.max_size)
	}

	pub fn depth_size(&self, depth: u32) -> f64 {
		(self.lineage_base - depth as f64 * self.lineage_step).max(self.min_size)
	}
}

/// Where the research backend lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
	pub base_url: String,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			base_url: option_env!("RESEARCH_API_URL")
				.unwrap_or("/api")
				.trim_end_matches('/')
				.to_string(),
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppConfig {
	pub api: ApiConfig,
	pub graph: GraphConfig,
}
