use crate::knowledge::NodeKey;

/// Physics knobs handed to the layout simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParams {
	pub repulsion: f32,
	/// Pull towards the origin, per second.
	pub gravity: f32,
	/// Preferred edge length range in world units; its midpoint sets spring stiffness.
	pub edge_length: (f32, f32),
}

impl Default for LayoutParams {
	fn default() -> Self {
		Self {
			repulsion: 150.0,
			gravity: 0.1,
			edge_length: (60.0, 160.0),
		}
	}
}

impl LayoutParams {
	pub fn spring(&self) -> f32 {
		let (lo, hi) = self.edge_length;
		let mid = ((lo + hi) / 2.0).max(1.0);
		0.05 * 110.0 / mid
	}

	/// Radius of the ring nodes start on.
	pub fn initial_radius(&self) -> f32 {
		self.edge_length.0.max(1.0)
	}
}

/// A click on a vertex, in page coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeEvent {
	pub key: NodeKey,
	pub x: f64,
	pub y: f64,
}
