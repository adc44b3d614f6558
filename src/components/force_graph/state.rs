use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::LayoutParams;
use crate::knowledge::focus::{FetchGuard, Ticket};
use crate::knowledge::{KnowledgeGraph, LinkStyle, NodeKey, NodeRole};

/// World units per unit of vertex size.
pub const SIZE_SCALE: f64 = 0.25;
/// Extra hit slack around a node, in world units.
pub const HIT_SLACK: f64 = 4.0;
/// Pointer travel (screen px) below which a press counts as a click.
pub const CLICK_SLOP: f64 = 4.0;
/// How long a node click waits for a second click before it counts as single.
pub const DOUBLE_CLICK_MS: u64 = 250;
const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 10.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub key: NodeKey,
	pub label: String,
	pub color: String,
	pub radius: f64,
	pub role: NodeRole,
}

#[derive(Clone, Debug)]
pub struct EdgeInfo {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub relation: String,
	pub style: LinkStyle,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Pointer press that may still turn out to be a click.
#[derive(Clone, Debug, Default)]
pub struct PressState {
	pub x: f64,
	pub y: f64,
	pub node: Option<DefaultNodeIdx>,
	pub moved: bool,
}

/// Outcome of releasing a press without dragging it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerClick {
	Node(DefaultNodeIdx),
	Background,
}

/// Holds a node click back until no double-click can follow it.
#[derive(Clone, Debug, Default)]
pub struct ClickGate {
	pending: FetchGuard<NodeKey>,
}

impl ClickGate {
	pub fn hold(&mut self, key: NodeKey) -> Ticket<NodeKey> {
		self.pending.dispatch(key)
	}

	/// True once for the latest held click, unless a double-click cancelled it.
	pub fn release(&mut self, ticket: &Ticket<NodeKey>) -> bool {
		let fires = self.pending.accepts(ticket);
		if fires {
			self.pending.cancel();
		}
		fires
	}

	pub fn cancel(&mut self) {
		self.pending.cancel();
	}
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub press: Option<PressState>,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	pub edges: Vec<EdgeInfo>,
	gravity: f32,
	keys: HashMap<DefaultNodeIdx, NodeKey>,
}

impl ForceGraphState {
	pub fn new(data: &KnowledgeGraph, layout: &LayoutParams, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: layout.repulsion,
			force_spring: layout.spring(),
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut key_to_idx = HashMap::new();
		let mut keys = HashMap::new();
		let mut edges = Vec::new();
		let ring = layout.initial_radius() as f64;

		for (i, node) in data.nodes.iter().enumerate() {
			let center = node.role == NodeRole::Center;
			let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
			let (x, y) = if center {
				(0.0, 0.0)
			} else {
				((ring * angle.cos()) as f32, (ring * angle.sin()) as f32)
			};

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: (node.size / 3.0) as f32,
				is_anchor: center,
				user_data: NodeInfo {
					key: node.key.clone(),
					label: node.display_name.clone(),
					color: data.color_of(node).to_string(),
					radius: node.size * SIZE_SCALE,
					role: node.role,
				},
			});
			key_to_idx.insert(node.key.clone(), idx);
			keys.insert(idx, node.key.clone());
		}

		for link in &data.links {
			if let (Some(&src), Some(&tgt)) =
				(key_to_idx.get(&link.source), key_to_idx.get(&link.target))
			{
				if src != tgt {
					graph.add_edge(src, tgt, EdgeData::default());
				}
				edges.push(EdgeInfo {
					source: src,
					target: tgt,
					relation: link.relation.clone(),
					style: link.style,
				});
			}
		}

		Self {
			graph,
			edges,
			keys,
			gravity: layout.gravity,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			press: None,
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
		}
	}

	pub fn key_of(&self, idx: DefaultNodeIdx) -> Option<&NodeKey> {
		self.keys.get(&idx)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// hit radius is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < node.data.user_data.radius + HIT_SLACK {
				found = Some(node.index());
			}
		});
		found
	}

	/// Current world positions and radii, keyed by node.
	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64, f64)> {
		let mut out = HashMap::new();
		self.graph.visit_nodes(|node| {
			out.insert(
				node.index(),
				(
					node.x() as f64,
					node.y() as f64,
					node.data.user_data.radius,
				),
			);
		});
		out
	}

	pub fn begin_press(&mut self, x: f64, y: f64, node: Option<DefaultNodeIdx>) {
		self.press = Some(PressState {
			x,
			y,
			node,
			moved: false,
		});
	}

	pub fn track_press(&mut self, x: f64, y: f64) {
		if let Some(press) = self.press.as_mut() {
			let (dx, dy) = (x - press.x, y - press.y);
			if (dx * dx + dy * dy).sqrt() > CLICK_SLOP {
				press.moved = true;
			}
		}
	}

	/// Ends the press; a press that never travelled is a click.
	pub fn end_press(&mut self) -> Option<PointerClick> {
		let press = self.press.take()?;
		if press.moved {
			return None;
		}
		Some(match press.node {
			Some(idx) => PointerClick::Node(idx),
			None => PointerClick::Background,
		})
	}

	/// Press on a node starts a drag, anywhere else a pan.
	pub fn pointer_down(&mut self, x: f64, y: f64) {
		let hit = self.node_at_position(x, y);
		self.begin_press(x, y, hit);
		match hit {
			Some(idx) => {
				let mut origin = (0.0, 0.0);
				self.graph.visit_nodes(|node| {
					if node.index() == idx {
						origin = (node.x(), node.y());
					}
				});
				self.drag = DragState {
					active: true,
					node_idx: Some(idx),
					start_x: x,
					start_y: y,
					node_start_x: origin.0,
					node_start_y: origin.1,
				};
			}
			None => {
				self.pan = PanState {
					active: true,
					start_x: x,
					start_y: y,
					transform_start_x: self.transform.x,
					transform_start_y: self.transform.y,
				};
			}
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		self.track_press(x, y);
		if let Some(idx) = self.drag.node_idx.filter(|_| self.drag.active) {
			let k = self.transform.k;
			let nx = self.drag.node_start_x + ((x - self.drag.start_x) / k) as f32;
			let ny = self.drag.node_start_y + ((y - self.drag.start_y) / k) as f32;
			// a dragged node stays where it is dropped
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.x = nx;
					node.data.y = ny;
					node.data.is_anchor = true;
				}
			});
			return;
		}
		let hovered = self.node_at_position(x, y);
		self.set_hover(hovered);
		if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	pub fn pointer_up(&mut self) -> Option<PointerClick> {
		self.drag = DragState::default();
		self.pan.active = false;
		self.end_press()
	}

	pub fn pointer_leave(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
		self.press = None;
		self.set_hover(None);
	}

	/// Zoom around the screen point `(x, y)`; scrolling down zooms out.
	pub fn zoom_at(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = k;
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// keep the previous highlight around for the fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for edge in &self.edges {
				if edge.source == idx {
					self.hover.neighbors.insert(edge.target);
				} else if edge.target == idx {
					self.hover.neighbors.insert(edge.source);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;

		let pull = (self.gravity * dt).min(1.0);
		if pull > 0.0 {
			self.graph.visit_nodes_mut(|node| {
				if !node.data.is_anchor {
					node.data.x -= node.data.x * pull;
					node.data.y -= node.data.y * pull;
				}
			});
		}

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.transform.x = width / 2.0;
		self.transform.y = height / 2.0;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::GraphConfig;
	use crate::knowledge::source::{EdgeSource, Relation};
	use crate::knowledge::{EntityRef, EntityType, GraphSource, assemble};

	fn star() -> KnowledgeGraph {
		let x = EntityRef::new(EntityType::Experience, "X");
		let src = EdgeSource {
			center: x.clone(),
			edges: vec![
				Relation {
					source: x.clone(),
					target: EntityRef::new(EntityType::Note, "N1"),
					relation: "mentions".into(),
				},
				Relation {
					source: x.clone(),
					target: x.clone(),
					relation: "revises".into(),
				},
			],
		};
		assemble(&GraphSource::Edges(src), &GraphConfig::default())
	}

	#[test]
	fn center_sits_at_origin() {
		let state = ForceGraphState::new(&star(), &LayoutParams::default(), 800.0, 600.0);
		let hit = state.node_at_position(400.0, 300.0);
		assert_eq!(
			hit.and_then(|idx| state.key_of(idx)).map(String::as_str),
			Some("experience:X")
		);
		assert_eq!(state.node_at_position(5.0, 5.0), None);
	}

	#[test]
	fn self_loops_are_kept_for_display() {
		let state = ForceGraphState::new(&star(), &LayoutParams::default(), 800.0, 600.0);
		assert_eq!(state.edges.len(), 2);
	}

	#[test]
	fn press_without_travel_is_a_click() {
		let mut state = ForceGraphState::new(&star(), &LayoutParams::default(), 800.0, 600.0);
		state.begin_press(10.0, 10.0, None);
		state.track_press(11.0, 11.0);
		assert_eq!(state.end_press(), Some(PointerClick::Background));

		state.begin_press(10.0, 10.0, None);
		state.track_press(40.0, 10.0);
		assert_eq!(state.end_press(), None);
		assert_eq!(state.end_press(), None);
	}

	#[test]
	fn background_drag_pans_without_clicking() {
		let mut state = ForceGraphState::new(&star(), &LayoutParams::default(), 800.0, 600.0);
		state.pointer_down(10.0, 10.0);
		state.pointer_move(60.0, 30.0);
		assert_eq!((state.transform.x, state.transform.y), (450.0, 320.0));
		assert_eq!(state.pointer_up(), None);
		assert!(!state.pan.active);
	}

	#[test]
	fn dragged_node_is_pinned() {
		let mut state = ForceGraphState::new(&star(), &LayoutParams::default(), 800.0, 600.0);
		state.pointer_down(400.0, 300.0);
		state.pointer_move(420.0, 300.0);
		assert_eq!(state.pointer_up(), None);
		let moved = state.node_at_position(420.0, 300.0);
		assert_eq!(
			moved.and_then(|idx| state.key_of(idx)).map(String::as_str),
			Some("experience:X")
		);
	}

	#[test]
	fn zoom_keeps_the_cursor_point_fixed() {
		let mut state = ForceGraphState::new(&star(), &LayoutParams::default(), 800.0, 600.0);
		let before = state.screen_to_graph(500.0, 200.0);
		state.zoom_at(500.0, 200.0, -1.0);
		let after = state.screen_to_graph(500.0, 200.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
		assert!(state.transform.k > 1.0);
	}

	#[test]
	fn double_click_swallows_the_held_click() {
		let mut gate = ClickGate::default();
		let first = gate.hold("note:N1".into());
		gate.cancel();
		assert!(!gate.release(&first));

		let single = gate.hold("note:N1".into());
		assert!(gate.release(&single));
		assert!(!gate.release(&single));
	}

	#[test]
	fn only_the_latest_held_click_fires() {
		let mut gate = ClickGate::default();
		let a = gate.hold("note:A".into());
		let b = gate.hold("note:B".into());
		assert!(!gate.release(&a));
		assert!(gate.release(&b));
	}

	#[test]
	fn hovering_center_highlights_neighbors() {
		let mut state = ForceGraphState::new(&star(), &LayoutParams::default(), 800.0, 600.0);
		let center = state.node_at_position(400.0, 300.0);
		state.set_hover(center);
		assert_eq!(state.hover.neighbors.len(), 2);
	}
}
