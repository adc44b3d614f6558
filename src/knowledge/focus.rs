//! Per-instance focus, preview and full-screen state.
//!
//! Every mounted graph view owns one [`FocusController`]; nothing here is
//! shared between views.

use log::debug;

use super::entity::{EntityRef, encode_component};
use super::key::{NodeKey, key_of, parse_key};
use super::source::GraphRequest;

/// Where a graph view is mounted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphMode {
	/// Embedded in a detail panel.
	Inline,
	/// The full graph explorer page or its full-screen overlay.
	Explorer,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Anchor {
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Preview {
	pub entity: EntityRef,
	pub key: NodeKey,
	pub anchor: Anchor,
}

/// What the view has to do after an input was handled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FocusAction {
	Ignored,
	PreviewOpened,
	PreviewClosed,
	Navigate(String),
	FullscreenExited,
}

/// Issued for every dispatched request; carries the parameters active at dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket<K> {
	key: K,
	generation: u64,
}

impl<K> Ticket<K> {
	pub fn key(&self) -> &K {
		&self.key
	}
}

/// Lets only the response to the latest dispatch through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchGuard<K> {
	generation: u64,
	current: Option<K>,
}

impl<K> Default for FetchGuard<K> {
	fn default() -> Self {
		Self {
			generation: 0,
			current: None,
		}
	}
}

impl<K: Clone + PartialEq> FetchGuard<K> {
	pub fn dispatch(&mut self, key: K) -> Ticket<K> {
		self.generation += 1;
		self.current = Some(key.clone());
		Ticket {
			key,
			generation: self.generation,
		}
	}

	pub fn accepts(&self, ticket: &Ticket<K>) -> bool {
		ticket.generation == self.generation && self.current.as_ref() == Some(&ticket.key)
	}

	/// Forget the in-flight request so its response is dropped.
	pub fn cancel(&mut self) {
		self.generation += 1;
		self.current = None;
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct FocusController {
	mode: GraphMode,
	center: Option<EntityRef>,
	preview: Option<Preview>,
	fullscreen: bool,
	fetch: FetchGuard<GraphRequest>,
}

impl FocusController {
	pub fn new(mode: GraphMode) -> Self {
		Self {
			mode,
			center: None,
			preview: None,
			fullscreen: false,
			fetch: FetchGuard::default(),
		}
	}

	pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
		self.fullscreen = fullscreen;
		self
	}

	pub fn mode(&self) -> GraphMode {
		self.mode
	}

	pub fn center(&self) -> Option<&EntityRef> {
		self.center.as_ref()
	}

	pub fn preview(&self) -> Option<&Preview> {
		self.preview.as_ref()
	}

	pub fn is_fullscreen(&self) -> bool {
		self.fullscreen
	}

	pub fn set_fullscreen(&mut self, fullscreen: bool) {
		self.fullscreen = fullscreen;
	}

	/// Replace the center. The preview belongs to the old sub-graph and is closed.
	pub fn set_center(&mut self, center: Option<EntityRef>) {
		if self.center != center {
			self.preview = None;
		}
		self.center = center;
	}

	/// Record `request` as the one in flight, re-centring on its entity.
	pub fn dispatch(&mut self, request: GraphRequest) -> Ticket<GraphRequest> {
		self.set_center(request.center().cloned());
		self.fetch.dispatch(request)
	}

	/// Nothing to show any more: drop the center and the in-flight request.
	pub fn cancel(&mut self) {
		self.set_center(None);
		self.fetch.cancel();
	}

	pub fn accepts(&self, ticket: &Ticket<GraphRequest>) -> bool {
		let current = self.fetch.accepts(ticket);
		if !current {
			debug!("discarding stale response for {:?}", ticket.key());
		}
		current
	}

	pub fn on_node_click(&mut self, key: &str, anchor: Anchor) -> FocusAction {
		let entity = parse_key(key);
		if self.center.as_ref() == Some(&entity) {
			return FocusAction::Ignored;
		}
		self.preview = Some(Preview {
			key: key.to_string(),
			entity,
			anchor,
		});
		FocusAction::PreviewOpened
	}

	pub fn on_node_double_click(&mut self, key: &str) -> FocusAction {
		match self.mode {
			GraphMode::Inline => FocusAction::Ignored,
			GraphMode::Explorer => {
				self.preview = None;
				FocusAction::Navigate(parse_key(key).route())
			}
		}
	}

	pub fn on_background_click(&mut self) -> FocusAction {
		self.close_preview()
	}

	/// Escape closes the preview first and leaves full-screen on the next press.
	pub fn on_escape(&mut self) -> FocusAction {
		if self.preview.is_some() {
			self.close_preview()
		} else if self.fullscreen {
			self.fullscreen = false;
			FocusAction::FullscreenExited
		} else {
			FocusAction::Ignored
		}
	}

	pub fn close_preview(&mut self) -> FocusAction {
		match self.preview.take() {
			Some(_) => FocusAction::PreviewClosed,
			None => FocusAction::Ignored,
		}
	}
}

/// Link to the graph explorer centred on `entity`.
pub fn view_in_graph(entity: &EntityRef) -> String {
	format!("/graph?focus={}", encode_component(&key_of(entity)))
}
