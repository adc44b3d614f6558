//! The one persisted user preference: how the explorer shows its nodes.

use std::cell::RefCell;
use std::collections::HashMap;

const VIEW_MODE_KEY: &str = "research-graph.view-mode";

/// Key/value storage for preferences.
pub trait PreferenceStore {
	fn load(&self, key: &str) -> Option<String>;
	fn store(&self, key: &str, value: &str);
}

/// Browser `localStorage`. Silently does nothing where storage is unavailable.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
	fn storage() -> Option<web_sys::Storage> {
		web_sys::window()?.local_storage().ok().flatten()
	}
}

impl PreferenceStore for BrowserStorage {
	fn load(&self, key: &str) -> Option<String> {
		Self::storage()?.get_item(key).ok().flatten()
	}

	fn store(&self, key: &str, value: &str) {
		if let Some(storage) = Self::storage() {
			if storage.set_item(key, value).is_err() {
				log::warn!("could not persist preference {key}");
			}
		}
	}
}

#[derive(Debug, Default)]
pub struct MemoryStore {
	values: RefCell<HashMap<String, String>>,
}

impl PreferenceStore for MemoryStore {
	fn load(&self, key: &str) -> Option<String> {
		self.values.borrow().get(key).cloned()
	}

	fn store(&self, key: &str, value: &str) {
		self.values
			.borrow_mut()
			.insert(key.to_string(), value.to_string());
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
	#[default]
	Graph,
	List,
}

impl ViewMode {
	pub fn as_str(self) -> &'static str {
		match self {
			ViewMode::Graph => "graph",
			ViewMode::List => "list",
		}
	}

	pub fn toggled(self) -> Self {
		match self {
			ViewMode::Graph => ViewMode::List,
			ViewMode::List => ViewMode::Graph,
		}
	}

	pub fn load(store: &impl PreferenceStore) -> Self {
		match store.load(VIEW_MODE_KEY).as_deref() {
			Some("list") => ViewMode::List,
			_ => ViewMode::Graph,
		}
	}

	pub fn save(self, store: &impl PreferenceStore) {
		store.store(VIEW_MODE_KEY, self.as_str());
	}
}
