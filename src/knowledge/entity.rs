//! Entity types known to the research backend and their static presentation table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of research entity a graph vertex stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
	/// Raw market data sets.
	Data,
	/// Computed factors.
	Factor,
	/// Trading strategies.
	Strategy,
	/// Free-form notes.
	Note,
	/// Research reports.
	Research,
	/// Experience records (research notes with outcomes).
	Experience,
	/// Tags attached to other entities.
	Tag,
}

/// Static presentation entry for one entity type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeStyle {
	pub label: &'static str,
	pub color: &'static str,
	/// Page path the entity opens on; the id goes into its `focus` (or `tag`) parameter.
	pub route: &'static str,
	pub route_param: &'static str,
}

impl EntityType {
	/// Every type, in legend order.
	pub const ALL: [EntityType; 7] = [
		EntityType::Data,
		EntityType::Factor,
		EntityType::Strategy,
		EntityType::Note,
		EntityType::Research,
		EntityType::Experience,
		EntityType::Tag,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			EntityType::Data => "data",
			EntityType::Factor => "factor",
			EntityType::Strategy => "strategy",
			EntityType::Note => "note",
			EntityType::Research => "research",
			EntityType::Experience => "experience",
			EntityType::Tag => "tag",
		}
	}

	pub fn style(self) -> TypeStyle {
		match self {
			EntityType::Data => TypeStyle {
				label: "Data",
				color: "#8c8c8c",
				route: "/data",
				route_param: "focus",
			},
			EntityType::Factor => TypeStyle {
				label: "Factor",
				color: "#1890ff",
				route: "/factors",
				route_param: "focus",
			},
			EntityType::Strategy => TypeStyle {
				label: "Strategy",
				color: "#52c41a",
				route: "/strategies",
				route_param: "focus",
			},
			EntityType::Note => TypeStyle {
				label: "Note",
				color: "#faad14",
				route: "/notes",
				route_param: "focus",
			},
			EntityType::Research => TypeStyle {
				label: "Research",
				color: "#722ed1",
				route: "/research",
				route_param: "focus",
			},
			EntityType::Experience => TypeStyle {
				label: "Experience",
				color: "#eb2f96",
				route: "/experiences",
				route_param: "focus",
			},
			EntityType::Tag => TypeStyle {
				label: "Tag",
				color: "#13c2c2",
				route: "/graph",
				route_param: "tag",
			},
		}
	}

	/// Pseudo-types that stay visible regardless of the type filter.
	pub fn is_always_shown(self) -> bool {
		matches!(self, EntityType::Data | EntityType::Tag)
	}

	/// Types the user can switch on and off.
	pub fn filterable() -> impl Iterator<Item = EntityType> {
		Self::ALL.into_iter().filter(|t| !t.is_always_shown())
	}

	/// Lenient conversion for payload strings: unknown names fall back to [`EntityType::Data`].
	pub fn parse_lossy(raw: &str) -> EntityType {
		raw.parse().unwrap_or_else(|_| {
			log::warn!("unknown entity type {raw:?}, treating as data");
			EntityType::Data
		})
	}
}

impl fmt::Display for EntityType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Returned when a string names no known entity type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownEntityType(pub String);

impl FromStr for EntityType {
	type Err = UnknownEntityType;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		EntityType::ALL
			.into_iter()
			.find(|t| t.as_str() == s)
			.ok_or_else(|| UnknownEntityType(s.to_string()))
	}
}

/// Typed reference to one backend entity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef {
	pub entity_type: EntityType,
	pub id: String,
}

impl EntityRef {
	pub fn new(entity_type: EntityType, id: impl Into<String>) -> Self {
		Self {
			entity_type,
			id: id.into(),
		}
	}

	/// Page this entity opens on when activated.
	pub fn route(&self) -> String {
		let style = self.entity_type.style();
		format!(
			"{}?{}={}",
			style.route,
			style.route_param,
			encode_component(&self.id)
		)
	}
}

pub(crate) fn encode_component(raw: &str) -> String {
	url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}
