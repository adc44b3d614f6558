//! Flat `"type:id"` vertex keys.

use super::entity::{EntityRef, EntityType};

/// Separator between the type and the id in a [`NodeKey`].
pub const KEY_DELIMITER: char = ':';

/// Graph vertex identifier, `"{type}:{id}"`.
pub type NodeKey = String;

pub fn build_key(entity_type: EntityType, id: &str) -> NodeKey {
	format!("{}{}{}", entity_type.as_str(), KEY_DELIMITER, id)
}

pub fn key_of(entity: &EntityRef) -> NodeKey {
	build_key(entity.entity_type, &entity.id)
}

/// Split a key on its first delimiter.
///
/// Keys without a delimiter, or whose prefix names no known type, degrade to a
/// `data` reference carrying the whole key as its id.
pub fn parse_key(key: &str) -> EntityRef {
	key.split_once(KEY_DELIMITER)
		.and_then(|(prefix, id)| {
			prefix
				.parse::<EntityType>()
				.ok()
				.map(|t| EntityRef::new(t, id))
		})
		.unwrap_or_else(|| EntityRef::new(EntityType::Data, key))
}
