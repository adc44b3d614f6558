//! Dense per-graph category indices, assigned in first-seen order.

use super::entity::EntityType;
use super::graph::Category;

#[derive(Clone, Debug, Default)]
pub struct CategoryIndexer {
	order: Vec<EntityType>,
}

impl CategoryIndexer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Index for `entity_type`, appending it if this is its first occurrence.
	pub fn index_of(&mut self, entity_type: EntityType) -> usize {
		match self.order.iter().position(|t| *t == entity_type) {
			Some(idx) => idx,
			None => {
				self.order.push(entity_type);
				self.order.len() - 1
			}
		}
	}

	pub fn len(&self) -> usize {
		self.order.len()
	}

	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	pub fn categories(&self) -> Vec<Category> {
		self.order
			.iter()
			.map(|t| {
				let style = t.style();
				Category {
					entity_type: *t,
					label: style.label.to_string(),
					color: style.color.to_string(),
				}
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn indices_follow_first_occurrence() {
		let mut indexer = CategoryIndexer::new();
		assert_eq!(indexer.index_of(EntityType::Strategy), 0);
		assert_eq!(indexer.index_of(EntityType::Factor), 1);
		assert_eq!(indexer.index_of(EntityType::Strategy), 0);
		assert_eq!(indexer.index_of(EntityType::Note), 2);

		let labels: Vec<_> = indexer.categories().into_iter().map(|c| c.label).collect();
		assert_eq!(labels, ["Strategy", "Factor", "Note"]);
	}

	#[test]
	fn same_traversal_gives_same_output() {
		let seq = [EntityType::Tag, EntityType::Data, EntityType::Tag];
		let run = || {
			let mut indexer = CategoryIndexer::new();
			let idx: Vec<_> = seq.iter().map(|t| indexer.index_of(*t)).collect();
			(idx, indexer.categories())
		};
		assert_eq!(run(), run());
	}
}
