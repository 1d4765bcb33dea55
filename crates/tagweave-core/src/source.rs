//! Anything that yields tags.

use crate::node::TagId;
use crate::render::Renderer;
use crate::tree::TagTree;

/// Source of tags for [`TagTree::append_all`] and friends
pub trait TagSource {
	/// Every tag this source stands for, in order.
	fn all_tags(&self) -> impl Iterator<Item = TagId> + '_;
}

impl TagSource for TagId {
	fn all_tags(&self) -> impl Iterator<Item = TagId> + '_ {
		std::iter::once(*self)
	}
}

impl TagSource for [TagId] {
	fn all_tags(&self) -> impl Iterator<Item = TagId> + '_ {
		self.iter().copied()
	}
}

impl TagSource for Vec<TagId> {
	fn all_tags(&self) -> impl Iterator<Item = TagId> + '_ {
		self.iter().copied()
	}
}

/// Ordered list of tags rendered one after another
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagList {
	tags: Vec<TagId>,
}

impl TagList {
	/// Creates an empty list.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a tag at the end.
	pub fn push(&mut self, tag: TagId) {
		self.tags.push(tag);
	}

	/// Number of tags.
	pub fn len(&self) -> usize {
		self.tags.len()
	}

	/// Whether the list holds no tags.
	pub fn is_empty(&self) -> bool {
		self.tags.is_empty()
	}

	/// Tags in order.
	pub fn iter(&self) -> impl Iterator<Item = TagId> + '_ {
		self.tags.iter().copied()
	}

	/// Concatenated compact markup of every tag.
	pub fn render(&self, tree: &TagTree) -> String {
		let renderer = Renderer::new(tree);
		self.tags.iter().map(|&tag| renderer.render(tag)).collect()
	}
}

impl TagSource for TagList {
	fn all_tags(&self) -> impl Iterator<Item = TagId> + '_ {
		self.iter()
	}
}

impl FromIterator<TagId> for TagList {
	fn from_iter<I: IntoIterator<Item = TagId>>(iter: I) -> Self {
		Self {
			tags: iter.into_iter().collect(),
		}
	}
}

impl From<Vec<TagId>> for TagList {
	fn from(tags: Vec<TagId>) -> Self {
		Self { tags }
	}
}

impl IntoIterator for TagList {
	type Item = TagId;
	type IntoIter = std::vec::IntoIter<TagId>;

	fn into_iter(self) -> Self::IntoIter {
		self.tags.into_iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::TagConfig;
	use rstest::rstest;

	#[rstest]
	fn test_single_tag_yields_itself() {
		let mut tree = TagTree::with_config(TagConfig::default());
		let div = tree.create("div");

		assert_eq!(div.all_tags().collect::<Vec<_>>(), vec![div]);
	}

	#[rstest]
	fn test_list_renders_members_in_order() {
		// Arrange
		let mut tree = TagTree::with_config(TagConfig::default());
		let a = tree.create("a");
		let hidden = tree.empty();
		let b = tree.create("b");
		let list: TagList = [a, hidden, b].into_iter().collect();

		// Act
		let html = list.render(&tree);

		// Assert
		assert_eq!(list.len(), 3);
		assert_eq!(html, "<a></a><b></b>");
	}

	#[rstest]
	fn test_list_is_a_tag_source() {
		let mut tree = TagTree::with_config(TagConfig::default());
		let ul = tree.create("ul");
		let items = TagList::from(vec![tree.create("li"), tree.create("li")]);

		tree.append_all(ul, &items).unwrap();

		assert_eq!(tree.tag(ul).to_html(), "<ul><li></li><li></li></ul>");
	}
}
