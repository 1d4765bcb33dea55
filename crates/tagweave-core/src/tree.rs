//! Arena that owns every node of a markup tree.
//!
//! Structural operations (appending, wrapping, sibling chaining) live here
//! because they touch more than one node; the single-parent rule and the
//! absence of cycles are checked before anything is changed.

use crate::config::{RenderOptions, TagConfig};
use crate::error::{TagError, TagResult};
use crate::handle::{TagMut, TagRef};
use crate::node::{TagId, TagKind, TagNode};
use crate::render::Renderer;
use crate::source::TagSource;
use std::ops::{Index, IndexMut};

/// Owner of a set of [`TagNode`]s addressed by [`TagId`].
///
/// Nodes are never freed while the tree lives, so ids stay valid. A node that
/// is detached simply stops being reachable from its former parent.
#[derive(Debug, Clone)]
pub struct TagTree {
	nodes: Vec<TagNode>,
	config: TagConfig,
}

impl Default for TagTree {
	fn default() -> Self {
		Self::new()
	}
}

impl TagTree {
	/// Creates an empty tree using the process-wide [`TagConfig`].
	pub fn new() -> Self {
		Self::with_config(TagConfig::global())
	}

	/// Creates an empty tree with its own configuration.
	pub fn with_config(config: TagConfig) -> Self {
		Self {
			nodes: Vec::new(),
			config,
		}
	}

	/// Configuration read when classifying attributes and rendering.
	pub fn config(&self) -> &TagConfig {
		&self.config
	}

	/// Replaces the configuration of this tree only.
	pub fn set_config(&mut self, config: TagConfig) {
		self.config = config;
	}

	/// Number of nodes ever created in this tree.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Whether no node was created yet.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Whether `id` belongs to this tree.
	pub fn contains(&self, id: TagId) -> bool {
		id.index() < self.nodes.len()
	}

	/// Creates an element named `name` (lower-cased).
	pub fn create(&mut self, name: &str) -> TagId {
		self.push(TagNode::new(name, TagKind::Element))
	}

	/// Creates a nameless node that writes only its content.
	pub fn placeholder(&mut self) -> TagId {
		let mut node = TagNode::new("", TagKind::Element);
		node.ignore_opening_tag = true;
		node.ignore_closing_tag = true;
		self.push(node)
	}

	/// Creates a `span` that is not rendered.
	pub fn empty(&mut self) -> TagId {
		let mut node = TagNode::new("span", TagKind::Element);
		node.should_render = false;
		self.push(node)
	}

	/// Creates a node that writes `html` verbatim.
	pub fn literal(&mut self, html: &str) -> TagId {
		let mut node = TagNode::new("", TagKind::Literal);
		node.text = html.to_string();
		node.encode_inner_text = false;
		self.push(node)
	}

	fn push(&mut self, node: TagNode) -> TagId {
		let id = TagId(self.nodes.len() as u32);
		self.nodes.push(node);
		id
	}

	/// Node data for `id`.
	pub fn get(&self, id: TagId) -> Option<&TagNode> {
		self.nodes.get(id.index())
	}

	/// Mutable node data for `id`.
	///
	/// Relationship fields are not reachable through this; use the tree's
	/// structural operations.
	pub fn get_mut(&mut self, id: TagId) -> Option<&mut TagNode> {
		self.nodes.get_mut(id.index())
	}

	fn node(&self, id: TagId) -> TagResult<&TagNode> {
		self.get(id).ok_or(TagError::UnknownTag(id))
	}

	fn ensure(&self, ids: &[TagId]) -> TagResult<()> {
		for &id in ids {
			self.node(id)?;
		}
		Ok(())
	}

	/// Read handle for `id`.
	///
	/// # Panics
	///
	/// Panics if `id` does not belong to this tree.
	pub fn tag(&self, id: TagId) -> TagRef<'_> {
		assert!(self.contains(id), "unknown tag {}", id);
		TagRef::new(self, id)
	}

	/// Write handle for `id`.
	///
	/// # Panics
	///
	/// Panics if `id` does not belong to this tree.
	pub fn tag_mut(&mut self, id: TagId) -> TagMut<'_> {
		assert!(self.contains(id), "unknown tag {}", id);
		TagMut::new(self, id)
	}

	/// Read handle for `id`, or [`TagError::UnknownTag`].
	pub fn try_tag(&self, id: TagId) -> TagResult<TagRef<'_>> {
		self.node(id)?;
		Ok(TagRef::new(self, id))
	}

	/// Write handle for `id`, or [`TagError::UnknownTag`].
	pub fn try_tag_mut(&mut self, id: TagId) -> TagResult<TagMut<'_>> {
		self.node(id)?;
		Ok(TagMut::new(self, id))
	}

	/// Top-most ancestor of `id`, or `id` itself.
	pub fn root_of(&self, id: TagId) -> TagId {
		let mut current = id;
		while let Some(parent) = self.get(current).and_then(|node| node.parent) {
			current = parent;
		}
		current
	}

	/// Whether `target` is `from` or can be reached from it by following
	/// child and sibling links in any mix.
	pub fn reaches(&self, from: TagId, target: TagId) -> bool {
		let mut seen = vec![false; self.nodes.len()];
		let mut stack = vec![from];
		while let Some(current) = stack.pop() {
			if current == target {
				return true;
			}
			let Some(node) = self.get(current) else {
				continue;
			};
			if std::mem::replace(&mut seen[current.index()], true) {
				continue;
			}
			stack.extend(node.children.iter().copied());
			stack.extend(node.next);
		}
		false
	}

	fn check_attach(&self, parent: TagId, child: TagId) -> TagResult<()> {
		self.ensure(&[parent, child])?;
		if self.reaches(child, parent) {
			tracing::debug!(parent = %parent, child = %child, "refusing to create a cycle");
			return Err(TagError::InvalidOperation(format!(
				"cannot append {} to {}: {} is reachable from it",
				child, parent, parent
			)));
		}
		Ok(())
	}

	/// Removes `child` from its parent's children, if it has a parent.
	pub fn detach(&mut self, child: TagId) -> TagResult<()> {
		let parent = self.node(child)?.parent;
		if let Some(parent) = parent {
			self.nodes[parent.index()].children.retain(|&id| id != child);
			self.nodes[child.index()].parent = None;
		}
		Ok(())
	}

	pub(crate) fn attach(&mut self, parent: TagId, child: TagId, first: bool) {
		let children = &mut self.nodes[parent.index()].children;
		if first {
			children.insert(0, child);
		} else {
			children.push(child);
		}
		self.nodes[child.index()].parent = Some(parent);
	}

	/// Moves `child` to the end of `parent`'s children.
	///
	/// # Errors
	///
	/// [`TagError::InvalidOperation`] when `child` is `parent` or one of its
	/// ancestors, [`TagError::UnknownTag`] for foreign ids.
	pub fn append(&mut self, parent: TagId, child: TagId) -> TagResult<()> {
		self.check_attach(parent, child)?;
		self.detach(child)?;
		self.attach(parent, child, false);
		Ok(())
	}

	/// Moves `child` to the front of `parent`'s children.
	pub fn insert_first(&mut self, parent: TagId, child: TagId) -> TagResult<()> {
		self.check_attach(parent, child)?;
		self.detach(child)?;
		self.attach(parent, child, true);
		Ok(())
	}

	/// Appends every node of `source` in order. Nothing is moved if any of
	/// them would be refused.
	pub fn append_all<S>(&mut self, parent: TagId, source: &S) -> TagResult<()>
	where
		S: TagSource + ?Sized,
	{
		let children: Vec<TagId> = source.all_tags().collect();
		for &child in &children {
			self.check_attach(parent, child)?;
		}
		for child in children {
			self.detach(child)?;
			self.attach(parent, child, false);
		}
		Ok(())
	}

	/// Detaches the current children of `parent` and appends `source` instead.
	pub fn replace_children<S>(&mut self, parent: TagId, source: &S) -> TagResult<()>
	where
		S: TagSource + ?Sized,
	{
		let children: Vec<TagId> = source.all_tags().collect();
		for &child in &children {
			self.check_attach(parent, child)?;
		}
		for old in std::mem::take(&mut self.nodes[parent.index()].children) {
			self.nodes[old.index()].parent = None;
		}
		for child in children {
			self.detach(child)?;
			self.attach(parent, child, false);
		}
		Ok(())
	}

	/// Creates the elements named by `path` below `parent`, each inside the
	/// previous one, and returns the innermost.
	///
	/// Segments are separated by `/` or `>`; empty segments are skipped, so an
	/// empty path returns `parent`.
	pub fn add(&mut self, parent: TagId, path: &str) -> TagResult<TagId> {
		self.node(parent)?;
		let mut current = parent;
		for segment in path.split(['/', '>']).map(str::trim) {
			if segment.is_empty() {
				continue;
			}
			let child = self.create(segment);
			self.attach(current, child, false);
			current = child;
		}
		Ok(current)
	}

	/// Makes `next` the sibling rendered right after `id`; the previous
	/// follower of `id` now follows `next`.
	///
	/// # Errors
	///
	/// [`TagError::InvalidOperation`] when `next` can already reach `id`
	/// (itself, an ancestor, or anything whose children or siblings lead
	/// back to `id`), or when the displaced follower leads back to `next`.
	pub fn after(&mut self, id: TagId, next: TagId) -> TagResult<()> {
		self.ensure(&[id, next])?;
		let old_next = self.nodes[id.index()].next;
		let loops = self.reaches(next, id) || old_next.is_some_and(|old| self.reaches(old, next));
		if loops {
			tracing::debug!(tag = %id, next = %next, "refusing to create a sibling cycle");
			return Err(TagError::InvalidOperation(format!(
				"placing {} after {} would make the sibling chain loop",
				next, id
			)));
		}

		self.nodes[next.index()].next = old_next;
		self.nodes[id.index()].next = Some(next);
		Ok(())
	}

	/// Wraps `id` in a new element named `name` and returns the wrapper.
	///
	/// The wrapper takes the node's place in its parent and copies its render
	/// and authorization flags.
	pub fn wrap_with(&mut self, id: TagId, name: &str) -> TagResult<TagId> {
		let (should_render, authorized) = {
			let node = self.node(id)?;
			(node.should_render, node.authorized)
		};
		let wrapper = self.create(name);
		{
			let node = &mut self.nodes[wrapper.index()];
			node.should_render = should_render;
			node.authorized = authorized;
		}
		self.splice(id, wrapper);
		self.attach(wrapper, id, false);
		Ok(wrapper)
	}

	/// Moves `id` to the front of `wrapper`'s children and returns `wrapper`.
	///
	/// A wrapper without a parent takes the node's former place.
	pub fn wrap_with_tag(&mut self, id: TagId, wrapper: TagId) -> TagResult<TagId> {
		self.check_attach(wrapper, id)?;
		let takes_slot = self.nodes[wrapper.index()].parent.is_none();
		if let Some(parent) = self.nodes[id.index()].parent.filter(|_| takes_slot) {
			if self.reaches(wrapper, parent) {
				tracing::debug!(tag = %id, wrapper = %wrapper, "refusing to create a cycle");
				return Err(TagError::InvalidOperation(format!(
					"{} cannot take the place of {}: {} is reachable from it",
					wrapper, id, parent
				)));
			}
		}
		if takes_slot {
			self.splice(id, wrapper);
		} else {
			self.detach(id)?;
		}
		self.attach(wrapper, id, true);
		Ok(wrapper)
	}

	// Puts `replacement` in the slot `id` holds in its parent and leaves `id`
	// detached. `replacement` must have no parent.
	fn splice(&mut self, id: TagId, replacement: TagId) {
		let Some(parent) = self.nodes[id.index()].parent.take() else {
			return;
		};
		if let Some(slot) = self.nodes[parent.index()]
			.children
			.iter_mut()
			.find(|child| **child == id)
		{
			*slot = replacement;
		}
		self.nodes[replacement.index()].parent = Some(parent);
	}

	/// First descendant of `id`, depth-first, whose tag name matches `name`
	/// ignoring ASCII case.
	pub fn for_child(&self, id: TagId, name: &str) -> Option<TagId> {
		let mut stack: Vec<TagId> = self.get(id)?.children.iter().rev().copied().collect();
		while let Some(current) = stack.pop() {
			let node = &self.nodes[current.index()];
			if node.tag.eq_ignore_ascii_case(name) {
				return Some(current);
			}
			stack.extend(node.children.iter().rev().copied());
		}
		None
	}

	/// Compact markup for `id`.
	pub fn render(&self, id: TagId) -> String {
		Renderer::new(self).render(id)
	}

	/// Markup for `id` with explicit output options.
	pub fn render_with(&self, id: TagId, options: RenderOptions) -> String {
		Renderer::with_options(self, options).render(id)
	}
}

impl Index<TagId> for TagTree {
	type Output = TagNode;

	/// # Panics
	///
	/// Panics if `id` does not belong to this tree.
	fn index(&self, id: TagId) -> &TagNode {
		&self.nodes[id.index()]
	}
}

impl IndexMut<TagId> for TagTree {
	fn index_mut(&mut self, id: TagId) -> &mut TagNode {
		&mut self.nodes[id.index()]
	}
}
