//! Tree to markup.

use crate::config::{CLASS_ATTRIBUTE, RenderOptions, STYLE_ATTRIBUTE};
use crate::node::{TagId, TagKind, TagNode};
use crate::tree::TagTree;
use crate::writer::MarkupWriter;

/// Serializes nodes of a [`TagTree`] to HTML.
///
/// Rendering is infallible: hidden nodes, unknown ids and metadata that
/// cannot be serialized produce no output rather than an error.
///
/// # Examples
///
/// ```
/// use tagweave_core::{RenderOptions, Renderer, TagTree};
///
/// let mut tree = TagTree::new();
/// let ul = tree.create("ul");
/// let li = tree.create("li");
/// tree.append(ul, li).unwrap();
/// tree.tag_mut(li).text("one");
///
/// let options = RenderOptions::new().pretty().newline("\n");
/// let html = Renderer::with_options(&tree, options).render(ul);
/// assert_eq!(html, "<ul>\n  <li>one</li>\n</ul>");
/// ```
#[derive(Debug, Clone)]
pub struct Renderer<'t> {
	tree: &'t TagTree,
	options: RenderOptions,
}

impl<'t> Renderer<'t> {
	/// Compact renderer.
	pub fn new(tree: &'t TagTree) -> Self {
		Self::with_options(tree, RenderOptions::default())
	}

	/// Renderer with explicit output options.
	pub fn with_options(tree: &'t TagTree, options: RenderOptions) -> Self {
		Self { tree, options }
	}

	/// Options in use.
	pub fn options(&self) -> &RenderOptions {
		&self.options
	}

	/// Markup for `id`, its content and its sibling chain.
	///
	/// When the node asked for rendering from the top, the top-most ancestor
	/// is rendered instead.
	pub fn render(&self, id: TagId) -> String {
		let Some(node) = self.tree.get(id) else {
			tracing::debug!(tag = %id, "render requested for unknown tag");
			return String::new();
		};
		if !node.will_be_rendered() {
			return String::new();
		}

		let start = if node.render_from_top {
			self.tree.root_of(id)
		} else {
			id
		};
		tracing::trace!(tag = %start, pretty = self.options.pretty, "rendering tag");

		let mut writer = MarkupWriter::new(&self.options);
		self.write_chain(start, &mut writer);
		writer.finish()
	}

	fn write_chain(&self, id: TagId, writer: &mut MarkupWriter<'_>) {
		let mut current = Some(id);
		while let Some(id) = current {
			let Some(node) = self.tree.get(id) else {
				break;
			};
			// a hidden node also hides whatever follows it
			if !node.will_be_rendered() {
				break;
			}
			match node.kind {
				TagKind::Literal => writer.write_text(&node.text, false),
				TagKind::Element => self.write_element(node, writer),
			}
			current = node.next;
		}
	}

	fn write_element(&self, node: &TagNode, writer: &mut MarkupWriter<'_>) {
		let opened = node.has_tag();
		if opened {
			self.write_attributes(node, writer);
			if node.is_self_closing() {
				writer.begin_tag(&node.tag, true);
				return;
			}
			writer.begin_tag(&node.tag, false);
		}

		if !node.text.is_empty() {
			writer.write_text(&node.text, node.encode_inner_text);
		}
		for &child in &node.children {
			self.write_chain(child, writer);
		}

		if opened {
			if node.has_closing_tag() {
				writer.end_tag();
			} else {
				writer.discarding(|w| w.end_tag());
			}
		}
	}

	fn write_attributes(&self, node: &TagNode, writer: &mut MarkupWriter<'_>) {
		node.attributes.each_pair(|key, value| match value {
			Some(attribute) => {
				writer.add_attribute(key, Some(&attribute.render_for(key)), attribute.encoded)
			}
			None => writer.add_attribute(key, None, false),
		});

		if !node.classes.is_empty() {
			writer.add_attribute(CLASS_ATTRIBUTE, Some(&node.class_attribute()), true);
		}

		if !node.metadata.is_empty() {
			match node.metadata_json() {
				Ok(json) => writer.add_attribute(
					&self.tree.config().metadata_attribute(),
					Some(&json),
					true,
				),
				Err(err) => tracing::warn!(error = %err, "skipping unserializable metadata"),
			}
		}

		if !node.styles.is_empty() {
			writer.add_attribute(STYLE_ATTRIBUTE, Some(&node.style_attribute()), true);
		}
	}
}
