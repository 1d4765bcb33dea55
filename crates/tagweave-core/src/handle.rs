//! Borrowed handles to a single node.
//!
//! [`TagRef`] is the read side: it dereferences to [`TagNode`] and adds the
//! lookups that need the whole tree (reserved attributes, navigation,
//! rendering). [`TagMut`] is the write side: every setter consumes the handle
//! and returns it, so calls chain the same way a builder does. Setters that
//! can fail return [`TagResult<Self>`].

use crate::access::RoleCheck;
use crate::class_name::{is_valid_class_name, parse_class_names};
use crate::config::{DATA_PREFIX, RenderOptions, ReservedAttr};
use crate::error::{TagError, TagResult};
use crate::node::{AttributeValue, TagId, TagNode, data_key, plain_string};
use crate::render::Renderer;
use crate::source::TagSource;
use crate::tree::TagTree;
use serde_json::{Map, Value};
use std::fmt;
use std::ops::Deref;

/// Read-only view of one node
#[derive(Clone, Copy)]
pub struct TagRef<'a> {
	tree: &'a TagTree,
	id: TagId,
}

impl<'a> TagRef<'a> {
	pub(crate) fn new(tree: &'a TagTree, id: TagId) -> Self {
		Self { tree, id }
	}

	/// Id of the viewed node.
	pub fn tag_id(&self) -> TagId {
		self.id
	}

	/// The owning tree.
	pub fn tree(&self) -> &'a TagTree {
		self.tree
	}

	fn node(&self) -> &'a TagNode {
		&self.tree[self.id]
	}

	/// Attribute value as it would be written, or an empty string.
	///
	/// `class`, `style` and the metadata attribute are built from their
	/// facets; boolean attributes read as empty.
	pub fn attr(&self, name: &str) -> String {
		let node = self.node();
		match self.tree.config().reserved(name) {
			Some(ReservedAttr::Class) => node.class_attribute(),
			Some(ReservedAttr::Style) => node.style_attribute(),
			Some(ReservedAttr::Metadata) if node.metadata.is_empty() => String::new(),
			Some(ReservedAttr::Metadata) => node.metadata_json().unwrap_or_default(),
			None => node
				.attr_value(name)
				.flatten()
				.map(|attribute| attribute.render_for(name))
				.unwrap_or_default(),
		}
	}

	/// Whether the attribute would be written.
	pub fn has_attr(&self, name: &str) -> bool {
		let node = self.node();
		match self.tree.config().reserved(name) {
			Some(ReservedAttr::Class) => !node.classes.is_empty(),
			Some(ReservedAttr::Style) => !node.styles.is_empty(),
			Some(ReservedAttr::Metadata) => !node.metadata.is_empty(),
			None => node.attributes.has(&name.to_string()),
		}
	}

	/// The `id` attribute.
	pub fn element_id(&self) -> String {
		self.attr("id")
	}

	/// The `title` attribute.
	pub fn title(&self) -> String {
		self.attr("title")
	}

	/// Metadata stored for `key`.
	///
	/// # Errors
	///
	/// [`TagError::Cache`] with a not-found error naming `key` when nothing is
	/// stored.
	pub fn metadata(&self, key: &str) -> TagResult<Value> {
		Ok(self.node().metadata.get(&key.to_string())?)
	}

	/// Parent node.
	pub fn parent_tag(&self) -> Option<TagRef<'a>> {
		self.node().parent.map(|id| TagRef::new(self.tree, id))
	}

	/// Children in order.
	pub fn child_tags(self) -> impl Iterator<Item = TagRef<'a>> {
		let tree = self.tree;
		self.node()
			.children
			.iter()
			.map(move |&id| TagRef::new(tree, id))
	}

	/// First child.
	pub fn first_child_tag(&self) -> Option<TagRef<'a>> {
		self.node()
			.first_child()
			.map(|id| TagRef::new(self.tree, id))
	}

	/// Following sibling.
	pub fn next_tag(&self) -> Option<TagRef<'a>> {
		self.node().next.map(|id| TagRef::new(self.tree, id))
	}

	/// First descendant with the given tag name, depth-first.
	pub fn for_child(&self, name: &str) -> Option<TagRef<'a>> {
		self.tree
			.for_child(self.id, name)
			.map(|id| TagRef::new(self.tree, id))
	}

	/// Compact markup.
	pub fn to_html(&self) -> String {
		Renderer::new(self.tree).render(self.id)
	}

	/// Indented markup, one element per line.
	pub fn to_pretty_html(&self) -> String {
		self.render_with(RenderOptions::new().pretty())
	}

	/// Markup with explicit output options.
	pub fn render_with(&self, options: RenderOptions) -> String {
		Renderer::with_options(self.tree, options).render(self.id)
	}
}

impl Deref for TagRef<'_> {
	type Target = TagNode;

	fn deref(&self) -> &TagNode {
		self.node()
	}
}

impl fmt::Display for TagRef<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_html())
	}
}

impl fmt::Debug for TagRef<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TagRef")
			.field("id", &self.id)
			.field("tag", &self.node().tag)
			.finish()
	}
}

/// Exclusive, chainable write access to one node
pub struct TagMut<'a> {
	tree: &'a mut TagTree,
	id: TagId,
}

impl<'a> TagMut<'a> {
	pub(crate) fn new(tree: &'a mut TagTree, id: TagId) -> Self {
		Self { tree, id }
	}

	/// Id of the edited node.
	pub fn tag_id(&self) -> TagId {
		self.id
	}

	/// Read view of the edited node.
	pub fn view(&self) -> TagRef<'_> {
		TagRef::new(&*self.tree, self.id)
	}

	/// Ends editing and keeps a read view.
	pub fn into_ref(self) -> TagRef<'a> {
		let TagMut { tree, id } = self;
		TagRef::new(tree, id)
	}

	/// The owning tree, e.g. to create nodes while editing.
	pub fn tree_mut(&mut self) -> &mut TagTree {
		&mut *self.tree
	}

	fn node_mut(&mut self) -> &mut TagNode {
		&mut self.tree[self.id]
	}

	fn reserved(&self, name: &str) -> Option<ReservedAttr> {
		self.tree.config().reserved(name)
	}

	// ----- structure -----

	/// Creates the nested elements named by `path` and returns the innermost.
	///
	/// See [`TagTree::add`] for the path syntax.
	pub fn add(self, path: &str) -> TagResult<TagMut<'a>> {
		let TagMut { tree, id } = self;
		let innermost = tree.add(id, path)?;
		Ok(TagMut::new(tree, innermost))
	}

	/// Like [`add`](Self::add), then runs `configure` on the innermost element.
	pub fn add_with<F>(self, path: &str, configure: F) -> TagResult<TagMut<'a>>
	where
		F: FnOnce(TagMut<'a>) -> TagResult<TagMut<'a>>,
	{
		configure(self.add(path)?)
	}

	/// Creates the nested elements named by `path` and stays on this node.
	pub fn append_path(self, path: &str) -> TagResult<Self> {
		self.tree.add(self.id, path)?;
		Ok(self)
	}

	/// Creates the nested elements named by `path`, configures the innermost
	/// and stays on this node.
	pub fn append_with<F>(self, path: &str, configure: F) -> TagResult<Self>
	where
		F: FnOnce(TagMut<'_>) -> TagResult<TagMut<'_>>,
	{
		let innermost = self.tree.add(self.id, path)?;
		configure(TagMut::new(&mut *self.tree, innermost))?;
		Ok(self)
	}

	/// Appends a configured `span` child.
	pub fn span<F>(self, configure: F) -> TagResult<Self>
	where
		F: FnOnce(TagMut<'_>) -> TagResult<TagMut<'_>>,
	{
		self.append_with("span", configure)
	}

	/// Appends a configured `div` child.
	pub fn div<F>(self, configure: F) -> TagResult<Self>
	where
		F: FnOnce(TagMut<'_>) -> TagResult<TagMut<'_>>,
	{
		self.append_with("div", configure)
	}

	/// Appends `<a href="#">` with `text` and `classes` and continues on the
	/// link.
	///
	/// # Errors
	///
	/// [`TagError::InvalidArgument`] when a class name is malformed; the link
	/// is not appended then.
	pub fn link<I, S>(self, text: &str, classes: I) -> TagResult<TagMut<'a>>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let classes: Vec<S> = classes.into_iter().collect();
		validate_classes(&classes)?;

		let TagMut { tree, id } = self;
		let link = tree.create("a");
		tree.attach(id, link, false);
		TagMut::new(tree, link)
			.plain_attr("href", "#")
			.text(text)
			.add_classes(classes)
	}

	/// Moves `child` to the end of this node's children.
	pub fn append(self, child: TagId) -> TagResult<Self> {
		self.tree.append(self.id, child)?;
		Ok(self)
	}

	/// Appends every node of `source`.
	pub fn append_all<S>(self, source: &S) -> TagResult<Self>
	where
		S: TagSource + ?Sized,
	{
		self.tree.append_all(self.id, source)?;
		Ok(self)
	}

	/// Appends a node that writes `html` verbatim.
	pub fn append_html(self, html: &str) -> Self {
		let literal = self.tree.literal(html);
		self.tree.attach(self.id, literal, false);
		self
	}

	/// Moves `child` to the front of this node's children.
	pub fn insert_first(self, child: TagId) -> TagResult<Self> {
		self.tree.insert_first(self.id, child)?;
		Ok(self)
	}

	/// Replaces all children with the nodes of `source`.
	pub fn replace_children<S>(self, source: &S) -> TagResult<Self>
	where
		S: TagSource + ?Sized,
	{
		self.tree.replace_children(self.id, source)?;
		Ok(self)
	}

	/// Wraps this node in a new element and continues on the wrapper.
	pub fn wrap_with(self, name: &str) -> TagResult<TagMut<'a>> {
		let TagMut { tree, id } = self;
		let wrapper = tree.wrap_with(id, name)?;
		Ok(TagMut::new(tree, wrapper))
	}

	/// Puts this node first inside `wrapper` and continues on the wrapper.
	pub fn wrap_with_tag(self, wrapper: TagId) -> TagResult<TagMut<'a>> {
		let TagMut { tree, id } = self;
		let wrapper = tree.wrap_with_tag(id, wrapper)?;
		Ok(TagMut::new(tree, wrapper))
	}

	/// Makes `next` the sibling rendered right after this node.
	pub fn after(self, next: TagId) -> TagResult<Self> {
		self.tree.after(self.id, next)?;
		Ok(self)
	}

	/// Runs `action` on this handle.
	pub fn modify<F>(self, action: F) -> TagResult<Self>
	where
		F: FnOnce(Self) -> TagResult<Self>,
	{
		action(self)
	}

	// ----- attributes -----

	/// Sets an attribute whose value is escaped when written.
	///
	/// A `null` value removes the attribute. On `class`, `style` and the
	/// metadata attribute an empty string clears the whole facet; `class`
	/// otherwise adds classes, `style` parses `key:value` declarations and the
	/// metadata attribute merges a JSON object.
	///
	/// # Errors
	///
	/// Invalid class names, or a metadata value that is not a JSON object.
	pub fn attr(self, name: &str, value: impl Into<Value>) -> TagResult<Self> {
		self.build_attr(name, value, true)
	}

	/// Sets an attribute whose value is already HTML-encoded.
	pub fn unencoded_attr(self, name: &str, value: impl Into<Value>) -> TagResult<Self> {
		self.build_attr(name, value, false)
	}

	/// Shared implementation of [`attr`](Self::attr) and
	/// [`unencoded_attr`](Self::unencoded_attr).
	pub fn build_attr(
		mut self,
		name: &str,
		value: impl Into<Value>,
		encode: bool,
	) -> TagResult<Self> {
		let value = value.into();
		let reserved = self.reserved(name);
		if value.is_null() || (reserved.is_some() && value.as_str() == Some("")) {
			return Ok(self.remove_attr(name));
		}

		match reserved {
			Some(ReservedAttr::Class) => self.add_class(&plain_string(&value)),
			Some(ReservedAttr::Style) => {
				let declarations = plain_string(&value);
				let styles = &mut self.node_mut().styles;
				for declaration in declarations.split(';') {
					if let Some((key, val)) = declaration.split_once(':') {
						let key = key.trim();
						if !key.is_empty() {
							styles.insert(key.to_string(), val.trim().to_string());
						}
					}
				}
				Ok(self)
			}
			Some(ReservedAttr::Metadata) => self.merge_metadata(value),
			None => {
				let value = if name.starts_with(DATA_PREFIX) {
					value
				} else {
					Value::String(plain_string(&value))
				};
				let attribute = AttributeValue {
					value,
					encoded: encode,
				};
				self.node_mut()
					.attributes
					.set(name.to_string(), Some(attribute));
				Ok(self)
			}
		}
	}

	fn merge_metadata(mut self, value: Value) -> TagResult<Self> {
		let entries: Map<String, Value> = match value {
			Value::Object(map) => map,
			Value::String(ref text) => match serde_json::from_str(text) {
				Ok(Value::Object(map)) => map,
				_ => return Err(invalid_metadata(&value)),
			},
			other => return Err(invalid_metadata(&other)),
		};
		self.store_metadata(entries);
		Ok(self)
	}

	fn store_metadata(&mut self, entries: Map<String, Value>) {
		let metadata = &self.node_mut().metadata;
		for (key, value) in entries {
			metadata.set(key, value);
		}
	}

	/// Sets a valueless attribute such as `required`.
	///
	/// On a reserved name this only clears that facet.
	pub fn boolean_attr(mut self, name: &str) -> Self {
		if self.reserved(name).is_some() {
			return self.remove_attr(name);
		}
		self.node_mut().attributes.set(name.to_string(), None);
		self
	}

	/// Removes an attribute; reserved names clear their whole facet.
	pub fn remove_attr(mut self, name: &str) -> Self {
		let reserved = self.reserved(name);
		let node = self.node_mut();
		match reserved {
			Some(ReservedAttr::Class) => node.classes.clear(),
			Some(ReservedAttr::Style) => node.styles.clear(),
			Some(ReservedAttr::Metadata) => node.metadata.clear(),
			None => node.attributes.remove(&name.to_string()),
		}
		self
	}

	fn plain_attr(mut self, name: &str, value: &str) -> Self {
		self.node_mut()
			.attributes
			.set(name.to_string(), Some(AttributeValue::new(value)));
		self
	}

	/// Sets the `id` attribute.
	pub fn id(self, id: &str) -> Self {
		self.plain_attr("id", id)
	}

	/// Sets the `title` attribute.
	pub fn title(self, title: &str) -> Self {
		self.plain_attr("title", title)
	}

	/// Sets the `name` attribute.
	pub fn name(self, name: &str) -> Self {
		self.plain_attr("name", name)
	}

	/// Sets the `value` attribute.
	pub fn value(self, value: &str) -> Self {
		self.plain_attr("value", value)
	}

	// ----- classes and styles -----

	/// Adds one or more whitespace-separated classes.
	///
	/// Input that looks like a JSON object or array is kept as a single
	/// class. Nothing is added unless every class is valid.
	///
	/// # Errors
	///
	/// [`TagError::InvalidArgument`] naming the whole input when any class
	/// name is malformed.
	pub fn add_class(self, class_name: &str) -> TagResult<Self> {
		self.add_classes([class_name])
	}

	/// Adds several class strings, each parsed like [`add_class`](Self::add_class).
	pub fn add_classes<I, S>(mut self, classes: I) -> TagResult<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let inputs: Vec<S> = classes.into_iter().collect();
		validate_classes(&inputs)?;

		let node = self.node_mut();
		for input in &inputs {
			for token in parse_class_names(input.as_ref()) {
				node.classes.insert(token.to_string());
			}
		}
		Ok(self)
	}

	/// Removes a class, keeping the order of the rest.
	pub fn remove_class(mut self, class_name: &str) -> Self {
		self.node_mut().classes.shift_remove(class_name);
		self
	}

	/// Sets an inline style property.
	pub fn style(mut self, key: &str, value: &str) -> Self {
		self.node_mut()
			.styles
			.insert(key.to_string(), value.to_string());
		self
	}

	/// Adds `display:none`.
	pub fn hide(self) -> Self {
		self.style("display", "none")
	}

	// ----- data and metadata -----

	/// Stores a value in `data-<key>`; `null` removes it.
	///
	/// Non-string values are written as JSON. When `data-<key>` is the
	/// metadata attribute, an object is merged into the metadata store and a
	/// `null` clears it; other values are ignored.
	pub fn data(mut self, key: &str, value: impl Into<Value>) -> Self {
		let value = value.into();
		let name = data_key(key);
		if self.reserved(&name) == Some(ReservedAttr::Metadata) {
			return match value {
				Value::Null => self.remove_attr(&name),
				Value::Object(entries) => {
					self.store_metadata(entries);
					self
				}
				other => {
					tracing::warn!(attribute = %name, value = %other, "ignoring non-object metadata value");
					self
				}
			};
		}

		let attributes = &self.node_mut().attributes;
		if value.is_null() {
			attributes.remove(&name);
		} else {
			attributes.set(name, Some(AttributeValue::new(value)));
		}
		self
	}

	/// Edits the value stored in `data-<key>` in place, if there is one.
	pub fn data_mut<F>(mut self, key: &str, configure: F) -> Self
	where
		F: FnOnce(&mut Value),
	{
		self.node_mut().attributes.update(&data_key(key), |entry| {
			if let Some(attribute) = entry {
				configure(&mut attribute.value);
			}
		});
		self
	}

	/// Stores a metadata entry.
	pub fn metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
		self.node_mut().metadata.set(key.to_string(), value.into());
		self
	}

	/// Edits a metadata entry in place, if there is one.
	pub fn metadata_mut<F>(mut self, key: &str, configure: F) -> Self
	where
		F: FnOnce(&mut Value),
	{
		self.node_mut().metadata.update(&key.to_string(), configure);
		self
	}

	// ----- content -----

	/// Sets the inner text.
	pub fn text(mut self, text: impl Into<String>) -> Self {
		self.node_mut().text = text.into();
		self
	}

	/// Sets the inner text only when it is empty.
	///
	/// # Errors
	///
	/// [`TagError::InvalidOperation`] on an `input` element, which cannot hold
	/// text.
	pub fn text_if_empty(mut self, default_text: &str) -> TagResult<Self> {
		let node = self.node_mut();
		if node.tag == "input" {
			return Err(TagError::InvalidOperation(
				"You are attempting to set the inner text on an INPUT tag. Use a textarea for multi-line input."
					.to_string(),
			));
		}
		if node.text.is_empty() {
			node.text = default_text.to_string();
		}
		Ok(self)
	}

	/// Whether inner text is escaped when written.
	pub fn encoded(mut self, encode: bool) -> Self {
		self.node_mut().encode_inner_text = encode;
		self
	}

	// ----- flags -----

	/// Sets the render flag.
	pub fn render(mut self, should_render: bool) -> Self {
		self.node_mut().should_render = should_render;
		self
	}

	/// Sets the authorization flag.
	pub fn authorized(mut self, authorized: bool) -> Self {
		self.node_mut().authorized = authorized;
		self
	}

	/// Authorizes the node when `principal` holds any of `roles`.
	pub fn visible_for_roles<R>(self, principal: &R, roles: &[&str]) -> Self
	where
		R: RoleCheck + ?Sized,
	{
		let allowed = roles.iter().any(|role| principal.is_in_role(role));
		self.authorized(allowed)
	}

	/// Writes only the content, without opening or closing tag.
	pub fn no_tag(mut self) -> Self {
		let node = self.node_mut();
		node.ignore_opening_tag = true;
		node.ignore_closing_tag = true;
		self
	}

	/// Leaves the element unclosed.
	pub fn no_closing_tag(mut self) -> Self {
		self.node_mut().ignore_closing_tag = true;
		self
	}

	/// Writes the closing tag again.
	pub fn use_closing_tag(mut self) -> Self {
		self.node_mut().ignore_closing_tag = false;
		self
	}

	/// Renders the top-most ancestor whenever this node is rendered.
	pub fn render_from_top(mut self) -> Self {
		self.node_mut().render_from_top = true;
		self
	}

	/// Renames the element (lower-cased).
	pub fn set_tag_name(mut self, name: &str) -> Self {
		self.node_mut().tag = name.to_lowercase();
		self
	}
}

impl fmt::Debug for TagMut<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TagMut")
			.field("id", &self.id)
			.field("tag", &self.tree[self.id].tag)
			.finish()
	}
}

fn validate_classes<S: AsRef<str>>(inputs: &[S]) -> TagResult<()> {
	for input in inputs {
		let input = input.as_ref();
		if !parse_class_names(input).into_iter().all(is_valid_class_name) {
			tracing::debug!(class_name = input, "rejected CSS class name");
			return Err(TagError::invalid_class_name(input));
		}
	}
	Ok(())
}

fn invalid_metadata(value: &Value) -> TagError {
	TagError::InvalidArgument {
		param: "value",
		value: value.to_string(),
		message: "Metadata must be given as a JSON object".to_string(),
	}
}
