//! Tag node data.
//!
//! A [`TagNode`] is plain data owned by a [`TagTree`](crate::TagTree). Its
//! relationships (parent, children, next sibling) are stored as [`TagId`]s
//! and only the tree changes them, which is how the single-parent rule is
//! enforced. Getters live here; mutation goes through
//! [`TagMut`](crate::TagMut).

use crate::config::DATA_PREFIX;
use crate::escape::{INPUT_ELEMENTS, is_void_element};
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use std::fmt;
use tagweave_cache::KeyedCache;

/// Stable identifier of a node inside its tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(pub(crate) u32);

impl TagId {
	/// Position of the node in the arena.
	pub fn index(self) -> usize {
		self.0 as usize
	}
}

impl fmt::Display for TagId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// How a node writes itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
	/// Ordinary element: attributes, escaped text, children, closing tag
	Element,
	/// Pre-formed markup written verbatim, no tag of its own
	Literal,
}

/// A stored attribute value
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeValue {
	/// Raw value; only `data-` attributes keep non-string values
	pub value: Value,
	/// `false` when the value is already HTML-encoded
	pub encoded: bool,
}

impl AttributeValue {
	/// Creates a value that will be escaped when rendered.
	pub fn new(value: impl Into<Value>) -> Self {
		Self {
			value: value.into(),
			encoded: true,
		}
	}

	/// Creates a value that is written as-is.
	pub fn raw(value: impl Into<Value>) -> Self {
		Self {
			value: value.into(),
			encoded: false,
		}
	}

	/// Text written for the attribute named `key`.
	///
	/// Non-string values of `data-` attributes become JSON; everything else
	/// uses its plain string form.
	pub fn render_for(&self, key: &str) -> String {
		match &self.value {
			Value::String(s) => s.clone(),
			other if key.starts_with(DATA_PREFIX) => other.to_string(),
			other => plain_string(other),
		}
	}
}

impl fmt::Display for AttributeValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&plain_string(&self.value))
	}
}

/// String form of a JSON value without quoting strings.
pub(crate) fn plain_string(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		Value::Null => String::new(),
		other => other.to_string(),
	}
}

/// One element of the markup tree
#[derive(Debug, Clone)]
pub struct TagNode {
	pub(crate) tag: String,
	pub(crate) kind: TagKind,
	/// `None` marks a valueless (boolean) attribute
	pub(crate) attributes: KeyedCache<String, Option<AttributeValue>>,
	pub(crate) classes: IndexSet<String>,
	pub(crate) styles: IndexMap<String, String>,
	pub(crate) metadata: KeyedCache<String, Value>,
	pub(crate) text: String,
	pub(crate) children: Vec<TagId>,
	pub(crate) parent: Option<TagId>,
	pub(crate) next: Option<TagId>,
	pub(crate) should_render: bool,
	pub(crate) authorized: bool,
	pub(crate) ignore_opening_tag: bool,
	pub(crate) ignore_closing_tag: bool,
	pub(crate) encode_inner_text: bool,
	pub(crate) render_from_top: bool,
}

impl TagNode {
	pub(crate) fn new(tag: &str, kind: TagKind) -> Self {
		Self {
			tag: tag.to_lowercase(),
			kind,
			attributes: KeyedCache::new(),
			classes: IndexSet::new(),
			styles: IndexMap::new(),
			metadata: KeyedCache::new(),
			text: String::new(),
			children: Vec::new(),
			parent: None,
			next: None,
			should_render: true,
			authorized: true,
			ignore_opening_tag: false,
			ignore_closing_tag: false,
			encode_inner_text: true,
			render_from_top: false,
		}
	}

	/// Lower-cased tag name; empty for placeholders.
	pub fn tag_name(&self) -> &str {
		&self.tag
	}

	/// Element or literal.
	pub fn kind(&self) -> TagKind {
		self.kind
	}

	/// Whether this node writes pre-formed markup.
	pub fn is_literal(&self) -> bool {
		self.kind == TagKind::Literal
	}

	/// Stored attribute entry. `Some(None)` is a boolean attribute.
	///
	/// Reserved names (`class`, `style`, metadata) are not kept here; see
	/// [`TagRef::attr`](crate::TagRef::attr).
	pub fn attr_value(&self, name: &str) -> Option<Option<AttributeValue>> {
		self.attributes.try_get(&name.to_string())
	}

	/// Names of stored attributes in insertion order.
	pub fn attr_names(&self) -> Vec<String> {
		self.attributes.keys()
	}

	/// CSS classes in insertion order.
	pub fn classes(&self) -> impl Iterator<Item = &str> {
		self.classes.iter().map(String::as_str)
	}

	/// Whether the class set contains `class_name`.
	pub fn has_class(&self, class_name: &str) -> bool {
		self.classes.contains(class_name)
	}

	/// Value of an inline style property.
	pub fn style_value(&self, key: &str) -> Option<&str> {
		self.styles.get(key).map(String::as_str)
	}

	/// Whether an inline style property is set.
	pub fn has_style(&self, key: &str) -> bool {
		self.styles.contains_key(key)
	}

	/// Inline styles in insertion order.
	pub fn styles(&self) -> impl Iterator<Item = (&str, &str)> {
		self.styles.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Value stored under `data-<key>`.
	pub fn data_value(&self, key: &str) -> Option<Value> {
		self.attributes
			.try_get(&data_key(key))
			.flatten()
			.map(|attribute| attribute.value)
	}

	/// Metadata value stored for `key`, if any.
	pub fn metadata_value(&self, key: &str) -> Option<Value> {
		self.metadata.try_get(&key.to_string())
	}

	/// Whether metadata holds `key`.
	pub fn has_metadata(&self, key: &str) -> bool {
		self.metadata.has(&key.to_string())
	}

	/// The metadata store.
	pub fn metadata_store(&self) -> &KeyedCache<String, Value> {
		&self.metadata
	}

	/// Inner text as set, unescaped.
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Whether inner text is escaped when rendered.
	pub fn is_encoded(&self) -> bool {
		self.encode_inner_text
	}

	/// Parent node.
	pub fn parent(&self) -> Option<TagId> {
		self.parent
	}

	/// Children in order.
	pub fn children(&self) -> &[TagId] {
		&self.children
	}

	/// First child.
	pub fn first_child(&self) -> Option<TagId> {
		self.children.first().copied()
	}

	/// The sibling rendered right after this node.
	pub fn next(&self) -> Option<TagId> {
		self.next
	}

	/// The render flag alone.
	pub fn should_render(&self) -> bool {
		self.should_render
	}

	/// The authorization flag alone.
	pub fn is_authorized(&self) -> bool {
		self.authorized
	}

	/// Whether anything at all is emitted for this node.
	pub fn will_be_rendered(&self) -> bool {
		self.should_render && self.authorized
	}

	/// Whether the opening tag is written.
	pub fn has_tag(&self) -> bool {
		!self.ignore_opening_tag
	}

	/// Whether the closing tag is written.
	pub fn has_closing_tag(&self) -> bool {
		!self.ignore_closing_tag
	}

	/// Whether rendering starts from the top ancestor.
	pub fn renders_from_top(&self) -> bool {
		self.render_from_top
	}

	/// `input`, `select` or `textarea`.
	pub fn is_input_element(&self) -> bool {
		INPUT_ELEMENTS.contains(&self.tag.as_str())
	}

	/// Void elements close themselves when they have no content.
	pub fn is_self_closing(&self) -> bool {
		is_void_element(&self.tag) && self.text.is_empty() && self.children.is_empty()
	}

	pub(crate) fn class_attribute(&self) -> String {
		self.classes
			.iter()
			.map(String::as_str)
			.collect::<Vec<_>>()
			.join(" ")
	}

	pub(crate) fn style_attribute(&self) -> String {
		self.styles
			.iter()
			.map(|(key, value)| format!("{}:{}", key, value))
			.collect::<Vec<_>>()
			.join(";")
	}

	pub(crate) fn metadata_json(&self) -> serde_json::Result<String> {
		serde_json::to_string(&self.metadata)
	}
}

pub(crate) fn data_key(key: &str) -> String {
	format!("{}{}", DATA_PREFIX, key)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_new_node_lower_cases_and_defaults() {
		let node = TagNode::new("DIV", TagKind::Element);

		assert_eq!(node.tag_name(), "div");
		assert!(node.will_be_rendered());
		assert!(node.has_tag());
		assert!(node.has_closing_tag());
		assert!(node.is_encoded());
		assert!(node.text().is_empty());
		assert!(node.children().is_empty());
	}

	#[rstest]
	#[case(json!("plain"), "data-x", "plain")]
	#[case(json!(42), "data-x", "42")]
	#[case(json!({"a": 1}), "data-x", r#"{"a":1}"#)]
	#[case(json!(["a"]), "data-x", r#"["a"]"#)]
	#[case(json!(true), "title", "true")]
	fn test_attribute_value_render_form(
		#[case] value: Value,
		#[case] key: &str,
		#[case] expected: &str,
	) {
		assert_eq!(AttributeValue::new(value).render_for(key), expected);
	}

	#[rstest]
	fn test_will_be_rendered_requires_both_flags() {
		let mut node = TagNode::new("p", TagKind::Element);
		node.authorized = false;
		assert!(!node.will_be_rendered());

		node.authorized = true;
		node.should_render = false;
		assert!(!node.will_be_rendered());
	}

	#[rstest]
	fn test_facet_attribute_strings() {
		let mut node = TagNode::new("div", TagKind::Element);
		node.classes.insert("a".to_string());
		node.classes.insert("b".to_string());
		node.styles.insert("color".to_string(), "red".to_string());
		node.styles.insert("width".to_string(), "1px".to_string());
		node.metadata.set("k".to_string(), json!("v"));

		assert_eq!(node.class_attribute(), "a b");
		assert_eq!(node.style_attribute(), "color:red;width:1px");
		assert_eq!(node.metadata_json().unwrap(), r#"{"k":"v"}"#);
	}

	#[rstest]
	fn test_input_and_void_detection() {
		let mut input = TagNode::new("input", TagKind::Element);
		assert!(input.is_input_element());
		assert!(input.is_self_closing());

		input.text = "oops".to_string();
		assert!(!input.is_self_closing());
		assert!(!TagNode::new("div", TagKind::Element).is_input_element());
	}
}
