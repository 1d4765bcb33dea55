//! Low-level markup writer.
//!
//! [`MarkupWriter`] knows nothing about tag nodes. It buffers attributes until
//! the next opening tag, tracks the stack of open elements so closing tags can
//! be written without repeating the name, and handles indentation in pretty
//! mode.

use crate::config::RenderOptions;
use crate::escape::html_escape;

#[derive(Debug)]
struct OpenTag {
	name: String,
	has_element_children: bool,
}

/// Streaming HTML writer used by the renderer
#[derive(Debug)]
pub struct MarkupWriter<'o> {
	out: String,
	options: &'o RenderOptions,
	pending: Vec<(String, Option<String>)>,
	open: Vec<OpenTag>,
}

impl<'o> MarkupWriter<'o> {
	/// Creates a writer with an empty buffer.
	pub fn new(options: &'o RenderOptions) -> Self {
		Self {
			out: String::new(),
			options,
			pending: Vec::new(),
			open: Vec::new(),
		}
	}

	/// Queues an attribute for the next [`begin_tag`](Self::begin_tag).
	///
	/// `None` writes the bare name, as for `required` or `disabled`.
	pub fn add_attribute(&mut self, name: &str, value: Option<&str>, encode: bool) {
		let value = value.map(|v| {
			if encode {
				html_escape(v).into_owned()
			} else {
				v.to_string()
			}
		});
		self.pending.push((name.to_string(), value));
	}

	/// Writes `<name ...>` with the queued attributes.
	///
	/// A self-closing tag is written as `<name ... />` and is not pushed on the
	/// open stack.
	pub fn begin_tag(&mut self, name: &str, self_closing: bool) {
		if let Some(parent) = self.open.last_mut() {
			parent.has_element_children = true;
		}
		if self.options.pretty {
			if !self.out.is_empty() {
				self.out.push_str(&self.options.newline);
			}
			self.write_indent(self.open.len());
		}

		self.out.push('<');
		self.out.push_str(name);
		for (key, value) in self.pending.drain(..) {
			self.out.push(' ');
			self.out.push_str(&key);
			if let Some(value) = value {
				self.out.push_str("=\"");
				self.out.push_str(&value);
				self.out.push('"');
			}
		}

		if self_closing {
			self.out.push_str(" />");
		} else {
			self.out.push('>');
			self.open.push(OpenTag {
				name: name.to_string(),
				has_element_children: false,
			});
		}
	}

	/// Closes the innermost open element. Does nothing when none is open.
	pub fn end_tag(&mut self) {
		let Some(tag) = self.open.pop() else {
			return;
		};
		if self.options.pretty && tag.has_element_children {
			self.out.push_str(&self.options.newline);
			self.write_indent(self.open.len());
		}
		self.out.push_str("</");
		self.out.push_str(&tag.name);
		self.out.push('>');
	}

	/// Writes text, escaped when `encode` is set.
	pub fn write_text(&mut self, text: &str, encode: bool) {
		if encode {
			self.out.push_str(&html_escape(text));
		} else {
			self.out.push_str(text);
		}
	}

	/// Runs `f` with output redirected to a throwaway buffer.
	///
	/// Stack changes made inside `f` are kept; only the written text is lost.
	pub fn discarding<F>(&mut self, f: F)
	where
		F: FnOnce(&mut Self),
	{
		let kept = std::mem::take(&mut self.out);
		f(self);
		self.out = kept;
	}

	/// Number of currently open elements.
	pub fn depth(&self) -> usize {
		self.open.len()
	}

	/// Consumes the writer and returns the markup.
	pub fn finish(self) -> String {
		self.out
	}

	fn write_indent(&mut self, depth: usize) {
		for _ in 0..depth {
			self.out.push_str(&self.options.indent);
		}
	}
}
