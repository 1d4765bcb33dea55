//! Tree and render configuration.
//!
//! [`TagConfig`] decides the name of the reserved metadata attribute. A
//! process-wide default exists for convenience, but every [`TagTree`]
//! captures its own copy when it is created and renders always read the
//! tree's copy, so tests can vary it without touching each other.
//!
//! [`RenderOptions`] controls the shape of the output (compact or pretty).
//!
//! [`TagTree`]: crate::TagTree

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Prefix of HTML5 custom data attributes
pub const DATA_PREFIX: &str = "data-";

/// Name of the CSS class attribute
pub const CLASS_ATTRIBUTE: &str = "class";

/// Name of the inline style attribute
pub const STYLE_ATTRIBUTE: &str = "style";

/// Suffix used for the metadata attribute unless configured otherwise
pub const DEFAULT_METADATA_SUFFIX: &str = "__";

#[cfg(windows)]
const PLATFORM_NEWLINE: &str = "\r\n";
#[cfg(not(windows))]
const PLATFORM_NEWLINE: &str = "\n";

static GLOBAL_CONFIG: Lazy<RwLock<TagConfig>> = Lazy::new(|| RwLock::new(TagConfig::default()));

/// Attribute names backed by a dedicated facet instead of the attribute store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedAttr {
	/// `class`
	Class,
	/// `style`
	Style,
	/// The metadata attribute, `data-__` by default
	Metadata,
}

/// Per-tree configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagConfig {
	/// Appended to `data-` to form the metadata attribute name
	pub metadata_suffix: String,
}

impl Default for TagConfig {
	fn default() -> Self {
		Self {
			metadata_suffix: DEFAULT_METADATA_SUFFIX.to_string(),
		}
	}
}

impl TagConfig {
	/// Creates the default configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the metadata suffix.
	pub fn with_metadata_suffix(mut self, suffix: impl Into<String>) -> Self {
		self.metadata_suffix = suffix.into();
		self
	}

	/// Snapshot of the process-wide default.
	pub fn global() -> Self {
		GLOBAL_CONFIG.read().clone()
	}

	/// Replaces the process-wide default. Trees created afterwards pick it up.
	pub fn set_global(config: TagConfig) {
		*GLOBAL_CONFIG.write() = config;
	}

	/// Changes the metadata suffix of the process-wide default.
	pub fn use_metadata_suffix(suffix: impl Into<String>) {
		GLOBAL_CONFIG.write().metadata_suffix = suffix.into();
	}

	/// Full name of the metadata attribute, e.g. `data-__`.
	pub fn metadata_attribute(&self) -> String {
		format!("{}{}", DATA_PREFIX, self.metadata_suffix)
	}

	/// Classifies `name`, ignoring ASCII case.
	pub fn reserved(&self, name: &str) -> Option<ReservedAttr> {
		if name.eq_ignore_ascii_case(CLASS_ATTRIBUTE) {
			Some(ReservedAttr::Class)
		} else if name.eq_ignore_ascii_case(STYLE_ATTRIBUTE) {
			Some(ReservedAttr::Style)
		} else if name.eq_ignore_ascii_case(&self.metadata_attribute()) {
			Some(ReservedAttr::Metadata)
		} else {
			None
		}
	}
}

/// Output shape for the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
	/// Put elements on their own lines and indent nested levels
	pub pretty: bool,
	/// One level of indentation in pretty mode
	pub indent: String,
	/// Line separator in pretty mode
	pub newline: String,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			pretty: false,
			indent: "  ".to_string(),
			newline: PLATFORM_NEWLINE.to_string(),
		}
	}
}

impl RenderOptions {
	/// Compact output, the default.
	pub fn new() -> Self {
		Self::default()
	}

	/// Enables pretty-printing.
	pub fn pretty(mut self) -> Self {
		self.pretty = true;
		self
	}

	/// Disables pretty-printing.
	pub fn compact(mut self) -> Self {
		self.pretty = false;
		self
	}

	/// Sets the indentation unit.
	pub fn indent(mut self, indent: impl Into<String>) -> Self {
		self.indent = indent.into();
		self
	}

	/// Sets the line separator.
	pub fn newline(mut self, newline: impl Into<String>) -> Self {
		self.newline = newline.into();
		self
	}
}
