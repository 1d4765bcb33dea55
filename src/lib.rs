//! # Tagweave
//!
//! Build HTML markup trees in code and render them to strings.
//!
//! Tagweave keeps every node of a document in a [`TagTree`]. Nodes are edited
//! through chainable handles, carry attributes, CSS classes, inline styles,
//! `data-` values, JSON metadata and text, and render to compact or indented
//! HTML.
//!
//! ## Crates
//!
//! - [`markup`] (`tagweave-core`): the tree, handles, renderer and configuration
//! - [`cache`] (`tagweave-cache`): the lazily-populated keyed cache backing
//!   attribute and metadata stores
//!
//! ## Quick Start
//!
//! ```
//! use tagweave::prelude::*;
//!
//! # fn main() -> TagResult<()> {
//! let mut tree = TagTree::new();
//! let form = tree.create("form");
//! tree.tag_mut(form)
//!     .id("login")
//!     .add_class("stacked")?
//!     .div(|row| {
//!         row.add_class("row")?
//!             .add_with("input", |input| Ok(input.name("user").boolean_attr("required")))
//!     })?;
//!
//! assert_eq!(
//!     tree.tag(form).to_html(),
//!     r#"<form id="login" class="stacked"><div class="row"><input name="user" required /></div></form>"#
//! );
//! # Ok(())
//! # }
//! ```

pub use tagweave_cache as cache;
pub use tagweave_core as markup;

pub use tagweave_cache::{CacheError, CacheResult, KeyedCache};
pub use tagweave_core::{
	AttributeValue, MarkupWriter, RenderOptions, Renderer, ReservedAttr, RoleCheck, TagConfig,
	TagError, TagId, TagKind, TagList, TagMut, TagNode, TagRef, TagResult, TagSource, TagTree,
};

/// Common imports
pub mod prelude {
	pub use crate::{
		RenderOptions, RoleCheck, TagConfig, TagError, TagId, TagList, TagMut, TagRef, TagResult,
		TagSource, TagTree,
	};

	// External
	pub use serde_json::{Value, json};
}
