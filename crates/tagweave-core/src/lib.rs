//! # Tagweave Core
//!
//! Programmatic construction of HTML markup trees.
//!
//! A [`TagTree`] owns every node; nodes are addressed by [`TagId`] and edited
//! through chainable [`TagMut`] handles. Attributes, CSS classes, inline
//! styles, `data-` values, metadata and text are attached to nodes, and the
//! [`Renderer`] turns any node into markup, compact or pretty-printed.
//!
//! ## Example
//!
//! ```
//! use tagweave_core::TagTree;
//!
//! let mut tree = TagTree::new();
//! let list = tree.create("ul");
//! tree.tag_mut(list)
//!     .add_class("menu")
//!     .unwrap()
//!     .add_with("li/a", |a| Ok(a.attr("href", "/home")?.text("Home")))
//!     .unwrap();
//!
//! assert_eq!(
//!     tree.tag(list).to_html(),
//!     r#"<ul class="menu"><li><a href="/home">Home</a></li></ul>"#
//! );
//! ```
//!
//! ## Reserved attributes
//!
//! `class`, `style` and the metadata attribute (`data-__` unless configured
//! through [`TagConfig`]) are not stored as plain attributes. Setting them
//! feeds the class set, the style map or the metadata store, and an empty
//! string clears the whole facet.

pub mod access;
pub mod class_name;
pub mod config;
pub mod error;
pub mod escape;
mod handle;
mod node;
mod render;
mod source;
mod tree;
mod writer;

pub use access::RoleCheck;
pub use config::{ReservedAttr, RenderOptions, TagConfig};
pub use error::{TagError, TagResult};
pub use handle::{TagMut, TagRef};
pub use node::{AttributeValue, TagId, TagKind, TagNode};
pub use render::Renderer;
pub use source::{TagList, TagSource};
pub use tree::TagTree;
pub use writer::MarkupWriter;
