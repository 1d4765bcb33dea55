//! Process-wide configuration. Kept in its own test binary because it
//! mutates global state.

use rstest::rstest;
use serial_test::serial;
use tagweave_core::{TagConfig, TagTree};

fn reset() {
	TagConfig::set_global(TagConfig::default());
}

#[rstest]
#[serial]
fn test_new_trees_capture_global_suffix() {
	// Arrange
	reset();
	let mut before = TagTree::new();
	TagConfig::use_metadata_suffix("opts");

	// Act
	let mut after = TagTree::new();
	let old = before.create("div");
	let new = after.create("div");
	before.tag_mut(old).metadata("a", 1);
	after.tag_mut(new).metadata("a", 1);

	// Assert
	assert_eq!(TagConfig::global().metadata_attribute(), "data-opts");
	assert!(before.tag(old).to_html().contains("data-__="));
	assert!(after.tag(new).to_html().contains("data-opts="));
	assert!(after.tag(new).has_attr("data-opts"));
	assert!(!after.tag(new).has_attr("data-__"));

	reset();
}

#[rstest]
#[serial]
fn test_explicit_config_ignores_global() {
	reset();
	TagConfig::use_metadata_suffix("global");

	let tree = TagTree::with_config(TagConfig::default());

	assert_eq!(tree.config().metadata_attribute(), "data-__");
	reset();
}
