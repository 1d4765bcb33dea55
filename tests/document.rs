//! Building a realistic fragment through the facade.

use rstest::rstest;
use tagweave::prelude::*;
use tagweave::{CacheError, KeyedCache};

#[rstest]
fn test_login_form() {
	// Arrange
	let mut tree = TagTree::with_config(TagConfig::default());
	let staff = |role: &str| role == "staff";
	let form = tree.create("form");

	// Act
	tree.tag_mut(form)
		.attr("action", "/login")
		.unwrap()
		.attr("method", "post")
		.unwrap()
		.div(|row| {
			row.add_class("row")?
				.add_with("label", |label| Ok(label.attr("for", "user")?.text("User")))
		})
		.unwrap()
		.div(|row| {
			row.add_with("input", |input| {
				Ok(input
					.id("user")
					.name("user")
					.data("rules", json!({"min": 3}))
					.boolean_attr("required"))
			})
		})
		.unwrap()
		.div(|row| {
			Ok(row
				.add_with("a", |a| Ok(a.attr("href", "/admin")?.text("Admin")))?
				.visible_for_roles(&staff, &["admin"]))
		})
		.unwrap();

	// Assert
	assert_eq!(
		tree.tag(form).to_html(),
		concat!(
			r#"<form action="/login" method="post">"#,
			r#"<div class="row"><label for="user">User</label></div>"#,
			r#"<div><input id="user" name="user" data-rules="{&quot;min&quot;:3}" required /></div>"#,
			r#"<div></div>"#,
			r#"</form>"#,
		)
	);
}

#[rstest]
fn test_list_of_fragments() {
	let mut tree = TagTree::with_config(TagConfig::default());
	let title = tree.create("h1");
	let body = tree.create("p");
	tree.tag_mut(title).text("Title");
	tree.tag_mut(body).text("a < b");
	let list: TagList = [title, body].into_iter().collect();

	assert_eq!(list.render(&tree), "<h1>Title</h1><p>a &lt; b</p>");
}

#[rstest]
fn test_cache_is_usable_directly() {
	let cache: KeyedCache<String, Value> = KeyedCache::new();

	let missing = cache.get(&"absent".to_string());
	cache.set("k".to_string(), json!(1));

	assert!(matches!(missing, Err(CacheError::NotFound { .. })));
	assert_eq!(serde_json::to_string(&cache).unwrap(), r#"{"k":1}"#);
}

#[rstest]
fn test_member_crates_are_reachable_by_name() {
	let mut tree = tagweave::markup::TagTree::with_config(TagConfig::default());
	let nav = tree.create("nav");

	tree.tag_mut(nav).link("Home", ["brand"]).unwrap();
	let cache = tagweave::cache::KeyedCache::<u8, u8>::new();

	assert_eq!(
		tree.render(nav),
		r##"<nav><a href="#" class="brand">Home</a></nav>"##
	);
	assert!(cache.is_empty());
}
