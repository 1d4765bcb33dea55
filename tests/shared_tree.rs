//! A finished tree is read from several threads at once.

use rstest::rstest;
use std::sync::Barrier;
use std::thread;
use tagweave::prelude::*;

fn build_menu(tree: &mut TagTree) -> TagResult<TagId> {
	let nav = tree.create("nav");
	let list = tree.tag_mut(nav).metadata("menu", "main").add("ul")?.tag_id();
	for (label, href) in [("Home", "/"), ("About", "/about")] {
		tree.tag_mut(list).add_with("li/a", |a| Ok(a.attr("href", href)?.text(label)))?;
	}
	Ok(nav)
}

#[rstest]
#[case(2)]
#[case(8)]
fn test_concurrent_renders_agree(#[case] readers: usize) {
	// Arrange
	let mut tree = TagTree::with_config(TagConfig::default());
	let nav = build_menu(&mut tree).unwrap();
	let expected = tree.tag(nav).to_html();
	let barrier = Barrier::new(readers);
	let (tree, barrier) = (&tree, &barrier);

	// Act
	let outputs: Vec<String> = thread::scope(|scope| {
		let handles: Vec<_> = (0..readers)
			.map(|_| {
				scope.spawn(move || {
					barrier.wait();
					tree.tag(nav).to_html()
				})
			})
			.collect();
		handles.into_iter().map(|h| h.join().unwrap()).collect()
	});

	// Assert
	assert!(outputs.iter().all(|html| *html == expected));
	assert_eq!(
		expected,
		r#"<nav data-__="{&quot;menu&quot;:&quot;main&quot;}"><ul><li><a href="/">Home</a></li><li><a href="/about">About</a></li></ul></nav>"#
	);
}

#[rstest]
fn test_metadata_store_is_shared_read_only() {
	let mut tree = TagTree::with_config(TagConfig::default());
	let nav = build_menu(&mut tree).unwrap();
	let tree = &tree;

	let seen: Vec<Value> = thread::scope(|scope| {
		let handles: Vec<_> = (0..4)
			.map(|_| scope.spawn(move || tree.tag(nav).metadata("menu").unwrap()))
			.collect();
		handles.into_iter().map(|h| h.join().unwrap()).collect()
	});

	assert!(seen.iter().all(|value| *value == json!("main")));
}
