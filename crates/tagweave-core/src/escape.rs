//! Escaping helpers and element tables used while writing markup.

use std::borrow::Cow;

/// Escaped form of `value` for attribute values and inner text.
///
/// The writer passes every encoded attribute value and every encoded text
/// node through here. `&`, `<`, `>`, `"` and `'` become entities, so the
/// result is safe inside a double-quoted attribute. Input without any of
/// them is returned borrowed.
pub fn html_escape(value: &str) -> Cow<'_, str> {
	let Some(first) = value.find(['&', '<', '>', '"', '\'']) else {
		return Cow::Borrowed(value);
	};

	let mut escaped = String::with_capacity(value.len() + 16);
	escaped.push_str(&value[..first]);
	for ch in value[first..].chars() {
		match entity(ch) {
			Some(entity) => escaped.push_str(entity),
			None => escaped.push(ch),
		}
	}
	Cow::Owned(escaped)
}

fn entity(ch: char) -> Option<&'static str> {
	match ch {
		'&' => Some("&amp;"),
		'<' => Some("&lt;"),
		'>' => Some("&gt;"),
		'"' => Some("&quot;"),
		'\'' => Some("&#x27;"),
		_ => None,
	}
}

/// Elements that never carry content and are written as `<name ... />`.
pub const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
	"wbr",
];

/// Whether `tag` names a void element. Expects a lower-cased name.
pub fn is_void_element(tag: &str) -> bool {
	VOID_ELEMENTS.contains(&tag)
}

/// Elements whose value is entered by the user.
pub const INPUT_ELEMENTS: &[&str] = &["input", "select", "textarea"];

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_plain_text_is_borrowed() {
		assert!(matches!(html_escape("Sign in"), Cow::Borrowed("Sign in")));
	}

	#[rstest]
	#[case("Tom & Jerry", "Tom &amp; Jerry")]
	#[case("<script>", "&lt;script&gt;")]
	#[case(r#"{"k":'v'}"#, "{&quot;k&quot;:&#x27;v&#x27;}")]
	#[case("&amp;", "&amp;amp;")]
	fn test_markup_characters_become_entities(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(html_escape(input), expected);
	}

	#[rstest]
	fn test_void_element_detection() {
		assert!(is_void_element("br"));
		assert!(is_void_element("input"));
		assert!(!is_void_element("div"));
		assert!(!is_void_element("textarea"));
	}
}
