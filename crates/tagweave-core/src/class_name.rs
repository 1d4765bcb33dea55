//! CSS class-name validation and parsing.

use once_cell::sync::Lazy;
use regex::Regex;

/// Identifier syntax: optional leading `-`, then a letter, `_`, non-ASCII
/// character or backslash escape, followed by any of those, digits or `-`.
static VALID_CLASS_NAME: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"^-?(?:[_a-zA-Z\x{00A0}-\x{10FFFF}]|\\.)(?:[_a-zA-Z0-9\x{00A0}-\x{10FFFF}-]|\\.)*$")
		.expect("class name pattern is valid")
});

/// Whether `class_name` is an object or array literal used as an opaque class.
///
/// Some client-side plugins read options out of the `class` attribute, so a
/// value such as `{required:true}` is kept as a single token.
pub fn is_json_class_name(class_name: &str) -> bool {
	let trimmed = class_name.trim();
	(trimmed.starts_with('{') && trimmed.ends_with('}'))
		|| (trimmed.starts_with('[') && trimmed.ends_with(']'))
}

/// Whether a single token is acceptable as a class name.
pub fn is_valid_class_name(class_name: &str) -> bool {
	is_json_class_name(class_name) || VALID_CLASS_NAME.is_match(class_name)
}

/// Splits `class_name` into the tokens it stands for.
///
/// JSON-looking input is one token; anything else is split on runs of
/// whitespace with empty pieces dropped.
pub fn parse_class_names(class_name: &str) -> Vec<&str> {
	if is_json_class_name(class_name) {
		vec![class_name]
	} else {
		class_name.split_whitespace().collect()
	}
}
