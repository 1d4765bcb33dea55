use crate::node::TagId;
use tagweave_cache::CacheError;
use thiserror::Error;

/// Result type for tag tree operations
pub type TagResult<T> = Result<T, TagError>;

/// Errors raised while building a tag tree.
///
/// Rendering never fails; every variant here comes from a construction-time
/// call.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
	/// An argument failed validation, e.g. a malformed CSS class name
	#[error("{message} (parameter '{param}')")]
	InvalidArgument {
		/// Name of the offending parameter
		param: &'static str,
		/// The full value that was passed
		value: String,
		/// Human readable explanation
		message: String,
	},

	/// The node is in a state that forbids the operation
	#[error("Invalid operation: {0}")]
	InvalidOperation(String),

	/// The id does not belong to this tree
	#[error("Unknown tag {0}")]
	UnknownTag(TagId),

	/// A strict cache read missed
	#[error(transparent)]
	Cache(#[from] CacheError),
}

impl TagError {
	pub(crate) fn invalid_class_name(class_name: &str) -> Self {
		Self::InvalidArgument {
			param: "class_name",
			value: class_name.to_string(),
			message: format!(
				"CSS class names is not valid. Problem class was '{}'",
				class_name
			),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_invalid_class_name_message() {
		let err = TagError::invalid_class_name("not valid!");

		assert_eq!(
			err.to_string(),
			"CSS class names is not valid. Problem class was 'not valid!' (parameter 'class_name')"
		);
	}

	#[rstest]
	fn test_cache_errors_convert() {
		let err: TagError = CacheError::not_found(&"k").into();

		assert!(matches!(err, TagError::Cache(CacheError::NotFound { .. })));
	}
}
