use thiserror::Error;

/// Result type for cache reads
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors raised while reading from a [`KeyedCache`](crate::KeyedCache)
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
	/// The key was absent and the miss handler refused to produce a value
	#[error("Key '{key}' could not be found")]
	NotFound {
		/// Debug rendering of the missing key
		key: String,
	},

	/// A custom miss handler failed for another reason
	#[error("Failed to populate key '{key}': {reason}")]
	Populate {
		/// Debug rendering of the key being populated
		key: String,
		/// Handler-provided explanation
		reason: String,
	},
}

impl CacheError {
	/// Builds a [`CacheError::NotFound`] for any debuggable key.
	pub fn not_found(key: &impl std::fmt::Debug) -> Self {
		Self::NotFound {
			key: format!("{:?}", key),
		}
	}

	/// Builds a [`CacheError::Populate`] for any debuggable key.
	pub fn populate(key: &impl std::fmt::Debug, reason: impl Into<String>) -> Self {
		Self::Populate {
			key: format!("{:?}", key),
			reason: reason.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_not_found_names_the_key() {
		let err = CacheError::not_found(&"title");
		assert_eq!(err.to_string(), "Key '\"title\"' could not be found");
	}

	#[rstest]
	fn test_populate_carries_reason() {
		let err = CacheError::populate(&7, "backend offline");
		assert_eq!(err.to_string(), "Failed to populate key '7': backend offline");
	}
}
