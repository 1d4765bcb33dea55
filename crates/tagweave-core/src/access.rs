//! Role-based visibility.

use std::collections::{BTreeSet, HashSet};

/// Answers whether the current principal holds a role.
///
/// Consulted only while building a tree, through
/// [`TagMut::visible_for_roles`](crate::TagMut::visible_for_roles).
pub trait RoleCheck {
	/// Whether the principal is in `role`.
	fn is_in_role(&self, role: &str) -> bool;
}

impl<F> RoleCheck for F
where
	F: Fn(&str) -> bool,
{
	fn is_in_role(&self, role: &str) -> bool {
		self(role)
	}
}

impl RoleCheck for HashSet<String> {
	fn is_in_role(&self, role: &str) -> bool {
		self.contains(role)
	}
}

impl RoleCheck for BTreeSet<String> {
	fn is_in_role(&self, role: &str) -> bool {
		self.contains(role)
	}
}
