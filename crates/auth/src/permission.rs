//! Permission model.

use std::borrow::Cow;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are opaque strings (e.g. "payroll.approve"); the backend owns
/// their vocabulary. This client only ever tests membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user's granted permissions.
///
/// Set-backed so membership tests are O(1); the wire shape is a plain list
/// of strings (order-insensitive, duplicates collapse).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(HashSet<Permission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, permission: &Permission) -> bool {
        self.0.contains(permission)
    }

    pub fn contains_any(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.0.contains(p))
    }

    pub fn insert(&mut self, permission: Permission) {
        self.0.insert(permission);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[&'static str; N]> for PermissionSet {
    fn from(names: [&'static str; N]) -> Self {
        names.into_iter().map(Permission::new).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_list_collapses_duplicates() {
        let set: PermissionSet =
            serde_json::from_str(r#"["leave.view", "leave.view", "leave.approve"]"#).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Permission::new("leave.approve")));
    }

    #[test]
    fn contains_any_matches_on_any_member() {
        let set = PermissionSet::from(["staff.view"]);
        assert!(set.contains_any(&[Permission::new("staff.edit"), Permission::new("staff.view")]));
        assert!(!set.contains_any(&[Permission::new("staff.edit")]));
        assert!(!set.contains_any(&[]));
    }
}
