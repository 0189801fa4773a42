//! Cached user profile and the authorization predicate surface.

use serde::{Deserialize, Serialize};

use staffhub_core::UserId;

use crate::{Permission, PermissionSet, Role};

/// The user profile cached at login time.
///
/// A profile is authorization data only; it is never the authentication
/// predicate. "Is someone logged in" is answered by the credential store
/// (token present), while this object answers "what may they see/do".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    /// Fine-grained grants, independent of role. Absent on the wire for
    /// most users.
    #[serde(default)]
    pub permissions: PermissionSet,
    /// Backend-precomputed label for the role (e.g. "HR Officer").
    #[serde(default)]
    pub role_display: Option<String>,
}

impl UserProfile {
    pub fn new(id: UserId, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            permissions: PermissionSet::new(),
            role_display: None,
        }
    }

    pub fn with_permissions(mut self, permissions: PermissionSet) -> Self {
        self.permissions = permissions;
        self
    }

    /// True if the role is administrator, else iff `permission` was granted
    /// explicitly.
    pub fn has_permission(&self, permission: &Permission) -> bool {
        self.role.is_administrator() || self.permissions.contains(permission)
    }

    /// Administrator short-circuits true; else true iff any listed
    /// permission was granted.
    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        self.role.is_administrator() || self.permissions.contains_any(permissions)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    /// Membership test against a role list. The administrator passes
    /// regardless of the declared list.
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.role.is_administrator() || roles.contains(&self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_administrator()
    }

    /// Administrator ∪ hr_officer.
    pub fn is_hr(&self) -> bool {
        self.role.is_administrator() || self.role == Role::HrOfficer
    }

    /// Administrator ∪ hr_officer ∪ manager.
    pub fn is_manager(&self) -> bool {
        self.is_hr() || self.role == Role::Manager
    }

    /// Label shown next to the user's name, preferring the backend's
    /// precomputed one.
    pub fn role_label(&self) -> &str {
        self.role_display.as_deref().unwrap_or(self.role.as_str())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn profile(role: Role) -> UserProfile {
        UserProfile::new(UserId::new(1), "Test User", role)
    }

    #[test]
    fn role_tier_matrix() {
        let admin = profile(Role::Administrator);
        assert!(admin.is_admin() && admin.is_hr() && admin.is_manager());

        let hr = profile(Role::HrOfficer);
        assert!(!hr.is_admin());
        assert!(hr.is_hr() && hr.is_manager());

        let manager = profile(Role::Manager);
        assert!(!manager.is_admin() && !manager.is_hr());
        assert!(manager.is_manager());

        let staff = profile(Role::StaffMember);
        assert!(!staff.is_admin() && !staff.is_hr() && !staff.is_manager());
    }

    #[test]
    fn unknown_role_grants_nothing() {
        let ghost = profile(Role::Unknown);
        assert!(!ghost.is_admin() && !ghost.is_hr() && !ghost.is_manager());
        assert!(!ghost.has_any_role(&Role::known()));
        assert!(!ghost.has_permission(&Permission::new("anything")));
    }

    #[test]
    fn administrator_passes_role_lists_not_naming_it() {
        let admin = profile(Role::Administrator);
        assert!(admin.has_any_role(&[Role::HrOfficer]));
        assert!(admin.has_any_role(&[]));
    }

    #[test]
    fn explicit_permissions_are_honored_independently_of_role() {
        let staff = profile(Role::StaffMember)
            .with_permissions(PermissionSet::from(["timesheet.submit"]));
        assert!(staff.has_permission(&Permission::new("timesheet.submit")));
        assert!(!staff.has_permission(&Permission::new("payroll.approve")));
        assert!(staff.has_any_permission(&[
            Permission::new("payroll.approve"),
            Permission::new("timesheet.submit"),
        ]));
    }

    #[test]
    fn profile_wire_shape_tolerates_missing_optionals() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"id": 7, "name": "Asha Rao", "role": "hr_officer"}"#,
        )
        .unwrap();
        assert_eq!(profile.role, Role::HrOfficer);
        assert!(profile.permissions.is_empty());
        assert_eq!(profile.role_label(), "hr_officer");
    }

    proptest! {
        /// Administrator passes every permission, including ones never
        /// granted; non-admins pass exactly their granted set.
        #[test]
        fn admin_bypass_holds_for_arbitrary_permissions(name in "[a-z]{1,12}\\.[a-z]{1,12}") {
            let perm = Permission::new(name.clone());
            let admin = profile(Role::Administrator);
            prop_assert!(admin.has_permission(&perm));

            let staff = profile(Role::StaffMember);
            prop_assert!(!staff.has_permission(&perm));

            let granted = profile(Role::StaffMember)
                .with_permissions(std::iter::once(Permission::new(name)).collect());
            prop_assert!(granted.has_permission(&perm));
        }
    }
}
