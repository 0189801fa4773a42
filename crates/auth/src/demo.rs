//! Demo identity catalog.
//!
//! One seeded identity per role, used only to streamline manual testing of
//! the authorization paths against a seeded backend. Nothing in the session
//! or gateway layers depends on this module.

use crate::Role;

/// A seeded demonstration identity.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DemoIdentity {
    pub email: &'static str,
    pub password: &'static str,
    pub name: &'static str,
    pub role: Role,
}

const DEMO_IDENTITIES: &[DemoIdentity] = &[
    DemoIdentity {
        email: "admin@staffhub.test",
        password: "admin1234",
        name: "Ada Okafor",
        role: Role::Administrator,
    },
    DemoIdentity {
        email: "hr@staffhub.test",
        password: "hr1234",
        name: "Priya Natarajan",
        role: Role::HrOfficer,
    },
    DemoIdentity {
        email: "manager@staffhub.test",
        password: "manager1234",
        name: "Tomas Lindqvist",
        role: Role::Manager,
    },
    DemoIdentity {
        email: "staff@staffhub.test",
        password: "staff1234",
        name: "Mei Chen",
        role: Role::StaffMember,
    },
];

/// All demo identities, one per known role, in privilege order.
pub fn demo_identities() -> &'static [DemoIdentity] {
    DEMO_IDENTITIES
}

/// The demo identity for a given role, if one is seeded.
pub fn demo_for_role(role: Role) -> Option<&'static DemoIdentity> {
    DEMO_IDENTITIES.iter().find(|d| d.role == role)
}
