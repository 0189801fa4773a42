//! Role model.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// A user's role — a closed set.
///
/// `Unknown` absorbs any wire value this client does not recognize, so a
/// backend that grows new roles never breaks profile deserialization. An
/// unknown role grants nothing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Administrator,
    HrOfficer,
    Manager,
    StaffMember,
    #[serde(other)]
    Unknown,
}

impl Role {
    /// The administrator bypass rule.
    ///
    /// This is the only place the "administrator passes every check" policy
    /// is encoded; every predicate consults it rather than re-testing the
    /// role inline.
    pub fn is_administrator(&self) -> bool {
        matches!(self, Role::Administrator)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "administrator",
            Role::HrOfficer => "hr_officer",
            Role::Manager => "manager",
            Role::StaffMember => "staff_member",
            Role::Unknown => "unknown",
        }
    }

    /// All roles the client knows about, in privilege order.
    pub fn known() -> [Role; 4] {
        [
            Role::Administrator,
            Role::HrOfficer,
            Role::Manager,
            Role::StaffMember,
        ]
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "administrator" => Role::Administrator,
            "hr_officer" => Role::HrOfficer,
            "manager" => Role::Manager,
            "staff_member" => Role::StaffMember,
            _ => Role::Unknown,
        })
    }
}
