//! Navigation model and role-based filtering.
//!
//! Presentation metadata ([`NavItem`]: label, icon, target) is kept separate
//! from the authorization data ([`NavEntry::allowed_roles`]) so the filter
//! can be exercised without any UI dependency. The static tree is declared
//! once at build time and never mutated; filtering produces a fresh visible
//! tree per viewer.

use serde::{Deserialize, Serialize};

use staffhub_auth::{Role, UserProfile};

/// Where a navigation entry leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavTarget {
    /// A leaf view.
    Path(String),
    /// A collapsible group of child entries.
    Group(Vec<NavEntry>),
}

/// Presentation metadata only — no authorization data here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub label: String,
    pub icon: String,
    pub target: NavTarget,
}

/// A declared menu entry: presentation plus the roles permitted to see it.
///
/// `allowed_roles: None` on a child means "inherit the parent's visibility";
/// on a top-level entry it means "visible to any authenticated user".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    pub item: NavItem,
    pub allowed_roles: Option<Vec<Role>>,
}

impl NavEntry {
    fn leaf(label: &str, icon: &str, path: &str, roles: Option<Vec<Role>>) -> Self {
        Self {
            item: NavItem {
                label: label.to_string(),
                icon: icon.to_string(),
                target: NavTarget::Path(path.to_string()),
            },
            allowed_roles: roles,
        }
    }

    fn group(label: &str, icon: &str, roles: Option<Vec<Role>>, children: Vec<NavEntry>) -> Self {
        Self {
            item: NavItem {
                label: label.to_string(),
                icon: icon.to_string(),
                target: NavTarget::Group(children),
            },
            allowed_roles: roles,
        }
    }

    pub fn label(&self) -> &str {
        &self.item.label
    }

    fn passes(&self, profile: &UserProfile) -> bool {
        match &self.allowed_roles {
            None => true,
            Some(roles) => profile.has_any_role(roles),
        }
    }
}

/// Compute the visible navigation for a viewer.
///
/// Pure and idempotent: declaration order is preserved, the input is never
/// mutated, and filtering an already-filtered tree is a no-op. Groups whose
/// filtered child list ends up empty are dropped entirely.
pub fn filter_navigation(entries: &[NavEntry], profile: &UserProfile) -> Vec<NavEntry> {
    entries
        .iter()
        .filter(|entry| entry.passes(profile))
        .filter_map(|entry| match &entry.item.target {
            NavTarget::Path(_) => Some(entry.clone()),
            NavTarget::Group(children) => {
                let visible = filter_navigation(children, profile);
                if visible.is_empty() {
                    return None;
                }
                Some(NavEntry {
                    item: NavItem {
                        label: entry.item.label.clone(),
                        icon: entry.item.icon.clone(),
                        target: NavTarget::Group(visible),
                    },
                    allowed_roles: entry.allowed_roles.clone(),
                })
            }
        })
        .collect()
}

/// The application's static navigation tree.
pub fn default_navigation() -> Vec<NavEntry> {
    use Role::{HrOfficer, Manager, StaffMember};

    let everyone = || Some(vec![HrOfficer, Manager, StaffMember]);
    let hr_only = || Some(vec![HrOfficer]);
    let hr_and_managers = || Some(vec![HrOfficer, Manager]);

    vec![
        NavEntry::leaf("Dashboard", "home", "/dashboard", everyone()),
        NavEntry::group(
            "Staff",
            "users",
            hr_and_managers(),
            vec![
                NavEntry::leaf("All Staff", "list", "/staff", None),
                NavEntry::leaf("Departments", "layers", "/departments", None),
                NavEntry::leaf("Designations", "tag", "/designations", hr_only()),
            ],
        ),
        NavEntry::group(
            "HR Management",
            "briefcase",
            hr_only(),
            vec![
                NavEntry::leaf("Attendance", "clock", "/attendance", None),
                NavEntry::leaf("Leave Requests", "calendar-x", "/leave-requests", None),
                NavEntry::leaf("Timesheets", "table", "/timesheets", None),
                NavEntry::leaf("Performance", "trending-up", "/performance", None),
            ],
        ),
        NavEntry::group(
            "HR Admin",
            "shield",
            hr_only(),
            vec![
                NavEntry::leaf("Holidays", "sun", "/holidays", None),
                NavEntry::leaf("Announcements", "megaphone", "/announcements", None),
                NavEntry::leaf("Policies", "book", "/policies", None),
            ],
        ),
        NavEntry::group(
            "Recruitment",
            "user-plus",
            hr_only(),
            vec![
                NavEntry::leaf("Job Openings", "clipboard", "/job-openings", None),
                NavEntry::leaf("Candidates", "user-check", "/candidates", None),
                NavEntry::leaf("Interviews", "message-circle", "/interviews", None),
            ],
        ),
        NavEntry::leaf("Contracts", "file-text", "/contracts", hr_only()),
        NavEntry::leaf("Media Library", "image", "/media", hr_only()),
        NavEntry::group(
            "Payroll",
            "dollar-sign",
            hr_only(),
            vec![
                NavEntry::leaf("Salary Setup", "sliders", "/payroll/setup", None),
                NavEntry::leaf("Payslips", "file", "/payroll/payslips", None),
                NavEntry::leaf("Loans", "credit-card", "/payroll/loans", None),
            ],
        ),
        NavEntry::group(
            "Reports",
            "bar-chart",
            hr_and_managers(),
            vec![
                NavEntry::leaf("Attendance Report", "activity", "/reports/attendance", None),
                NavEntry::leaf("Leave Report", "pie-chart", "/reports/leave", None),
                NavEntry::leaf("Payroll Report", "file-text", "/reports/payroll", hr_only()),
            ],
        ),
        NavEntry::group(
            "Configuration",
            "settings",
            hr_only(),
            vec![
                NavEntry::leaf("Roles & Permissions", "lock", "/config/roles", None),
                NavEntry::leaf("Document Types", "folder", "/config/document-types", None),
            ],
        ),
        NavEntry::leaf("Settings", "tool", "/settings", hr_only()),
        NavEntry::leaf("Documents", "paperclip", "/documents", everyone()),
        NavEntry::leaf("Meetings", "video", "/meetings", everyone()),
        NavEntry::leaf("Calendar", "calendar", "/calendar", everyone()),
    ]
}

#[cfg(test)]
mod tests {
    use staffhub_core::UserId;

    use super::*;

    fn profile(role: Role) -> UserProfile {
        UserProfile::new(UserId::new(1), "Nav Viewer", role)
    }

    fn labels(entries: &[NavEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.label()).collect()
    }

    fn count_entries(entries: &[NavEntry]) -> usize {
        entries
            .iter()
            .map(|e| match &e.item.target {
                NavTarget::Path(_) => 1,
                NavTarget::Group(children) => 1 + count_entries(children),
            })
            .sum()
    }

    #[test]
    fn administrator_sees_everything() {
        let tree = default_navigation();
        let visible = filter_navigation(&tree, &profile(Role::Administrator));
        // Every entry, including ones restricted to hr_officer alone.
        assert_eq!(count_entries(&visible), count_entries(&tree));
    }

    #[test]
    fn staff_member_sees_only_the_common_entries() {
        let visible = filter_navigation(&default_navigation(), &profile(Role::StaffMember));
        assert_eq!(
            labels(&visible),
            vec!["Dashboard", "Documents", "Meetings", "Calendar"]
        );
    }

    #[test]
    fn manager_sees_group_but_not_hr_only_children() {
        let visible = filter_navigation(&default_navigation(), &profile(Role::Manager));
        let staff_group = visible
            .iter()
            .find(|e| e.label() == "Staff")
            .expect("managers see the Staff group");

        let NavTarget::Group(children) = &staff_group.item.target else {
            panic!("Staff is a group");
        };
        // "Designations" carries its own hr_officer-only list.
        assert_eq!(labels(children), vec!["All Staff", "Departments"]);

        assert!(!visible.iter().any(|e| e.label() == "HR Management"));
        assert!(!visible.iter().any(|e| e.label() == "Contracts"));
    }

    #[test]
    fn group_with_no_visible_children_is_dropped() {
        let tree = vec![NavEntry::group(
            "Empty For Staff",
            "x",
            None,
            vec![NavEntry::leaf("HR Child", "y", "/x", Some(vec![Role::HrOfficer]))],
        )];
        let visible = filter_navigation(&tree, &profile(Role::StaffMember));
        assert!(visible.is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        for role in Role::known() {
            let viewer = profile(role);
            let once = filter_navigation(&default_navigation(), &viewer);
            let twice = filter_navigation(&once, &viewer);
            assert_eq!(once, twice, "filter not idempotent for {role}");
        }
    }

    #[test]
    fn role_with_no_entries_yields_empty_navigation() {
        let visible = filter_navigation(&default_navigation(), &profile(Role::Unknown));
        assert!(visible.is_empty());
    }

    #[test]
    fn declaration_order_is_preserved() {
        let visible = filter_navigation(&default_navigation(), &profile(Role::Administrator));
        let all = default_navigation();
        assert_eq!(labels(&visible), labels(&all));
    }
}
