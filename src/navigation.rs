use serde::Serialize;

use crate::models::Role;

/// Screens reachable from the navigation shell, in sidebar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Dashboard,
    CaseLibrary,
    InvestigationTools,
    Reports,
    UserManagement,
    Analytics,
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::Dashboard,
        Screen::CaseLibrary,
        Screen::InvestigationTools,
        Screen::Reports,
        Screen::UserManagement,
        Screen::Analytics,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::CaseLibrary => "Case Library",
            Self::InvestigationTools => "Investigation Tools",
            Self::Reports => "Reports",
            Self::UserManagement => "User Management",
            Self::Analytics => "Analytics",
        }
    }

    pub const fn path(self) -> &'static str {
        match self {
            Self::Dashboard => "/",
            Self::CaseLibrary => "/cases",
            Self::InvestigationTools => "/investigate",
            Self::Reports => "/reports",
            Self::UserManagement => "/users",
            Self::Analytics => "/analytics",
        }
    }

    pub const fn permits(self, role: Role) -> bool {
        match (self, role) {
            (_, Role::Public) => false,
            (_, Role::Admin) => true,
            (Self::UserManagement | Self::Analytics, Role::Investigator) => false,
            (_, Role::Investigator) => true,
        }
    }
}

pub fn navigation_for(role: Role) -> Vec<Screen> {
    Screen::ALL
        .into_iter()
        .filter(|screen| screen.permits(role))
        .collect()
}

/// Only administrators open new cases.
pub const fn can_create_cases(role: Role) -> bool {
    matches!(role, Role::Admin)
}

/// Investigators never see confidential records, so the confidentiality
/// filter is only offered to administrators.
pub const fn can_filter_by_confidentiality(role: Role) -> bool {
    matches!(role, Role::Admin)
}
