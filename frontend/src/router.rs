// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::fmt;

use common::Role;

/// The four screens of the client, one per path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    EmployeeDashboard,
    ManagerDashboard,
    AdminDashboard,
}

impl Route {
    pub const ALL: [Route; 4] = [
        Self::Login,
        Self::EmployeeDashboard,
        Self::ManagerDashboard,
        Self::AdminDashboard,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::EmployeeDashboard => "/employee-dashboard",
            Self::ManagerDashboard => "/manager-dashboard",
            Self::AdminDashboard => "/admin-dashboard",
        }
    }

    /// Resolves a path to its screen. Unknown paths have none.
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    /// Where a freshly authenticated user of `role` lands.
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => Self::AdminDashboard,
            Role::Manager => Self::ManagerDashboard,
            Role::Employee => Self::EmployeeDashboard,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
