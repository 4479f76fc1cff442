//! Role-based landing page selection

use crate::model::{Role, User};

pub const LOGIN_PATH: &str = "/login";
pub const ROLE_SELECTION_PATH: &str = "/role-selection";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";
pub const DASHBOARD_PATH: &str = "/dashboard";

pub fn dashboard_path(role: Role) -> &'static str {
    match role {
        Role::Hub => "/hub/dashboard",
        Role::Professional => "/professional/dashboard",
    }
}

/// Where a user should land when they ask for "their dashboard"
pub fn dashboard_redirect(user: Option<&User>) -> &'static str {
    match user {
        None => LOGIN_PATH,
        Some(user) => match user.current_role {
            None => ROLE_SELECTION_PATH,
            Some(role) => dashboard_path(role),
        },
    }
}
