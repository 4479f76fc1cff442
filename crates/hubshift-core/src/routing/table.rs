//! Page route table

use super::guard::{normalize_path, RouteRequirement};
use super::redirect::{DASHBOARD_PATH, LOGIN_PATH, ROLE_SELECTION_PATH, UNAUTHORIZED_PATH};
use crate::model::Role;

#[derive(Debug, Clone)]
struct RouteEntry {
    /// Path without the trailing `/*`
    base: String,
    /// Pattern ended in `/*`
    nested: bool,
    requirement: RouteRequirement,
}

impl RouteEntry {
    fn matches(&self, path: &str) -> bool {
        if path == self.base {
            return true;
        }
        self.nested
            && path
                .strip_prefix(self.base.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// Maps page paths to their access requirements
///
/// Patterns are exact (`/login`) or nested (`/hub/*`, matching `/hub` and
/// everything beneath it). Matching ignores ASCII case, so `/HUB/shifts`
/// is guarded like `/hub/shifts`. The longest matching pattern wins; unknown
/// paths are public so the client can render its own not-found page.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, pattern: &str, requirement: RouteRequirement) -> Self {
        let (base, nested) = match pattern.strip_suffix("/*") {
            Some(base) => (base, true),
            None => (pattern, false),
        };
        self.entries.push(RouteEntry {
            base: normalize_path(base).to_ascii_lowercase(),
            nested,
            requirement,
        });
        self
    }

    /// The marketplace's page routes
    pub fn standard() -> Self {
        Self::new()
            .route("/", RouteRequirement::public())
            .route("/about", RouteRequirement::public())
            .route(UNAUTHORIZED_PATH, RouteRequirement::public())
            .route(LOGIN_PATH, RouteRequirement::guest_only())
            .route("/signup", RouteRequirement::guest_only())
            .route("/forgot-password", RouteRequirement::guest_only())
            .route(ROLE_SELECTION_PATH, RouteRequirement::authenticated())
            .route("/messages/*", RouteRequirement::authenticated())
            .route("/settings", RouteRequirement::authenticated())
            .route(DASHBOARD_PATH, RouteRequirement::dashboard())
            .route("/hub/*", RouteRequirement::role(Role::Hub))
            .route("/professional/*", RouteRequirement::role(Role::Professional))
    }

    pub fn lookup(&self, path: &str) -> RouteRequirement {
        let path = normalize_path(path).to_ascii_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.matches(&path))
            .max_by_key(|entry| (entry.base.len(), !entry.nested))
            .map(|entry| entry.requirement.clone())
            .unwrap_or_else(RouteRequirement::public)
    }
}
