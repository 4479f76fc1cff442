//! Route-level authorization
//!
//! `evaluate` is a pure function of the session state, the requested
//! location and the route's requirement. It never redirects to the location
//! it was asked about, so a client that follows its redirects cannot loop.

use serde::Serialize;

use super::redirect::{
    dashboard_path, dashboard_redirect, LOGIN_PATH, ROLE_SELECTION_PATH, UNAUTHORIZED_PATH,
};
use crate::model::{Role, User};

/// What the client knows about the session at render time
#[derive(Debug, Clone, Copy)]
pub enum SessionState<'a> {
    /// Session lookup still in flight
    Loading,
    Anonymous,
    SignedIn(&'a User),
}

impl<'a> SessionState<'a> {
    pub fn from_parts(user: Option<&'a User>, loading: bool) -> Self {
        match (loading, user) {
            (true, _) => SessionState::Loading,
            (false, None) => SessionState::Anonymous,
            (false, Some(user)) => SessionState::SignedIn(user),
        }
    }
}

/// Who may see a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Access {
    Public,
    /// Login/signup pages; signed-in users are sent to their dashboard
    GuestOnly,
    Authenticated { role: Option<Role> },
    /// Authenticated page that always forwards to the user's dashboard
    DashboardRedirect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequirement {
    pub access: Access,
    /// Replaces `/login` as the target for anonymous visitors
    pub redirect_to: Option<String>,
}

impl RouteRequirement {
    pub fn public() -> Self {
        Self::with_access(Access::Public)
    }

    pub fn guest_only() -> Self {
        Self::with_access(Access::GuestOnly)
    }

    pub fn authenticated() -> Self {
        Self::with_access(Access::Authenticated { role: None })
    }

    pub fn role(role: Role) -> Self {
        Self::with_access(Access::Authenticated { role: Some(role) })
    }

    pub fn dashboard() -> Self {
        Self::with_access(Access::DashboardRedirect)
    }

    pub fn redirecting_to(mut self, target: impl Into<String>) -> Self {
        self.redirect_to = Some(target.into());
        self
    }

    fn with_access(access: Access) -> Self {
        Self {
            access,
            redirect_to: None,
        }
    }
}

/// Requested path plus optional query string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Option<String>,
}

impl Location {
    /// Split `/a/b?x=1` into path and query; a trailing slash is dropped
    pub fn parse(raw: &str) -> Self {
        let (path, query) = match raw.split_once('?') {
            Some((p, q)) => (p, Some(q.to_string()).filter(|q| !q.is_empty())),
            None => (raw, None),
        };
        Self {
            path: normalize_path(path),
            query,
        }
    }

    /// Path and query as the user typed them, for a `from` parameter
    pub fn to_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{}", self.path, q),
            None => self.path.clone(),
        }
    }
}

pub(crate) fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    let with_root = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    };
    if with_root.len() > 1 {
        with_root.trim_end_matches('/').to_string()
    } else {
        with_root
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RedirectReason {
    LoginRequired,
    RoleSelectionRequired,
    AlreadySignedIn,
    RoleMismatch,
    Unauthorized,
    Dashboard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Redirect {
    pub to: String,
    /// Origin to return to after signing in
    pub from: Option<String>,
    pub reason: RedirectReason,
}

impl Redirect {
    fn to(target: &str, reason: RedirectReason) -> Self {
        Self {
            to: target.to_string(),
            from: None,
            reason,
        }
    }

    /// Target URI with `from` appended as a query parameter
    pub fn location(&self) -> String {
        match &self.from {
            None => self.to.clone(),
            Some(from) => {
                let encoded: String =
                    url::form_urlencoded::byte_serialize(from.as_bytes()).collect();
                let sep = if self.to.contains('?') { '&' } else { '?' };
                format!("{}{}from={}", self.to, sep, encoded)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum GuardDecision {
    /// Show a placeholder until the session resolves
    Pending,
    Render,
    Redirect(Redirect),
}

impl GuardDecision {
    pub fn label(&self) -> &'static str {
        match self {
            GuardDecision::Pending => "pending",
            GuardDecision::Render => "render",
            GuardDecision::Redirect(_) => "redirect",
        }
    }
}

/// Decide whether to render `location` or send the visitor elsewhere
pub fn evaluate(
    session: SessionState<'_>,
    location: &Location,
    requirement: &RouteRequirement,
) -> GuardDecision {
    let decision = decide(session, location, requirement);
    tracing::debug!(
        path = %location.path,
        decision = decision.label(),
        "route guard evaluated"
    );
    decision
}

fn decide(
    session: SessionState<'_>,
    location: &Location,
    requirement: &RouteRequirement,
) -> GuardDecision {
    let user = match session {
        SessionState::Loading => return GuardDecision::Pending,
        SessionState::Anonymous => None,
        SessionState::SignedIn(user) => Some(user),
    };

    let user = match (requirement.access, user) {
        (Access::GuestOnly, Some(user)) => {
            return redirect_unless_here(
                location,
                dashboard_redirect(Some(user)),
                RedirectReason::AlreadySignedIn,
            );
        }
        (Access::GuestOnly, None) | (Access::Public, _) => return GuardDecision::Render,
        (_, None) => return login_redirect(location, requirement),
        (_, Some(user)) => user,
    };

    let Some(current_role) = user.current_role else {
        if location.path.eq_ignore_ascii_case(ROLE_SELECTION_PATH) {
            return GuardDecision::Render;
        }
        return GuardDecision::Redirect(Redirect::to(
            ROLE_SELECTION_PATH,
            RedirectReason::RoleSelectionRequired,
        ));
    };

    match requirement.access {
        Access::Authenticated {
            role: Some(required),
        } if required != current_role => redirect_unless_here(
            location,
            dashboard_path(current_role),
            RedirectReason::RoleMismatch,
        ),
        Access::DashboardRedirect => redirect_unless_here(
            location,
            dashboard_path(current_role),
            RedirectReason::Dashboard,
        ),
        _ => GuardDecision::Render,
    }
}

fn login_redirect(location: &Location, requirement: &RouteRequirement) -> GuardDecision {
    let target = requirement
        .redirect_to
        .as_deref()
        .filter(|to| !Location::parse(to).path.eq_ignore_ascii_case(&location.path))
        .unwrap_or(LOGIN_PATH);
    if Location::parse(target).path.eq_ignore_ascii_case(&location.path) {
        return GuardDecision::Redirect(Redirect::to(
            UNAUTHORIZED_PATH,
            RedirectReason::Unauthorized,
        ));
    }
    GuardDecision::Redirect(Redirect {
        to: target.to_string(),
        from: Some(location.to_uri()),
        reason: RedirectReason::LoginRequired,
    })
}

/// Redirect to `target`, or to the unauthorized page when `target` is where
/// the visitor already is
fn redirect_unless_here(
    location: &Location,
    target: &str,
    reason: RedirectReason,
) -> GuardDecision {
    if location.path.eq_ignore_ascii_case(target) {
        GuardDecision::Redirect(Redirect::to(
            UNAUTHORIZED_PATH,
            RedirectReason::Unauthorized,
        ))
    } else {
        GuardDecision::Redirect(Redirect::to(target, reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_parse() {
        let loc = Location::parse("/hub/shifts/?week=3");
        assert_eq!(loc.path, "/hub/shifts");
        assert_eq!(loc.query.as_deref(), Some("week=3"));
        assert_eq!(loc.to_uri(), "/hub/shifts?week=3");

        assert_eq!(Location::parse("/").path, "/");
        assert_eq!(Location::parse("login?").query, None);
        assert_eq!(Location::parse("login").path, "/login");
    }

    #[test]
    fn test_redirect_location_encodes_from() {
        let redirect = Redirect {
            to: "/login".to_string(),
            from: Some("/hub/shifts?week=3&view=list".to_string()),
            reason: RedirectReason::LoginRequired,
        };
        assert_eq!(
            redirect.location(),
            "/login?from=%2Fhub%2Fshifts%3Fweek%3D3%26view%3Dlist"
        );

        let with_query = Redirect {
            to: "/welcome?tab=signin".to_string(),
            ..redirect
        };
        assert!(with_query.location().starts_with("/welcome?tab=signin&from="));
    }

    #[test]
    fn test_session_state_from_parts() {
        assert!(matches!(SessionState::from_parts(None, true), SessionState::Loading));
        assert!(matches!(SessionState::from_parts(None, false), SessionState::Anonymous));
    }

    #[test]
    fn test_decision_serializes_with_action_tag() {
        let json = serde_json::to_value(GuardDecision::Redirect(Redirect::to(
            ROLE_SELECTION_PATH,
            RedirectReason::RoleSelectionRequired,
        )))
        .unwrap();
        assert_eq!(json["action"], "redirect");
        assert_eq!(json["to"], "/role-selection");
        assert_eq!(json["reason"], "roleSelectionRequired");
        assert_eq!(
            serde_json::to_value(GuardDecision::Render).unwrap()["action"],
            "render"
        );
    }
}
