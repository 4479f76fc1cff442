//! Authentication and role routing
//!
//! Session state → guard → dashboard redirect → page.

pub mod guard;
pub mod redirect;
pub mod table;

pub use guard::{
    evaluate, Access, GuardDecision, Location, Redirect, RedirectReason, RouteRequirement,
    SessionState,
};
pub use redirect::{
    dashboard_path, dashboard_redirect, DASHBOARD_PATH, LOGIN_PATH, ROLE_SELECTION_PATH,
    UNAUTHORIZED_PATH,
};
pub use table::RouteTable;
