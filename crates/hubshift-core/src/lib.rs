//! HubShift Core - marketplace domain kernel
//!
//! This crate holds the pieces of the hospitality shift marketplace that do
//! not touch a database or the network:
//! - User, venue, shift, application and conversation models
//! - Authentication and role routing (guard, dashboard redirect, route table)
//! - Reliability badges, notification styling and calendar layout
//! - Application eligibility (RSA certificate gate)
//! - Error and logging facilities shared by the other crates

pub mod calendar;
pub mod compliance;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod notifications;
pub mod reliability;
pub mod routing;

// Macros reach core-types through `$crate`
pub use hubshift_core_types;

// Re-export commonly used types
pub use compliance::check_application_eligibility;
pub use errors::{ExError, ExErrorKind, HubError, Result};
pub use model::{Application, ApplicationStatus, Role, Shift, User};
pub use notifications::NotificationKind;
pub use reliability::{ReliabilityBadge, ReliabilitySummary};
pub use routing::{evaluate, GuardDecision, Location, RouteRequirement, RouteTable, SessionState};
