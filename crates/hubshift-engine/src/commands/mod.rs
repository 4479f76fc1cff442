//! Command handlers with boundary logging.
//!
//! ## Logging Ownership
//!
//! Each public command owns its lifecycle events:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()`.

pub mod applications;
pub mod auth;
pub mod conversations;
pub mod fixtures;
pub mod professional;
pub mod shifts;
pub mod venue;

use hubshift_core::errors::HubError;
use hubshift_core::model::{Role, User};

/// Require that `user` is currently acting as `role`
pub(crate) fn require_role(user: &User, role: Role) -> Result<(), HubError> {
    match user.current_role {
        None => Err(HubError::RoleNotSelected {
            user_id: user.id.to_string(),
        }),
        Some(current) if current != role => Err(HubError::RoleMismatch {
            required: role.as_str().to_string(),
            actual: current.as_str().to_string(),
        }),
        Some(_) => Ok(()),
    }
}
