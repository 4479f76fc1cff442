use thiserror::Error;

/// Result type alias using HubError
pub type Result<T> = std::result::Result<T, HubError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used in API responses, tests and
/// log fields. The HTTP layer maps kinds to status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    InvalidRole,
    InvalidTimeRange,

    // Lookup
    NotFound,
    AlreadyExists,
    Conflict,

    // Access
    Unauthorised,
    Forbidden,
    SessionExpired,

    // Marketplace rules
    ComplianceViolation,
    ShiftNotOpen,

    // Integration/IO
    Persistence,
    Migration,
    Serialization,
    ExternalService,
    Configuration,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidRole => "ERR_INVALID_ROLE",
            ExErrorKind::InvalidTimeRange => "ERR_INVALID_TIME_RANGE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::Conflict => "ERR_CONFLICT",
            ExErrorKind::Unauthorised => "ERR_UNAUTHORISED",
            ExErrorKind::Forbidden => "ERR_FORBIDDEN",
            ExErrorKind::SessionExpired => "ERR_SESSION_EXPIRED",
            ExErrorKind::ComplianceViolation => "ERR_COMPLIANCE_VIOLATION",
            ExErrorKind::ShiftNotOpen => "ERR_SHIFT_NOT_OPEN",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Migration => "ERR_MIGRATION",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Configuration => "ERR_CONFIGURATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification for programmatic handling plus context for
/// debugging. Built with the `with_*` methods.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    user_id: Option<String>,
    message: String,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            user_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the id of the entity the error concerns (shift, application, ...)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add the acting user's id
    pub fn with_user_id(mut self, id: impl Into<String>) -> Self {
        self.user_id = Some(id.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain errors raised by marketplace operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HubError {
    // ===== Lookup =====
    #[error("User not found: {user_id}")]
    UserNotFound { user_id: String },

    #[error("Shift not found: {shift_id}")]
    ShiftNotFound { shift_id: String },

    #[error("Application not found: {application_id}")]
    ApplicationNotFound { application_id: String },

    #[error("Venue profile not found for user {user_id}")]
    VenueProfileNotFound { user_id: String },

    // ===== Access =====
    /// No session, or the session token is unknown
    #[error("Authentication required")]
    NotAuthenticated,

    #[error("Session has expired")]
    SessionExpired,

    /// The user has not picked a current role yet
    #[error("User {user_id} has not selected a role")]
    RoleNotSelected { user_id: String },

    #[error("Operation requires role {required}, user is acting as {actual}")]
    RoleMismatch { required: String, actual: String },

    #[error("User {user_id} may not access {entity_id}")]
    AccessDenied { user_id: String, entity_id: String },

    // ===== Validation =====
    #[error("Unknown role: {value}")]
    UnknownRole { value: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Invalid time range: {reason}")]
    InvalidTimeRange { reason: String },

    // ===== Marketplace rules =====
    #[error("Shift {shift_id} requires a current RSA certificate")]
    RsaCertificateRequired { shift_id: String },

    #[error("RSA certificate expired on {expired_on}, before shift date {shift_date}")]
    RsaCertificateExpired {
        expired_on: String,
        shift_date: String,
    },

    #[error("Professional {user_id} is suspended and cannot apply")]
    ProfessionalSuspended { user_id: String },

    #[error("Professional {user_id} has already applied to shift {shift_id}")]
    DuplicateApplication { user_id: String, shift_id: String },

    #[error("Shift {shift_id} is {status} and not accepting applications")]
    ShiftNotOpen { shift_id: String, status: String },

    #[error("Application {application_id} cannot move from {from} to {to}")]
    IllegalStatusTransition {
        application_id: String,
        from: String,
        to: String,
    },

    #[error("Application {application_id} already has a strike")]
    StrikeAlreadyIssued { application_id: String },

    #[error("Cannot start a conversation with yourself")]
    SelfConversation,

    #[error("Email {email} is already registered")]
    EmailTaken { email: String },

    // ===== Integration =====
    #[error("Identity provider rejected the credential: {reason}")]
    IdentityRejected { reason: String },

    #[error("Identity provider unavailable: {message}")]
    IdentityProviderUnavailable { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Conversion from HubError to the structured ExError
impl From<HubError> for ExError {
    fn from(err: HubError) -> Self {
        match err {
            HubError::UserNotFound { user_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(user_id)
                .with_message("User not found"),

            HubError::ShiftNotFound { shift_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(shift_id)
                .with_message("Shift not found"),

            HubError::ApplicationNotFound { application_id } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(application_id)
                    .with_message("Application not found")
            }

            HubError::VenueProfileNotFound { user_id } => ExError::new(ExErrorKind::NotFound)
                .with_user_id(user_id)
                .with_message("Venue profile not found"),

            HubError::NotAuthenticated => {
                ExError::new(ExErrorKind::Unauthorised).with_message("Authentication required")
            }

            HubError::SessionExpired => {
                ExError::new(ExErrorKind::SessionExpired).with_message("Session has expired")
            }

            HubError::RoleNotSelected { user_id } => ExError::new(ExErrorKind::Forbidden)
                .with_user_id(user_id)
                .with_message("Select a role before continuing"),

            HubError::RoleMismatch { required, actual } => ExError::new(ExErrorKind::Forbidden)
                .with_message(format!("Requires role {}, acting as {}", required, actual)),

            HubError::AccessDenied { user_id, entity_id } => {
                ExError::new(ExErrorKind::Forbidden)
                    .with_user_id(user_id)
                    .with_entity_id(entity_id)
                    .with_message("Access denied")
            }

            HubError::UnknownRole { value } => ExError::new(ExErrorKind::InvalidRole)
                .with_message(format!("Unknown role: {}", value)),

            HubError::InvalidInput { reason } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(reason)
            }

            HubError::InvalidTimeRange { reason } => {
                ExError::new(ExErrorKind::InvalidTimeRange).with_message(reason)
            }

            HubError::RsaCertificateRequired { shift_id } => {
                ExError::new(ExErrorKind::ComplianceViolation)
                    .with_entity_id(shift_id)
                    .with_message("This shift requires a current RSA certificate")
            }

            HubError::RsaCertificateExpired {
                expired_on,
                shift_date,
            } => ExError::new(ExErrorKind::ComplianceViolation).with_message(format!(
                "RSA certificate expired on {}, before the shift on {}",
                expired_on, shift_date
            )),

            HubError::ProfessionalSuspended { user_id } => {
                ExError::new(ExErrorKind::ComplianceViolation)
                    .with_user_id(user_id)
                    .with_message("Suspended professionals cannot apply to shifts")
            }

            HubError::DuplicateApplication { user_id, shift_id } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_user_id(user_id)
                    .with_entity_id(shift_id)
                    .with_message("Already applied to this shift")
            }

            HubError::ShiftNotOpen { shift_id, status } => ExError::new(ExErrorKind::ShiftNotOpen)
                .with_entity_id(shift_id)
                .with_message(format!("Shift is {}", status)),

            HubError::IllegalStatusTransition {
                application_id,
                from,
                to,
            } => ExError::new(ExErrorKind::Conflict)
                .with_entity_id(application_id)
                .with_message(format!("Cannot move application from {} to {}", from, to)),

            HubError::StrikeAlreadyIssued { application_id } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_entity_id(application_id)
                    .with_message("A strike was already issued for this application")
            }

            HubError::SelfConversation => ExError::new(ExErrorKind::InvalidInput)
                .with_message("Cannot start a conversation with yourself"),

            HubError::EmailTaken { email } => ExError::new(ExErrorKind::AlreadyExists)
                .with_message(format!("Email {} is already registered", email)),

            HubError::IdentityRejected { reason } => ExError::new(ExErrorKind::Unauthorised)
                .with_op("verify_identity")
                .with_message(reason),

            HubError::IdentityProviderUnavailable { message } => {
                ExError::new(ExErrorKind::ExternalService)
                    .with_op("verify_identity")
                    .with_message(message)
            }

            HubError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            HubError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for HubError {
    fn from(err: serde_json::Error) -> Self {
        HubError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_unique() {
        let kinds = [
            ExErrorKind::InvalidInput,
            ExErrorKind::InvalidRole,
            ExErrorKind::InvalidTimeRange,
            ExErrorKind::NotFound,
            ExErrorKind::AlreadyExists,
            ExErrorKind::Conflict,
            ExErrorKind::Unauthorised,
            ExErrorKind::Forbidden,
            ExErrorKind::SessionExpired,
            ExErrorKind::ComplianceViolation,
            ExErrorKind::ShiftNotOpen,
            ExErrorKind::Persistence,
            ExErrorKind::Migration,
            ExErrorKind::Serialization,
            ExErrorKind::ExternalService,
            ExErrorKind::Configuration,
            ExErrorKind::Internal,
        ];
        let mut codes: Vec<_> = kinds.iter().map(|k| k.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
        assert!(codes.iter().all(|c| c.starts_with("ERR_")));
    }

    #[test]
    fn test_display_includes_code_op_and_entity() {
        let err = ExError::new(ExErrorKind::NotFound)
            .with_op("get_shift")
            .with_entity_id("s-1")
            .with_message("Shift not found");
        assert_eq!(
            err.to_string(),
            "[ERR_NOT_FOUND] in operation 'get_shift': Shift not found (entity_id: s-1)"
        );
    }
}
