use hubshift_core::errors::{ExError, ExErrorKind, HubError};

#[test]
fn test_not_found_verifiable_by_kind() {
    let err = HubError::ShiftNotFound {
        shift_id: "missing-shift".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::NotFound);
    assert_eq!(ex_err.code(), "ERR_NOT_FOUND");
    assert_eq!(ex_err.entity_id(), Some("missing-shift"));
}

#[test]
fn test_rsa_failures_are_compliance_violations() {
    let required: ExError = HubError::RsaCertificateRequired {
        shift_id: "s-1".to_string(),
    }
    .into();
    let expired: ExError = HubError::RsaCertificateExpired {
        expired_on: "2026-01-01".to_string(),
        shift_date: "2026-02-01".to_string(),
    }
    .into();

    assert_eq!(required.kind(), ExErrorKind::ComplianceViolation);
    assert_eq!(expired.kind(), ExErrorKind::ComplianceViolation);
    assert!(expired.message().contains("2026-01-01"));
}

#[test]
fn test_duplicate_application_is_already_exists() {
    let ex_err: ExError = HubError::DuplicateApplication {
        user_id: "u-1".to_string(),
        shift_id: "s-1".to_string(),
    }
    .into();

    assert_eq!(ex_err.code(), "ERR_ALREADY_EXISTS");
    assert_eq!(ex_err.user_id(), Some("u-1"));
    assert_eq!(ex_err.entity_id(), Some("s-1"));
}

#[test]
fn test_access_errors_distinguish_unauthorised_from_forbidden() {
    let anonymous: ExError = HubError::NotAuthenticated.into();
    let wrong_role: ExError = HubError::RoleMismatch {
        required: "hub".to_string(),
        actual: "professional".to_string(),
    }
    .into();

    assert_eq!(anonymous.kind(), ExErrorKind::Unauthorised);
    assert_eq!(wrong_role.kind(), ExErrorKind::Forbidden);
    assert_ne!(anonymous.code(), wrong_role.code());
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::InvalidRole, "ERR_INVALID_ROLE"),
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::Unauthorised, "ERR_UNAUTHORISED"),
        (ExErrorKind::ComplianceViolation, "ERR_COMPLIANCE_VIOLATION"),
        (ExErrorKind::Migration, "ERR_MIGRATION"),
        (ExErrorKind::ExternalService, "ERR_EXTERNAL_SERVICE"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_builder_carries_context() {
    let err = ExError::new(ExErrorKind::Persistence)
        .with_op("create_shift")
        .with_user_id("u-1")
        .with_message("connection reset");

    assert_eq!(err.op(), Some("create_shift"));
    assert_eq!(err.user_id(), Some("u-1"));
    assert!(err.to_string().starts_with("[ERR_PERSISTENCE]"));
}

#[test]
fn test_unknown_role_parse_error() {
    let err = "manager".parse::<hubshift_core::model::Role>().unwrap_err();
    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::InvalidRole);
    assert!(ex_err.message().contains("manager"));
}
