#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use chrono::Duration;
use common::{ttl, user, StubVerifier};
use hubshift_core::errors::ExErrorKind;
use hubshift_core::model::{AuthProvider, Role, Session};
use hubshift_core_types::Sensitive;
use hubshift_engine::commands::auth::{google_sign_in, resolve_session, select_role, sign_out};
use hubshift_store::{MemoryRepo, Repository};

fn credential(raw: &str) -> Sensitive<String> {
    Sensitive::new(raw.to_string())
}

#[tokio::test]
async fn test_first_sign_in_creates_user_with_requested_role() {
    let repo = MemoryRepo::new();
    let verifier = StubVerifier::default().with("cred-1", "google-1", "New.Hub@Example.com");

    let signed_in = google_sign_in(&repo, &verifier, &credential("cred-1"), Some(Role::Hub), ttl())
        .await
        .unwrap();

    assert!(signed_in.created);
    assert_eq!(signed_in.user.email, "new.hub@example.com");
    assert_eq!(signed_in.user.provider, AuthProvider::Google);
    assert_eq!(signed_in.user.role, Some(Role::Hub));
    assert_eq!(signed_in.user.current_role, Some(Role::Hub));
    assert_eq!(signed_in.redirect_to, "/hub/dashboard");

    let resolved = resolve_session(&repo, signed_in.token.expose())
        .await
        .unwrap();
    assert_eq!(resolved.id, signed_in.user.id);
}

#[tokio::test]
async fn test_sign_in_without_role_lands_on_role_selection() {
    let repo = MemoryRepo::new();
    let verifier = StubVerifier::default().with("cred-2", "google-2", "fresh@example.com");

    let signed_in = google_sign_in(&repo, &verifier, &credential("cred-2"), None, ttl())
        .await
        .unwrap();
    assert_eq!(signed_in.user.current_role, None);
    assert_eq!(signed_in.redirect_to, "/role-selection");
}

#[tokio::test]
async fn test_sign_in_links_existing_email_account() {
    let repo = MemoryRepo::new();
    let existing = user(&repo, "bar@example.com", Some(Role::Professional)).await;
    let verifier = StubVerifier::default().with("cred-3", "google-3", "BAR@example.com");

    let signed_in = google_sign_in(&repo, &verifier, &credential("cred-3"), Some(Role::Hub), ttl())
        .await
        .unwrap();

    assert!(!signed_in.created);
    assert_eq!(signed_in.user.id, existing.id);
    // Existing role choice wins over the one requested at sign-in
    assert_eq!(signed_in.user.current_role, Some(Role::Professional));

    let linked = repo.find_user_by_google_id("google-3").await.unwrap();
    assert_eq!(linked.map(|u| u.id), Some(existing.id));
}

#[tokio::test]
async fn test_rejected_credential_is_unauthorised() {
    let repo = MemoryRepo::new();
    let verifier = StubVerifier::default();

    let err = google_sign_in(&repo, &verifier, &credential("forged"), None, ttl())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Unauthorised);
}

#[tokio::test]
async fn test_unknown_and_signed_out_tokens_are_rejected() {
    let repo = MemoryRepo::new();
    let verifier = StubVerifier::default().with("cred-4", "google-4", "out@example.com");
    let signed_in = google_sign_in(&repo, &verifier, &credential("cred-4"), None, ttl())
        .await
        .unwrap();

    let err = resolve_session(&repo, "not-a-token").await.unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Unauthorised);

    sign_out(&repo, signed_in.token.expose()).await.unwrap();
    let err = resolve_session(&repo, signed_in.token.expose())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Unauthorised);
}

#[tokio::test]
async fn test_expired_session_is_reported_and_removed() {
    let repo = MemoryRepo::new();
    let owner = user(&repo, "late@example.com", None).await;
    let (session, token) = Session::issue(owner.id, Duration::seconds(-1));
    repo.insert_session(&session).await.unwrap();

    let err = resolve_session(&repo, token.expose()).await.unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::SessionExpired);
    assert!(repo
        .find_session(&session.token_hash)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_select_role_switches_dashboard() {
    let repo = MemoryRepo::new();
    let hub = user(&repo, "switch@example.com", Some(Role::Hub)).await;

    let (updated, dashboard) = select_role(&repo, &hub, Role::Professional).await.unwrap();
    assert_eq!(dashboard, "/professional/dashboard");
    assert_eq!(updated.role, Some(Role::Hub));
    assert_eq!(updated.current_role, Some(Role::Professional));

    let stored = repo.find_user(hub.id).await.unwrap().unwrap();
    assert_eq!(stored.current_role, Some(Role::Professional));
}
