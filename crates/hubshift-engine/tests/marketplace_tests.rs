#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use chrono::NaiveTime;
use common::{days_from_now, posted_shift, ttl, user, YieldingRepo};
use hubshift_core::calendar::DayWindow;
use hubshift_core::errors::ExErrorKind;
use hubshift_core::hubshift_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use hubshift_core::logging_facility::init_test_capture;
use hubshift_core::model::{
    ApplicationStatus, Day, DayHours, OperatingHours, RsaCertificate, ShiftStatus,
};
use hubshift_core::notifications::NotificationKind;
use hubshift_core::reliability::ReliabilityBadge;
use hubshift_core::{Role, User};
use hubshift_engine::commands::applications::{
    apply_to_shift, issue_strike, list_application_updates, update_application_status,
};
use hubshift_engine::commands::conversations::start_conversation;
use hubshift_engine::commands::fixtures::setup_error_data;
use hubshift_engine::commands::professional::{reliability_summary, save_rsa_certificate};
use hubshift_engine::commands::shifts::{calendar_day, create_shift, list_shifts};
use hubshift_engine::commands::venue::{get_venue_profile, save_venue_profile, VenueProfileInput};
use hubshift_store::{MemoryRepo, Repository};
use uuid::Uuid;

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

async fn load(repo: &MemoryRepo, id: Uuid) -> User {
    repo.find_user(id).await.unwrap().unwrap()
}

#[tokio::test]
async fn test_rsa_gate_on_application() {
    let repo = MemoryRepo::new();
    let hub = user(&repo, "hub@example.com", Some(Role::Hub)).await;
    let pro = user(&repo, "pro@example.com", Some(Role::Professional)).await;
    let shift = posted_shift(&repo, &hub, true).await;

    let err = apply_to_shift(&repo, &pro, shift.id).await.unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ComplianceViolation);

    save_rsa_certificate(
        &repo,
        &pro,
        RsaCertificate {
            number: " NSW-77 ".to_string(),
            expires_on: shift.date,
        },
    )
    .await
    .unwrap();

    let application = apply_to_shift(&repo, &pro, shift.id).await.unwrap();
    assert_eq!(application.status, ApplicationStatus::Pending);

    let err = apply_to_shift(&repo, &pro, shift.id).await.unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
}

#[tokio::test]
async fn test_hub_cannot_apply_and_professional_cannot_post() {
    let repo = MemoryRepo::new();
    let hub = user(&repo, "hub2@example.com", Some(Role::Hub)).await;
    let pro = user(&repo, "pro2@example.com", Some(Role::Professional)).await;
    let shift = posted_shift(&repo, &hub, false).await;

    let err = apply_to_shift(&repo, &hub, shift.id).await.unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Forbidden);

    let err = create_shift(&repo, &pro, common::new_shift(false))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Forbidden);
}

#[tokio::test]
async fn test_accept_fills_shift_and_timeline_records_it() {
    let repo = MemoryRepo::new();
    let hub = user(&repo, "hub3@example.com", Some(Role::Hub)).await;
    let pro = user(&repo, "pro3@example.com", Some(Role::Professional)).await;
    let other = user(&repo, "pro3b@example.com", Some(Role::Professional)).await;
    let shift = posted_shift(&repo, &hub, false).await;

    let application = apply_to_shift(&repo, &pro, shift.id).await.unwrap();
    update_application_status(&repo, &hub, application.id, ApplicationStatus::Accepted)
        .await
        .unwrap();

    let stored = repo.find_shift(shift.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ShiftStatus::Filled);

    let err = apply_to_shift(&repo, &other, shift.id).await.unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ShiftNotOpen);

    let timeline = list_application_updates(&repo, &pro, application.id)
        .await
        .unwrap();
    let kinds: Vec<_> = timeline.iter().map(|v| v.update.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NotificationKind::ApplicationSubmitted,
            NotificationKind::ApplicationAccepted
        ]
    );
    assert_eq!(timeline[1].style.color, "green");

    // Hub that posted the shift can read it too; strangers cannot
    assert!(list_application_updates(&repo, &hub, application.id)
        .await
        .is_ok());
    let err = list_application_updates(&repo, &other, application.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Forbidden);
}

#[tokio::test]
async fn test_withdrawing_accepted_application_reopens_shift() {
    let repo = MemoryRepo::new();
    let hub = user(&repo, "hub4@example.com", Some(Role::Hub)).await;
    let pro = user(&repo, "pro4@example.com", Some(Role::Professional)).await;
    let shift = posted_shift(&repo, &hub, false).await;
    let application = apply_to_shift(&repo, &pro, shift.id).await.unwrap();

    update_application_status(&repo, &hub, application.id, ApplicationStatus::Accepted)
        .await
        .unwrap();
    let err = update_application_status(&repo, &hub, application.id, ApplicationStatus::Withdrawn)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Forbidden);

    update_application_status(&repo, &pro, application.id, ApplicationStatus::Withdrawn)
        .await
        .unwrap();
    let stored = repo.find_shift(shift.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ShiftStatus::Open);

    let err = update_application_status(&repo, &hub, application.id, ApplicationStatus::Accepted)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Conflict);
}

#[tokio::test]
async fn test_strikes_lead_to_suspension() {
    let repo = MemoryRepo::new();
    let hub = user(&repo, "hub5@example.com", Some(Role::Hub)).await;
    let pro = user(&repo, "pro5@example.com", Some(Role::Professional)).await;

    for n in 1..=3u32 {
        let shift = posted_shift(&repo, &hub, false).await;
        let application = apply_to_shift(&repo, &pro, shift.id).await.unwrap();
        update_application_status(&repo, &hub, application.id, ApplicationStatus::Accepted)
            .await
            .unwrap();
        let summary = issue_strike(&repo, &hub, application.id, None).await.unwrap();
        assert_eq!(summary.strikes, n);
    }

    let summary = reliability_summary(&repo, &pro).await.unwrap();
    assert_eq!(summary.badge, ReliabilityBadge::Suspended);
    assert!(!summary.can_apply);

    let shift = posted_shift(&repo, &hub, false).await;
    let err = apply_to_shift(&repo, &pro, shift.id).await.unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ComplianceViolation);
}

#[tokio::test]
async fn test_strike_requires_accepted_application() {
    let repo = MemoryRepo::new();
    let hub = user(&repo, "hub6@example.com", Some(Role::Hub)).await;
    let pro = user(&repo, "pro6@example.com", Some(Role::Professional)).await;
    let shift = posted_shift(&repo, &hub, false).await;
    let application = apply_to_shift(&repo, &pro, shift.id).await.unwrap();

    let err = issue_strike(&repo, &hub, application.id, Some("late".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_second_strike_on_same_application_refused() {
    let repo = MemoryRepo::new();
    let hub = user(&repo, "hub6b@example.com", Some(Role::Hub)).await;
    let pro = user(&repo, "pro6b@example.com", Some(Role::Professional)).await;
    let shift = posted_shift(&repo, &hub, false).await;
    let application = apply_to_shift(&repo, &pro, shift.id).await.unwrap();
    update_application_status(&repo, &hub, application.id, ApplicationStatus::Accepted)
        .await
        .unwrap();

    let summary = issue_strike(&repo, &hub, application.id, None).await.unwrap();
    assert_eq!(summary.strikes, 1);

    for _ in 0..2 {
        let err = issue_strike(&repo, &hub, application.id, Some("again".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
    }

    let summary = reliability_summary(&repo, &pro).await.unwrap();
    assert_eq!(summary.strikes, 1);
    assert_eq!(summary.badge, ReliabilityBadge::Good);
}

#[tokio::test]
async fn test_interleaved_strikes_on_one_application_count_once() {
    let repo = YieldingRepo::default();
    let hub = user(&repo.inner, "hub6c@example.com", Some(Role::Hub)).await;
    let pro = user(&repo.inner, "pro6c@example.com", Some(Role::Professional)).await;
    let shift = posted_shift(&repo.inner, &hub, false).await;
    let application = apply_to_shift(&repo.inner, &pro, shift.id).await.unwrap();
    update_application_status(&repo.inner, &hub, application.id, ApplicationStatus::Accepted)
        .await
        .unwrap();

    let (first, second) = tokio::join!(
        issue_strike(&repo, &hub, application.id, None),
        issue_strike(&repo, &hub, application.id, None),
    );
    assert_eq!(usize::from(first.is_ok()) + usize::from(second.is_ok()), 1);

    let summary = reliability_summary(&repo, &pro).await.unwrap();
    assert_eq!(summary.strikes, 1);
}

#[tokio::test]
async fn test_interleaved_accepts_book_shift_once() {
    let repo = YieldingRepo::default();
    let hub = user(&repo.inner, "hub6d@example.com", Some(Role::Hub)).await;
    let pro_a = user(&repo.inner, "pro6d@example.com", Some(Role::Professional)).await;
    let pro_b = user(&repo.inner, "pro6e@example.com", Some(Role::Professional)).await;
    let shift = posted_shift(&repo.inner, &hub, false).await;
    let first = apply_to_shift(&repo.inner, &pro_a, shift.id).await.unwrap();
    let second = apply_to_shift(&repo.inner, &pro_b, shift.id).await.unwrap();

    let (a, b) = tokio::join!(
        update_application_status(&repo, &hub, first.id, ApplicationStatus::Accepted),
        update_application_status(&repo, &hub, second.id, ApplicationStatus::Accepted),
    );
    let refused = match (a, b) {
        (Ok(_), Err(err)) | (Err(err), Ok(_)) => err,
        (a, b) => panic!("expected exactly one accept, got {:?} / {:?}", a, b),
    };
    assert_eq!(refused.kind(), ExErrorKind::ShiftNotOpen);

    let stored = repo.find_shift(shift.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ShiftStatus::Filled);

    let mut statuses = Vec::new();
    for id in [first.id, second.id] {
        statuses.push(repo.find_application(id).await.unwrap().unwrap().status);
    }
    statuses.sort_by_key(|s| s.as_str());
    assert_eq!(
        statuses,
        vec![ApplicationStatus::Accepted, ApplicationStatus::Pending]
    );
}

#[tokio::test]
async fn test_conversation_reused_for_same_pair_and_shift() {
    let repo = MemoryRepo::new();
    let hub = user(&repo, "hub7@example.com", Some(Role::Hub)).await;
    let pro = user(&repo, "pro7@example.com", Some(Role::Professional)).await;
    let shift = posted_shift(&repo, &hub, false).await;

    let (first, created) = start_conversation(&repo, &hub, pro.id, Some(shift.id))
        .await
        .unwrap();
    assert!(created);

    let (again, created) = start_conversation(&repo, &pro, hub.id, Some(shift.id))
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(again.id, first.id);

    let (general, created) = start_conversation(&repo, &pro, hub.id, None).await.unwrap();
    assert!(created);
    assert_ne!(general.id, first.id);

    let err = start_conversation(&repo, &pro, pro.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);

    let err = start_conversation(&repo, &pro, Uuid::now_v7(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[tokio::test]
async fn test_venue_profile_save_and_update() {
    let repo = MemoryRepo::new();
    let hub = user(&repo, "hub8@example.com", Some(Role::Hub)).await;

    let err = get_venue_profile(&repo, &hub).await.unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);

    let mut hours = OperatingHours::new();
    hours.set(
        Day::Saturday,
        DayHours {
            open: hm(16, 0),
            close: hm(3, 0),
        },
    );
    let first = save_venue_profile(
        &repo,
        &hub,
        VenueProfileInput {
            address: "12 Crown St".to_string(),
            operating_hours: hours,
        },
    )
    .await
    .unwrap();

    let second = save_venue_profile(
        &repo,
        &hub,
        VenueProfileInput {
            address: "14 Crown St".to_string(),
            operating_hours: OperatingHours::new(),
        },
    )
    .await
    .unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(
        get_venue_profile(&repo, &hub).await.unwrap().address,
        "14 Crown St"
    );

    let err = save_venue_profile(
        &repo,
        &hub,
        VenueProfileInput {
            address: "  ".to_string(),
            operating_hours: OperatingHours::new(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_calendar_day_layout() {
    let repo = MemoryRepo::new();
    let hub = user(&repo, "hub9@example.com", Some(Role::Hub)).await;
    let shift = posted_shift(&repo, &hub, false).await;
    assert_eq!(list_shifts(&repo, &hub, None).await.unwrap().len(), 1);

    let window = DayWindow::new(hm(12, 0), hm(23, 0), 660.0).unwrap();
    let day = calendar_day(&repo, &hub, shift.date, window, Some((shift.date, hm(17, 30))))
        .await
        .unwrap();

    assert_eq!(day.blocks.len(), 1);
    assert_eq!(day.blocks[0].top, 360.0);
    assert!(day.blocks[0].clipped);
    assert_eq!(day.now_offset, Some(330.0));

    let other_day = calendar_day(&repo, &hub, days_from_now(1), window, Some((shift.date, hm(17, 30))))
        .await
        .unwrap();
    assert!(other_day.blocks.is_empty());
    assert_eq!(other_day.now_offset, None);
}

#[tokio::test]
async fn test_error_fixtures_reproduce_each_refusal() {
    let repo = MemoryRepo::new();
    let fixtures = setup_error_data(&repo, ttl()).await.unwrap();

    let uncertified = load(&repo, fixtures.uncertified.user_id).await;
    let err = apply_to_shift(&repo, &uncertified, fixtures.rsa_shift_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ComplianceViolation);

    let expired = load(&repo, fixtures.expired_rsa.user_id).await;
    let err = apply_to_shift(&repo, &expired, fixtures.rsa_shift_id)
        .await
        .unwrap_err();
    assert!(err.message().contains("expired"));

    let suspended = load(&repo, fixtures.suspended.user_id).await;
    let err = apply_to_shift(&repo, &suspended, fixtures.rsa_shift_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ComplianceViolation);

    let err = apply_to_shift(&repo, &uncertified, fixtures.filled_shift_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ShiftNotOpen);

    let no_role = load(&repo, fixtures.no_role.user_id).await;
    assert_eq!(no_role.current_role, None);

    // Fixture sets never collide
    assert!(setup_error_data(&repo, ttl()).await.is_ok());
}

#[tokio::test]
async fn test_commands_own_boundary_events() {
    let capture = init_test_capture();
    let repo = MemoryRepo::new();
    let hub = user(&repo, "hub10@example.com", Some(Role::Hub)).await;
    let pro = user(&repo, "pro10@example.com", Some(Role::Professional)).await;
    let shift = posted_shift(&repo, &hub, true).await;

    let _ = apply_to_shift(&repo, &pro, shift.id).await;

    let events: Vec<_> = capture
        .events_for_op("apply_to_shift")
        .into_iter()
        .filter(|e| e.field("shift_id") == Some(shift.id.to_string().as_str()))
        .collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));

    let ended: Vec<_> = capture
        .events_for_op("apply_to_shift")
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();
    assert!(ended
        .iter()
        .any(|e| e.field("err_code") == Some("ERR_COMPLIANCE_VIOLATION")));
    assert!(capture
        .events_for_op("create_shift")
        .iter()
        .any(|e| e.event.as_deref() == Some(EVENT_END)));
}
