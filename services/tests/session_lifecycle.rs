mod common;

use chrono::{Duration, Utc};
use common::{Fixture, expire};
use db::models::SessionTarget;
use db::models::check_in_session::{SessionMode, SessionStatus};
use db::test_utils::create_teacher;
use services::{AttendanceError, Caller};

#[tokio::test]
async fn open_returns_token_and_five_minute_expiry() {
    let fx = Fixture::new().await;
    let before = Utc::now();

    let session = fx.open(&fx.lesson(), 1, SessionMode::Standard).await;

    assert_eq!(session.token.len(), 8);
    assert!(session.token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    assert_eq!(session.status, SessionStatus::Open);
    let ttl = session.expires_at - session.opened_at;
    assert_eq!(ttl, Duration::minutes(5));
    assert!(session.opened_at >= before);
}

#[tokio::test]
async fn open_rejects_unknown_class_and_lesson() {
    let fx = Fixture::new().await;
    let store = fx.sessions();
    let caller = fx.teacher_caller();

    let err = store
        .open(&caller, &SessionTarget::class(9999, "L01"), 1, SessionMode::Standard)
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::NotFound(_)));

    let err = store
        .open(&caller, &SessionTarget::class(fx.class.id, "L99"), 1, SessionMode::Standard)
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::NotFound(_)));
}

#[tokio::test]
async fn open_requires_class_owner() {
    let fx = Fixture::new().await;
    let other = create_teacher(&fx.db, "gv002").await;

    let err = fx
        .sessions()
        .open(&Caller::teacher(other.id), &fx.lesson(), 1, SessionMode::Standard)
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::Forbidden(_)));

    let err = fx
        .sessions()
        .open(&Caller::student(fx.students[0].id), &fx.lesson(), 1, SessionMode::Standard)
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::Forbidden(_)));
}

#[tokio::test]
async fn open_validates_level() {
    let fx = Fixture::new().await;
    let exam = fx.create_exam(fx.teacher.id, &[]).await;

    for level in [0, 4] {
        let err = fx
            .sessions()
            .open(&fx.teacher_caller(), &fx.lesson(), level, SessionMode::Standard)
            .await
            .unwrap_err();
        assert!(matches!(err, AttendanceError::InvalidInput(_)), "level {level}");
    }

    let err = fx
        .sessions()
        .open(&fx.teacher_caller(), &SessionTarget::exam(exam.id), 2, SessionMode::Standard)
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::InvalidInput(_)));
}

#[tokio::test]
async fn exam_session_requires_recorded_supervisor() {
    let fx = Fixture::new().await;
    let supervisor = create_teacher(&fx.db, "gv002").await;
    let exam = fx.create_exam(supervisor.id, &[]).await;

    let err = fx
        .sessions()
        .open(&fx.teacher_caller(), &SessionTarget::exam(exam.id), 3, SessionMode::Standard)
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::Forbidden(_)));

    let ok = fx
        .sessions()
        .open(&Caller::teacher(supervisor.id), &SessionTarget::exam(exam.id), 3, SessionMode::Standard)
        .await;
    assert!(ok.is_ok());
}

#[tokio::test]
async fn opening_again_supersedes_previous_session() {
    let fx = Fixture::new().await;
    let first = fx.open(&fx.lesson(), 1, SessionMode::Standard).await;
    let second = fx.open(&fx.lesson(), 2, SessionMode::Standard).await;

    let store = fx.sessions();
    assert!(matches!(store.lookup(&first.token).await, Err(AttendanceError::NotFound(_))));
    assert_eq!(store.lookup(&second.token).await.unwrap().id, second.id);
}

#[tokio::test]
async fn lookup_after_expiry_is_not_found_even_if_never_closed() {
    let fx = Fixture::new().await;
    let session = fx.open(&fx.lesson(), 1, SessionMode::Standard).await;
    expire(&fx.db, &session).await;

    let err = fx.sessions().lookup(&session.token).await.unwrap_err();
    assert!(matches!(err, AttendanceError::NotFound(_)));

    let err = fx.check_in(&fx.students[0], &session.token).await.unwrap_err();
    assert!(matches!(err, AttendanceError::NotFound(_)));
}

#[tokio::test]
async fn extend_revives_expired_session() {
    let fx = Fixture::new().await;
    let session = fx.open(&fx.lesson(), 1, SessionMode::Standard).await;
    expire(&fx.db, &session).await;

    let extended = fx.sessions().extend(&fx.teacher_caller(), &session.token).await.unwrap();
    assert!(extended.is_live(Utc::now()));
    assert_eq!(extended.expires_at - extended.opened_at, Duration::minutes(5));
    assert!(fx.sessions().lookup(&session.token).await.is_ok());
}

#[tokio::test]
async fn extend_reopens_closed_session_and_closes_newer_one() {
    let fx = Fixture::new().await;
    let old = fx.open(&fx.lesson(), 1, SessionMode::Standard).await;
    let new = fx.open(&fx.lesson(), 1, SessionMode::Standard).await;

    fx.sessions().extend(&fx.teacher_caller(), &old.token).await.unwrap();

    assert!(fx.sessions().lookup(&old.token).await.is_ok());
    assert!(matches!(fx.sessions().lookup(&new.token).await, Err(AttendanceError::NotFound(_))));
}

#[tokio::test]
async fn extend_and_close_unknown_token_is_not_found() {
    let fx = Fixture::new().await;
    let store = fx.sessions();

    assert!(matches!(
        store.extend(&fx.teacher_caller(), "DEADBEEF").await,
        Err(AttendanceError::NotFound(_))
    ));
    assert!(matches!(
        store.close(&fx.teacher_caller(), "DEADBEEF").await,
        Err(AttendanceError::NotFound(_))
    ));
}

#[tokio::test]
async fn close_makes_session_unusable_immediately() {
    let fx = Fixture::new().await;
    let session = fx.open(&fx.lesson(), 1, SessionMode::Standard).await;

    let closed = fx.sessions().close(&fx.teacher_caller(), &session.token).await.unwrap();
    assert_eq!(closed.session.status, SessionStatus::Closed);
    assert!(closed.session.closed_at.is_some());
    assert!(closed.session.expires_at <= Utc::now());

    let err = fx.check_in(&fx.students[0], &session.token).await.unwrap_err();
    assert!(matches!(err, AttendanceError::NotFound(_)));
}

#[tokio::test]
async fn stats_count_and_list_recent_check_ins() {
    let fx = Fixture::new().await;
    let session = fx.open(&fx.lesson(), 1, SessionMode::Standard).await;
    fx.check_in(&fx.students[0], &session.token).await.unwrap();
    fx.check_in(&fx.students[1], &session.token).await.unwrap();
    fx.check_in(&fx.students[1], &session.token).await.unwrap();

    let stats = fx.sessions().stats(&fx.teacher_caller(), &session.token).await.unwrap();
    assert_eq!(stats.count, 2);
    assert_eq!(stats.recent_checkins.len(), 2);
    assert!(stats.active);
    assert_eq!(stats.level, 1);
    let names: Vec<_> = stats.recent_checkins.iter().map(|c| c.username.as_str()).collect();
    assert!(names.contains(&"sv001") && names.contains(&"sv002"));

    fx.sessions().close(&fx.teacher_caller(), &session.token).await.unwrap();
    let stats = fx.sessions().stats(&fx.teacher_caller(), &session.token).await.unwrap();
    assert_eq!(stats.count, 2);
    assert!(!stats.active);
}

#[tokio::test]
async fn stats_are_owner_only() {
    let fx = Fixture::new().await;
    let other = create_teacher(&fx.db, "gv002").await;
    let session = fx.open(&fx.lesson(), 1, SessionMode::Standard).await;

    let err = fx.sessions().stats(&Caller::teacher(other.id), &session.token).await.unwrap_err();
    assert!(matches!(err, AttendanceError::Forbidden(_)));
}
