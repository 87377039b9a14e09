#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use db::models::user::{self, UserRole};
use db::models::{class, exam};
use db::test_utils::{create_class_with_lesson, create_exam, create_student, create_teacher, setup_test_db};
use serde_json::Value;
use tower::ServiceExt;
use util::config::AttendancePolicy;
use util::state::AppState;
use util::test_helpers::init_test_config;

use api::auth::generate_jwt;
use api::routes::routes;

/// Router mounted under `/api` over a fresh in-memory database.
pub async fn make_test_app() -> (Router, AppState) {
    init_test_config();

    let db = setup_test_db().await;
    let state = AppState::new(db, AttendancePolicy::default());
    let app = Router::new().nest("/api", routes(state.clone()));

    (app, state)
}

pub fn bearer(user: &user::Model) -> String {
    let (token, _) = generate_jwt(user.id, user.role).unwrap();
    format!("Bearer {token}")
}

/// Sends a request and decodes the JSON envelope.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("Authorization", auth);
    }
    let req = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// A teacher with class `IT101` (lesson `L01`), two enrolled students, and
/// an exam supervised by the same teacher with only the first student on it.
pub struct Seed {
    pub teacher: user::Model,
    pub other_teacher: user::Model,
    pub alice: user::Model,
    pub bob: user::Model,
    pub class: class::Model,
    pub exam: exam::Model,
}

impl Seed {
    pub async fn new(state: &AppState) -> Self {
        let db = state.db();
        let teacher = create_teacher(db, "gv001").await;
        let other_teacher = create_teacher(db, "gv002").await;
        let alice = create_student(db, "sv001", 0).await;
        let bob = create_student(db, "sv002", 1).await;

        let class = create_class_with_lesson(db, "IT101", teacher.id, "L01", false).await;
        class.add_student(db, alice.id).await.unwrap();
        class.add_student(db, bob.id).await.unwrap();

        let exam = create_exam(db, "EXAM_IT101", teacher.id, false).await;
        exam.add_student(db, alice.id).await.unwrap();

        assert_eq!(teacher.role, UserRole::Teacher);
        Self {
            teacher,
            other_teacher,
            alice,
            bob,
            class,
            exam,
        }
    }

    /// Opens a session through the API and returns its token.
    pub async fn open_lesson(&self, app: &Router, level: i16, mode: &str) -> String {
        let (status, json) = send(
            app,
            "POST",
            "/api/sessions",
            Some(&bearer(&self.teacher)),
            Some(serde_json::json!({
                "class_id": self.class.id,
                "lesson_id": "L01",
                "level": level,
                "mode": mode,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{json}");
        json["data"]["session_token"].as_str().unwrap().to_owned()
    }

    pub fn check_in_body(student: &user::Model, token: &str) -> Value {
        serde_json::json!({
            "session_token": token,
            "nfc_value": student.nfc_id,
            "face_embedding": student.face_embedding.0,
        })
    }
}
