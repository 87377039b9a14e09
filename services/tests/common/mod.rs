#![allow(dead_code)]

use chrono::{Duration, Utc};
use db::models::check_in_session::{self, SessionMode};
use db::models::{SessionTarget, class, exam, user};
use db::test_utils::{
    create_class_with_lesson, create_exam, create_student, create_teacher, setup_test_db, unit_embedding,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, IntoActiveModel, Set};
use services::Caller;
use services::session_store::SessionStore;
use services::verification::{CheckInReceipt, CheckInRequest, VerificationPipeline};
use services::AttendanceError;
use util::config::AttendancePolicy;

pub const DIMS: usize = 8;

/// A teacher owning class `IT101` with lesson `L01`, and three enrolled students.
pub struct Fixture {
    pub db: DatabaseConnection,
    pub policy: AttendancePolicy,
    pub teacher: user::Model,
    pub students: Vec<user::Model>,
    pub class: class::Model,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_lesson_finished(false).await
    }

    pub async fn with_lesson_finished(finished: bool) -> Self {
        let db = setup_test_db().await;
        let teacher = create_teacher(&db, "gv001").await;
        let class = create_class_with_lesson(&db, "IT101", teacher.id, "L01", finished).await;

        let mut students = Vec::new();
        for (i, name) in ["sv001", "sv002", "sv003"].into_iter().enumerate() {
            let student = create_student(&db, name, i).await;
            class.add_student(&db, student.id).await.unwrap();
            students.push(student);
        }

        Self {
            db,
            policy: AttendancePolicy::default(),
            teacher,
            students,
            class,
        }
    }

    pub fn lesson(&self) -> SessionTarget {
        SessionTarget::class(self.class.id, "L01")
    }

    pub fn teacher_caller(&self) -> Caller {
        Caller::teacher(self.teacher.id)
    }

    pub fn sessions(&self) -> SessionStore<'_> {
        SessionStore::new(&self.db, &self.policy)
    }

    pub fn pipeline(&self) -> VerificationPipeline<'_> {
        VerificationPipeline::new(&self.db, &self.policy)
    }

    pub async fn open(&self, target: &SessionTarget, level: i16, mode: SessionMode) -> check_in_session::Model {
        self.sessions()
            .open(&self.teacher_caller(), target, level, mode)
            .await
            .unwrap()
    }

    /// Checks `student` in with their own card and face.
    pub async fn check_in(
        &self,
        student: &user::Model,
        token: &str,
    ) -> Result<CheckInReceipt, AttendanceError> {
        self.pipeline()
            .check_in(&Caller::student(student.id), &genuine_request(student, token))
            .await
    }

    pub async fn create_exam(&self, supervisor_id: i64, roster: &[&user::Model]) -> exam::Model {
        let exam = create_exam(&self.db, "EXAM_IT101", supervisor_id, false).await;
        for student in roster {
            exam.add_student(&self.db, student.id).await.unwrap();
        }
        exam
    }
}

/// A request carrying the student's enrolled card, written the way a reader
/// might report it, and their enrolled face.
pub fn genuine_request(student: &user::Model, token: &str) -> CheckInRequest {
    let card = student.nfc_id.clone().unwrap_or_default().to_lowercase().replace('-', " ");
    CheckInRequest {
        session_token: token.to_owned(),
        nfc_value: Some(card),
        face_embedding: Some(student.face_embedding.0.clone()),
    }
}

/// An embedding whose cosine similarity to `unit_embedding(axis)` is `similarity`.
pub fn embedding_with_similarity(axis: usize, similarity: f32) -> Vec<f32> {
    let mut v = unit_embedding(axis, DIMS);
    v[axis] = similarity;
    v[(axis + 1) % DIMS] = (1.0 - similarity * similarity).sqrt();
    v
}

/// Moves a session's expiry into the past without closing it.
pub async fn expire(db: &DatabaseConnection, session: &check_in_session::Model) {
    let mut active = session.clone().into_active_model();
    active.expires_at = Set(Utc::now() - Duration::seconds(1));
    active.update(db).await.unwrap();
}
