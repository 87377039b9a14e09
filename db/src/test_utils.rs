use chrono::{DateTime, Duration, Utc};
use migration::Migrator;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::models::{class, exam, lesson, user};

pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// A unit vector along `axis`, handy as an enrolled face embedding.
pub fn unit_embedding(axis: usize, dims: usize) -> Vec<f32> {
    let mut v = vec![0.0; dims];
    v[axis % dims] = 1.0;
    v
}

pub async fn create_teacher(db: &DatabaseConnection, username: &str) -> user::Model {
    user::Model::create(db, username, &format!("Teacher {username}"), user::UserRole::Teacher, None, Vec::new())
        .await
        .expect("Failed to create teacher")
}

/// Student with an NFC card `NFC-<username>` and a face embedding along `axis`.
pub async fn create_student(db: &DatabaseConnection, username: &str, axis: usize) -> user::Model {
    let card = format!("NFC-{username}");
    user::Model::create(
        db,
        username,
        &format!("Student {username}"),
        user::UserRole::Student,
        Some(&card),
        unit_embedding(axis, 8),
    )
    .await
    .expect("Failed to create student")
}

pub fn lesson_date(days_from_now: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days_from_now)
}

pub async fn create_class_with_lesson(
    db: &DatabaseConnection,
    code: &str,
    teacher_id: i64,
    lesson_id: &str,
    is_finished: bool,
) -> class::Model {
    let class = class::Model::create(db, code, &format!("Class {code}"), teacher_id)
        .await
        .expect("Failed to create class");
    lesson::Model::create(db, class.id, lesson_id, lesson_date(0), "A101", "morning", is_finished)
        .await
        .expect("Failed to create lesson");
    class
}

pub async fn create_exam(
    db: &DatabaseConnection,
    code: &str,
    supervisor_id: i64,
    is_finished: bool,
) -> exam::Model {
    exam::Model::create(db, code, &format!("Exam {code}"), lesson_date(0), "Hall 1", supervisor_id, is_finished)
        .await
        .expect("Failed to create exam")
}
