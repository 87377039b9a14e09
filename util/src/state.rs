//! Application state container shared across Axum route handlers and services.
//!
//! This struct holds shared resources such as the database connection and the
//! attendance policy. It is cheap to clone and passed into route handlers via
//! Axum's `State<T>` extractor.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AttendancePolicy;

/// Central application state shared across the server.
///
/// This includes:
/// - A cloned, thread-safe database connection for use with SeaORM.
/// - The `AttendancePolicy` injected into every check-in operation.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    policy: Arc<AttendancePolicy>,
}

impl AppState {
    /// Creates a new `AppState` with the given database connection and policy.
    pub fn new(db: DatabaseConnection, policy: AttendancePolicy) -> Self {
        Self {
            db,
            policy: Arc::new(policy),
        }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Returns the attendance policy in force.
    pub fn policy(&self) -> &AttendancePolicy {
        &self.policy
    }
}

impl AppState {
    /// Returns a cloned copy of the database connection.
    ///
    /// Useful for async contexts or spawning tasks that require ownership.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }
}
