//! Multi-factor check-in pipeline.
//!
//! Factors are checked in a fixed order: role, live session, NFC card, face
//! (level 2 and up), eligibility. Only when all pass are the log and the
//! result written, together, in one transaction.

use chrono::{DateTime, Utc};
use db::models::attendance_log::{self, CheckInMethod};
use db::models::attendance_result;
use db::models::check_in_session::{self, SessionMode};
use db::models::{SessionTarget, user};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use util::config::AttendancePolicy;

use crate::biometrics::{cosine_similarity, normalize_nfc};
use crate::error::AttendanceError;
use crate::identity::Caller;
use crate::reconciliation;
use crate::session_store::lookup_live;
use crate::targets::ResolvedTarget;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckInRequest {
    pub session_token: String,
    pub nfc_value: Option<String>,
    pub face_embedding: Option<Vec<f32>>,
}

/// What the student gets back after an accepted check-in.
#[derive(Debug, Clone, Serialize)]
pub struct CheckInReceipt {
    pub session_token: String,
    pub target: SessionTarget,
    pub class_id: Option<i64>,
    pub lesson_id: Option<String>,
    pub exam_id: Option<i64>,
    pub method: CheckInMethod,
    pub check_in_time: DateTime<Utc>,
    /// Set when the student had already checked in to this session.
    pub already_checked_in: bool,
    /// Face similarity, for levels that compare faces.
    pub similarity: Option<f32>,
}

/// Result of the pre-flight check a client runs before capturing biometrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SessionValidation {
    Ready {
        session_token: String,
        target: SessionTarget,
        level: i16,
        mode: SessionMode,
        requires_face: bool,
    },
    Blocked {
        reason: String,
    },
}

pub struct VerificationPipeline<'a> {
    db: &'a DatabaseConnection,
    policy: &'a AttendancePolicy,
}

impl<'a> VerificationPipeline<'a> {
    pub fn new(db: &'a DatabaseConnection, policy: &'a AttendancePolicy) -> Self {
        Self { db, policy }
    }

    pub async fn check_in(
        &self,
        caller: &Caller,
        request: &CheckInRequest,
    ) -> Result<CheckInReceipt, AttendanceError> {
        caller.require_student()?;

        let now = Utc::now();
        let session = lookup_live(self.db, &request.session_token, now).await?;
        let student = self.load_student(caller).await?;

        if let Err(err) = self.verify_card(&student, request.nfc_value.as_deref()) {
            tracing::warn!(student = student.id, session = %session.token, reason = %err, "card check rejected");
            return Err(err);
        }

        let similarity = if session.requires_face() {
            match self.verify_face(&student, request.face_embedding.as_deref()) {
                Ok(similarity) => Some(similarity),
                Err(err) => {
                    tracing::warn!(student = student.id, session = %session.token, reason = %err, "face check rejected");
                    return Err(err);
                }
            }
        } else {
            None
        };

        let target = session.target()?;
        self.check_eligibility(&session, &target, student.id).await?;

        let method = CheckInMethod::from_level(session.level);
        let txn = self.db.begin().await?;
        let inserted =
            attendance_log::Model::insert_if_absent(&txn, student.id, session.id, &target, method, now)
                .await?;
        if inserted {
            reconciliation::record_check_in(&txn, student.id, &target, now).await?;
        }
        txn.commit().await?;

        if inserted {
            tracing::info!(
                student = student.id,
                session = %session.token,
                target = %session.target_key,
                method = %method,
                similarity = ?similarity,
                "check-in accepted"
            );
        } else {
            tracing::debug!(student = student.id, session = %session.token, "repeated check-in ignored");
        }

        Ok(CheckInReceipt {
            session_token: session.token,
            class_id: target.class_id(),
            lesson_id: target.lesson_id().map(str::to_owned),
            exam_id: target.exam_id(),
            target,
            method,
            check_in_time: now,
            already_checked_in: !inserted,
            similarity,
        })
    }

    /// Tells a student whether a check-in against `token` can succeed before
    /// any biometric capture happens.
    pub async fn validate_session(
        &self,
        caller: &Caller,
        token: &str,
    ) -> Result<SessionValidation, AttendanceError> {
        caller.require_student()?;

        let session = lookup_live(self.db, token, Utc::now()).await?;
        let target = session.target()?;
        self.check_roster(&target, caller.user_id).await?;

        let result =
            attendance_result::Model::find_for_student(self.db, caller.user_id, &session.target_key)
                .await?;
        let present = result.as_ref().is_some_and(attendance_result::Model::is_present);

        let already_logged = session.is_reinforced()
            && attendance_log::Model::exists(self.db, caller.user_id, session.id).await?;

        let blocked = match (session.mode, present) {
            (SessionMode::Standard, true) => Some("You are already marked present for this lesson"),
            (SessionMode::Reinforced, false) => {
                Some("Only students marked present earlier can join this re-verification round")
            }
            (SessionMode::Reinforced, true) if already_logged => {
                Some("You have already re-verified in this session")
            }
            _ => None,
        };

        Ok(match blocked {
            Some(reason) => SessionValidation::Blocked {
                reason: reason.to_owned(),
            },
            None => SessionValidation::Ready {
                requires_face: session.requires_face(),
                session_token: session.token,
                target,
                level: session.level,
                mode: session.mode,
            },
        })
    }

    async fn load_student(&self, caller: &Caller) -> Result<user::Model, AttendanceError> {
        user::Model::find_by_id(self.db, caller.user_id)
            .await?
            .filter(user::Model::is_student)
            .ok_or_else(|| AttendanceError::not_found("Student account not found"))
    }

    fn verify_card(&self, student: &user::Model, presented: Option<&str>) -> Result<(), AttendanceError> {
        let stored = student
            .nfc_id
            .as_deref()
            .map(normalize_nfc)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AttendanceError::invalid_input("No NFC card is registered for this account"))?;

        let presented = presented
            .map(normalize_nfc)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AttendanceError::invalid_input("NFC card data is required"))?;

        if stored != presented {
            return Err(AttendanceError::mismatch(
                "NFC card does not match the registered card",
            ));
        }
        Ok(())
    }

    fn verify_face(&self, student: &user::Model, presented: Option<&[f32]>) -> Result<f32, AttendanceError> {
        let presented = presented
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AttendanceError::invalid_input("Face data is required for this level"))?;

        if !student.face_embedding.is_enrolled() {
            return Err(AttendanceError::invalid_input(
                "Face data is not enrolled for this account",
            ));
        }

        let similarity = cosine_similarity(presented, student.face_embedding.as_slice());
        let threshold = self.policy.face_match_threshold;
        if similarity < threshold {
            return Err(AttendanceError::BiometricMismatch {
                similarity,
                threshold,
            });
        }
        Ok(similarity)
    }

    async fn check_eligibility(
        &self,
        session: &check_in_session::Model,
        target: &SessionTarget,
        student_id: i64,
    ) -> Result<(), AttendanceError> {
        self.check_roster(target, student_id).await?;

        if session.is_reinforced() {
            let present = attendance_result::Model::find_for_student(self.db, student_id, &session.target_key)
                .await?
                .is_some_and(|r| r.is_present());
            if !present {
                return Err(AttendanceError::forbidden(
                    "Only students marked present earlier can join this re-verification round",
                ));
            }
        }
        Ok(())
    }

    /// Exams admit only their roster. Class lessons admit anyone holding the
    /// session token.
    async fn check_roster(&self, target: &SessionTarget, student_id: i64) -> Result<(), AttendanceError> {
        let SessionTarget::Exam { .. } = target else {
            return Ok(());
        };
        let ResolvedTarget::Exam { exam } = ResolvedTarget::resolve(self.db, target).await? else {
            return Ok(());
        };
        if !exam.has_student(self.db, student_id).await? {
            return Err(AttendanceError::forbidden("You are not registered for this exam"));
        }
        Ok(())
    }
}
