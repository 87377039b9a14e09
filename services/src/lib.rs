//! Attendance verification and reconciliation engine.
//!
//! Check-in sessions are opened by teachers through [`session_store`],
//! students check in through [`verification`], and [`reconciliation`]
//! maintains the one authoritative result per student and lesson or exam.
//! [`report`] and [`history`] are the read side.

pub mod biometrics;
pub mod error;
pub mod history;
pub mod identity;
pub mod reconciliation;
pub mod report;
pub mod session_store;
pub mod targets;
pub mod verification;

pub use error::AttendanceError;
pub use identity::Caller;
