pub mod attendance_log;
pub mod attendance_result;
pub mod check_in_session;
pub mod class;
pub mod class_student;
pub mod exam;
pub mod exam_student;
pub mod lesson;
pub mod target;
pub mod user;

pub use attendance_log::Entity as AttendanceLog;
pub use attendance_result::Entity as AttendanceResult;
pub use check_in_session::Entity as CheckInSession;
pub use class::Entity as Class;
pub use exam::Entity as Exam;
pub use lesson::Entity as Lesson;
pub use target::{SessionTarget, TargetKind};
pub use user::Entity as User;
