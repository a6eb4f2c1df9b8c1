pub mod assessment;
pub mod course;
pub mod question;
pub mod result;
pub mod user;

pub use assessment::Assessment;
pub use course::Course;
pub use question::Question;
pub use result::{AssessmentResult, InstructorResultRow};
pub use user::{AuthUser, Role};
