//! REST paths, relative to the configured base URL.

pub const AUTH_LOGIN: &str = "/api/Auth/login";
pub const AUTH_REGISTER: &str = "/api/Auth/register";
pub const AUTH_FORGOT_PASSWORD: &str = "/api/Auth/forgot-password";
pub const AUTH_RESET_PASSWORD: &str = "/api/Auth/reset-password";

pub const COURSES: &str = "/api/Course";
pub const COURSES_UPLOAD: &str = "/api/Course/upload";
pub const COURSES_BY_INSTRUCTOR: &str = "/api/Course/instructor";

pub const ASSESSMENTS: &str = "/api/Assessment";
pub const ASSESSMENTS_BY_INSTRUCTOR: &str = "/api/Assessment/instructor";
pub const RESULTS: &str = "/api/Assessment/results";
pub const RESULTS_BY_INSTRUCTOR: &str = "/api/Assessment/results/instructor";
pub const RESULTS_BY_STUDENT: &str = "/api/Assessment/results/student";

pub const FILE_UPLOAD: &str = "/api/File/upload";
pub const FILE_UPLOAD_URL: &str = "/api/File/upload-url";

/// `{base}/{id}` for item and scoped-collection routes.
pub fn item(base: &str, id: &str) -> String {
    format!("{}/{}", base, id)
}
