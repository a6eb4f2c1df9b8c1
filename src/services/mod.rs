pub mod assessment_service;
pub mod auth_service;
pub mod course_service;
pub mod endpoints;
pub mod file_service;
pub mod result_service;
pub mod scoring;
