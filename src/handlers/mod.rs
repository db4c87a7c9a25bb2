pub mod certificate_handler;
pub mod course_handler;
pub mod enrollment_handler;
pub mod health_handler;
pub mod submission_handler;
