pub mod certificate_service;
pub mod course_service;
pub mod grading_service;
pub mod progress_service;
pub mod quiz_grader;
pub mod submission_service;

pub use certificate_service::CertificateService;
pub use course_service::CourseService;
pub use grading_service::GradingService;
pub use progress_service::ProgressService;
pub use quiz_grader::{QuizGrader, QuizScore};
pub use submission_service::SubmissionService;
