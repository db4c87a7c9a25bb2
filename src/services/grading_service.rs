use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    auth::{utils::require_course_instructor, Claims},
    errors::{AppError, AppResult},
    models::{domain::Submission, dto::request::GradeSubmissionRequest},
    repositories::{AssignmentRepository, CourseRepository, SubmissionRepository},
    services::ProgressService,
};

pub struct GradingService {
    submission_repository: Arc<dyn SubmissionRepository>,
    assignment_repository: Arc<dyn AssignmentRepository>,
    course_repository: Arc<dyn CourseRepository>,
    progress_service: Arc<ProgressService>,
}

impl GradingService {
    pub fn new(
        submission_repository: Arc<dyn SubmissionRepository>,
        assignment_repository: Arc<dyn AssignmentRepository>,
        course_repository: Arc<dyn CourseRepository>,
        progress_service: Arc<ProgressService>,
    ) -> Self {
        Self {
            submission_repository,
            assignment_repository,
            course_repository,
            progress_service,
        }
    }

    /// Attach a grade and feedback to a submission and finalize it.
    /// Re-grading simply overwrites the previous grade; no history is kept.
    /// For quizzes this overrides the auto-score, which is advisory.
    pub async fn grade(
        &self,
        claims: &Claims,
        submission_id: &str,
        request: GradeSubmissionRequest,
    ) -> AppResult<Submission> {
        request.validate()?;

        let submission = self
            .submission_repository
            .find_by_id(submission_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Submission with id '{}' not found", submission_id))
            })?;

        let assignment = self
            .assignment_repository
            .find_by_id(&submission.assignment_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Assignment with id '{}' not found",
                    submission.assignment_id
                ))
            })?;

        let course = self
            .course_repository
            .find_by_id(&assignment.course_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Course with id '{}' not found",
                    assignment.course_id
                ))
            })?;

        require_course_instructor(claims, &course)?;

        let graded = self
            .submission_repository
            .apply_grade(submission_id, request.grade, &request.feedback, Utc::now())
            .await?;

        log::info!(
            "Submission {} graded {} by {}",
            submission_id,
            request.grade,
            claims.sub
        );

        self.progress_service
            .recompute(&graded.student_id, &course.id)
            .await?;

        Ok(graded)
    }
}
