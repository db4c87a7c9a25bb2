use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use validator::Validate;

use crate::{
    auth::{utils::require_course_instructor, Claims, UserRole},
    errors::{AppError, AppResult},
    models::{
        domain::{
            Answer, Assignment, AssignmentKind, Course, Submission, SubmissionDraft,
            SubmissionPayload, SubmissionStatus,
        },
        dto::{
            request::SubmitAssignmentRequest,
            response::{QuestionReview, SubmissionReviewResponse},
        },
    },
    repositories::{
        AssignmentRepository, CourseRepository, EnrollmentRepository, SubmissionRepository,
    },
    services::{ProgressService, QuizGrader},
};

static FILE_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://\S+$").expect("FILE_URL_REGEX is a valid regex pattern")
});

pub struct SubmissionService {
    assignment_repository: Arc<dyn AssignmentRepository>,
    course_repository: Arc<dyn CourseRepository>,
    enrollment_repository: Arc<dyn EnrollmentRepository>,
    submission_repository: Arc<dyn SubmissionRepository>,
    progress_service: Arc<ProgressService>,
}

impl SubmissionService {
    pub fn new(
        assignment_repository: Arc<dyn AssignmentRepository>,
        course_repository: Arc<dyn CourseRepository>,
        enrollment_repository: Arc<dyn EnrollmentRepository>,
        submission_repository: Arc<dyn SubmissionRepository>,
        progress_service: Arc<ProgressService>,
    ) -> Self {
        Self {
            assignment_repository,
            course_repository,
            enrollment_repository,
            submission_repository,
            progress_service,
        }
    }

    /// Create or replace the caller's submission for an assignment. One row
    /// per (assignment, student): a resubmission overwrites the payload and
    /// keeps the original `submitted_at`. Quiz submissions are scored and
    /// finalized on the spot; file submissions wait for the instructor.
    /// Due dates do not block: late submissions are accepted and lateness is
    /// left for callers to derive from the timestamps.
    pub async fn submit(
        &self,
        claims: &Claims,
        assignment_id: &str,
        request: SubmitAssignmentRequest,
    ) -> AppResult<Submission> {
        request.validate()?;

        let assignment = self.find_assignment(assignment_id).await?;

        self.enrollment_repository
            .find_by_student_and_course(&claims.sub, &assignment.course_id)
            .await?
            .ok_or_else(|| {
                AppError::Unauthorized("You must be enrolled in this course".to_string())
            })?;

        let now = Utc::now();
        let draft = match assignment.kind {
            AssignmentKind::File => {
                if request.answers.is_some() {
                    return Err(AppError::ValidationError(
                        "File assignments do not accept quiz answers".to_string(),
                    ));
                }

                let file_url = request.file_url.as_deref().ok_or_else(|| {
                    AppError::ValidationError("File assignments require a file_url".to_string())
                })?;

                if !FILE_URL_REGEX.is_match(file_url) {
                    return Err(AppError::ValidationError(
                        "file_url must be a non-empty http(s) URL".to_string(),
                    ));
                }

                SubmissionDraft::file(assignment_id, &claims.sub, file_url, now)
            }
            AssignmentKind::Quiz => {
                if request.file_url.is_some() {
                    return Err(AppError::ValidationError(
                        "Quiz assignments do not accept a file_url".to_string(),
                    ));
                }

                let answers: Vec<Answer> = request
                    .answers
                    .ok_or_else(|| {
                        AppError::ValidationError("Quiz assignments require answers".to_string())
                    })?
                    .into_iter()
                    .map(|a| Answer {
                        question_index: a.question_index,
                        selected_option_index: a.selected_option_index,
                    })
                    .collect();

                let score = QuizGrader::grade(&assignment.questions, &answers);

                SubmissionDraft::quiz(
                    assignment_id,
                    &claims.sub,
                    answers,
                    score.score_percent,
                    score.correct_count,
                    score.total_count,
                    now,
                )
            }
        };

        let submission = self.submission_repository.upsert(draft).await?;

        log::info!(
            "Student {} submitted assignment {} ({:?})",
            claims.sub,
            assignment_id,
            assignment.kind
        );

        // Auto-scored quizzes move the assignment gate immediately; a file
        // submission only counts once the instructor grades it.
        if assignment.kind == AssignmentKind::Quiz {
            self.progress_service
                .recompute(&claims.sub, &assignment.course_id)
                .await?;
        }

        Ok(submission)
    }

    pub async fn get(&self, claims: &Claims, submission_id: &str) -> AppResult<Submission> {
        let submission = self.find_submission(submission_id).await?;
        self.authorize_read(claims, &submission).await?;
        Ok(submission)
    }

    pub async fn list_for_assignment(
        &self,
        claims: &Claims,
        assignment_id: &str,
    ) -> AppResult<Vec<Submission>> {
        let assignment = self.find_assignment(assignment_id).await?;
        let course = self.find_course(&assignment.course_id).await?;
        require_course_instructor(claims, &course)?;

        self.submission_repository
            .list_by_assignment(assignment_id)
            .await
    }

    /// Per-question breakdown of a graded quiz submission. Runs the grader
    /// again against the current answer key, and is the only student-facing
    /// read that reveals correct option indices.
    pub async fn review(
        &self,
        claims: &Claims,
        submission_id: &str,
    ) -> AppResult<SubmissionReviewResponse> {
        let submission = self.get(claims, submission_id).await?;

        if submission.status != SubmissionStatus::Graded {
            return Err(AppError::ValidationError(
                "Submission has not been graded yet".to_string(),
            ));
        }

        let assignment = self.find_assignment(&submission.assignment_id).await?;

        let SubmissionPayload::Quiz { ref answers, .. } = submission.payload else {
            return Err(AppError::ValidationError(
                "Only quiz submissions have a review".to_string(),
            ));
        };

        let score = QuizGrader::grade(&assignment.questions, answers);
        let questions = assignment
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let answer = answers.iter().find(|a| a.question_index == index);
                QuestionReview {
                    question_text: question.question_text.clone(),
                    options: question.options.clone(),
                    correct_option_index: question.correct_option_index,
                    selected_option_index: answer.map(|a| a.selected_option_index),
                    is_correct: QuizGrader::is_answer_correct(question, answer),
                }
            })
            .collect();

        Ok(SubmissionReviewResponse {
            submission_id: submission.id,
            assignment_id: assignment.id,
            score_percent: score.score_percent,
            correct_count: score.correct_count,
            total_count: score.total_count,
            questions,
        })
    }

    /// Hard delete. Students may withdraw their own submission while it is
    /// still pending; after grading only the course instructor or an admin
    /// can remove it.
    pub async fn delete(&self, claims: &Claims, submission_id: &str) -> AppResult<()> {
        let submission = self.find_submission(submission_id).await?;

        let owner_may_delete = claims.sub == submission.student_id
            && submission.status == SubmissionStatus::Pending;

        if !owner_may_delete {
            let assignment = self.find_assignment(&submission.assignment_id).await?;
            let course = self.find_course(&assignment.course_id).await?;
            require_course_instructor(claims, &course)?;
        }

        self.submission_repository.delete(submission_id).await?;

        log::info!("Submission {} deleted by {}", submission_id, claims.sub);
        Ok(())
    }

    async fn authorize_read(&self, claims: &Claims, submission: &Submission) -> AppResult<()> {
        if claims.sub == submission.student_id || claims.role == UserRole::Admin {
            return Ok(());
        }

        let assignment = self.find_assignment(&submission.assignment_id).await?;
        let course = self.find_course(&assignment.course_id).await?;
        require_course_instructor(claims, &course)
    }

    async fn find_assignment(&self, assignment_id: &str) -> AppResult<Assignment> {
        self.assignment_repository
            .find_by_id(assignment_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Assignment with id '{}' not found", assignment_id))
            })
    }

    async fn find_course(&self, course_id: &str) -> AppResult<Course> {
        self.course_repository
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course with id '{}' not found", course_id)))
    }

    async fn find_submission(&self, submission_id: &str) -> AppResult<Submission> {
        self.submission_repository
            .find_by_id(submission_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Submission with id '{}' not found", submission_id))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_url_regex_accepts_http_and_https() {
        assert!(FILE_URL_REGEX.is_match("https://storage.example.com/a.pdf"));
        assert!(FILE_URL_REGEX.is_match("http://storage.example.com/a.pdf"));
    }

    #[test]
    fn file_url_regex_rejects_garbage() {
        assert!(!FILE_URL_REGEX.is_match(""));
        assert!(!FILE_URL_REGEX.is_match("ftp://storage.example.com/a.pdf"));
        assert!(!FILE_URL_REGEX.is_match("https:// with spaces"));
        assert!(!FILE_URL_REGEX.is_match("just-a-name.pdf"));
    }
}
