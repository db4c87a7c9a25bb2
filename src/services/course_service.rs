use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    auth::{
        utils::{require_course_instructor, require_instructor},
        Claims, UserRole,
    },
    errors::{AppError, AppResult},
    models::{
        domain::{Assignment, AssignmentKind, Course, CourseStatus, Enrollment, Lecture, Question},
        dto::{
            request::{
                CreateAssignmentRequest, CreateCourseRequest, CreateLectureRequest,
                QuestionInput, UpdateAssignmentRequest, UpdateCourseRequest,
            },
            response::AssignmentResponse,
        },
    },
    repositories::{
        AssignmentRepository, CourseRepository, EnrollmentRepository, SubmissionRepository,
    },
};

pub struct CourseService {
    course_repository: Arc<dyn CourseRepository>,
    assignment_repository: Arc<dyn AssignmentRepository>,
    submission_repository: Arc<dyn SubmissionRepository>,
    enrollment_repository: Arc<dyn EnrollmentRepository>,
}

impl CourseService {
    pub fn new(
        course_repository: Arc<dyn CourseRepository>,
        assignment_repository: Arc<dyn AssignmentRepository>,
        submission_repository: Arc<dyn SubmissionRepository>,
        enrollment_repository: Arc<dyn EnrollmentRepository>,
    ) -> Self {
        Self {
            course_repository,
            assignment_repository,
            submission_repository,
            enrollment_repository,
        }
    }

    pub async fn create_course(
        &self,
        claims: &Claims,
        request: CreateCourseRequest,
    ) -> AppResult<Course> {
        require_instructor(claims)?;
        request.validate()?;

        let course = Course::new_draft(&request.title, &claims.sub);
        self.course_repository.create(course).await
    }

    pub async fn get_course(&self, claims: &Claims, course_id: &str) -> AppResult<Course> {
        let course = self.find_course(course_id).await?;

        // Drafts are only visible to their owner; published and archived
        // courses are readable by anyone authenticated.
        if course.status == CourseStatus::Draft {
            require_course_instructor(claims, &course)?;
        }

        Ok(course)
    }

    pub async fn list_courses_by_instructor(
        &self,
        instructor_id: &str,
    ) -> AppResult<Vec<Course>> {
        self.course_repository.list_by_instructor(instructor_id).await
    }

    pub async fn update_course(
        &self,
        claims: &Claims,
        course_id: &str,
        request: UpdateCourseRequest,
    ) -> AppResult<Course> {
        request.validate()?;

        let mut course = self.find_course(course_id).await?;
        require_course_instructor(claims, &course)?;

        if let Some(title) = request.title {
            course.title = title;
        }
        if let Some(status) = request.status {
            course.status = status;
        }
        if let Some(completion_status) = request.completion_status {
            course.completion_status = completion_status;
        }
        course.modified_at = Some(Utc::now());

        self.course_repository.update(course).await
    }

    /// Delete a course and everything hanging off it: assignments, their
    /// submissions, and all enrollments. No orphans survive.
    pub async fn delete_course(&self, claims: &Claims, course_id: &str) -> AppResult<()> {
        let course = self.find_course(course_id).await?;
        require_course_instructor(claims, &course)?;

        let assignments = self.assignment_repository.find_by_course(course_id).await?;
        let assignment_ids: Vec<String> = assignments.iter().map(|a| a.id.clone()).collect();

        let submissions_removed = self
            .submission_repository
            .delete_by_assignments(&assignment_ids)
            .await?;
        let assignments_removed = self
            .assignment_repository
            .delete_by_course(course_id)
            .await?;
        let enrollments_removed = self
            .enrollment_repository
            .delete_by_course(course_id)
            .await?;
        self.course_repository.delete(course_id).await?;

        log::info!(
            "Deleted course {} ({} assignments, {} submissions, {} enrollments)",
            course_id,
            assignments_removed,
            submissions_removed,
            enrollments_removed
        );

        Ok(())
    }

    pub async fn add_lecture(
        &self,
        claims: &Claims,
        course_id: &str,
        request: CreateLectureRequest,
    ) -> AppResult<Course> {
        request.validate()?;

        let mut course = self.find_course(course_id).await?;
        require_course_instructor(claims, &course)?;

        let lecture = Lecture::new(course.next_lecture_order(), &request.title, &request.video_url);
        course.lectures.push(lecture);
        course.modified_at = Some(Utc::now());

        self.course_repository.update(course).await
    }

    pub async fn create_assignment(
        &self,
        claims: &Claims,
        course_id: &str,
        request: CreateAssignmentRequest,
    ) -> AppResult<Assignment> {
        request.validate()?;

        let course = self.find_course(course_id).await?;
        require_course_instructor(claims, &course)?;

        let questions = match request.kind {
            AssignmentKind::Quiz => build_questions(request.questions.unwrap_or_default())?,
            AssignmentKind::File => {
                if request.questions.is_some() {
                    return Err(AppError::ValidationError(
                        "File assignments do not take questions".to_string(),
                    ));
                }
                Vec::new()
            }
        };

        let assignment = Assignment::new(course_id, request.kind, request.due_date, questions);
        self.assignment_repository.create(assignment).await
    }

    /// Edit an assignment's due date or, for quizzes, its question list. The
    /// answer key is authoritative only here; existing submissions keep their
    /// stored scores and are never re-scored implicitly.
    pub async fn update_assignment(
        &self,
        claims: &Claims,
        assignment_id: &str,
        request: UpdateAssignmentRequest,
    ) -> AppResult<Assignment> {
        request.validate()?;

        let mut assignment = self.find_assignment(assignment_id).await?;
        let course = self.find_course(&assignment.course_id).await?;
        require_course_instructor(claims, &course)?;

        if let Some(due_date) = request.due_date {
            assignment.due_date = due_date;
        }
        if let Some(inputs) = request.questions {
            if assignment.kind != AssignmentKind::Quiz {
                return Err(AppError::ValidationError(
                    "File assignments do not take questions".to_string(),
                ));
            }
            assignment.questions = build_questions(inputs)?;
        }
        assignment.modified_at = Some(Utc::now());

        self.assignment_repository.update(assignment).await
    }

    /// Read an assignment, revealing the answer key only to the owning
    /// instructor or an admin.
    pub async fn get_assignment(
        &self,
        claims: &Claims,
        assignment_id: &str,
    ) -> AppResult<AssignmentResponse> {
        let assignment = self.find_assignment(assignment_id).await?;
        let course = self.find_course(&assignment.course_id).await?;

        let reveal_answer_key = require_course_instructor(claims, &course).is_ok();

        Ok(AssignmentResponse::from_assignment(assignment, reveal_answer_key))
    }

    /// Delete an assignment and, with it, every submission made against it.
    pub async fn delete_assignment(&self, claims: &Claims, assignment_id: &str) -> AppResult<()> {
        let assignment = self.find_assignment(assignment_id).await?;
        let course = self.find_course(&assignment.course_id).await?;
        require_course_instructor(claims, &course)?;

        let submissions_removed = self
            .submission_repository
            .delete_by_assignments(std::slice::from_ref(&assignment.id))
            .await?;
        self.assignment_repository.delete(assignment_id).await?;

        log::info!(
            "Deleted assignment {} and {} submissions",
            assignment_id,
            submissions_removed
        );

        Ok(())
    }

    pub async fn enroll(&self, claims: &Claims, course_id: &str) -> AppResult<Enrollment> {
        if claims.role != UserRole::Student {
            return Err(AppError::Unauthorized(
                "Only students can enroll in courses".to_string(),
            ));
        }

        let course = self.find_course(course_id).await?;
        if course.status != CourseStatus::Published {
            return Err(AppError::ValidationError(
                "Course is not open for enrollment".to_string(),
            ));
        }

        let enrollment = Enrollment::new(&claims.sub, course_id);
        self.enrollment_repository.create(enrollment).await
    }

    pub async fn unenroll(&self, claims: &Claims, course_id: &str) -> AppResult<()> {
        self.enrollment_repository
            .delete(&claims.sub, course_id)
            .await
    }

    async fn find_course(&self, course_id: &str) -> AppResult<Course> {
        self.course_repository
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course with id '{}' not found", course_id)))
    }

    async fn find_assignment(&self, assignment_id: &str) -> AppResult<Assignment> {
        self.assignment_repository
            .find_by_id(assignment_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Assignment with id '{}' not found", assignment_id))
            })
    }
}

fn build_questions(inputs: Vec<QuestionInput>) -> AppResult<Vec<Question>> {
    if inputs.is_empty() {
        return Err(AppError::ValidationError(
            "Quiz assignments require at least one question".to_string(),
        ));
    }

    inputs
        .into_iter()
        .map(|q| {
            if q.correct_option_index >= q.options.len() {
                return Err(AppError::ValidationError(format!(
                    "correct_option_index {} is out of range for {} options",
                    q.correct_option_index,
                    q.options.len()
                )));
            }
            Ok(Question {
                question_text: q.question_text,
                options: q.options,
                correct_option_index: q.correct_option_index,
            })
        })
        .collect()
}
