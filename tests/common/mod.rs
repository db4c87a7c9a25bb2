#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use aula_server::{
    auth::{Claims, UserRole},
    errors::{AppError, AppResult},
    models::domain::{
        Assignment, Certificate, Course, Enrollment, EnrollmentStatus, Submission,
        SubmissionDraft, SubmissionStatus,
    },
    repositories::{
        AssignmentRepository, CertificateRepository, CourseRepository, EnrollmentRepository,
        SubmissionRepository,
    },
    services::{
        CertificateService, CourseService, GradingService, ProgressService, SubmissionService,
    },
};

pub fn claims(user_id: &str, role: UserRole) -> Claims {
    Claims {
        sub: user_id.to_string(),
        role,
        iat: 0,
        exp: 9999999999,
    }
}

pub fn student(user_id: &str) -> Claims {
    claims(user_id, UserRole::Student)
}

pub fn instructor(user_id: &str) -> Claims {
    claims(user_id, UserRole::Instructor)
}

pub struct InMemoryCourseRepository {
    courses: Arc<RwLock<HashMap<String, Course>>>,
}

impl InMemoryCourseRepository {
    pub fn new() -> Self {
        Self {
            courses: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn create(&self, course: Course) -> AppResult<Course> {
        let mut courses = self.courses.write().await;
        if courses.contains_key(&course.id) {
            return Err(AppError::AlreadyExists(format!(
                "Course with id '{}' already exists",
                course.id
            )));
        }
        courses.insert(course.id.clone(), course.clone());
        Ok(course)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Course>> {
        let courses = self.courses.read().await;
        Ok(courses.get(id).cloned())
    }

    async fn list_by_instructor(&self, instructor_id: &str) -> AppResult<Vec<Course>> {
        let courses = self.courses.read().await;
        let mut items: Vec<_> = courses
            .values()
            .filter(|c| c.instructor_id == instructor_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(items)
    }

    async fn update(&self, course: Course) -> AppResult<Course> {
        let mut courses = self.courses.write().await;
        if !courses.contains_key(&course.id) {
            return Err(AppError::NotFound(format!(
                "Course with id '{}' not found",
                course.id
            )));
        }
        courses.insert(course.id.clone(), course.clone());
        Ok(course)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut courses = self.courses.write().await;
        if courses.remove(id).is_none() {
            return Err(AppError::NotFound(format!(
                "Course with id '{}' not found",
                id
            )));
        }
        Ok(())
    }
}

pub struct InMemoryAssignmentRepository {
    assignments: Arc<RwLock<HashMap<String, Assignment>>>,
}

impl InMemoryAssignmentRepository {
    pub fn new() -> Self {
        Self {
            assignments: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryAssignmentRepository {
    async fn create(&self, assignment: Assignment) -> AppResult<Assignment> {
        let mut assignments = self.assignments.write().await;
        if assignments.contains_key(&assignment.id) {
            return Err(AppError::AlreadyExists(format!(
                "Assignment with id '{}' already exists",
                assignment.id
            )));
        }
        assignments.insert(assignment.id.clone(), assignment.clone());
        Ok(assignment)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Assignment>> {
        let assignments = self.assignments.read().await;
        Ok(assignments.get(id).cloned())
    }

    async fn find_by_course(&self, course_id: &str) -> AppResult<Vec<Assignment>> {
        let assignments = self.assignments.read().await;
        let mut items: Vec<_> = assignments
            .values()
            .filter(|a| a.course_id == course_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(items)
    }

    async fn update(&self, assignment: Assignment) -> AppResult<Assignment> {
        let mut assignments = self.assignments.write().await;
        if !assignments.contains_key(&assignment.id) {
            return Err(AppError::NotFound(format!(
                "Assignment with id '{}' not found",
                assignment.id
            )));
        }
        assignments.insert(assignment.id.clone(), assignment.clone());
        Ok(assignment)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut assignments = self.assignments.write().await;
        if assignments.remove(id).is_none() {
            return Err(AppError::NotFound(format!(
                "Assignment with id '{}' not found",
                id
            )));
        }
        Ok(())
    }

    async fn delete_by_course(&self, course_id: &str) -> AppResult<u64> {
        let mut assignments = self.assignments.write().await;
        let before = assignments.len();
        assignments.retain(|_, a| a.course_id != course_id);
        Ok((before - assignments.len()) as u64)
    }
}

pub struct InMemorySubmissionRepository {
    submissions: Arc<RwLock<HashMap<String, Submission>>>,
}

impl InMemorySubmissionRepository {
    pub fn new() -> Self {
        Self {
            submissions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn count(&self) -> usize {
        self.submissions.read().await.len()
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepository {
    async fn upsert(&self, draft: SubmissionDraft) -> AppResult<Submission> {
        let mut submissions = self.submissions.write().await;

        let existing = submissions
            .values()
            .find(|s| s.assignment_id == draft.assignment_id && s.student_id == draft.student_id)
            .cloned();

        let submission = match existing {
            Some(previous) => Submission {
                id: previous.id,
                assignment_id: previous.assignment_id,
                student_id: previous.student_id,
                status: draft.status,
                payload: draft.payload,
                grade: draft.grade,
                feedback: None,
                graded_at: draft.graded_at,
                submitted_at: previous.submitted_at,
                updated_at: draft.submitted_at,
            },
            None => Submission {
                id: draft.id,
                assignment_id: draft.assignment_id,
                student_id: draft.student_id,
                status: draft.status,
                payload: draft.payload,
                grade: draft.grade,
                feedback: None,
                graded_at: draft.graded_at,
                submitted_at: draft.submitted_at,
                updated_at: draft.submitted_at,
            },
        };

        submissions.insert(submission.id.clone(), submission.clone());
        Ok(submission)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Submission>> {
        let submissions = self.submissions.read().await;
        Ok(submissions.get(id).cloned())
    }

    async fn find_by_assignment_and_student(
        &self,
        assignment_id: &str,
        student_id: &str,
    ) -> AppResult<Option<Submission>> {
        let submissions = self.submissions.read().await;
        Ok(submissions
            .values()
            .find(|s| s.assignment_id == assignment_id && s.student_id == student_id)
            .cloned())
    }

    async fn list_by_assignment(&self, assignment_id: &str) -> AppResult<Vec<Submission>> {
        let submissions = self.submissions.read().await;
        let mut items: Vec<_> = submissions
            .values()
            .filter(|s| s.assignment_id == assignment_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(items)
    }

    async fn find_for_student(
        &self,
        student_id: &str,
        assignment_ids: &[String],
    ) -> AppResult<Vec<Submission>> {
        let submissions = self.submissions.read().await;
        Ok(submissions
            .values()
            .filter(|s| s.student_id == student_id && assignment_ids.contains(&s.assignment_id))
            .cloned()
            .collect())
    }

    async fn apply_grade(
        &self,
        id: &str,
        grade: i16,
        feedback: &str,
        graded_at: DateTime<Utc>,
    ) -> AppResult<Submission> {
        let mut submissions = self.submissions.write().await;
        let submission = submissions
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Submission with id '{}' not found", id)))?;

        submission.status = SubmissionStatus::Graded;
        submission.grade = Some(grade);
        submission.feedback = Some(feedback.to_string());
        submission.graded_at = Some(graded_at);
        submission.updated_at = graded_at;

        Ok(submission.clone())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut submissions = self.submissions.write().await;
        if submissions.remove(id).is_none() {
            return Err(AppError::NotFound(format!(
                "Submission with id '{}' not found",
                id
            )));
        }
        Ok(())
    }

    async fn delete_by_assignments(&self, assignment_ids: &[String]) -> AppResult<u64> {
        let mut submissions = self.submissions.write().await;
        let before = submissions.len();
        submissions.retain(|_, s| !assignment_ids.contains(&s.assignment_id));
        Ok((before - submissions.len()) as u64)
    }
}

pub struct InMemoryEnrollmentRepository {
    enrollments: Arc<RwLock<HashMap<(String, String), Enrollment>>>,
}

impl InMemoryEnrollmentRepository {
    pub fn new() -> Self {
        Self {
            enrollments: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn key(student_id: &str, course_id: &str) -> (String, String) {
        (student_id.to_string(), course_id.to_string())
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryEnrollmentRepository {
    async fn create(&self, enrollment: Enrollment) -> AppResult<Enrollment> {
        let mut enrollments = self.enrollments.write().await;
        let key = Self::key(&enrollment.student_id, &enrollment.course_id);

        if let Some(existing) = enrollments.get(&key) {
            return Ok(existing.clone());
        }

        enrollments.insert(key, enrollment.clone());
        Ok(enrollment)
    }

    async fn find_by_student_and_course(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> AppResult<Option<Enrollment>> {
        let enrollments = self.enrollments.read().await;
        Ok(enrollments.get(&Self::key(student_id, course_id)).cloned())
    }

    async fn add_completed_lesson(
        &self,
        student_id: &str,
        course_id: &str,
        lecture_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Enrollment> {
        let mut enrollments = self.enrollments.write().await;
        let enrollment = enrollments
            .get_mut(&Self::key(student_id, course_id))
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Enrollment for student '{}' in course '{}' not found",
                    student_id, course_id
                ))
            })?;

        if !enrollment.completed_lesson_ids.iter().any(|id| id == lecture_id) {
            enrollment.completed_lesson_ids.push(lecture_id.to_string());
        }
        enrollment.modified_at = Some(now);

        Ok(enrollment.clone())
    }

    async fn update_progress(
        &self,
        student_id: &str,
        course_id: &str,
        progress: i16,
        now: DateTime<Utc>,
    ) -> AppResult<Enrollment> {
        let mut enrollments = self.enrollments.write().await;
        let enrollment = enrollments
            .get_mut(&Self::key(student_id, course_id))
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Enrollment for student '{}' in course '{}' not found",
                    student_id, course_id
                ))
            })?;

        enrollment.progress = enrollment.progress.max(progress);
        enrollment.modified_at = Some(now);

        Ok(enrollment.clone())
    }

    async fn mark_completed(
        &self,
        student_id: &str,
        course_id: &str,
        certificate_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Enrollment> {
        let mut enrollments = self.enrollments.write().await;
        let enrollment = enrollments
            .get_mut(&Self::key(student_id, course_id))
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Enrollment for student '{}' in course '{}' not found",
                    student_id, course_id
                ))
            })?;

        enrollment.status = EnrollmentStatus::Completed;
        enrollment.certificate_id = Some(certificate_id.to_string());
        enrollment.modified_at = Some(now);

        Ok(enrollment.clone())
    }

    async fn delete(&self, student_id: &str, course_id: &str) -> AppResult<()> {
        let mut enrollments = self.enrollments.write().await;
        if enrollments.remove(&Self::key(student_id, course_id)).is_none() {
            return Err(AppError::NotFound(format!(
                "Enrollment for student '{}' in course '{}' not found",
                student_id, course_id
            )));
        }
        Ok(())
    }

    async fn delete_by_course(&self, course_id: &str) -> AppResult<u64> {
        let mut enrollments = self.enrollments.write().await;
        let before = enrollments.len();
        enrollments.retain(|_, e| e.course_id != course_id);
        Ok((before - enrollments.len()) as u64)
    }
}

pub struct InMemoryCertificateRepository {
    certificates: Arc<RwLock<HashMap<(String, String), Certificate>>>,
}

impl InMemoryCertificateRepository {
    pub fn new() -> Self {
        Self {
            certificates: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn count(&self) -> usize {
        self.certificates.read().await.len()
    }
}

#[async_trait]
impl CertificateRepository for InMemoryCertificateRepository {
    async fn insert_if_absent(&self, certificate: Certificate) -> AppResult<Certificate> {
        // The write lock makes check-then-insert atomic, mirroring the
        // unique (student_id, course_id) index in the real store.
        let mut certificates = self.certificates.write().await;
        let key = (
            certificate.student_id.clone(),
            certificate.course_id.clone(),
        );

        if let Some(existing) = certificates.get(&key) {
            return Ok(existing.clone());
        }

        certificates.insert(key, certificate.clone());
        Ok(certificate)
    }

    async fn find_by_student_and_course(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> AppResult<Option<Certificate>> {
        let certificates = self.certificates.read().await;
        Ok(certificates
            .get(&(student_id.to_string(), course_id.to_string()))
            .cloned())
    }

    async fn find_by_verification_code(&self, code: &str) -> AppResult<Option<Certificate>> {
        let certificates = self.certificates.read().await;
        Ok(certificates
            .values()
            .find(|c| c.verification_code == code)
            .cloned())
    }
}

/// The whole service stack wired against in-memory repositories.
pub struct TestPlatform {
    pub submissions: Arc<InMemorySubmissionRepository>,
    pub certificates: Arc<InMemoryCertificateRepository>,
    pub enrollments: Arc<InMemoryEnrollmentRepository>,
    pub course_service: CourseService,
    pub submission_service: SubmissionService,
    pub grading_service: GradingService,
    pub progress_service: Arc<ProgressService>,
    pub certificate_service: Arc<CertificateService>,
}

impl TestPlatform {
    pub fn new() -> Self {
        Self::with_pending_submissions_counting(false)
    }

    pub fn with_pending_submissions_counting(count_pending_submissions: bool) -> Self {
        let courses = Arc::new(InMemoryCourseRepository::new());
        let assignments = Arc::new(InMemoryAssignmentRepository::new());
        let submissions = Arc::new(InMemorySubmissionRepository::new());
        let enrollments = Arc::new(InMemoryEnrollmentRepository::new());
        let certificates = Arc::new(InMemoryCertificateRepository::new());

        let certificate_service = Arc::new(CertificateService::new(
            enrollments.clone(),
            certificates.clone(),
        ));

        let progress_service = Arc::new(ProgressService::new(
            courses.clone(),
            assignments.clone(),
            submissions.clone(),
            enrollments.clone(),
            certificate_service.clone(),
            count_pending_submissions,
        ));

        let submission_service = SubmissionService::new(
            assignments.clone(),
            courses.clone(),
            enrollments.clone(),
            submissions.clone(),
            progress_service.clone(),
        );

        let grading_service = GradingService::new(
            submissions.clone(),
            assignments.clone(),
            courses.clone(),
            progress_service.clone(),
        );

        let course_service = CourseService::new(
            courses.clone(),
            assignments.clone(),
            submissions.clone(),
            enrollments.clone(),
        );

        Self {
            submissions,
            certificates,
            enrollments,
            course_service,
            submission_service,
            grading_service,
            progress_service,
            certificate_service,
        }
    }
}
