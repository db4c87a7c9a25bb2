use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::{Certificate, Course, Enrollment},
    repositories::{
        AssignmentRepository, CourseRepository, EnrollmentRepository, SubmissionRepository,
    },
    services::CertificateService,
};

/// What a recomputation settles on for one (student, course) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
    pub progress: i16,
    pub completed_lesson_ids: Vec<String>,
}

pub struct ProgressService {
    course_repository: Arc<dyn CourseRepository>,
    assignment_repository: Arc<dyn AssignmentRepository>,
    submission_repository: Arc<dyn SubmissionRepository>,
    enrollment_repository: Arc<dyn EnrollmentRepository>,
    certificate_service: Arc<CertificateService>,
    count_pending_submissions: bool,
}

impl ProgressService {
    pub fn new(
        course_repository: Arc<dyn CourseRepository>,
        assignment_repository: Arc<dyn AssignmentRepository>,
        submission_repository: Arc<dyn SubmissionRepository>,
        enrollment_repository: Arc<dyn EnrollmentRepository>,
        certificate_service: Arc<CertificateService>,
        count_pending_submissions: bool,
    ) -> Self {
        Self {
            course_repository,
            assignment_repository,
            submission_repository,
            enrollment_repository,
            certificate_service,
            count_pending_submissions,
        }
    }

    /// Record a finished lecture for the calling student, then recompute.
    /// Safe to call repeatedly for the same lecture.
    pub async fn complete_lecture(
        &self,
        claims: &Claims,
        course_id: &str,
        lecture_id: &str,
    ) -> AppResult<ProgressSnapshot> {
        let course = self.find_course(course_id).await?;

        if !course.has_lecture(lecture_id) {
            return Err(AppError::NotFound(format!(
                "Lecture with id '{}' not found in course '{}'",
                lecture_id, course_id
            )));
        }

        self.enrollment_repository
            .find_by_student_and_course(&claims.sub, course_id)
            .await?
            .ok_or_else(|| {
                AppError::Unauthorized("You must be enrolled in this course".to_string())
            })?;

        self.enrollment_repository
            .add_completed_lesson(&claims.sub, course_id, lecture_id, Utc::now())
            .await?;

        self.recompute(&claims.sub, course_id).await
    }

    /// Recompute progress from the current completed-lecture set and the
    /// student's submissions. Idempotent: with unchanged inputs, repeated
    /// calls settle on the same value. On reaching 100 the certificate
    /// issuer runs; its unique index absorbs concurrent triggers.
    pub async fn recompute(&self, student_id: &str, course_id: &str) -> AppResult<ProgressSnapshot> {
        let course = self.find_course(course_id).await?;
        let enrollment = self.find_enrollment(student_id, course_id).await?;

        let assignments = self.assignment_repository.find_by_course(course_id).await?;
        let assignment_ids: Vec<String> = assignments.iter().map(|a| a.id.clone()).collect();
        let submissions = self
            .submission_repository
            .find_for_student(student_id, &assignment_ids)
            .await?;

        let assignments_satisfied = assignments.iter().all(|assignment| {
            submissions.iter().any(|submission| {
                submission.assignment_id == assignment.id
                    && (self.count_pending_submissions || submission.is_graded())
            })
        });

        // Only lectures that still exist in the course count toward the
        // numerator; stale ids from removed lectures are ignored.
        let completed_lectures = enrollment
            .completed_lesson_ids
            .iter()
            .filter(|id| course.has_lecture(id))
            .count();

        let progress = compute_progress(
            course.lecture_count(),
            completed_lectures,
            assignments_satisfied,
        );

        let updated = self
            .enrollment_repository
            .update_progress(student_id, course_id, progress, Utc::now())
            .await?;

        if updated.progress >= 100 {
            if let Some(certificate) = self
                .certificate_service
                .issue_if_eligible(student_id, course_id)
                .await?
            {
                if updated.certificate_id.is_none() {
                    let completed = self
                        .enrollment_repository
                        .mark_completed(student_id, course_id, &certificate.id, Utc::now())
                        .await?;
                    return Ok(snapshot(completed));
                }
            }
        }

        Ok(snapshot(updated))
    }

    pub async fn get_progress(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> AppResult<(Enrollment, Option<Certificate>)> {
        let enrollment = self.find_enrollment(student_id, course_id).await?;
        let certificate = self
            .certificate_service
            .find_for(student_id, course_id)
            .await?;
        Ok((enrollment, certificate))
    }

    async fn find_course(&self, course_id: &str) -> AppResult<Course> {
        self.course_repository
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course with id '{}' not found", course_id)))
    }

    async fn find_enrollment(&self, student_id: &str, course_id: &str) -> AppResult<Enrollment> {
        self.enrollment_repository
            .find_by_student_and_course(student_id, course_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Enrollment for student '{}' in course '{}' not found",
                    student_id, course_id
                ))
            })
    }
}

fn snapshot(enrollment: Enrollment) -> ProgressSnapshot {
    ProgressSnapshot {
        progress: enrollment.progress,
        completed_lesson_ids: enrollment.completed_lesson_ids,
    }
}

/// Lecture percentage capped at 99 until every completion gate holds.
/// 99 is the canonical "all lectures watched, assignments still pending"
/// value; true 100 only appears when the assignment gate is satisfied too.
pub(crate) fn compute_progress(
    total_lectures: usize,
    completed_lectures: usize,
    assignments_satisfied: bool,
) -> i16 {
    if total_lectures == 0 {
        return 0;
    }

    if completed_lectures >= total_lectures && assignments_satisfied {
        return 100;
    }

    let percent = (100.0 * completed_lectures as f64 / total_lectures as f64).round() as i16;
    percent.min(99)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_course_has_zero_progress() {
        assert_eq!(compute_progress(0, 0, true), 0);
    }

    #[test]
    fn half_of_the_lectures_is_fifty_percent() {
        assert_eq!(compute_progress(2, 1, true), 50);
    }

    #[test]
    fn full_completion_requires_both_gates() {
        assert_eq!(compute_progress(2, 2, true), 100);
        assert_eq!(compute_progress(2, 2, false), 99);
    }

    #[test]
    fn rounding_never_fakes_completion() {
        // 199/200 rounds to 99.5 -> 100, which must still be capped.
        assert_eq!(compute_progress(200, 199, true), 99);
        assert_eq!(compute_progress(3, 1, true), 33);
    }

    #[test]
    fn progress_is_bounded() {
        for completed in 0..=5 {
            for satisfied in [true, false] {
                let progress = compute_progress(5, completed, satisfied);
                assert!((0..=100).contains(&progress));
            }
        }
    }
}
