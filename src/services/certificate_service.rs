use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::Certificate,
    repositories::{CertificateRepository, EnrollmentRepository},
};

pub struct CertificateService {
    enrollment_repository: Arc<dyn EnrollmentRepository>,
    certificate_repository: Arc<dyn CertificateRepository>,
}

impl CertificateService {
    pub fn new(
        enrollment_repository: Arc<dyn EnrollmentRepository>,
        certificate_repository: Arc<dyn CertificateRepository>,
    ) -> Self {
        Self {
            enrollment_repository,
            certificate_repository,
        }
    }

    /// Issue a certificate for a fully completed enrollment. Returns `None`
    /// while the student is not yet eligible; progress recomputation calls
    /// this freely and treats that as a normal outcome. Duplicate triggers
    /// collapse onto the unique (student, course) index, so every caller
    /// gets the same certificate back.
    pub async fn issue_if_eligible(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> AppResult<Option<Certificate>> {
        let Some(enrollment) = self
            .enrollment_repository
            .find_by_student_and_course(student_id, course_id)
            .await?
        else {
            return Ok(None);
        };

        if enrollment.progress < 100 {
            return Ok(None);
        }

        let fresh = Certificate::new(student_id, course_id);
        let issued = self
            .certificate_repository
            .insert_if_absent(fresh.clone())
            .await?;

        if issued.id == fresh.id {
            log::info!(
                "Issued certificate {} for student {} in course {}",
                issued.id,
                student_id,
                course_id
            );
        }

        Ok(Some(issued))
    }

    pub async fn find_for(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> AppResult<Option<Certificate>> {
        self.certificate_repository
            .find_by_student_and_course(student_id, course_id)
            .await
    }

    /// Public lookup backing the shareable certificate URL.
    pub async fn verify(&self, verification_code: &str) -> AppResult<Certificate> {
        self.certificate_repository
            .find_by_verification_code(verification_code)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Certificate with code '{}' not found",
                    verification_code
                ))
            })
    }
}
