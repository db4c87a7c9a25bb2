use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoAssignmentRepository, MongoCertificateRepository, MongoCourseRepository,
        MongoEnrollmentRepository, MongoSubmissionRepository,
    },
    services::{
        CertificateService, CourseService, GradingService, ProgressService, SubmissionService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub course_service: Arc<CourseService>,
    pub submission_service: Arc<SubmissionService>,
    pub grading_service: Arc<GradingService>,
    pub progress_service: Arc<ProgressService>,
    pub certificate_service: Arc<CertificateService>,
    pub config: Arc<Config>,
    pub db: Database,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let course_repository = Arc::new(MongoCourseRepository::new(&db));
        course_repository.ensure_indexes().await?;

        let assignment_repository = Arc::new(MongoAssignmentRepository::new(&db));
        assignment_repository.ensure_indexes().await?;

        let submission_repository = Arc::new(MongoSubmissionRepository::new(&db));
        submission_repository.ensure_indexes().await?;

        let enrollment_repository = Arc::new(MongoEnrollmentRepository::new(&db));
        enrollment_repository.ensure_indexes().await?;

        let certificate_repository = Arc::new(MongoCertificateRepository::new(&db));
        certificate_repository.ensure_indexes().await?;

        let certificate_service = Arc::new(CertificateService::new(
            enrollment_repository.clone(),
            certificate_repository.clone(),
        ));

        let progress_service = Arc::new(ProgressService::new(
            course_repository.clone(),
            assignment_repository.clone(),
            submission_repository.clone(),
            enrollment_repository.clone(),
            certificate_service.clone(),
            config.progress_counts_pending_submissions,
        ));

        let submission_service = Arc::new(SubmissionService::new(
            assignment_repository.clone(),
            course_repository.clone(),
            enrollment_repository.clone(),
            submission_repository.clone(),
            progress_service.clone(),
        ));

        let grading_service = Arc::new(GradingService::new(
            submission_repository.clone(),
            assignment_repository.clone(),
            course_repository.clone(),
            progress_service.clone(),
        ));

        let course_service = Arc::new(CourseService::new(
            course_repository,
            assignment_repository,
            submission_repository,
            enrollment_repository,
        ));

        Ok(Self {
            course_service,
            submission_service,
            grading_service,
            progress_service,
            certificate_service,
            config: Arc::new(config),
            db,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
