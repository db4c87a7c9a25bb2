use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{is_duplicate_key_error, Database},
    errors::{AppError, AppResult},
    models::domain::Certificate,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CertificateRepository: Send + Sync {
    /// Atomic insert-if-absent keyed on (student_id, course_id). Losers of a
    /// concurrent race get the winner's certificate back, never a second row.
    async fn insert_if_absent(&self, certificate: Certificate) -> AppResult<Certificate>;
    async fn find_by_student_and_course(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> AppResult<Option<Certificate>>;
    async fn find_by_verification_code(&self, code: &str) -> AppResult<Option<Certificate>>;
}

pub struct MongoCertificateRepository {
    collection: Collection<Certificate>,
}

impl MongoCertificateRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("certificates");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for certificates collection");

        let student_course_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "course_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("student_course_unique".to_string())
                    .build(),
            )
            .build();

        let code_index = IndexModel::builder()
            .keys(doc! { "verification_code": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("verification_code_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(student_course_index).await?;
        self.collection.create_index(code_index).await?;

        Ok(())
    }
}

#[async_trait]
impl CertificateRepository for MongoCertificateRepository {
    async fn insert_if_absent(&self, certificate: Certificate) -> AppResult<Certificate> {
        match self.collection.insert_one(&certificate).await {
            Ok(_) => Ok(certificate),
            Err(err) if is_duplicate_key_error(&err) => {
                let existing = self
                    .find_by_student_and_course(&certificate.student_id, &certificate.course_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::InternalError(
                            "Certificate vanished after duplicate key".to_string(),
                        )
                    })?;
                Ok(existing)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_student_and_course(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> AppResult<Option<Certificate>> {
        let certificate = self
            .collection
            .find_one(doc! { "student_id": student_id, "course_id": course_id })
            .await?;
        Ok(certificate)
    }

    async fn find_by_verification_code(&self, code: &str) -> AppResult<Option<Certificate>> {
        let certificate = self
            .collection
            .find_one(doc! { "verification_code": code })
            .await?;
        Ok(certificate)
    }
}
