use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::{
    bson::{doc, to_bson},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::{is_duplicate_key_error, Database},
    errors::{AppError, AppResult},
    models::domain::{Enrollment, EnrollmentStatus},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Insert a fresh enrollment; a concurrent duplicate resolves to the
    /// already-enrolled row instead of an error.
    async fn create(&self, enrollment: Enrollment) -> AppResult<Enrollment>;
    async fn find_by_student_and_course(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> AppResult<Option<Enrollment>>;
    /// Set-insert of a completed lecture; marking twice never double counts.
    async fn add_completed_lesson(
        &self,
        student_id: &str,
        course_id: &str,
        lecture_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Enrollment>;
    /// Store a recomputed progress value. Progress only moves forward; a
    /// lower value leaves the stored one in place.
    async fn update_progress(
        &self,
        student_id: &str,
        course_id: &str,
        progress: i16,
        now: DateTime<Utc>,
    ) -> AppResult<Enrollment>;
    async fn mark_completed(
        &self,
        student_id: &str,
        course_id: &str,
        certificate_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Enrollment>;
    async fn delete(&self, student_id: &str, course_id: &str) -> AppResult<()>;
    async fn delete_by_course(&self, course_id: &str) -> AppResult<u64>;
}

pub struct MongoEnrollmentRepository {
    collection: Collection<Enrollment>,
}

impl MongoEnrollmentRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("enrollments");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for enrollments collection");

        let student_course_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "course_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("student_course_unique".to_string())
                    .build(),
            )
            .build();

        let course_index = IndexModel::builder()
            .keys(doc! { "course_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("course_id".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(student_course_index).await?;
        self.collection.create_index(course_index).await?;

        Ok(())
    }

    async fn find_one_and_update(
        &self,
        student_id: &str,
        course_id: &str,
        update: mongodb::bson::Document,
    ) -> AppResult<Enrollment> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection
            .find_one_and_update(
                doc! { "student_id": student_id, "course_id": course_id },
                update,
            )
            .with_options(options)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Enrollment for student '{}' in course '{}' not found",
                    student_id, course_id
                ))
            })
    }
}

#[async_trait]
impl EnrollmentRepository for MongoEnrollmentRepository {
    async fn create(&self, enrollment: Enrollment) -> AppResult<Enrollment> {
        match self.collection.insert_one(&enrollment).await {
            Ok(_) => Ok(enrollment),
            Err(err) if is_duplicate_key_error(&err) => {
                let existing = self
                    .find_by_student_and_course(&enrollment.student_id, &enrollment.course_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::InternalError(
                            "Enrollment vanished after duplicate key".to_string(),
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
    ) -> AppResult<Option<Enrollment>> {
        let enrollment = self
            .collection
            .find_one(doc! { "student_id": student_id, "course_id": course_id })
            .await?;
        Ok(enrollment)
    }

    async fn add_completed_lesson(
        &self,
        student_id: &str,
        course_id: &str,
        lecture_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Enrollment> {
        let update = doc! {
            "$addToSet": { "completed_lesson_ids": lecture_id },
            "$set": { "modified_at": to_bson(&now)? },
        };

        self.find_one_and_update(student_id, course_id, update).await
    }

    async fn update_progress(
        &self,
        student_id: &str,
        course_id: &str,
        progress: i16,
        now: DateTime<Utc>,
    ) -> AppResult<Enrollment> {
        let update = doc! {
            "$max": { "progress": progress as i32 },
            "$set": { "modified_at": to_bson(&now)? },
        };

        self.find_one_and_update(student_id, course_id, update).await
    }

    async fn mark_completed(
        &self,
        student_id: &str,
        course_id: &str,
        certificate_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Enrollment> {
        let update = doc! {
            "$set": {
                "status": to_bson(&EnrollmentStatus::Completed)?,
                "certificate_id": certificate_id,
                "modified_at": to_bson(&now)?,
            },
        };

        self.find_one_and_update(student_id, course_id, update).await
    }

    async fn delete(&self, student_id: &str, course_id: &str) -> AppResult<()> {
        let result = self
            .collection
            .delete_one(doc! { "student_id": student_id, "course_id": course_id })
            .await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Enrollment for student '{}' in course '{}' not found",
                student_id, course_id
            )));
        }

        Ok(())
    }

    async fn delete_by_course(&self, course_id: &str) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "course_id": course_id })
            .await?;
        Ok(result.deleted_count)
    }
}
