use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, Bson},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{Submission, SubmissionDraft, SubmissionStatus},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Create-or-replace keyed on (assignment_id, student_id). A resubmission
    /// keeps the original `submitted_at` and id; everything else is replaced.
    async fn upsert(&self, draft: SubmissionDraft) -> AppResult<Submission>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Submission>>;
    async fn find_by_assignment_and_student(
        &self,
        assignment_id: &str,
        student_id: &str,
    ) -> AppResult<Option<Submission>>;
    async fn list_by_assignment(&self, assignment_id: &str) -> AppResult<Vec<Submission>>;
    async fn find_for_student(
        &self,
        student_id: &str,
        assignment_ids: &[String],
    ) -> AppResult<Vec<Submission>>;
    async fn apply_grade(
        &self,
        id: &str,
        grade: i16,
        feedback: &str,
        graded_at: DateTime<Utc>,
    ) -> AppResult<Submission>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn delete_by_assignments(&self, assignment_ids: &[String]) -> AppResult<u64>;
}

pub struct MongoSubmissionRepository {
    collection: Collection<Submission>,
}

impl MongoSubmissionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("submissions");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for submissions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        // The one-submission-per-(assignment, student) invariant lives here,
        // not in application code.
        let assignment_student_index = IndexModel::builder()
            .keys(doc! { "assignment_id": 1, "student_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("assignment_student_unique".to_string())
                    .build(),
            )
            .build();

        let student_index = IndexModel::builder()
            .keys(doc! { "student_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("student_id".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(assignment_student_index).await?;
        self.collection.create_index(student_index).await?;

        Ok(())
    }
}

#[async_trait]
impl SubmissionRepository for MongoSubmissionRepository {
    async fn upsert(&self, draft: SubmissionDraft) -> AppResult<Submission> {
        let filter = doc! {
            "assignment_id": &draft.assignment_id,
            "student_id": &draft.student_id,
        };

        // Payload, status and score fields land in one update so answers are
        // never visible without their score. Feedback from a previous grading
        // round is cleared; it referred to content that no longer exists.
        let update = doc! {
            "$set": {
                "status": to_bson(&draft.status)?,
                "payload": to_bson(&draft.payload)?,
                "grade": to_bson(&draft.grade)?,
                "feedback": Bson::Null,
                "graded_at": to_bson(&draft.graded_at)?,
                "updated_at": to_bson(&draft.submitted_at)?,
            },
            "$setOnInsert": {
                "id": &draft.id,
                "submitted_at": to_bson(&draft.submitted_at)?,
            },
        };

        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let submission = self
            .collection
            .find_one_and_update(filter, update)
            .with_options(options)
            .await?
            .ok_or_else(|| {
                AppError::InternalError("Submission upsert returned no document".to_string())
            })?;

        Ok(submission)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Submission>> {
        let submission = self.collection.find_one(doc! { "id": id }).await?;
        Ok(submission)
    }

    async fn find_by_assignment_and_student(
        &self,
        assignment_id: &str,
        student_id: &str,
    ) -> AppResult<Option<Submission>> {
        let submission = self
            .collection
            .find_one(doc! {
                "assignment_id": assignment_id,
                "student_id": student_id,
            })
            .await?;
        Ok(submission)
    }

    async fn list_by_assignment(&self, assignment_id: &str) -> AppResult<Vec<Submission>> {
        let submissions = self
            .collection
            .find(doc! { "assignment_id": assignment_id })
            .await?
            .try_collect()
            .await?;
        Ok(submissions)
    }

    async fn find_for_student(
        &self,
        student_id: &str,
        assignment_ids: &[String],
    ) -> AppResult<Vec<Submission>> {
        if assignment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let submissions = self
            .collection
            .find(doc! {
                "student_id": student_id,
                "assignment_id": { "$in": assignment_ids },
            })
            .await?
            .try_collect()
            .await?;
        Ok(submissions)
    }

    async fn apply_grade(
        &self,
        id: &str,
        grade: i16,
        feedback: &str,
        graded_at: DateTime<Utc>,
    ) -> AppResult<Submission> {
        let update = doc! {
            "$set": {
                "status": to_bson(&SubmissionStatus::Graded)?,
                "grade": grade as i32,
                "feedback": feedback,
                "graded_at": to_bson(&graded_at)?,
                "updated_at": to_bson(&graded_at)?,
            },
        };

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let submission = self
            .collection
            .find_one_and_update(doc! { "id": id }, update)
            .with_options(options)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Submission with id '{}' not found", id)))?;

        Ok(submission)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Submission with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn delete_by_assignments(&self, assignment_ids: &[String]) -> AppResult<u64> {
        if assignment_ids.is_empty() {
            return Ok(0);
        }

        let result = self
            .collection
            .delete_many(doc! { "assignment_id": { "$in": assignment_ids } })
            .await?;
        Ok(result.deleted_count)
    }
}
