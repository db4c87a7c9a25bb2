use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{is_duplicate_key_error, Database},
    errors::{AppError, AppResult},
    models::domain::Assignment,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn create(&self, assignment: Assignment) -> AppResult<Assignment>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Assignment>>;
    async fn find_by_course(&self, course_id: &str) -> AppResult<Vec<Assignment>>;
    async fn update(&self, assignment: Assignment) -> AppResult<Assignment>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn delete_by_course(&self, course_id: &str) -> AppResult<u64>;
}

pub struct MongoAssignmentRepository {
    collection: Collection<Assignment>,
}

impl MongoAssignmentRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("assignments");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for assignments collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
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

        self.collection.create_index(id_index).await?;
        self.collection.create_index(course_index).await?;

        Ok(())
    }
}

#[async_trait]
impl AssignmentRepository for MongoAssignmentRepository {
    async fn create(&self, assignment: Assignment) -> AppResult<Assignment> {
        match self.collection.insert_one(&assignment).await {
            Ok(_) => Ok(assignment),
            Err(err) if is_duplicate_key_error(&err) => Err(AppError::AlreadyExists(format!(
                "Assignment with id '{}' already exists",
                assignment.id
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Assignment>> {
        let assignment = self.collection.find_one(doc! { "id": id }).await?;
        Ok(assignment)
    }

    async fn find_by_course(&self, course_id: &str) -> AppResult<Vec<Assignment>> {
        let assignments = self
            .collection
            .find(doc! { "course_id": course_id })
            .await?
            .try_collect()
            .await?;
        Ok(assignments)
    }

    async fn update(&self, assignment: Assignment) -> AppResult<Assignment> {
        let result = self
            .collection
            .replace_one(doc! { "id": &assignment.id }, &assignment)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Assignment with id '{}' not found",
                assignment.id
            )));
        }

        Ok(assignment)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Assignment with id '{}' not found",
                id
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
