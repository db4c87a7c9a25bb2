use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{is_duplicate_key_error, Database},
    errors::{AppError, AppResult},
    models::domain::Course,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn create(&self, course: Course) -> AppResult<Course>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Course>>;
    async fn list_by_instructor(&self, instructor_id: &str) -> AppResult<Vec<Course>>;
    async fn update(&self, course: Course) -> AppResult<Course>;
    async fn delete(&self, id: &str) -> AppResult<()>;
}

pub struct MongoCourseRepository {
    collection: Collection<Course>,
}

impl MongoCourseRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("courses");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for courses collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let instructor_index = IndexModel::builder()
            .keys(doc! { "instructor_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("instructor_id".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(instructor_index).await?;

        Ok(())
    }
}

#[async_trait]
impl CourseRepository for MongoCourseRepository {
    async fn create(&self, course: Course) -> AppResult<Course> {
        match self.collection.insert_one(&course).await {
            Ok(_) => Ok(course),
            Err(err) if is_duplicate_key_error(&err) => Err(AppError::AlreadyExists(format!(
                "Course with id '{}' already exists",
                course.id
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Course>> {
        let course = self.collection.find_one(doc! { "id": id }).await?;
        Ok(course)
    }

    async fn list_by_instructor(&self, instructor_id: &str) -> AppResult<Vec<Course>> {
        let courses = self
            .collection
            .find(doc! { "instructor_id": instructor_id })
            .await?
            .try_collect()
            .await?;
        Ok(courses)
    }

    async fn update(&self, course: Course) -> AppResult<Course> {
        let result = self
            .collection
            .replace_one(doc! { "id": &course.id }, &course)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Course with id '{}' not found",
                course.id
            )));
        }

        Ok(course)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Course with id '{}' not found",
                id
            )));
        }

        Ok(())
    }
}
