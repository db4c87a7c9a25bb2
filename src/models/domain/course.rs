use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub instructor_id: String,
    pub status: CourseStatus,
    pub completion_status: CompletionStatus,
    pub lectures: Vec<Lecture>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    Draft,
    Published,
    Archived,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionStatus {
    Ongoing,
    Completed,
}

/// Lectures are embedded in their course; `order` is unique per course and
/// only drives the progress denominator, never playback gating.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Lecture {
    pub id: String,
    pub order: i16,
    pub title: String,
    pub video_url: String,
}

impl Course {
    pub fn new_draft(title: &str, instructor_id: &str) -> Self {
        Course {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            instructor_id: instructor_id.to_string(),
            status: CourseStatus::Draft,
            completion_status: CompletionStatus::Ongoing,
            lectures: Vec::new(),
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn lecture_count(&self) -> usize {
        self.lectures.len()
    }

    pub fn has_lecture(&self, lecture_id: &str) -> bool {
        self.lectures.iter().any(|l| l.id == lecture_id)
    }

    pub fn next_lecture_order(&self) -> i16 {
        self.lectures.iter().map(|l| l.order).max().unwrap_or(0) + 1
    }
}

impl Lecture {
    pub fn new(order: i16, title: &str, video_url: &str) -> Self {
        Lecture {
            id: Uuid::new_v4().to_string(),
            order,
            title: title.to_string(),
            video_url: video_url.to_string(),
        }
    }
}
