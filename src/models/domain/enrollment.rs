use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Progress record for one (student, course) pair, unique per pair.
/// `completed_lesson_ids` has set semantics: re-completing a lecture never
/// double counts.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Enrollment {
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    pub completed_lesson_ids: Vec<String>,
    /// 0-100; 99 is the cap while lectures are done but assignments are
    /// still ungraded. Never decreases for a live enrollment.
    pub progress: i16,
    pub status: EnrollmentStatus,
    pub certificate_id: Option<String>,
    pub enrolled_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Ongoing,
    Completed,
}

impl Enrollment {
    pub fn new(student_id: &str, course_id: &str) -> Self {
        Enrollment {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            course_id: course_id.to_string(),
            completed_lesson_ids: Vec::new(),
            progress: 0,
            status: EnrollmentStatus::Ongoing,
            certificate_id: None,
            enrolled_at: Utc::now(),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn has_completed(&self, lecture_id: &str) -> bool {
        self.completed_lesson_ids.iter().any(|id| id == lecture_id)
    }
}
