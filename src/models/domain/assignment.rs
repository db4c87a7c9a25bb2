use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Assignment {
    pub id: String,
    pub course_id: String,
    pub kind: AssignmentKind,
    pub due_date: DateTime<Utc>,
    /// Question list for quiz assignments, empty for file assignments.
    /// The answer key lives only here; submissions never copy it.
    pub questions: Vec<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentKind {
    File,
    Quiz,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_option_index: usize,
}

impl Assignment {
    pub fn new(
        course_id: &str,
        kind: AssignmentKind,
        due_date: DateTime<Utc>,
        questions: Vec<Question>,
    ) -> Self {
        Assignment {
            id: Uuid::new_v4().to_string(),
            course_id: course_id.to_string(),
            kind,
            due_date,
            questions,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }
}
