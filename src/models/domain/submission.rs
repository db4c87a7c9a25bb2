use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// At most one submission exists per (assignment_id, student_id); the pair is
/// covered by a unique index and all writes go through an upsert.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Submission {
    pub id: String,
    pub assignment_id: String,
    pub student_id: String,
    pub status: SubmissionStatus,
    pub payload: SubmissionPayload,
    pub grade: Option<i16>,
    pub feedback: Option<String>,
    pub graded_at: Option<DateTime<Utc>>,
    /// First-submit timestamp; resubmissions leave it untouched.
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Graded,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SubmissionPayload {
    File {
        file_url: String,
    },
    Quiz {
        answers: Vec<Answer>,
        score_percent: i16,
        correct_count: i16,
        total_count: i16,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Answer {
    pub question_index: usize,
    pub selected_option_index: usize,
}

/// Everything the store needs to create or replace a submission in one
/// atomic write. `id` and `submitted_at` only take effect on insert.
#[derive(Clone, Debug)]
pub struct SubmissionDraft {
    pub id: String,
    pub assignment_id: String,
    pub student_id: String,
    pub status: SubmissionStatus,
    pub payload: SubmissionPayload,
    pub grade: Option<i16>,
    pub graded_at: Option<DateTime<Utc>>,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionDraft {
    pub fn file(assignment_id: &str, student_id: &str, file_url: &str, now: DateTime<Utc>) -> Self {
        SubmissionDraft {
            id: Uuid::new_v4().to_string(),
            assignment_id: assignment_id.to_string(),
            student_id: student_id.to_string(),
            status: SubmissionStatus::Pending,
            payload: SubmissionPayload::File {
                file_url: file_url.to_string(),
            },
            grade: None,
            graded_at: None,
            submitted_at: now,
        }
    }

    pub fn quiz(
        assignment_id: &str,
        student_id: &str,
        answers: Vec<Answer>,
        score_percent: i16,
        correct_count: i16,
        total_count: i16,
        now: DateTime<Utc>,
    ) -> Self {
        SubmissionDraft {
            id: Uuid::new_v4().to_string(),
            assignment_id: assignment_id.to_string(),
            student_id: student_id.to_string(),
            status: SubmissionStatus::Graded,
            payload: SubmissionPayload::Quiz {
                answers,
                score_percent,
                correct_count,
                total_count,
            },
            grade: Some(score_percent),
            graded_at: Some(now),
            submitted_at: now,
        }
    }
}

impl Submission {
    pub fn is_graded(&self) -> bool {
        self.status == SubmissionStatus::Graded
    }

    pub fn file_url(&self) -> Option<&str> {
        match &self.payload {
            SubmissionPayload::File { file_url } => Some(file_url),
            SubmissionPayload::Quiz { .. } => None,
        }
    }
}
