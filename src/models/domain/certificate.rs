use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable proof of course completion. One per (student, course), enforced
/// by a unique index; the verification code is public and unguessable.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Certificate {
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    pub verification_code: String,
    pub issued_at: DateTime<Utc>,
}

impl Certificate {
    pub fn new(student_id: &str, course_id: &str) -> Self {
        Certificate {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            course_id: course_id.to_string(),
            verification_code: Uuid::new_v4().simple().to_string(),
            issued_at: Utc::now(),
        }
    }
}
