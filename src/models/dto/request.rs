use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::models::domain::assignment::AssignmentKind;
use crate::models::domain::course::{CompletionStatus, CourseStatus};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCourseRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    pub status: Option<CourseStatus>,

    pub completion_status: Option<CompletionStatus>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLectureRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(url(message = "Invalid video URL"))]
    pub video_url: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAssignmentRequest {
    pub kind: AssignmentKind,

    pub due_date: DateTime<Utc>,

    /// Required for quiz assignments, rejected for file assignments.
    #[validate(nested)]
    pub questions: Option<Vec<QuestionInput>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuestionInput {
    #[validate(length(min = 1, max = 1000))]
    pub question_text: String,

    #[validate(length(min = 2, max = 10))]
    pub options: Vec<String>,

    pub correct_option_index: usize,
}

/// Assignment kind is fixed at creation; only the due date and, for quizzes,
/// the question list can change.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAssignmentRequest {
    pub due_date: Option<DateTime<Utc>>,

    #[validate(nested)]
    pub questions: Option<Vec<QuestionInput>>,
}

/// One of `file_url` or `answers` must be present, matching the assignment
/// kind; the submission service checks the variant against the assignment.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitAssignmentRequest {
    pub file_url: Option<String>,

    pub answers: Option<Vec<AnswerInput>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerInput {
    pub question_index: usize,
    pub selected_option_index: usize,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GradeSubmissionRequest {
    #[validate(range(min = 0, max = 100))]
    pub grade: i16,

    #[validate(length(max = 5000))]
    pub feedback: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_request_range() {
        let ok_low = GradeSubmissionRequest {
            grade: 0,
            feedback: "".to_string(),
        };
        let ok_high = GradeSubmissionRequest {
            grade: 100,
            feedback: "Good work".to_string(),
        };
        let too_high = GradeSubmissionRequest {
            grade: 150,
            feedback: "".to_string(),
        };
        let negative = GradeSubmissionRequest {
            grade: -1,
            feedback: "".to_string(),
        };

        assert!(ok_low.validate().is_ok());
        assert!(ok_high.validate().is_ok());
        assert!(too_high.validate().is_err());
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_question_input_requires_two_options() {
        let question = QuestionInput {
            question_text: "Pick one".to_string(),
            options: vec!["only option".to_string()],
            correct_option_index: 0,
        };

        assert!(question.validate().is_err());
    }

    #[test]
    fn test_create_lecture_rejects_bad_url() {
        let lecture = CreateLectureRequest {
            title: "Intro".to_string(),
            video_url: "not a url".to_string(),
        };

        assert!(lecture.validate().is_err());
    }

    #[test]
    fn test_create_course_rejects_empty_title() {
        let course = CreateCourseRequest {
            title: "".to_string(),
        };

        assert!(course.validate().is_err());
    }
}
