use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{
    Answer, Assignment, AssignmentKind, Certificate, CompletionStatus, Course, CourseStatus,
    Enrollment, EnrollmentStatus, Lecture, Submission, SubmissionPayload, SubmissionStatus,
};

#[derive(Debug, Clone, Serialize)]
pub struct CourseResponse {
    pub id: String,
    pub title: String,
    pub instructor_id: String,
    pub status: CourseStatus,
    pub completion_status: CompletionStatus,
    pub lecture_count: usize,
    pub lectures: Vec<Lecture>,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        CourseResponse {
            id: course.id,
            title: course.title,
            instructor_id: course.instructor_id,
            status: course.status,
            completion_status: course.completion_status,
            lecture_count: course.lectures.len(),
            lectures: course.lectures,
        }
    }
}

/// Student-facing question view. The correct option index is only present
/// for instructors and admins.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub question_text: String,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_option_index: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentResponse {
    pub id: String,
    pub course_id: String,
    pub kind: AssignmentKind,
    pub due_date: DateTime<Utc>,
    pub questions: Vec<QuestionView>,
}

impl AssignmentResponse {
    pub fn from_assignment(assignment: Assignment, reveal_answer_key: bool) -> Self {
        let questions = assignment
            .questions
            .into_iter()
            .map(|q| QuestionView {
                question_text: q.question_text,
                options: q.options,
                correct_option_index: reveal_answer_key.then_some(q.correct_option_index),
            })
            .collect();

        AssignmentResponse {
            id: assignment.id,
            course_id: assignment.course_id,
            kind: assignment.kind,
            due_date: assignment.due_date,
            questions,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizResultDto {
    pub score_percent: i16,
    pub correct_count: i16,
    pub total_count: i16,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResponse {
    pub id: String,
    pub assignment_id: String,
    pub student_id: String,
    pub status: SubmissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graded_at: Option<DateTime<Utc>>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<QuizResultDto>,
}

impl From<Submission> for SubmissionResponse {
    fn from(submission: Submission) -> Self {
        let (file_url, quiz) = match submission.payload {
            SubmissionPayload::File { file_url } => (Some(file_url), None),
            SubmissionPayload::Quiz {
                answers,
                score_percent,
                correct_count,
                total_count,
            } => (
                None,
                Some(QuizResultDto {
                    score_percent,
                    correct_count,
                    total_count,
                    answers,
                }),
            ),
        };

        SubmissionResponse {
            id: submission.id,
            assignment_id: submission.assignment_id,
            student_id: submission.student_id,
            status: submission.status,
            grade: submission.grade,
            feedback: submission.feedback,
            graded_at: submission.graded_at,
            submitted_at: submission.submitted_at,
            updated_at: submission.updated_at,
            file_url,
            quiz,
        }
    }
}

/// Per-question breakdown shown once a quiz submission is graded. This is the
/// only student-facing place the answer key appears.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionReview {
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_option_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_option_index: Option<usize>,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReviewResponse {
    pub submission_id: String,
    pub assignment_id: String,
    pub score_percent: i16,
    pub correct_count: i16,
    pub total_count: i16,
    pub questions: Vec<QuestionReview>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CertificateResponse {
    pub verification_code: String,
    pub student_id: String,
    pub course_id: String,
    pub issued_at: DateTime<Utc>,
}

impl From<Certificate> for CertificateResponse {
    fn from(certificate: Certificate) -> Self {
        CertificateResponse {
            verification_code: certificate.verification_code,
            student_id: certificate.student_id,
            course_id: certificate.course_id,
            issued_at: certificate.issued_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressResponse {
    pub course_id: String,
    pub student_id: String,
    pub progress: i16,
    pub completed_lesson_ids: Vec<String>,
    pub status: EnrollmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<CertificateResponse>,
}

impl ProgressResponse {
    pub fn from_enrollment(enrollment: Enrollment, certificate: Option<Certificate>) -> Self {
        ProgressResponse {
            course_id: enrollment.course_id,
            student_id: enrollment.student_id,
            progress: enrollment.progress,
            completed_lesson_ids: enrollment.completed_lesson_ids,
            status: enrollment.status,
            certificate: certificate.map(CertificateResponse::from),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}
