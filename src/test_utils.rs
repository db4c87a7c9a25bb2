use crate::auth::{Claims, UserRole};
use crate::models::domain::{Assignment, AssignmentKind, Course, CourseStatus, Lecture, Question};


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::auth::UserRole;

    #[test]
    fn test_fixtures_test_course() {
        let course = test_course("teacher-1");
        assert_eq!(course.instructor_id, "teacher-1");
        assert_eq!(course.lecture_count(), 2);
    }

    #[test]
    fn test_fixtures_test_quiz_assignment() {
        let assignment = test_quiz_assignment("course-1", &[1, 0, 2]);
        assert_eq!(assignment.questions.len(), 3);
        assert_eq!(assignment.questions[0].correct_option_index, 1);
    }

    #[test]
    fn test_fixtures_test_claims() {
        let claims = test_claims("user-1", UserRole::Admin);
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role, UserRole::Admin);
    }
}
