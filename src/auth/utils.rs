use crate::{
    auth::claims::{Claims, UserRole},
    errors::{AppError, AppResult},
    models::domain::Course,
};

pub fn require_admin(claims: &Claims) -> AppResult<()> {
    if claims.role != UserRole::Admin {
        return Err(AppError::Unauthorized(
            "Only admins can perform this action".to_string(),
        ));
    }
    Ok(())
}

pub fn require_instructor(claims: &Claims) -> AppResult<()> {
    if claims.role != UserRole::Instructor && claims.role != UserRole::Admin {
        return Err(AppError::Unauthorized(
            "Only instructors can perform this action".to_string(),
        ));
    }
    Ok(())
}

/// Admins may act on any course; instructors only on courses they own.
pub fn require_course_instructor(claims: &Claims, course: &Course) -> AppResult<()> {
    if claims.role == UserRole::Admin {
        return Ok(());
    }
    if claims.role == UserRole::Instructor && claims.sub == course.instructor_id {
        return Ok(());
    }
    Err(AppError::Unauthorized(
        "You can only manage your own courses".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::Course;

    fn create_test_claims(user_id: &str, role: UserRole) -> Claims {
        Claims {
            sub: user_id.to_string(),
            role,
            iat: 0,
            exp: 9999999999,
        }
    }

    fn course_owned_by(instructor_id: &str) -> Course {
        Course::new_draft("Test Course", instructor_id)
    }

    #[test]
    fn test_require_admin_success() {
        let claims = create_test_claims("admin", UserRole::Admin);
        assert!(require_admin(&claims).is_ok());
    }

    #[test]
    fn test_require_admin_failure() {
        let claims = create_test_claims("user", UserRole::Student);
        assert!(require_admin(&claims).is_err());
    }

    #[test]
    fn test_require_instructor_accepts_admin() {
        let claims = create_test_claims("admin", UserRole::Admin);
        assert!(require_instructor(&claims).is_ok());
    }

    #[test]
    fn test_require_instructor_rejects_student() {
        let claims = create_test_claims("student", UserRole::Student);
        assert!(require_instructor(&claims).is_err());
    }

    #[test]
    fn test_require_course_instructor_as_owner() {
        let claims = create_test_claims("teacher-1", UserRole::Instructor);
        let course = course_owned_by("teacher-1");
        assert!(require_course_instructor(&claims, &course).is_ok());
    }

    #[test]
    fn test_require_course_instructor_as_admin() {
        let claims = create_test_claims("admin", UserRole::Admin);
        let course = course_owned_by("teacher-1");
        assert!(require_course_instructor(&claims, &course).is_ok());
    }

    #[test]
    fn test_require_course_instructor_rejects_other_instructor() {
        let claims = create_test_claims("teacher-2", UserRole::Instructor);
        let course = course_owned_by("teacher-1");
        assert!(require_course_instructor(&claims, &course).is_err());
    }

    #[test]
    fn test_require_course_instructor_rejects_enrolled_student() {
        let claims = create_test_claims("student-1", UserRole::Student);
        let course = course_owned_by("teacher-1");
        assert!(require_course_instructor(&claims, &course).is_err());
    }
}
