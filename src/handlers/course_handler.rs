use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::{
            CreateAssignmentRequest, CreateCourseRequest, CreateLectureRequest,
            UpdateAssignmentRequest, UpdateCourseRequest,
        },
        response::{CourseResponse, DeleteResponse},
    },
};

#[post("/courses")]
pub async fn create_course(
    state: web::Data<AppState>,
    request: web::Json<CreateCourseRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let course = state
        .course_service
        .create_course(&auth.0, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(CourseResponse::from(course)))
}

#[get("/courses")]
pub async fn list_my_courses(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let courses = state
        .course_service
        .list_courses_by_instructor(&auth.0.sub)
        .await?;
    let response: Vec<CourseResponse> = courses.into_iter().map(CourseResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

#[get("/courses/{id}")]
pub async fn get_course(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let course = state.course_service.get_course(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(CourseResponse::from(course)))
}

#[put("/courses/{id}")]
pub async fn update_course(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateCourseRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let course = state
        .course_service
        .update_course(&auth.0, &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(CourseResponse::from(course)))
}

#[delete("/courses/{id}")]
pub async fn delete_course(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.course_service.delete_course(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: format!("Course '{}' deleted", id),
    }))
}

#[post("/courses/{id}/lectures")]
pub async fn add_lecture(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<CreateLectureRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let course = state
        .course_service
        .add_lecture(&auth.0, &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(CourseResponse::from(course)))
}

#[post("/courses/{id}/assignments")]
pub async fn create_assignment(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<CreateAssignmentRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let assignment = state
        .course_service
        .create_assignment(&auth.0, &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(assignment))
}

#[get("/assignments/{id}")]
pub async fn get_assignment(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state.course_service.get_assignment(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[put("/assignments/{id}")]
pub async fn update_assignment(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateAssignmentRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let assignment = state
        .course_service
        .update_assignment(&auth.0, &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(assignment))
}

#[delete("/assignments/{id}")]
pub async fn delete_assignment(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.course_service.delete_assignment(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: format!("Assignment '{}' deleted", id),
    }))
}
