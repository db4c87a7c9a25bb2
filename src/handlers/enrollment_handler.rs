use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::response::{DeleteResponse, ProgressResponse},
};

#[post("/courses/{id}/enroll")]
pub async fn enroll(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let enrollment = state.course_service.enroll(&auth.0, &id).await?;
    Ok(HttpResponse::Created().json(ProgressResponse::from_enrollment(enrollment, None)))
}

#[delete("/courses/{id}/enroll")]
pub async fn unenroll(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.course_service.unenroll(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: format!("Unenrolled from course '{}'", id),
    }))
}

#[post("/courses/{course_id}/lectures/{lecture_id}/complete")]
pub async fn complete_lecture(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (course_id, lecture_id) = path.into_inner();
    let snapshot = state
        .progress_service
        .complete_lecture(&auth.0, &course_id, &lecture_id)
        .await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[get("/courses/{id}/progress")]
pub async fn get_progress(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (enrollment, certificate) = state
        .progress_service
        .get_progress(&auth.0.sub, &id)
        .await?;
    Ok(HttpResponse::Ok().json(ProgressResponse::from_enrollment(enrollment, certificate)))
}
