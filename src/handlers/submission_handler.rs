use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::{GradeSubmissionRequest, SubmitAssignmentRequest},
        response::{DeleteResponse, SubmissionResponse},
    },
};

#[post("/assignments/{id}/submit")]
pub async fn submit_assignment(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SubmitAssignmentRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let submission = state
        .submission_service
        .submit(&auth.0, &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(SubmissionResponse::from(submission)))
}

#[get("/submissions/{id}")]
pub async fn get_submission(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let submission = state.submission_service.get(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(SubmissionResponse::from(submission)))
}

#[get("/submissions/{id}/review")]
pub async fn review_submission(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let review = state.submission_service.review(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(review))
}

#[get("/assignments/{id}/submissions")]
pub async fn list_submissions(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let submissions = state
        .submission_service
        .list_for_assignment(&auth.0, &id)
        .await?;
    let response: Vec<SubmissionResponse> = submissions
        .into_iter()
        .map(SubmissionResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(response))
}

#[put("/submissions/{id}/grade")]
pub async fn grade_submission(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<GradeSubmissionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let submission = state
        .grading_service
        .grade(&auth.0, &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(SubmissionResponse::from(submission)))
}

#[delete("/submissions/{id}")]
pub async fn delete_submission(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.submission_service.delete(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: format!("Submission '{}' deleted", id),
    }))
}
