use actix_web::{get, web, HttpResponse};

use crate::{
    app_state::AppState, errors::AppError, models::dto::response::CertificateResponse,
};

/// Public lookup for the shareable certificate URL; no authentication, the
/// unguessable code is the credential.
#[get("/api/certificates/{verification_code}")]
pub async fn verify_certificate(
    state: web::Data<AppState>,
    verification_code: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let certificate = state
        .certificate_service
        .verify(&verification_code)
        .await?;
    Ok(HttpResponse::Ok().json(CertificateResponse::from(certificate)))
}
