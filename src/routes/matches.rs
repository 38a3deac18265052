use actix_web::{http::header, web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::models::{
    BusinessProfileRequest, EmailResultsRequest, EmailResultsResponse, HealthResponse, MatchStatusResponse,
    ProfileCreatedResponse, ResultsQuery,
};
use crate::services::{render_results_pdf, MatchingService, ResultsMailer, ServiceError, PDF_FILENAME};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MatchingService>,
    pub mailer: Arc<dyn ResultsMailer>,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/business-profile", web::post().to(submit_profile))
        .route("/match-status", web::get().to(match_status))
        .route("/match-results", web::get().to(match_results))
        .route("/download-results", web::get().to(download_results))
        .route("/email-results", web::post().to(email_results));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.service.store().health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Submit a business profile
///
/// POST /api/business-profile
///
/// Request body:
/// ```json
/// {
///   "businessType": "startup",
///   "industrySector": "tech",
///   "teamSize": "micro",
///   "fundingStage": "seed",
///   "growthGoals": ["funding", "digital"],
///   "notes": "optional"
/// }
/// ```
async fn submit_profile(
    state: web::Data<AppState>,
    req: web::Json<BusinessProfileRequest>,
) -> Result<HttpResponse, ServiceError> {
    let req = req.into_inner().normalized();
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for business profile: {:?}", errors);
        return Err(ServiceError::from_validation(&errors));
    }

    let outcome = state.service.submit_profile(&req.into_new_profile()).await?;

    tracing::info!(
        "Profile {} submitted with {} matches and {} insights",
        outcome.profile.id,
        outcome.matches.len(),
        outcome.insights.len()
    );

    Ok(HttpResponse::Created().json(ProfileCreatedResponse {
        success: true,
        message: "Business profile created successfully".to_string(),
        business_profile_id: outcome.profile.id,
    }))
}

/// Matching runs inside the submission request, so it is always complete
async fn match_status() -> impl Responder {
    HttpResponse::Ok().json(MatchStatusResponse { is_complete: true })
}

/// Results for the given or most recent profile
///
/// GET /api/match-results?businessProfileId={id}
async fn match_results(
    state: web::Data<AppState>,
    query: web::Query<ResultsQuery>,
) -> Result<HttpResponse, ServiceError> {
    let results = state.service.results(query.business_profile_id).await?;
    Ok(HttpResponse::Ok().json(results))
}

/// Results rendered as a PDF attachment
///
/// GET /api/download-results?businessProfileId={id}
async fn download_results(
    state: web::Data<AppState>,
    query: web::Query<ResultsQuery>,
) -> Result<HttpResponse, ServiceError> {
    let results = state.service.results(query.business_profile_id).await?;
    let bytes = render_results_pdf(&results)?;

    tracing::info!(
        "Generated {} byte PDF for profile {}",
        bytes.len(),
        results.business_profile.id
    );

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={}", PDF_FILENAME),
        ))
        .body(bytes))
}

/// Email results to the given address
///
/// POST /api/email-results
///
/// Request body:
/// ```json
/// { "email": "owner@example.com", "businessProfileId": 1 }
/// ```
async fn email_results(
    state: web::Data<AppState>,
    req: web::Json<EmailResultsRequest>,
) -> Result<HttpResponse, ServiceError> {
    let req = req.into_inner().normalized();
    if let Err(errors) = req.validate() {
        return Err(ServiceError::from_validation(&errors));
    }

    state
        .service
        .email_results(req.email.as_deref(), req.business_profile_id, state.mailer.as_ref())
        .await?;

    Ok(HttpResponse::Ok().json(EmailResultsResponse {
        success: true,
        message: "Email sent successfully".to_string(),
    }))
}
