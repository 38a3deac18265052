use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::core::{combine_insights, generate_match_specific_insights, InsightGenerator, Matcher};
use crate::models::{
    BusinessProfile, ErrorResponse, FieldError, Match, MatchResults, NewBusinessProfile, NewMatch,
    NewSupportResource, RankedSupport, SupportResource,
};
use crate::services::cache::CatalogCache;
use crate::services::mailer::{MailError, ResultsMailer};
use crate::services::pdf::PdfError;
use crate::services::store::{ResultsStore, StoreError};

pub const PROFILE_NOT_FOUND: &str = "No business profile found";

/// Errors surfaced by the matching service, mapped onto HTTP responses
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Delivery failed: {0}")]
    Delivery(#[from] MailError),

    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Flatten validator output into one entry per failed field, ordered by field
    pub fn from_validation(errors: &validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, failures)| {
                let field = camel_case(field.as_ref());
                failures.iter().map(move |failure| FieldError {
                    field: field.clone(),
                    message: failure
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field)),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));

        ServiceError::Validation {
            message: "Validation error".to_string(),
            errors: fields,
        }
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation { .. } => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Store(_) | ServiceError::Delivery(_) | ServiceError::Pdf(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ServiceError::Validation { message, errors } => ErrorResponse {
                errors: errors.clone(),
                ..ErrorResponse::new(message.clone())
            },
            ServiceError::NotFound(message) => ErrorResponse::new(message.clone()),
            ServiceError::Store(e) => {
                tracing::error!("Store failure: {}", e);
                ErrorResponse::new("Internal server error")
            }
            ServiceError::Delivery(e) => {
                tracing::error!("Email delivery failure: {}", e);
                ErrorResponse {
                    error: Some(e.to_string()),
                    ..ErrorResponse::new("Failed to send email")
                }
            }
            ServiceError::Pdf(e) => {
                tracing::error!("PDF generation failure: {}", e);
                ErrorResponse::new("Error generating PDF")
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

/// What a profile submission produced
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub profile: BusinessProfile,
    pub matches: Vec<Match>,
    pub insights: Vec<String>,
}

/// Orchestrates scoring, persistence and insight generation
pub struct MatchingService {
    store: Arc<dyn ResultsStore>,
    catalog: CatalogCache,
    matcher: Matcher,
    insights: InsightGenerator,
}

impl MatchingService {
    pub fn new(
        store: Arc<dyn ResultsStore>,
        catalog: CatalogCache,
        matcher: Matcher,
        insights: InsightGenerator,
    ) -> Self {
        Self {
            store,
            catalog,
            matcher,
            insights,
        }
    }

    pub fn store(&self) -> &Arc<dyn ResultsStore> {
        &self.store
    }

    /// Seed the catalog unless one exists, dropping any cached copy
    pub async fn seed_catalog(&self, resources: &[NewSupportResource]) -> Result<usize, ServiceError> {
        let inserted = self.store.seed_resources(resources).await?;
        if inserted > 0 {
            self.catalog.invalidate().await;
        }
        Ok(inserted)
    }

    /// Store a profile, match it and persist its insights
    pub async fn submit_profile(&self, new_profile: &NewBusinessProfile) -> Result<SubmissionOutcome, ServiceError> {
        let profile = self.store.create_profile(new_profile).await?;
        tracing::info!("Created business profile {}", profile.id);

        let matches = self.run_matching(&profile).await?;
        let insights = self.generate_insights(&profile).await?;

        Ok(SubmissionOutcome {
            profile,
            matches,
            insights,
        })
    }

    /// Score the catalog for a profile and make the accepted resources its
    /// stored match set
    pub async fn run_matching(&self, profile: &BusinessProfile) -> Result<Vec<Match>, ServiceError> {
        let catalog = self.catalog.get_or_load(self.store.as_ref()).await?;
        let result = self.matcher.find_matches(profile, &catalog);

        tracing::info!(
            "Profile {} matched {} of {} resources",
            profile.id,
            result.matches.len(),
            result.total_resources
        );

        let rows: Vec<NewMatch> = result
            .matches
            .into_iter()
            .map(|scored| NewMatch {
                business_profile_id: profile.id,
                support_resource_id: scored.resource.id,
                score: scored.score,
                insights: scored.insights,
            })
            .collect();

        Ok(self.store.replace_matches(profile.id, &rows).await?)
    }

    /// Build general plus match-specific insights and store them on every
    /// match of the profile
    pub async fn generate_insights(&self, profile: &BusinessProfile) -> Result<Vec<String>, ServiceError> {
        let matches = self.store.matches_for_profile(profile.id).await?;
        let catalog = self.catalog.get_or_load(self.store.as_ref()).await?;
        let by_id = index_catalog(&catalog);

        let per_match = matches.iter().filter_map(|m| {
            by_id
                .get(&m.support_resource_id)
                .map(|resource| generate_match_specific_insights(profile, resource))
        });
        let insights = combine_insights(self.insights.general(profile), per_match);

        if !matches.is_empty() {
            let updated = self.store.set_profile_insights(profile.id, &insights).await?;
            tracing::debug!("Stored {} insights on {} matches of profile {}", insights.len(), updated, profile.id);
        }

        Ok(insights)
    }

    /// Persisted insights for a profile, generated on first read when missing
    pub async fn insights_for_profile(&self, profile: &BusinessProfile) -> Result<Vec<String>, ServiceError> {
        let matches = self.store.matches_for_profile(profile.id).await?;

        if let Some(stored) = matches.iter().find(|m| !m.insights.is_empty()) {
            return Ok(stored.insights.clone());
        }

        self.generate_insights(profile).await
    }

    /// Resolve the requested profile, or the most recent one when none is given
    pub async fn resolve_profile(&self, profile_id: Option<i32>) -> Result<BusinessProfile, ServiceError> {
        let profile = match profile_id {
            Some(id) => self.store.profile(id).await?,
            None => self.store.most_recent_profile().await?,
        };

        profile.ok_or_else(|| ServiceError::NotFound(PROFILE_NOT_FOUND.to_string()))
    }

    /// Everything needed to render results for a profile
    pub async fn results(&self, profile_id: Option<i32>) -> Result<MatchResults, ServiceError> {
        let profile = self.resolve_profile(profile_id).await?;
        let stored = self.store.matches_for_profile(profile.id).await?;
        let catalog = self.catalog.get_or_load(self.store.as_ref()).await?;
        let by_id = index_catalog(&catalog);

        let matches = stored
            .iter()
            .filter_map(|m| match by_id.get(&m.support_resource_id) {
                Some(resource) => Some(RankedSupport {
                    resource: (*resource).clone(),
                    match_score: m.score,
                }),
                None => {
                    tracing::warn!(
                        "Match {} references unknown support resource {}",
                        m.id,
                        m.support_resource_id
                    );
                    None
                }
            })
            .collect();

        let insights = self.insights_for_profile(&profile).await?;

        Ok(MatchResults {
            matches,
            business_profile: profile,
            insights,
        })
    }

    /// Record the address on the profile, send the results and log the attempt.
    ///
    /// A failed send is logged and returned; the stored address is kept.
    pub async fn email_results(
        &self,
        email: Option<&str>,
        profile_id: Option<i32>,
        mailer: &dyn ResultsMailer,
    ) -> Result<(), ServiceError> {
        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ServiceError::validation("Email is required"))?;

        let results = self.results(profile_id).await?;
        let profile_id = results.business_profile.id;

        self.store.update_profile_email(profile_id, email).await?;

        match mailer.send_results(email, &results).await {
            Ok(()) => {
                self.record_email(email, profile_id, true, None).await;
                tracing::info!("Emailed results for profile {} to {}", profile_id, email);
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                self.record_email(email, profile_id, false, Some(&message)).await;
                Err(ServiceError::Delivery(e))
            }
        }
    }

    async fn record_email(&self, email: &str, profile_id: i32, success: bool, error: Option<&str>) {
        if let Err(e) = self.store.log_email(email, profile_id, success, error).await {
            tracing::warn!("Failed to write email log for profile {}: {}", profile_id, e);
        }
    }
}

fn index_catalog(catalog: &[SupportResource]) -> HashMap<i32, &SupportResource> {
    catalog.iter().map(|r| (r.id, r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScoringWeights;
    use crate::services::catalog::default_catalog;
    use crate::services::memory::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubMailer {
        sent: AtomicUsize,
        fail: bool,
    }

    impl StubMailer {
        fn new(fail: bool) -> Self {
            Self {
                sent: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl ResultsMailer for StubMailer {
        async fn send_results(&self, to: &str, _results: &MatchResults) -> Result<(), MailError> {
            let _: lettre::message::Mailbox = to.parse()?;
            if self.fail {
                // Any address error stands in for a transport failure
                let _: lettre::message::Mailbox = "unreachable".parse()?;
            }
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    async fn create_service() -> (Arc<MemoryStore>, MatchingService) {
        let store = Arc::new(MemoryStore::new());
        store.seed_resources(&default_catalog()).await.unwrap();

        let service = MatchingService::new(
            store.clone(),
            CatalogCache::new(60),
            Matcher::with_default_weights(),
            InsightGenerator::seeded(7),
        );
        (store, service)
    }

    fn tech_startup() -> NewBusinessProfile {
        NewBusinessProfile {
            business_type: "startup".to_string(),
            industry_sector: "tech".to_string(),
            team_size: "micro".to_string(),
            funding_stage: "seed".to_string(),
            growth_goals: vec!["funding".to_string(), "digital".to_string()],
            notes: None,
            email: None,
        }
    }

    #[tokio::test]
    async fn test_submit_profile_persists_matches_and_insights() {
        let (_store, service) = create_service().await;

        let outcome = service.submit_profile(&tech_startup()).await.unwrap();

        assert!(!outcome.matches.is_empty());
        assert!(outcome.matches.iter().all(|m| m.score >= 50));
        assert!(outcome.matches.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(!outcome.insights.is_empty());

        let read = service.insights_for_profile(&outcome.profile).await.unwrap();
        assert_eq!(read, outcome.insights);
        let again = service.insights_for_profile(&outcome.profile).await.unwrap();
        assert_eq!(again, outcome.insights);
    }

    #[tokio::test]
    async fn test_rerunning_matching_upserts() {
        let (store, service) = create_service().await;
        let outcome = service.submit_profile(&tech_startup()).await.unwrap();
        let count = store.match_count().await;

        let rerun = service.run_matching(&outcome.profile).await.unwrap();

        assert_eq!(rerun.len(), outcome.matches.len());
        assert_eq!(store.match_count().await, count);
    }

    #[tokio::test]
    async fn test_rerun_with_new_weights_drops_stale_matches() {
        let (store, service) = create_service().await;
        let outcome = service.submit_profile(&tech_startup()).await.unwrap();
        assert!(store.match_count().await > 0);

        let strict = MatchingService::new(
            store.clone(),
            CatalogCache::new(60),
            Matcher::new(ScoringWeights {
                business_type: 0,
                industry_sector: 0,
                team_size: 0,
                funding_stage: 0,
                growth_goal: 10,
            }),
            InsightGenerator::seeded(7),
        );

        let rerun = strict.run_matching(&outcome.profile).await.unwrap();

        assert!(rerun.is_empty());
        assert!(store.matches_for_profile(outcome.profile.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_seed_catalog_reaches_later_submissions() {
        let store = Arc::new(MemoryStore::new());
        let service = MatchingService::new(
            store.clone(),
            CatalogCache::new(60),
            Matcher::with_default_weights(),
            InsightGenerator::seeded(7),
        );

        let before = service.submit_profile(&tech_startup()).await.unwrap();
        assert!(before.matches.is_empty());

        assert_eq!(service.seed_catalog(&default_catalog()).await.unwrap(), 9);
        assert_eq!(service.seed_catalog(&default_catalog()).await.unwrap(), 0);

        let after = service.submit_profile(&tech_startup()).await.unwrap();
        assert!(!after.matches.is_empty());
    }

    #[tokio::test]
    async fn test_profile_without_matches_gets_fresh_insights() {
        let (store, service) = create_service().await;
        let outcome = service
            .submit_profile(&NewBusinessProfile {
                business_type: "other".to_string(),
                industry_sector: "other".to_string(),
                team_size: "other".to_string(),
                funding_stage: "other".to_string(),
                growth_goals: vec!["other".to_string()],
                notes: None,
                email: None,
            })
            .await
            .unwrap();

        assert!(outcome.matches.is_empty());
        assert_eq!(store.match_count().await, 0);

        let results = service.results(Some(outcome.profile.id)).await.unwrap();
        assert!(results.matches.is_empty());
        assert!(results.insights.len() <= 4);
    }

    #[tokio::test]
    async fn test_results_default_to_most_recent_profile() {
        let (_store, service) = create_service().await;
        let first = service.submit_profile(&tech_startup()).await.unwrap();
        let mut second_profile = tech_startup();
        second_profile.industry_sector = "food".to_string();
        let second = service.submit_profile(&second_profile).await.unwrap();

        let latest = service.results(None).await.unwrap();
        assert_eq!(latest.business_profile.id, second.profile.id);

        let explicit = service.results(Some(first.profile.id)).await.unwrap();
        assert_eq!(explicit.business_profile.id, first.profile.id);
        assert_eq!(explicit.matches.len(), first.matches.len());
    }

    #[tokio::test]
    async fn test_results_without_profile_is_not_found() {
        let (_store, service) = create_service().await;
        let err = service.results(None).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_email_results_sets_address_and_logs() {
        let (store, service) = create_service().await;
        let outcome = service.submit_profile(&tech_startup()).await.unwrap();
        let mailer = StubMailer::new(false);

        service
            .email_results(Some("owner@example.com"), None, &mailer)
            .await
            .unwrap();

        assert_eq!(mailer.sent.load(Ordering::SeqCst), 1);
        let profile = store.profile(outcome.profile.id).await.unwrap().unwrap();
        assert_eq!(profile.email.as_deref(), Some("owner@example.com"));

        let logs = store.email_logs().await;
        assert_eq!(logs.len(), 1);
        assert!(logs[0].success);
    }

    #[tokio::test]
    async fn test_failed_email_is_logged_and_address_kept() {
        let (store, service) = create_service().await;
        let outcome = service.submit_profile(&tech_startup()).await.unwrap();
        let mailer = StubMailer::new(true);

        let err = service
            .email_results(Some("owner@example.com"), Some(outcome.profile.id), &mailer)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Delivery(_)));
        let logs = store.email_logs().await;
        assert_eq!(logs.len(), 1);
        assert!(!logs[0].success);
        assert!(logs[0].error_message.is_some());

        let profile = store.profile(outcome.profile.id).await.unwrap().unwrap();
        assert_eq!(profile.email.as_deref(), Some("owner@example.com"));
    }

    #[tokio::test]
    async fn test_blank_email_rejected() {
        let (_store, service) = create_service().await;
        let mailer = StubMailer::new(false);

        let err = service.email_results(Some("  "), None, &mailer).await.unwrap_err();
        assert_eq!(err.to_string(), "Email is required");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_camel_case_field_names() {
        assert_eq!(camel_case("growth_goals"), "growthGoals");
        assert_eq!(camel_case("email"), "email");
    }
}
