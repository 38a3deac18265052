use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    BusinessProfile, EmailLog, Match, NewBusinessProfile, NewMatch, NewSupportResource, SupportResource,
};

/// Errors that can occur when reading or writing results
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Persistence for profiles, the catalog, matches and the email log.
///
/// Carried in `AppState` as `Arc<dyn ResultsStore>`.
#[async_trait]
pub trait ResultsStore: Send + Sync {
    async fn create_profile(&self, profile: &NewBusinessProfile) -> Result<BusinessProfile, StoreError>;

    async fn profile(&self, id: i32) -> Result<Option<BusinessProfile>, StoreError>;

    async fn most_recent_profile(&self) -> Result<Option<BusinessProfile>, StoreError>;

    async fn update_profile_email(&self, id: i32, email: &str) -> Result<(), StoreError>;

    async fn all_resources(&self) -> Result<Vec<SupportResource>, StoreError>;

    /// Insert the catalog unless one is already present.
    /// Returns the number of resources inserted.
    async fn seed_resources(&self, resources: &[NewSupportResource]) -> Result<usize, StoreError>;

    /// Make `matches` the complete match set of a profile: one row per
    /// (profile, resource) pair is inserted or updated, and the profile's rows
    /// for resources not in `matches` are deleted.
    async fn replace_matches(&self, profile_id: i32, matches: &[NewMatch]) -> Result<Vec<Match>, StoreError>;

    /// Matches for a profile, highest score first, ties by resource id
    async fn matches_for_profile(&self, profile_id: i32) -> Result<Vec<Match>, StoreError>;

    /// Replace the insights stored on every match of a profile
    async fn set_profile_insights(&self, profile_id: i32, insights: &[String]) -> Result<u64, StoreError>;

    async fn log_email(
        &self,
        email: &str,
        profile_id: i32,
        success: bool,
        error_message: Option<&str>,
    ) -> Result<EmailLog, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
