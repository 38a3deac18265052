use serde::{Deserialize, Serialize};
use crate::models::domain::{BusinessProfile, SupportResource};

/// Response for the profile submission endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCreatedResponse {
    pub success: bool,
    pub message: String,
    pub business_profile_id: i32,
}

/// Matching progress
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStatusResponse {
    pub is_complete: bool,
}

/// Matched resource with the score it was accepted at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedSupport {
    #[serde(flatten)]
    pub resource: SupportResource,
    pub match_score: u8,
}

/// Everything the results screen, PDF and email render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResults {
    pub matches: Vec<RankedSupport>,
    pub business_profile: BusinessProfile,
    pub insights: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Single field validation failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Error / outcome envelope used by every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<FieldError>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
            errors: Vec::new(),
        }
    }
}

/// Outcome of a results email request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailResultsResponse {
    pub success: bool,
    pub message: String,
}
