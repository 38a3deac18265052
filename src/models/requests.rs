use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::NewBusinessProfile;

/// Profile form submission
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfileRequest {
    #[validate(length(min = 1, message = "Business type is required"))]
    #[serde(default)]
    pub business_type: String,
    #[validate(length(min = 1, message = "Industry sector is required"))]
    #[serde(default)]
    pub industry_sector: String,
    #[validate(length(min = 1, message = "Team size is required"))]
    #[serde(default)]
    pub team_size: String,
    #[validate(length(min = 1, message = "Funding stage is required"))]
    #[serde(default)]
    pub funding_stage: String,
    #[validate(length(min = 1, message = "At least one growth goal is required"))]
    #[serde(default)]
    pub growth_goals: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[validate(email(message = "Email must be a valid address"))]
    #[serde(default)]
    pub email: Option<String>,
}

impl BusinessProfileRequest {
    /// Trim values, drop blank and repeated growth goals, and turn blank
    /// notes/email into `None`. Runs before validation so whitespace-only
    /// input counts as missing.
    pub fn normalized(self) -> Self {
        let mut growth_goals: Vec<String> = Vec::with_capacity(self.growth_goals.len());
        for goal in self.growth_goals {
            let goal = goal.trim().to_string();
            if !goal.is_empty() && !growth_goals.contains(&goal) {
                growth_goals.push(goal);
            }
        }

        Self {
            business_type: self.business_type.trim().to_string(),
            industry_sector: self.industry_sector.trim().to_string(),
            team_size: self.team_size.trim().to_string(),
            funding_stage: self.funding_stage.trim().to_string(),
            growth_goals,
            notes: non_blank(self.notes),
            email: non_blank(self.email),
        }
    }

    /// Expects a request that went through `normalized` and `validate`
    pub fn into_new_profile(self) -> NewBusinessProfile {
        NewBusinessProfile {
            business_type: self.business_type,
            industry_sector: self.industry_sector,
            team_size: self.team_size,
            funding_stage: self.funding_stage,
            growth_goals: self.growth_goals,
            notes: self.notes,
            email: self.email,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Request to email results
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmailResultsRequest {
    #[validate(email(message = "Email must be a valid address"))]
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub business_profile_id: Option<i32>,
}

impl EmailResultsRequest {
    /// A blank address counts as missing
    pub fn normalized(self) -> Self {
        Self {
            email: non_blank(self.email),
            business_profile_id: self.business_profile_id,
        }
    }
}

/// Optional explicit profile selection for the results endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsQuery {
    #[serde(default)]
    pub business_profile_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> BusinessProfileRequest {
        BusinessProfileRequest {
            business_type: "startup".to_string(),
            industry_sector: "tech".to_string(),
            team_size: "micro".to_string(),
            funding_stage: "seed".to_string(),
            growth_goals: vec!["funding".to_string()],
            notes: None,
            email: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_missing_fields_reported_per_field() {
        let mut req = request();
        req.business_type = String::new();
        req.growth_goals.clear();

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("business_type"));
        assert!(fields.contains_key("growth_goals"));
        assert!(!fields.contains_key("team_size"));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut req = request();
        req.email = Some("not-an-email".to_string());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_growth_goals_deduplicated_in_order() {
        let mut req = request();
        req.growth_goals = vec![
            "digital".to_string(),
            "funding".to_string(),
            " digital ".to_string(),
            "".to_string(),
        ];
        req.notes = Some("   ".to_string());

        let profile = req.normalized().into_new_profile();
        assert_eq!(profile.growth_goals, vec!["digital", "funding"]);
        assert_eq!(profile.notes, None);
    }

    #[test]
    fn test_whitespace_only_fields_fail_after_normalizing() {
        let req = BusinessProfileRequest {
            business_type: "   ".to_string(),
            industry_sector: "\t".to_string(),
            team_size: " ".to_string(),
            funding_stage: "seed".to_string(),
            growth_goals: vec!["  ".to_string(), "".to_string()],
            notes: None,
            email: Some("  ".to_string()),
        };

        let normalized = req.normalized();
        assert_eq!(normalized.email, None);

        let errors = normalized.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("business_type"));
        assert!(fields.contains_key("industry_sector"));
        assert!(fields.contains_key("team_size"));
        assert!(fields.contains_key("growth_goals"));
        assert!(!fields.contains_key("funding_stage"));
        assert!(!fields.contains_key("email"));
    }

    #[test]
    fn test_blank_results_email_becomes_missing() {
        let req = EmailResultsRequest {
            email: Some("   ".to_string()),
            business_profile_id: Some(1),
        };

        let normalized = req.normalized();
        assert_eq!(normalized.email, None);
        assert!(normalized.validate().is_ok());
    }

    #[test]
    fn test_camel_case_body_deserializes() {
        let body = serde_json::json!({
            "businessType": "startup",
            "industrySector": "tech",
            "teamSize": "micro",
            "fundingStage": "seed",
            "growthGoals": ["funding", "digital"]
        });
        let req: BusinessProfileRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.industry_sector, "tech");
        assert_eq!(req.growth_goals.len(), 2);
    }
}
