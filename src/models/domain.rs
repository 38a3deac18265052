use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Eligibility value that matches any profile value for a dimension
pub const WILDCARD: &str = "all";

/// Submitted business profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    pub id: i32,
    pub business_type: String,
    pub industry_sector: String,
    pub team_size: String,
    pub funding_stage: String,
    pub growth_goals: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl BusinessProfile {
    /// Helper to check growth goal membership
    pub fn has_goal(&self, goal: &str) -> bool {
        self.growth_goals.iter().any(|g| g == goal)
    }
}

/// Validated profile ready to be stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBusinessProfile {
    pub business_type: String,
    pub industry_sector: String,
    pub team_size: String,
    pub funding_stage: String,
    pub growth_goals: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Kind of support a resource offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Funding,
    Mentorship,
    Networking,
    Accelerator,
    Training,
    Advisory,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Funding => "funding",
            ResourceType::Mentorship => "mentorship",
            ResourceType::Networking => "networking",
            ResourceType::Accelerator => "accelerator",
            ResourceType::Training => "training",
            ResourceType::Advisory => "advisory",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown resource type: {0}")]
pub struct UnknownResourceType(pub String);

impl FromStr for ResourceType {
    type Err = UnknownResourceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "funding" => Ok(ResourceType::Funding),
            "mentorship" => Ok(ResourceType::Mentorship),
            "networking" => Ok(ResourceType::Networking),
            "accelerator" => Ok(ResourceType::Accelerator),
            "training" => Ok(ResourceType::Training),
            "advisory" => Ok(ResourceType::Advisory),
            _ => Err(UnknownResourceType(s.to_string())),
        }
    }
}

/// Which profiles a resource is suitable for, one set per dimension.
///
/// Every set except `business_types` honours the [`WILDCARD`] value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eligibility {
    pub business_types: Vec<String>,
    pub industry_sectors: Vec<String>,
    pub team_sizes: Vec<String>,
    pub funding_stages: Vec<String>,
    pub growth_goals: Vec<String>,
}

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportResource {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub description: String,
    pub apply_url: String,
    #[serde(default)]
    pub apply_text: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default = "default_true")]
    pub sharia_compliant: bool,
    #[serde(rename = "suitableFor")]
    pub eligibility: Eligibility,
}

/// Catalog entry before it has been stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSupportResource {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub description: String,
    pub apply_url: String,
    pub apply_text: Option<String>,
    pub amount: Option<String>,
    pub deadline: Option<String>,
    pub location: Option<String>,
    pub duration: Option<String>,
    pub sharia_compliant: bool,
    #[serde(rename = "suitableFor")]
    pub eligibility: Eligibility,
}

impl NewSupportResource {
    pub fn with_id(self, id: i32) -> SupportResource {
        SupportResource {
            id,
            name: self.name,
            resource_type: self.resource_type,
            description: self.description,
            apply_url: self.apply_url,
            apply_text: self.apply_text,
            amount: self.amount,
            deadline: self.deadline,
            location: self.location,
            duration: self.duration,
            sharia_compliant: self.sharia_compliant,
            eligibility: self.eligibility,
        }
    }
}

fn default_true() -> bool { true }

/// Stored (profile, resource) pairing that cleared the threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: i32,
    pub business_profile_id: i32,
    pub support_resource_id: i32,
    #[serde(rename = "matchScore")]
    pub score: u8,
    pub insights: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Match row to upsert
#[derive(Debug, Clone, PartialEq)]
pub struct NewMatch {
    pub business_profile_id: i32,
    pub support_resource_id: i32,
    pub score: u8,
    pub insights: Vec<String>,
}

/// Scored resource produced by the matcher
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredResource {
    pub resource: SupportResource,
    pub score: u8,
    pub insights: Vec<String>,
}

/// Audit record of a results email attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailLog {
    pub id: i32,
    pub email: String,
    pub business_profile_id: i32,
    pub sent_at: chrono::DateTime<chrono::Utc>,
    pub success: bool,
    pub error_message: Option<String>,
}

/// Points awarded per matching eligibility dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    pub business_type: u32,
    pub industry_sector: u32,
    pub team_size: u32,
    pub funding_stage: u32,
    pub growth_goal: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            business_type: 20,
            industry_sector: 20,
            team_size: 15,
            funding_stage: 15,
            growth_goal: 10,
        }
    }
}
