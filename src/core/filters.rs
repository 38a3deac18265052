use crate::models::{BusinessProfile, Eligibility, WILDCARD};

/// Check if an eligibility set lists the value or the wildcard
#[inline]
pub fn accepts(allowed: &[String], value: &str) -> bool {
    allowed.iter().any(|a| a == value || a == WILDCARD)
}

/// Check if an eligibility set lists the value literally
///
/// Used for the business type dimension, which ignores the wildcard.
#[inline]
pub fn lists(allowed: &[String], value: &str) -> bool {
    allowed.iter().any(|a| a == value)
}

/// Per-dimension outcome of checking a profile against a resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionMatches {
    pub business_type: bool,
    pub industry_sector: bool,
    pub team_size: bool,
    pub funding_stage: bool,
    pub shared_goals: Vec<String>,
}

/// Evaluate each eligibility dimension for a profile
#[inline]
pub fn match_dimensions(profile: &BusinessProfile, eligibility: &Eligibility) -> DimensionMatches {
    // Growth goals are compared literally; "all" is not a goal
    let shared_goals = profile
        .growth_goals
        .iter()
        .filter(|goal| lists(&eligibility.growth_goals, goal))
        .cloned()
        .collect();

    DimensionMatches {
        business_type: lists(&eligibility.business_types, &profile.business_type),
        industry_sector: accepts(&eligibility.industry_sectors, &profile.industry_sector),
        team_size: accepts(&eligibility.team_sizes, &profile.team_size),
        funding_stage: accepts(&eligibility.funding_stages, &profile.funding_stage),
        shared_goals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn create_test_profile() -> BusinessProfile {
        BusinessProfile {
            id: 1,
            business_type: "startup".to_string(),
            industry_sector: "tech".to_string(),
            team_size: "micro".to_string(),
            funding_stage: "seed".to_string(),
            growth_goals: strings(&["funding", "digital"]),
            notes: None,
            email: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_accepts_literal_and_wildcard() {
        assert!(accepts(&strings(&["tech", "food"]), "tech"));
        assert!(accepts(&strings(&["all"]), "anything"));
        assert!(!accepts(&strings(&["food"]), "tech"));
        assert!(!accepts(&[], "tech"));
    }

    #[test]
    fn test_lists_ignores_wildcard() {
        assert!(lists(&strings(&["startup"]), "startup"));
        assert!(!lists(&strings(&["all"]), "startup"));
    }

    #[test]
    fn test_business_type_wildcard_not_honoured() {
        let profile = create_test_profile();
        let eligibility = Eligibility {
            business_types: strings(&["all"]),
            industry_sectors: strings(&["all"]),
            team_sizes: strings(&["all"]),
            funding_stages: strings(&["all"]),
            growth_goals: strings(&["networking"]),
        };

        let dims = match_dimensions(&profile, &eligibility);
        assert!(!dims.business_type);
        assert!(dims.industry_sector && dims.team_size && dims.funding_stage);
        assert!(dims.shared_goals.is_empty());
    }

    #[test]
    fn test_shared_goals_follow_profile_order() {
        let profile = create_test_profile();
        let eligibility = Eligibility {
            growth_goals: strings(&["digital", "products", "funding"]),
            ..Default::default()
        };

        let dims = match_dimensions(&profile, &eligibility);
        assert_eq!(dims.shared_goals, vec!["funding", "digital"]);
    }
}
