use crate::core::{insights::generate_match_specific_insights, scoring::calculate_match_score};
use crate::models::{BusinessProfile, ScoredResource, ScoringWeights, SupportResource};

/// Minimum score a resource needs to be kept as a match
pub const MATCH_THRESHOLD: u8 = 50;

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<ScoredResource>,
    pub total_resources: usize,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Score every catalog resource against the profile
/// 2. Keep resources at or above [`MATCH_THRESHOLD`]
/// 3. Attach match-specific insights
/// 4. Rank by score
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a single resource without applying the threshold
    pub fn score(&self, profile: &BusinessProfile, resource: &SupportResource) -> u8 {
        calculate_match_score(profile, resource, &self.weights)
    }

    /// Find the catalog resources that suit a business profile
    ///
    /// # Arguments
    /// * `profile` - The submitted business profile
    /// * `catalog` - Every support resource on offer
    ///
    /// # Returns
    /// MatchResult with accepted resources, highest score first. Equal
    /// scores are ordered by ascending resource id.
    pub fn find_matches(&self, profile: &BusinessProfile, catalog: &[SupportResource]) -> MatchResult {
        let total_resources = catalog.len();

        let mut matches: Vec<ScoredResource> = catalog
            .iter()
            .filter_map(|resource| {
                let score = self.score(profile, resource);
                if score < MATCH_THRESHOLD {
                    return None;
                }

                Some(ScoredResource {
                    insights: generate_match_specific_insights(profile, resource),
                    resource: resource.clone(),
                    score,
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.resource.id.cmp(&b.resource.id))
        });

        MatchResult {
            matches,
            total_resources,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Eligibility, ResourceType};
    use chrono::Utc;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn create_resource(id: i32, business_types: &[&str], sectors: &[&str], goals: &[&str]) -> SupportResource {
        SupportResource {
            id,
            name: format!("Resource {}", id),
            resource_type: ResourceType::Funding,
            description: "desc".to_string(),
            apply_url: "https://example.org".to_string(),
            apply_text: None,
            amount: None,
            deadline: None,
            location: None,
            duration: None,
            sharia_compliant: true,
            eligibility: Eligibility {
                business_types: strings(business_types),
                industry_sectors: strings(sectors),
                team_sizes: strings(&["all"]),
                funding_stages: strings(&["seed"]),
                growth_goals: strings(goals),
            },
        }
    }

    fn create_profile() -> BusinessProfile {
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
    fn test_find_matches_applies_threshold() {
        let matcher = Matcher::with_default_weights();
        let profile = create_profile();

        let catalog = vec![
            create_resource(1, &["startup"], &["tech"], &["funding"]),  // 80
            create_resource(2, &["established"], &["food"], &[]),       // 30
            create_resource(3, &["established"], &["tech"], &["digital"]), // 60
        ];

        let result = matcher.find_matches(&profile, &catalog);

        assert_eq!(result.total_resources, 3);
        assert_eq!(result.matches.len(), 2);
        assert!(result.matches.iter().all(|m| m.score >= MATCH_THRESHOLD));
    }

    #[test]
    fn test_matches_sorted_by_score() {
        let matcher = Matcher::with_default_weights();
        let profile = create_profile();

        let catalog = vec![
            create_resource(1, &["established"], &["tech"], &["digital"]),
            create_resource(2, &["startup"], &["tech"], &["funding", "digital"]),
            create_resource(3, &["startup"], &["tech"], &[]),
        ];

        let result = matcher.find_matches(&profile, &catalog);
        let scores: Vec<u8> = result.matches.iter().map(|m| m.score).collect();

        assert_eq!(scores, vec![90, 70, 60]);
    }

    #[test]
    fn test_ties_ordered_by_resource_id() {
        let matcher = Matcher::with_default_weights();
        let profile = create_profile();

        let catalog = vec![
            create_resource(9, &["startup"], &["tech"], &[]),
            create_resource(4, &["startup"], &["tech"], &[]),
        ];

        let result = matcher.find_matches(&profile, &catalog);
        let ids: Vec<i32> = result.matches.iter().map(|m| m.resource.id).collect();

        assert_eq!(ids, vec![4, 9]);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let matcher = Matcher::with_default_weights();
        let profile = create_profile();

        let catalog = vec![create_resource(1, &["established"], &["food"], &[])];
        let result = matcher.find_matches(&profile, &catalog);

        assert!(result.matches.is_empty());
        assert!(matcher.find_matches(&profile, &[]).matches.is_empty());
    }

    #[test]
    fn test_match_insights_attached() {
        let matcher = Matcher::with_default_weights();
        let profile = create_profile();

        let catalog = vec![create_resource(1, &["startup"], &["tech"], &["funding"])];
        let result = matcher.find_matches(&profile, &catalog);

        assert_eq!(result.matches[0].insights.len(), 2);
        assert!(result.matches[0].insights[0].starts_with("Resource 1 offers funding"));
    }
}
