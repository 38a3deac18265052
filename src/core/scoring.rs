use crate::core::filters::match_dimensions;
use crate::models::{BusinessProfile, ScoringWeights, SupportResource};

/// Highest score a match can have
pub const MAX_SCORE: u8 = 100;

/// Calculate a match score (0-100) for a resource against a business profile
///
/// Scoring formula (default weights):
/// score = min(100,
///     20 * business_type_listed +      # no "all" wildcard for this dimension
///     20 * industry_sector_accepted +
///     15 * team_size_accepted +
///     15 * funding_stage_accepted +
///     10 * shared_growth_goals
/// )
pub fn calculate_match_score(
    profile: &BusinessProfile,
    resource: &SupportResource,
    weights: &ScoringWeights,
) -> u8 {
    let dims = match_dimensions(profile, &resource.eligibility);

    let mut total: u32 = 0;
    if dims.business_type {
        total = total.saturating_add(weights.business_type);
    }
    if dims.industry_sector {
        total = total.saturating_add(weights.industry_sector);
    }
    if dims.team_size {
        total = total.saturating_add(weights.team_size);
    }
    if dims.funding_stage {
        total = total.saturating_add(weights.funding_stage);
    }
    total = total.saturating_add(weights.growth_goal.saturating_mul(dims.shared_goals.len() as u32));

    total.min(MAX_SCORE as u32) as u8
}
