// Core algorithm exports
pub mod filters;
pub mod insights;
pub mod matcher;
pub mod scoring;

pub use filters::{accepts, lists, match_dimensions, DimensionMatches};
pub use insights::{
    combine_insights, generate_general_insights, generate_match_specific_insights, split_insights,
    InsightGenerator, MAX_GENERAL_INSIGHTS,
};
pub use matcher::{MatchResult, Matcher, MATCH_THRESHOLD};
pub use scoring::{calculate_match_score, MAX_SCORE};
