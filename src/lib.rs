//! Business Baraka Finder - matching service for ethical business support
//!
//! Scores a submitted business profile against a catalog of support
//! resources (funding, mentorship, networking, accelerators, training and
//! advisory), stores the accepted matches with personalised insights, and
//! delivers the results as JSON, PDF or email.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{calculate_match_score, Matcher, MATCH_THRESHOLD};
pub use models::{BusinessProfile, MatchResults, ScoringWeights, SupportResource};
pub use services::{MatchingService, ResultsStore};
