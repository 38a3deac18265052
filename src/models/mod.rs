// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BusinessProfile, EmailLog, Eligibility, Match, NewBusinessProfile, NewMatch, NewSupportResource,
    ResourceType, ScoredResource, ScoringWeights, SupportResource, WILDCARD,
};
pub use requests::{BusinessProfileRequest, EmailResultsRequest, ResultsQuery};
pub use responses::{
    EmailResultsResponse, ErrorResponse, FieldError, HealthResponse, MatchResults, MatchStatusResponse,
    ProfileCreatedResponse, RankedSupport,
};
