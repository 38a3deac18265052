//! Insight generation
//!
//! General insights come from fixed templates keyed by literal profile
//! values and are sampled down to [`MAX_GENERAL_INSIGHTS`]. Match-specific
//! insights depend on the resource and are deterministic.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use crate::models::{BusinessProfile, ResourceType, SupportResource};

/// Upper bound on general insights shown per profile
pub const MAX_GENERAL_INSIGHTS: usize = 4;

/// Build every general insight the profile qualifies for, before sampling
pub fn general_insight_pool(profile: &BusinessProfile) -> Vec<&'static str> {
    let mut pool = Vec::new();

    match profile.business_type.as_str() {
        "startup" => pool.extend([
            "Consider exploring profit-sharing models for investment rather than traditional interest-based funding",
            "As a startup, building a strong ethical foundation now will make growth easier as you scale",
        ]),
        "scale-up" => pool.extend([
            "Scale-ups often benefit from structured mentorship programs that provide both business and ethical guidance",
            "Consider partnering with aligned businesses to share resources and reduce costs",
        ]),
        "social-enterprise" => pool.extend([
            "Social enterprises can often access special funding opportunities focused on community impact",
            "Measuring and reporting your social impact can strengthen applications for ethical business support",
        ]),
        _ => {}
    }

    match profile.industry_sector.as_str() {
        "tech" => pool.extend([
            "Ethical technology businesses often find success with B-Corp certification, which can open doors to aligned investors",
            "Tech businesses should consider how their products promote digital inclusion and access",
        ]),
        "food" => pool.extend([
            "Food businesses with ethical sourcing and transparent supply chains often qualify for specialized support programs",
            "Consider halal certification to expand your market reach and qualify for specialized funding",
        ]),
        "finance" => pool.extend([
            "Financial businesses should explore Islamic finance principles to broaden their ethical offering",
            "Consider joining specialized networks for ethical finance professionals",
        ]),
        _ => {}
    }

    match profile.team_size.as_str() {
        "solo" | "micro" => pool.extend([
            "Small teams should leverage community resources and shared workspaces to reduce overhead costs",
            "Consider joining an incubator that specializes in ethical business practices",
        ]),
        "small" => pool.extend([
            "Your sector typically sees growth challenges around the 15-employee mark – investing in management structures now could help",
            "Businesses of your size often benefit from peer-learning networks with similar-sized organizations",
        ]),
        _ => {}
    }

    match profile.funding_stage.as_str() {
        "pre-revenue" | "seed" => pool.extend([
            "Early-stage businesses should focus on building relationships with ethical investors before they need capital",
            "Consider crowd-funding platforms that align with ethical finance principles",
        ]),
        "growth" => pool.extend([
            "Growth-stage businesses often need to balance scaling operations with maintaining their ethical standards",
            "Consider engaging with specialized ethical business accelerators",
        ]),
        _ => {}
    }

    if profile.has_goal("funding") {
        pool.extend([
            "When seeking funding, prepare to clearly articulate how your ethical principles create business value",
            "Different types of funding have different implications for your business control - research thoroughly",
        ]);
    }

    if profile.has_goal("expansion") {
        pool.extend([
            "When expanding to new markets, consider partnering with local businesses that share your ethical values",
            "International expansion often benefits from cultural advisors who understand ethical business practices in target markets",
        ]);
    }

    pool
}

/// Sample at most [`MAX_GENERAL_INSIGHTS`] general insights without replacement
pub fn generate_general_insights<R: Rng + ?Sized>(profile: &BusinessProfile, rng: &mut R) -> Vec<String> {
    let pool = general_insight_pool(profile);
    pool.choose_multiple(rng, MAX_GENERAL_INSIGHTS)
        .map(|s| s.to_string())
        .collect()
}

/// Insights tied to a specific accepted resource
pub fn generate_match_specific_insights(profile: &BusinessProfile, resource: &SupportResource) -> Vec<String> {
    let mut insights = Vec::new();
    let name = &resource.name;

    match resource.resource_type {
        ResourceType::Funding if profile.has_goal("funding") => insights.push(format!(
            "{name} offers funding that aligns with ethical finance principles, which matches your funding goals"
        )),
        ResourceType::Mentorship if profile.has_goal("advisory") => insights.push(format!(
            "The mentorship from {name} can help address the common challenges in your business stage"
        )),
        ResourceType::Networking if profile.has_goal("networking") => insights.push(format!(
            "{name} has a specific network for businesses in your industry that meets regularly"
        )),
        _ => {}
    }

    if resource.sharia_compliant {
        insights.push(format!(
            "{name} is fully compliant with ethical finance principles, making it suitable for your business values"
        ));
    }

    insights
}

/// General insights followed by each match's insights, in match order
pub fn combine_insights<I>(general: Vec<String>, per_match: I) -> Vec<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut combined = general;
    for insights in per_match {
        combined.extend(insights);
    }
    combined
}

/// Split insights positionally for the "growth" and "ethical" columns.
/// The first half gets the extra item when the length is odd.
pub fn split_insights(insights: &[String]) -> (&[String], &[String]) {
    insights.split_at(insights.len().div_ceil(2))
}

/// General insight generator with an injectable random source
pub struct InsightGenerator {
    rng: Mutex<StdRng>,
}

impl InsightGenerator {
    /// Generator seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Generator with reproducible output
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::new(),
        }
    }

    pub fn general(&self, profile: &BusinessProfile) -> Vec<String> {
        // A poisoned lock only means another sampler panicked; the RNG state is still usable
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        generate_general_insights(profile, &mut *rng)
    }
}

impl Default for InsightGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InsightGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsightGenerator").finish_non_exhaustive()
    }
}
