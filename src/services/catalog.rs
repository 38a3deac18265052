//! Seed data for the support catalog.

use crate::models::{Eligibility, NewSupportResource, ResourceType};

fn list(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn opt(value: &str) -> Option<String> {
    Some(value.to_string())
}

/// The fixed list of support resources the service ships with
pub fn default_catalog() -> Vec<NewSupportResource> {
    vec![
        NewSupportResource {
            name: "Innovate UK Smart Grants".to_string(),
            resource_type: ResourceType::Funding,
            description: "Funding for game-changing innovations from any sector or business of any size.".to_string(),
            apply_url: "https://www.ukri.org/councils/innovate-uk/".to_string(),
            apply_text: opt("Apply Now"),
            amount: opt("£25,000 - £500,000"),
            deadline: opt("24 Nov 2023"),
            location: None,
            duration: None,
            sharia_compliant: true,
            eligibility: Eligibility {
                business_types: list(&["startup", "scale-up", "established"]),
                industry_sectors: list(&["tech", "healthcare", "manufacturing", "education", "creative"]),
                team_sizes: list(&["micro", "small", "medium", "large"]),
                funding_stages: list(&["seed", "early", "growth"]),
                growth_goals: list(&["funding", "products", "digital"]),
            },
        },
        NewSupportResource {
            name: "IFG Business Advisory".to_string(),
            resource_type: ResourceType::Mentorship,
            description: "Specialized business mentorship with experts who understand ethical business practices and principles.".to_string(),
            apply_url: "https://www.islamic-finance.com/".to_string(),
            apply_text: opt("Learn More"),
            amount: None,
            deadline: None,
            location: None,
            duration: opt("12-month programme"),
            sharia_compliant: true,
            eligibility: Eligibility {
                business_types: list(&["startup", "scale-up", "social-enterprise", "family-business"]),
                industry_sectors: list(&["all"]),
                team_sizes: list(&["solo", "micro", "small"]),
                funding_stages: list(&["pre-revenue", "seed", "early"]),
                growth_goals: list(&["advisory", "networking", "expansion"]),
            },
        },
        NewSupportResource {
            name: "Cur8 Business Network".to_string(),
            resource_type: ResourceType::Networking,
            description: "Connect with like-minded business owners committed to ethical practices and sustainable growth.".to_string(),
            apply_url: "https://cur8.network/".to_string(),
            apply_text: opt("Join Network"),
            amount: None,
            deadline: None,
            location: opt("London, Birmingham, Manchester"),
            duration: None,
            sharia_compliant: true,
            eligibility: Eligibility {
                business_types: list(&["all"]),
                industry_sectors: list(&["all"]),
                team_sizes: list(&["all"]),
                funding_stages: list(&["all"]),
                growth_goals: list(&["networking", "expansion", "advisory"]),
            },
        },
        NewSupportResource {
            name: "Ethical Business Accelerator".to_string(),
            resource_type: ResourceType::Accelerator,
            description: "A 6-month intensive program designed to help ethical businesses scale rapidly while maintaining their values.".to_string(),
            apply_url: "https://ethicalbusinessaccelerator.org/".to_string(),
            apply_text: opt("Apply for Next Cohort"),
            amount: None,
            deadline: opt("15 Jan 2024"),
            location: None,
            duration: opt("6-month program"),
            sharia_compliant: true,
            eligibility: Eligibility {
                business_types: list(&["startup", "scale-up", "social-enterprise"]),
                industry_sectors: list(&["tech", "food", "retail", "finance", "healthcare"]),
                team_sizes: list(&["micro", "small"]),
                funding_stages: list(&["seed", "early", "growth"]),
                growth_goals: list(&["funding", "expansion", "advisory", "digital"]),
            },
        },
        NewSupportResource {
            name: "Halal Investment Fund".to_string(),
            resource_type: ResourceType::Funding,
            description: "Equity investment for businesses following ethical financial principles, with a focus on long-term growth.".to_string(),
            apply_url: "https://halalinvestmentfund.com/".to_string(),
            apply_text: opt("Request Investment"),
            amount: opt("£50,000 - £1,000,000"),
            deadline: None,
            location: None,
            duration: None,
            sharia_compliant: true,
            eligibility: Eligibility {
                business_types: list(&["scale-up", "established", "family-business"]),
                industry_sectors: list(&["tech", "food", "healthcare", "education", "manufacturing", "retail"]),
                team_sizes: list(&["small", "medium"]),
                funding_stages: list(&["growth", "established"]),
                growth_goals: list(&["funding", "expansion"]),
            },
        },
        NewSupportResource {
            name: "Ethical Tech Alliance".to_string(),
            resource_type: ResourceType::Networking,
            description: "A community of technology businesses committed to ethical product development and responsible innovation.".to_string(),
            apply_url: "https://ethicaltechalliance.org/".to_string(),
            apply_text: opt("Join Alliance"),
            amount: None,
            deadline: None,
            location: opt("Online + quarterly events in major cities"),
            duration: None,
            sharia_compliant: true,
            eligibility: Eligibility {
                business_types: list(&["startup", "scale-up", "established"]),
                industry_sectors: list(&["tech", "creative"]),
                team_sizes: list(&["all"]),
                funding_stages: list(&["all"]),
                growth_goals: list(&["networking", "digital", "products"]),
            },
        },
        NewSupportResource {
            name: "Community Business Grant".to_string(),
            resource_type: ResourceType::Funding,
            description: "Grant funding for businesses that create positive impact in their local communities.".to_string(),
            apply_url: "https://communitybusinessfund.co.uk/".to_string(),
            apply_text: opt("Check Eligibility"),
            amount: opt("Up to £50,000"),
            deadline: opt("Rolling applications"),
            location: None,
            duration: None,
            sharia_compliant: true,
            eligibility: Eligibility {
                business_types: list(&["social-enterprise", "startup", "family-business"]),
                industry_sectors: list(&["food", "retail", "education", "healthcare", "creative", "professional"]),
                team_sizes: list(&["solo", "micro", "small"]),
                funding_stages: list(&["pre-revenue", "seed", "early"]),
                growth_goals: list(&["funding", "expansion", "products"]),
            },
        },
        NewSupportResource {
            name: "Export Growth Service".to_string(),
            resource_type: ResourceType::Advisory,
            description: "Specialized advice and support for businesses looking to expand internationally in an ethical way.".to_string(),
            apply_url: "https://exportgrowth.service/".to_string(),
            apply_text: opt("Book Consultation"),
            amount: None,
            deadline: None,
            location: None,
            duration: None,
            sharia_compliant: true,
            eligibility: Eligibility {
                business_types: list(&["scale-up", "established"]),
                industry_sectors: list(&["all"]),
                team_sizes: list(&["small", "medium", "large"]),
                funding_stages: list(&["growth", "established"]),
                growth_goals: list(&["expansion", "advisory"]),
            },
        },
        NewSupportResource {
            name: "Digital Skills Training Grant".to_string(),
            resource_type: ResourceType::Training,
            description: "Funding for staff training in digital skills, with a focus on ethical and responsible tech adoption.".to_string(),
            apply_url: "https://digitalskillstraining.org/".to_string(),
            apply_text: opt("Apply for Training"),
            amount: opt("50% of costs up to £5,000"),
            deadline: None,
            location: None,
            duration: None,
            sharia_compliant: true,
            eligibility: Eligibility {
                business_types: list(&["all"]),
                industry_sectors: list(&["all"]),
                team_sizes: list(&["micro", "small", "medium"]),
                funding_stages: list(&["all"]),
                growth_goals: list(&["digital", "advisory"]),
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_entries_have_every_dimension() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 9);

        for resource in &catalog {
            let e = &resource.eligibility;
            assert!(!e.business_types.is_empty(), "{} has no business types", resource.name);
            assert!(!e.industry_sectors.is_empty());
            assert!(!e.team_sizes.is_empty());
            assert!(!e.funding_stages.is_empty());
            assert!(!e.growth_goals.is_empty());
            assert!(resource.apply_url.starts_with("https://"));
        }
    }
}
