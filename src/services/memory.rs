use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{
    BusinessProfile, EmailLog, Match, NewBusinessProfile, NewMatch, NewSupportResource, SupportResource,
};
use crate::services::store::{ResultsStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    profiles: Vec<BusinessProfile>,
    resources: Vec<SupportResource>,
    matches: Vec<Match>,
    email_logs: Vec<EmailLog>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process store for local runs and tests.
///
/// Mirrors the Postgres client: same ordering rules, same upsert key.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every email log entry, oldest first
    pub async fn email_logs(&self) -> Vec<EmailLog> {
        self.tables.read().await.email_logs.clone()
    }

    /// Total match rows across all profiles
    pub async fn match_count(&self) -> usize {
        self.tables.read().await.matches.len()
    }
}

#[async_trait]
impl ResultsStore for MemoryStore {
    async fn create_profile(&self, profile: &NewBusinessProfile) -> Result<BusinessProfile, StoreError> {
        let mut tables = self.tables.write().await;
        let created = BusinessProfile {
            id: tables.next_id(),
            business_type: profile.business_type.clone(),
            industry_sector: profile.industry_sector.clone(),
            team_size: profile.team_size.clone(),
            funding_stage: profile.funding_stage.clone(),
            growth_goals: profile.growth_goals.clone(),
            notes: profile.notes.clone(),
            email: profile.email.clone(),
            created_at: chrono::Utc::now(),
        };
        tables.profiles.push(created.clone());
        Ok(created)
    }

    async fn profile(&self, id: i32) -> Result<Option<BusinessProfile>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn most_recent_profile(&self) -> Result<Option<BusinessProfile>, StoreError> {
        let tables = self.tables.read().await;
        // Later insertion wins on equal timestamps, same as ORDER BY created_at DESC, id DESC
        Ok(tables
            .profiles
            .iter()
            .max_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)))
            .cloned())
    }

    async fn update_profile_email(&self, id: i32, email: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let profile = tables
            .profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("business profile {}", id)))?;
        profile.email = Some(email.to_string());
        Ok(())
    }

    async fn all_resources(&self) -> Result<Vec<SupportResource>, StoreError> {
        Ok(self.tables.read().await.resources.clone())
    }

    async fn seed_resources(&self, resources: &[NewSupportResource]) -> Result<usize, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.resources.is_empty() {
            return Ok(0);
        }
        for resource in resources {
            let id = tables.next_id();
            tables.resources.push(resource.clone().with_id(id));
        }
        Ok(resources.len())
    }

    async fn replace_matches(&self, profile_id: i32, matches: &[NewMatch]) -> Result<Vec<Match>, StoreError> {
        if let Some(stray) = matches.iter().find(|m| m.business_profile_id != profile_id) {
            return Err(StoreError::InvalidData(format!(
                "match for profile {} passed while replacing profile {}",
                stray.business_profile_id, profile_id
            )));
        }

        let mut tables = self.tables.write().await;
        tables.matches.retain(|m| {
            m.business_profile_id != profile_id
                || matches.iter().any(|new| new.support_resource_id == m.support_resource_id)
        });

        let mut stored = Vec::with_capacity(matches.len());

        for new in matches {
            let existing = tables.matches.iter().position(|m| {
                m.business_profile_id == new.business_profile_id
                    && m.support_resource_id == new.support_resource_id
            });

            let row = match existing {
                Some(index) => {
                    let row = &mut tables.matches[index];
                    row.score = new.score;
                    row.insights = new.insights.clone();
                    row.clone()
                }
                None => {
                    let row = Match {
                        id: tables.next_id(),
                        business_profile_id: new.business_profile_id,
                        support_resource_id: new.support_resource_id,
                        score: new.score,
                        insights: new.insights.clone(),
                        created_at: chrono::Utc::now(),
                    };
                    tables.matches.push(row.clone());
                    row
                }
            };
            stored.push(row);
        }

        Ok(stored)
    }

    async fn matches_for_profile(&self, profile_id: i32) -> Result<Vec<Match>, StoreError> {
        let tables = self.tables.read().await;
        let mut matches: Vec<Match> = tables
            .matches
            .iter()
            .filter(|m| m.business_profile_id == profile_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.support_resource_id.cmp(&b.support_resource_id))
        });
        Ok(matches)
    }

    async fn set_profile_insights(&self, profile_id: i32, insights: &[String]) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let mut updated = 0;
        for row in tables.matches.iter_mut().filter(|m| m.business_profile_id == profile_id) {
            row.insights = insights.to_vec();
            updated += 1;
        }
        Ok(updated)
    }

    async fn log_email(
        &self,
        email: &str,
        profile_id: i32,
        success: bool,
        error_message: Option<&str>,
    ) -> Result<EmailLog, StoreError> {
        let mut tables = self.tables.write().await;
        let log = EmailLog {
            id: tables.next_id(),
            email: email.to_string(),
            business_profile_id: profile_id,
            sent_at: chrono::Utc::now(),
            success,
            error_message: error_message.map(str::to_string),
        };
        tables.email_logs.push(log.clone());
        Ok(log)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_profile(business_type: &str) -> NewBusinessProfile {
        NewBusinessProfile {
            business_type: business_type.to_string(),
            industry_sector: "tech".to_string(),
            team_size: "micro".to_string(),
            funding_stage: "seed".to_string(),
            growth_goals: vec!["funding".to_string()],
            notes: None,
            email: None,
        }
    }

    fn new_match(profile_id: i32, resource_id: i32, score: u8) -> NewMatch {
        NewMatch {
            business_profile_id: profile_id,
            support_resource_id: resource_id,
            score,
            insights: vec![format!("insight {}", resource_id)],
        }
    }

    #[tokio::test]
    async fn test_most_recent_profile() {
        let store = MemoryStore::new();
        assert!(store.most_recent_profile().await.unwrap().is_none());

        store.create_profile(&new_profile("startup")).await.unwrap();
        let second = store.create_profile(&new_profile("scale-up")).await.unwrap();

        let recent = store.most_recent_profile().await.unwrap().unwrap();
        assert_eq!(recent.id, second.id);
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_row_per_pair() {
        let store = MemoryStore::new();

        store.replace_matches(1, &[new_match(1, 10, 60), new_match(1, 11, 70)]).await.unwrap();
        store.replace_matches(1, &[new_match(1, 10, 80), new_match(1, 11, 70)]).await.unwrap();

        assert_eq!(store.match_count().await, 2);
        let matches = store.matches_for_profile(1).await.unwrap();
        assert_eq!(matches[0].support_resource_id, 10);
        assert_eq!(matches[0].score, 80);
    }

    #[tokio::test]
    async fn test_replace_prunes_dropped_pairs_of_that_profile_only() {
        let store = MemoryStore::new();

        store.replace_matches(1, &[new_match(1, 10, 60), new_match(1, 11, 70)]).await.unwrap();
        store.replace_matches(2, &[new_match(2, 10, 90)]).await.unwrap();

        store.replace_matches(1, &[new_match(1, 11, 75)]).await.unwrap();

        let first = store.matches_for_profile(1).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].support_resource_id, 11);
        assert_eq!(store.matches_for_profile(2).await.unwrap().len(), 1);

        store.replace_matches(1, &[]).await.unwrap();
        assert!(store.matches_for_profile(1).await.unwrap().is_empty());
        assert_eq!(store.match_count().await, 1);
    }

    #[tokio::test]
    async fn test_replace_rejects_other_profiles_rows() {
        let store = MemoryStore::new();
        let err = store.replace_matches(1, &[new_match(2, 10, 60)]).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_seed_skipped_when_catalog_present() {
        let store = MemoryStore::new();
        let catalog = crate::services::catalog::default_catalog();

        assert_eq!(store.seed_resources(&catalog).await.unwrap(), catalog.len());
        assert_eq!(store.seed_resources(&catalog).await.unwrap(), 0);
        assert_eq!(store.all_resources().await.unwrap().len(), catalog.len());
    }

    #[tokio::test]
    async fn test_update_email_for_missing_profile() {
        let store = MemoryStore::new();
        let err = store.update_profile_email(99, "a@b.co").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
