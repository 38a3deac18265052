use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;

use crate::models::{
    BusinessProfile, EmailLog, Eligibility, Match, NewBusinessProfile, NewMatch, NewSupportResource,
    ResourceType, SupportResource,
};
use crate::services::store::{ResultsStore, StoreError};

const PROFILE_COLUMNS: &str =
    "id, business_type, industry_sector, team_size, funding_stage, growth_goals, notes, email, created_at";

const RESOURCE_COLUMNS: &str = "id, name, type, description, apply_url, apply_text, amount, deadline, \
     location, duration, sharia_compliant, suitable_for";

const MATCH_COLUMNS: &str =
    "id, business_profile_id, support_resource_id, match_score, insights, created_at";

/// PostgreSQL client for profiles, the support catalog, matches and email logs
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

fn profile_from_row(row: &PgRow) -> Result<BusinessProfile, StoreError> {
    let growth_goals: Json<Vec<String>> = row.try_get("growth_goals")?;
    Ok(BusinessProfile {
        id: row.try_get("id")?,
        business_type: row.try_get("business_type")?,
        industry_sector: row.try_get("industry_sector")?,
        team_size: row.try_get("team_size")?,
        funding_stage: row.try_get("funding_stage")?,
        growth_goals: growth_goals.0,
        notes: row.try_get("notes")?,
        email: row.try_get("email")?,
        created_at: row.try_get("created_at")?,
    })
}

fn resource_from_row(row: &PgRow) -> Result<SupportResource, StoreError> {
    let raw_type: String = row.try_get("type")?;
    let resource_type: ResourceType = raw_type
        .parse()
        .map_err(|e: crate::models::domain::UnknownResourceType| StoreError::InvalidData(e.to_string()))?;
    let eligibility: Json<Eligibility> = row.try_get("suitable_for")?;

    Ok(SupportResource {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        resource_type,
        description: row.try_get("description")?,
        apply_url: row.try_get("apply_url")?,
        apply_text: row.try_get("apply_text")?,
        amount: row.try_get("amount")?,
        deadline: row.try_get("deadline")?,
        location: row.try_get("location")?,
        duration: row.try_get("duration")?,
        sharia_compliant: row.try_get("sharia_compliant")?,
        eligibility: eligibility.0,
    })
}

fn match_from_row(row: &PgRow) -> Result<Match, StoreError> {
    let raw_score: i32 = row.try_get("match_score")?;
    let score = u8::try_from(raw_score)
        .map_err(|_| StoreError::InvalidData(format!("match score out of range: {}", raw_score)))?;
    let insights: Option<Json<Vec<String>>> = row.try_get("insights")?;

    Ok(Match {
        id: row.try_get("id")?,
        business_profile_id: row.try_get("business_profile_id")?,
        support_resource_id: row.try_get("support_resource_id")?,
        score,
        insights: insights.map(|j| j.0).unwrap_or_default(),
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl ResultsStore for PostgresClient {
    async fn create_profile(&self, profile: &NewBusinessProfile) -> Result<BusinessProfile, StoreError> {
        let query = format!(
            r#"
            INSERT INTO business_profiles
                (business_type, industry_sector, team_size, funding_stage, growth_goals, notes, email)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PROFILE_COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(&profile.business_type)
            .bind(&profile.industry_sector)
            .bind(&profile.team_size)
            .bind(&profile.funding_stage)
            .bind(Json(&profile.growth_goals))
            .bind(&profile.notes)
            .bind(&profile.email)
            .fetch_one(&self.pool)
            .await?;

        let created = profile_from_row(&row)?;
        tracing::debug!("Created business profile {}", created.id);
        Ok(created)
    }

    async fn profile(&self, id: i32) -> Result<Option<BusinessProfile>, StoreError> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM business_profiles WHERE id = $1");

        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(profile_from_row).transpose()
    }

    async fn most_recent_profile(&self) -> Result<Option<BusinessProfile>, StoreError> {
        let query = format!(
            "SELECT {PROFILE_COLUMNS} FROM business_profiles ORDER BY created_at DESC, id DESC LIMIT 1"
        );

        let row = sqlx::query(&query).fetch_optional(&self.pool).await?;
        row.as_ref().map(profile_from_row).transpose()
    }

    async fn update_profile_email(&self, id: i32, email: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE business_profiles SET email = $1 WHERE id = $2")
            .bind(email)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("business profile {}", id)));
        }
        Ok(())
    }

    async fn all_resources(&self) -> Result<Vec<SupportResource>, StoreError> {
        let query = format!("SELECT {RESOURCE_COLUMNS} FROM support_resources ORDER BY id");

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        rows.iter().map(resource_from_row).collect()
    }

    async fn seed_resources(&self, resources: &[NewSupportResource]) -> Result<usize, StoreError> {
        let mut tx = self.pool.begin().await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM support_resources")
            .fetch_one(&mut *tx)
            .await?;

        if existing > 0 {
            tracing::info!("Skipping support resource seeding, {} resources already exist", existing);
            return Ok(0);
        }

        for resource in resources {
            sqlx::query(
                r#"
                INSERT INTO support_resources
                    (name, type, description, apply_url, apply_text, amount, deadline,
                     location, duration, sharia_compliant, suitable_for)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(&resource.name)
            .bind(resource.resource_type.as_str())
            .bind(&resource.description)
            .bind(&resource.apply_url)
            .bind(&resource.apply_text)
            .bind(&resource.amount)
            .bind(&resource.deadline)
            .bind(&resource.location)
            .bind(&resource.duration)
            .bind(resource.sharia_compliant)
            .bind(Json(&resource.eligibility))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!("Inserted {} support resources", resources.len());
        Ok(resources.len())
    }

    /// Uses INSERT ... ON CONFLICT so re-running matching for a profile
    /// refreshes score and insights instead of duplicating rows.
    async fn replace_matches(&self, profile_id: i32, matches: &[NewMatch]) -> Result<Vec<Match>, StoreError> {
        let query = format!(
            r#"
            INSERT INTO matches (business_profile_id, support_resource_id, match_score, insights)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (business_profile_id, support_resource_id)
            DO UPDATE SET
                match_score = EXCLUDED.match_score,
                insights = EXCLUDED.insights
            RETURNING {MATCH_COLUMNS}
            "#
        );

        let keep: Vec<i32> = matches.iter().map(|m| m.support_resource_id).collect();

        let mut tx = self.pool.begin().await?;

        let pruned = sqlx::query(
            "DELETE FROM matches WHERE business_profile_id = $1 AND NOT (support_resource_id = ANY($2))",
        )
        .bind(profile_id)
        .bind(&keep)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let mut stored = Vec::with_capacity(matches.len());

        for new in matches {
            if new.business_profile_id != profile_id {
                return Err(StoreError::InvalidData(format!(
                    "match for profile {} passed while replacing profile {}",
                    new.business_profile_id, profile_id
                )));
            }
            let row = sqlx::query(&query)
                .bind(new.business_profile_id)
                .bind(new.support_resource_id)
                .bind(i32::from(new.score))
                .bind(Json(&new.insights))
                .fetch_one(&mut *tx)
                .await?;
            stored.push(match_from_row(&row)?);
        }

        tx.commit().await?;

        tracing::debug!("Upserted {} matches, pruned {} for profile {}", stored.len(), pruned, profile_id);
        Ok(stored)
    }

    async fn matches_for_profile(&self, profile_id: i32) -> Result<Vec<Match>, StoreError> {
        let query = format!(
            r#"
            SELECT {MATCH_COLUMNS}
            FROM matches
            WHERE business_profile_id = $1
            ORDER BY match_score DESC, support_resource_id ASC
            "#
        );

        let rows = sqlx::query(&query).bind(profile_id).fetch_all(&self.pool).await?;
        rows.iter().map(match_from_row).collect()
    }

    async fn set_profile_insights(&self, profile_id: i32, insights: &[String]) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE matches SET insights = $1 WHERE business_profile_id = $2")
            .bind(Json(insights))
            .bind(profile_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn log_email(
        &self,
        email: &str,
        profile_id: i32,
        success: bool,
        error_message: Option<&str>,
    ) -> Result<EmailLog, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO email_logs (email, business_profile_id, success, error_message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, business_profile_id, sent_at, success, error_message
            "#,
        )
        .bind(email)
        .bind(profile_id)
        .bind(success)
        .bind(error_message)
        .fetch_one(&self.pool)
        .await?;

        Ok(EmailLog {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            business_profile_id: row.try_get("business_profile_id")?,
            sent_at: row.try_get("sent_at")?,
            success: row.try_get("success")?,
            error_message: row.try_get("error_message")?,
        })
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
