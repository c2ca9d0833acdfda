use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A single front-desk check-in. `station` is optional free text naming where
/// the check-in happened.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CheckInActivity {
    pub id: Uuid,
    pub member_id: String,
    pub station: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl CheckInActivity {
    /// Records a check-in, stamped with the storage clock
    pub async fn create(
        pool: &PgPool,
        member_id: &str,
        station: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        let activity = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO check_in_activities (member_id, station)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(member_id)
        .bind(station)
        .fetch_one(pool)
        .await?;

        Ok(activity)
    }

    /// Lists check-ins for a member, newest first
    pub async fn list_for_member(
        pool: &PgPool,
        member_id: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let activities = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM check_in_activities
            WHERE member_id = $1
            ORDER BY occurred_at DESC
            "#,
        )
        .bind(member_id)
        .fetch_all(pool)
        .await?;

        Ok(activities)
    }
}
