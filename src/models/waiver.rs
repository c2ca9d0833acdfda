use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

/// Signed liability waiver on file for a member.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Waiver {
    pub id: Uuid,
    pub member_id: String,
    pub kind: String,
    pub signed_on: NaiveDate,
    pub document_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateWaiverData {
    pub kind: String,
    pub signed_on: NaiveDate,
    pub document_url: Option<String>,
}

impl Waiver {
    pub async fn create(
        conn: &mut PgConnection,
        member_id: &str,
        data: &CreateWaiverData,
    ) -> Result<Self, sqlx::Error> {
        let waiver = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO waivers (member_id, kind, signed_on, document_url)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(member_id)
        .bind(&data.kind)
        .bind(data.signed_on)
        .bind(&data.document_url)
        .fetch_one(conn)
        .await?;

        Ok(waiver)
    }

    /// Lists a member's waivers, most recently signed first
    pub async fn list_for_member(pool: &PgPool, member_id: &str) -> Result<Vec<Self>, sqlx::Error> {
        let waivers = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM waivers
            WHERE member_id = $1
            ORDER BY signed_on DESC, kind ASC
            "#,
        )
        .bind(member_id)
        .fetch_all(pool)
        .await?;

        Ok(waivers)
    }
}
