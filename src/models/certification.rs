use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

/// Equipment or skill certification awarded to a member.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Certification {
    pub id: Uuid,
    pub member_id: String,
    pub name: String,
    pub awarded_on: NaiveDate,
    pub expires_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateCertificationData {
    pub name: String,
    pub awarded_on: NaiveDate,
    pub expires_on: Option<NaiveDate>,
}

impl Certification {
    pub async fn create(
        conn: &mut PgConnection,
        member_id: &str,
        data: &CreateCertificationData,
    ) -> Result<Self, sqlx::Error> {
        let certification = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO certifications (member_id, name, awarded_on, expires_on)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(member_id)
        .bind(&data.name)
        .bind(data.awarded_on)
        .bind(data.expires_on)
        .fetch_one(conn)
        .await?;

        Ok(certification)
    }

    /// Lists a member's certifications, most recently awarded first
    pub async fn list_for_member(
        pool: &PgPool,
        member_id: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let certifications = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM certifications
            WHERE member_id = $1
            ORDER BY awarded_on DESC, name ASC
            "#,
        )
        .bind(member_id)
        .fetch_all(pool)
        .await?;

        Ok(certifications)
    }
}
