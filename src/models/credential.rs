use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

/// Stored login credential. At most one per member; hashing happens upstream,
/// this layer only keeps the opaque hash and salt.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LogInCredential {
    pub id: Uuid,
    pub member_id: String,
    pub password_hash: String,
    pub password_salt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateLogInCredentialData {
    pub password_hash: String,
    pub password_salt: String,
}

impl LogInCredential {
    /// Inserts or replaces the member's credential. The member_id unique
    /// constraint keeps this one-to-one.
    pub async fn upsert(
        conn: &mut PgConnection,
        member_id: &str,
        data: &CreateLogInCredentialData,
    ) -> Result<Self, sqlx::Error> {
        let credential = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO log_in_credentials (member_id, password_hash, password_salt)
            VALUES ($1, $2, $3)
            ON CONFLICT (member_id) DO UPDATE
            SET password_hash = EXCLUDED.password_hash,
                password_salt = EXCLUDED.password_salt,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(member_id)
        .bind(&data.password_hash)
        .bind(&data.password_salt)
        .fetch_one(conn)
        .await?;

        Ok(credential)
    }

    /// Finds the credential for a member
    pub async fn find_by_member_id(
        pool: &PgPool,
        member_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let credential = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM log_in_credentials WHERE member_id = $1
            "#,
        )
        .bind(member_id)
        .fetch_optional(pool)
        .await?;

        Ok(credential)
    }
}
