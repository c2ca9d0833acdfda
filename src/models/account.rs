use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::AccountServiceError;
use crate::models::{CreateCertificationData, CreateLogInCredentialData, CreateWaiverData};

/// Membership category, used to group accounts for queries and listserv export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_account_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserAccountType {
    Standard,
    Student,
    Senior,
    Staff,
}

impl UserAccountType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Student => "student",
            Self::Senior => "senior",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for UserAccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserAccountType {
    type Err = AccountServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "student" => Ok(Self::Student),
            "senior" => Ok(Self::Senior),
            "staff" => Ok(Self::Staff),
            _ => Err(AccountServiceError::Validation(format!(
                "invalid account type: {s}"
            ))),
        }
    }
}

/// Account status. New registrations start out pending until approved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_account_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserAccountStatus {
    Active,
    Suspended,
    #[default]
    Pending,
}

impl UserAccountStatus {
    /// Only active accounts may use their stored credential.
    pub const fn can_log_in(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for UserAccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserAccountStatus {
    type Err = AccountServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            "pending" => Ok(Self::Pending),
            _ => Err(AccountServiceError::Validation(format!(
                "invalid account status: {s}"
            ))),
        }
    }
}

/// A member account. `member_id` is the business key referenced by all child
/// records; `id` is the internal row identifier and never leaves storage.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserAccount {
    pub id: Uuid,
    pub member_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub account_type: UserAccountType,
    pub account_status: UserAccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Restricted projection of an account for mailing-list export.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ListservEntry {
    pub member_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct CreateUserAccountData {
    pub member_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub account_type: UserAccountType,
    pub account_status: UserAccountStatus,
    /// Child records attached at creation time.
    pub credential: Option<CreateLogInCredentialData>,
    pub certifications: Vec<CreateCertificationData>,
    pub waivers: Vec<CreateWaiverData>,
}

impl CreateUserAccountData {
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.member_id.trim().is_empty() {
            return Err(AccountServiceError::Validation(
                "member id must not be empty".to_string(),
            ));
        }
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(AccountServiceError::Validation(
                "first and last name must not be empty".to_string(),
            ));
        }
        if !self.email.contains('@') {
            return Err(AccountServiceError::Validation(format!(
                "invalid email address: {}",
                self.email
            )));
        }
        Ok(())
    }
}

/// Full replacement of the mutable fields of an existing account.
#[derive(Debug, Clone)]
pub struct UpdateUserAccountData {
    pub member_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub account_type: UserAccountType,
    pub account_status: UserAccountStatus,
}

impl UserAccount {
    /// Inserts a new account row. Runs on a caller-owned connection so it can
    /// participate in the same transaction as attached child inserts.
    pub async fn create(
        conn: &mut PgConnection,
        data: &CreateUserAccountData,
    ) -> Result<Self, sqlx::Error> {
        let account = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO user_accounts
                (member_id, first_name, last_name, email, phone_number, account_type, account_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&data.member_id)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.phone_number)
        .bind(data.account_type)
        .bind(data.account_status)
        .fetch_one(conn)
        .await?;

        Ok(account)
    }

    /// Finds an account by its member id
    pub async fn find_by_member_id(
        pool: &PgPool,
        member_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let account = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM user_accounts WHERE member_id = $1
            "#,
        )
        .bind(member_id)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    /// Finds the earliest-created account in the given status. Creation order
    /// makes the "single representative account" queries deterministic when
    /// several accounts share a status.
    pub async fn find_earliest_by_status(
        pool: &PgPool,
        status: UserAccountStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let account = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM user_accounts
            WHERE account_status = $1
            ORDER BY created_at ASC, member_id ASC
            LIMIT 1
            "#,
        )
        .bind(status)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    /// Lists accounts of a membership type
    pub async fn list_by_type(
        pool: &PgPool,
        account_type: UserAccountType,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let accounts = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM user_accounts
            WHERE account_type = $1
            ORDER BY member_id ASC
            "#,
        )
        .bind(account_type)
        .fetch_all(pool)
        .await?;

        Ok(accounts)
    }

    /// Lists accounts of a membership type further filtered by status
    pub async fn list_by_type_and_status(
        pool: &PgPool,
        account_type: UserAccountType,
        status: UserAccountStatus,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let accounts = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM user_accounts
            WHERE account_type = $1 AND account_status = $2
            ORDER BY member_id ASC
            "#,
        )
        .bind(account_type)
        .bind(status)
        .fetch_all(pool)
        .await?;

        Ok(accounts)
    }

    /// Mailing-list projection for accounts of a type. Selects only the
    /// name/contact columns so no other account data leaves storage.
    pub async fn listserv_by_type(
        pool: &PgPool,
        account_type: UserAccountType,
    ) -> Result<Vec<ListservEntry>, sqlx::Error> {
        let entries = sqlx::query_as::<_, ListservEntry>(
            r#"
            SELECT member_id, first_name, last_name, email
            FROM user_accounts
            WHERE account_type = $1
            ORDER BY member_id ASC
            "#,
        )
        .bind(account_type)
        .fetch_all(pool)
        .await?;

        Ok(entries)
    }

    /// Replaces the stored state of the account matching the member id.
    /// Returns the number of rows touched; zero means no such account.
    pub async fn update_by_member_id(
        pool: &PgPool,
        data: &UpdateUserAccountData,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE user_accounts
            SET
                first_name = $2,
                last_name = $3,
                email = $4,
                phone_number = $5,
                account_type = $6,
                account_status = $7,
                updated_at = NOW()
            WHERE member_id = $1
            "#,
        )
        .bind(&data.member_id)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.phone_number)
        .bind(data.account_type)
        .bind(data.account_status)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deletes an account. Child rows go with it via the schema's cascade
    /// rules, so the whole owned subgraph disappears in one statement.
    pub async fn delete_by_member_id(pool: &PgPool, member_id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_accounts WHERE member_id = $1
            "#,
        )
        .bind(member_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}
