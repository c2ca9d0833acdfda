use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{AccountServiceError, Result};
use crate::models::{
    Certification, CheckInActivity, CreateCertificationData, CreateLogInCredentialData,
    CreateUserAccountData, CreateWaiverData, ListservEntry, LogInCredential,
    UpdateUserAccountData, UserAccount, UserAccountStatus, UserAccountType, Waiver,
};

/// Operations available on user accounts, independent of storage mechanics.
///
/// All implementations must enforce the same contract: `member_id` is the
/// unique business key, child records live and die with their owning account,
/// and every failure surfaces through [`AccountServiceError`].
#[async_trait]
pub trait UserAccountService: Send + Sync {
    /// Persists a new account together with any attached child records, as
    /// one atomic operation. A duplicate member id is a `Conflict` and leaves
    /// existing data untouched.
    async fn create_user(&self, data: CreateUserAccountData) -> Result<()>;

    /// Returns the account with the given member id
    async fn get_user_account(&self, member_id: &str) -> Result<UserAccount>;

    /// Returns the earliest-created suspended account, if any is suspended.
    /// Creation order makes the pick deterministic when several match.
    async fn get_suspended_user_account(&self) -> Result<UserAccount>;

    /// Returns the earliest-created pending account
    async fn get_pending_user_account(&self) -> Result<UserAccount>;

    /// Returns all accounts of a membership type; empty when none match
    async fn get_user_accounts(&self, account_type: UserAccountType) -> Result<Vec<UserAccount>>;

    /// Returns suspended accounts of a membership type
    async fn get_suspended_user_accounts(
        &self,
        account_type: UserAccountType,
    ) -> Result<Vec<UserAccount>>;

    /// Returns pending accounts of a membership type
    async fn get_pending_user_accounts(
        &self,
        account_type: UserAccountType,
    ) -> Result<Vec<UserAccount>>;

    /// Returns the mailing-list projection for accounts of a type
    async fn get_listserv_data(
        &self,
        account_type: UserAccountType,
    ) -> Result<Vec<ListservEntry>>;

    /// Replaces the stored state of the account matching `updated.member_id`.
    /// Never creates a record: an unknown member id is `NotFound`.
    async fn update_user_account(&self, updated: UpdateUserAccountData) -> Result<()>;

    /// Deletes an account and its entire owned subgraph (credential,
    /// certifications, waivers, check-ins) atomically.
    async fn delete_user_account(&self, member_id: &str) -> Result<()>;

    /// Returns the member's stored credential
    async fn get_log_in_credential(&self, member_id: &str) -> Result<LogInCredential>;

    /// Creates or replaces the member's credential record
    async fn set_log_in_credential(
        &self,
        member_id: &str,
        data: CreateLogInCredentialData,
    ) -> Result<LogInCredential>;

    /// Records a certification for a member
    async fn add_certification(
        &self,
        member_id: &str,
        data: CreateCertificationData,
    ) -> Result<Certification>;

    /// Lists a member's certifications
    async fn get_certifications(&self, member_id: &str) -> Result<Vec<Certification>>;

    /// Records a signed waiver for a member
    async fn add_waiver(&self, member_id: &str, data: CreateWaiverData) -> Result<Waiver>;

    /// Lists a member's waivers
    async fn get_waivers(&self, member_id: &str) -> Result<Vec<Waiver>>;

    /// Records a check-in for a member
    async fn record_check_in(
        &self,
        member_id: &str,
        station: Option<&str>,
    ) -> Result<CheckInActivity>;

    /// Lists a member's check-ins, newest first
    async fn get_check_in_activities(&self, member_id: &str) -> Result<Vec<CheckInActivity>>;
}

/// PostgreSQL-backed account service. Queries live in the model modules;
/// this type owns transaction boundaries and error classification.
#[derive(Clone)]
pub struct PgUserAccountService {
    pool: PgPool,
}

impl PgUserAccountService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn conflict_on_unique(member_id: &str, e: sqlx::Error) -> AccountServiceError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AccountServiceError::Conflict(format!("member id {member_id} already exists"))
        }
        _ => AccountServiceError::Storage(e),
    }
}

fn not_found_on_fk(member_id: &str, e: sqlx::Error) -> AccountServiceError {
    match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            AccountServiceError::no_such_member(member_id)
        }
        _ => AccountServiceError::Storage(e),
    }
}

#[async_trait]
impl UserAccountService for PgUserAccountService {
    async fn create_user(&self, data: CreateUserAccountData) -> Result<()> {
        data.validate()?;

        let mut tx = self.pool.begin().await?;

        UserAccount::create(&mut *tx, &data)
            .await
            .map_err(|e| conflict_on_unique(&data.member_id, e))?;

        if let Some(credential) = &data.credential {
            LogInCredential::upsert(&mut *tx, &data.member_id, credential).await?;
        }
        for certification in &data.certifications {
            Certification::create(&mut *tx, &data.member_id, certification).await?;
        }
        for waiver in &data.waivers {
            Waiver::create(&mut *tx, &data.member_id, waiver).await?;
        }

        tx.commit().await?;

        tracing::debug!(member_id = %data.member_id, "created user account");
        Ok(())
    }

    async fn get_user_account(&self, member_id: &str) -> Result<UserAccount> {
        UserAccount::find_by_member_id(&self.pool, member_id)
            .await?
            .ok_or_else(|| AccountServiceError::no_such_member(member_id))
    }

    async fn get_suspended_user_account(&self) -> Result<UserAccount> {
        UserAccount::find_earliest_by_status(&self.pool, UserAccountStatus::Suspended)
            .await?
            .ok_or_else(|| AccountServiceError::NotFound("no suspended accounts".to_string()))
    }

    async fn get_pending_user_account(&self) -> Result<UserAccount> {
        UserAccount::find_earliest_by_status(&self.pool, UserAccountStatus::Pending)
            .await?
            .ok_or_else(|| AccountServiceError::NotFound("no pending accounts".to_string()))
    }

    async fn get_user_accounts(&self, account_type: UserAccountType) -> Result<Vec<UserAccount>> {
        Ok(UserAccount::list_by_type(&self.pool, account_type).await?)
    }

    async fn get_suspended_user_accounts(
        &self,
        account_type: UserAccountType,
    ) -> Result<Vec<UserAccount>> {
        Ok(UserAccount::list_by_type_and_status(
            &self.pool,
            account_type,
            UserAccountStatus::Suspended,
        )
        .await?)
    }

    async fn get_pending_user_accounts(
        &self,
        account_type: UserAccountType,
    ) -> Result<Vec<UserAccount>> {
        Ok(UserAccount::list_by_type_and_status(
            &self.pool,
            account_type,
            UserAccountStatus::Pending,
        )
        .await?)
    }

    async fn get_listserv_data(
        &self,
        account_type: UserAccountType,
    ) -> Result<Vec<ListservEntry>> {
        Ok(UserAccount::listserv_by_type(&self.pool, account_type).await?)
    }

    async fn update_user_account(&self, updated: UpdateUserAccountData) -> Result<()> {
        let rows = UserAccount::update_by_member_id(&self.pool, &updated).await?;
        if rows == 0 {
            return Err(AccountServiceError::no_such_member(&updated.member_id));
        }
        tracing::debug!(member_id = %updated.member_id, "updated user account");
        Ok(())
    }

    async fn delete_user_account(&self, member_id: &str) -> Result<()> {
        let rows = UserAccount::delete_by_member_id(&self.pool, member_id).await?;
        if rows == 0 {
            return Err(AccountServiceError::no_such_member(member_id));
        }
        tracing::debug!(%member_id, "deleted user account and owned records");
        Ok(())
    }

    async fn get_log_in_credential(&self, member_id: &str) -> Result<LogInCredential> {
        LogInCredential::find_by_member_id(&self.pool, member_id)
            .await?
            .ok_or_else(|| {
                AccountServiceError::NotFound(format!("no credential for member {member_id}"))
            })
    }

    async fn set_log_in_credential(
        &self,
        member_id: &str,
        data: CreateLogInCredentialData,
    ) -> Result<LogInCredential> {
        let mut conn = self.pool.acquire().await?;
        LogInCredential::upsert(&mut *conn, member_id, &data)
            .await
            .map_err(|e| not_found_on_fk(member_id, e))
    }

    async fn add_certification(
        &self,
        member_id: &str,
        data: CreateCertificationData,
    ) -> Result<Certification> {
        let mut conn = self.pool.acquire().await?;
        Certification::create(&mut *conn, member_id, &data)
            .await
            .map_err(|e| not_found_on_fk(member_id, e))
    }

    async fn get_certifications(&self, member_id: &str) -> Result<Vec<Certification>> {
        Ok(Certification::list_for_member(&self.pool, member_id).await?)
    }

    async fn add_waiver(&self, member_id: &str, data: CreateWaiverData) -> Result<Waiver> {
        let mut conn = self.pool.acquire().await?;
        Waiver::create(&mut *conn, member_id, &data)
            .await
            .map_err(|e| not_found_on_fk(member_id, e))
    }

    async fn get_waivers(&self, member_id: &str) -> Result<Vec<Waiver>> {
        Ok(Waiver::list_for_member(&self.pool, member_id).await?)
    }

    async fn record_check_in(
        &self,
        member_id: &str,
        station: Option<&str>,
    ) -> Result<CheckInActivity> {
        CheckInActivity::create(&self.pool, member_id, station)
            .await
            .map_err(|e| not_found_on_fk(member_id, e))
    }

    async fn get_check_in_activities(&self, member_id: &str) -> Result<Vec<CheckInActivity>> {
        Ok(CheckInActivity::list_for_member(&self.pool, member_id).await?)
    }
}
