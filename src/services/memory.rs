use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AccountServiceError, Result};
use crate::models::{
    Certification, CheckInActivity, CreateCertificationData, CreateLogInCredentialData,
    CreateUserAccountData, CreateWaiverData, ListservEntry, LogInCredential,
    UpdateUserAccountData, UserAccount, UserAccountStatus, UserAccountType, Waiver,
};
use crate::services::accounts::UserAccountService;

/// Everything a member owns, held inside one map entry. Removing the entry
/// drops the credential, certifications, waivers and check-ins with it, which
/// is the in-memory equivalent of the schema's cascade rules.
#[derive(Debug, Clone)]
struct AccountRecord {
    account: UserAccount,
    credential: Option<LogInCredential>,
    certifications: Vec<Certification>,
    waivers: Vec<Waiver>,
    check_ins: Vec<CheckInActivity>,
}

/// In-memory account service, keyed by member id.
///
/// Honors the exact contract of [`UserAccountService`] — same error taxonomy,
/// ordering and validation as the PostgreSQL implementation — so tests and
/// local tooling can run without a transactional store.
#[derive(Clone, Default)]
pub struct InMemoryUserAccountService {
    records: Arc<RwLock<HashMap<String, AccountRecord>>>,
}

impl InMemoryUserAccountService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserAccountService for InMemoryUserAccountService {
    async fn create_user(&self, data: CreateUserAccountData) -> Result<()> {
        data.validate()?;

        let mut records = self.records.write().await;
        if records.contains_key(&data.member_id) {
            return Err(AccountServiceError::Conflict(format!(
                "member id {} already exists",
                data.member_id
            )));
        }

        let now = Utc::now();
        let account = UserAccount {
            id: Uuid::new_v4(),
            member_id: data.member_id.clone(),
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            phone_number: data.phone_number,
            account_type: data.account_type,
            account_status: data.account_status,
            created_at: now,
            updated_at: now,
        };

        let credential = data.credential.map(|c| LogInCredential {
            id: Uuid::new_v4(),
            member_id: data.member_id.clone(),
            password_hash: c.password_hash,
            password_salt: c.password_salt,
            created_at: now,
            updated_at: now,
        });
        let certifications = data
            .certifications
            .into_iter()
            .map(|c| Certification {
                id: Uuid::new_v4(),
                member_id: data.member_id.clone(),
                name: c.name,
                awarded_on: c.awarded_on,
                expires_on: c.expires_on,
                created_at: now,
            })
            .collect();
        let waivers = data
            .waivers
            .into_iter()
            .map(|w| Waiver {
                id: Uuid::new_v4(),
                member_id: data.member_id.clone(),
                kind: w.kind,
                signed_on: w.signed_on,
                document_url: w.document_url,
                created_at: now,
            })
            .collect();

        records.insert(
            data.member_id.clone(),
            AccountRecord {
                account,
                credential,
                certifications,
                waivers,
                check_ins: Vec::new(),
            },
        );

        tracing::debug!(member_id = %data.member_id, "created user account");
        Ok(())
    }

    async fn get_user_account(&self, member_id: &str) -> Result<UserAccount> {
        let records = self.records.read().await;
        records
            .get(member_id)
            .map(|r| r.account.clone())
            .ok_or_else(|| AccountServiceError::no_such_member(member_id))
    }

    async fn get_suspended_user_account(&self) -> Result<UserAccount> {
        let records = self.records.read().await;
        records
            .values()
            .filter(|r| r.account.account_status == UserAccountStatus::Suspended)
            .min_by(|a, b| {
                a.account
                    .created_at
                    .cmp(&b.account.created_at)
                    .then_with(|| a.account.member_id.cmp(&b.account.member_id))
            })
            .map(|r| r.account.clone())
            .ok_or_else(|| AccountServiceError::NotFound("no suspended accounts".to_string()))
    }

    async fn get_pending_user_account(&self) -> Result<UserAccount> {
        let records = self.records.read().await;
        records
            .values()
            .filter(|r| r.account.account_status == UserAccountStatus::Pending)
            .min_by(|a, b| {
                a.account
                    .created_at
                    .cmp(&b.account.created_at)
                    .then_with(|| a.account.member_id.cmp(&b.account.member_id))
            })
            .map(|r| r.account.clone())
            .ok_or_else(|| AccountServiceError::NotFound("no pending accounts".to_string()))
    }

    async fn get_user_accounts(&self, account_type: UserAccountType) -> Result<Vec<UserAccount>> {
        let records = self.records.read().await;
        let mut accounts: Vec<UserAccount> = records
            .values()
            .filter(|r| r.account.account_type == account_type)
            .map(|r| r.account.clone())
            .collect();
        accounts.sort_by(|a, b| a.member_id.cmp(&b.member_id));
        Ok(accounts)
    }

    async fn get_suspended_user_accounts(
        &self,
        account_type: UserAccountType,
    ) -> Result<Vec<UserAccount>> {
        let records = self.records.read().await;
        let mut accounts: Vec<UserAccount> = records
            .values()
            .filter(|r| {
                r.account.account_type == account_type
                    && r.account.account_status == UserAccountStatus::Suspended
            })
            .map(|r| r.account.clone())
            .collect();
        accounts.sort_by(|a, b| a.member_id.cmp(&b.member_id));
        Ok(accounts)
    }

    async fn get_pending_user_accounts(
        &self,
        account_type: UserAccountType,
    ) -> Result<Vec<UserAccount>> {
        let records = self.records.read().await;
        let mut accounts: Vec<UserAccount> = records
            .values()
            .filter(|r| {
                r.account.account_type == account_type
                    && r.account.account_status == UserAccountStatus::Pending
            })
            .map(|r| r.account.clone())
            .collect();
        accounts.sort_by(|a, b| a.member_id.cmp(&b.member_id));
        Ok(accounts)
    }

    async fn get_listserv_data(
        &self,
        account_type: UserAccountType,
    ) -> Result<Vec<ListservEntry>> {
        let records = self.records.read().await;
        let mut entries: Vec<ListservEntry> = records
            .values()
            .filter(|r| r.account.account_type == account_type)
            .map(|r| ListservEntry {
                member_id: r.account.member_id.clone(),
                first_name: r.account.first_name.clone(),
                last_name: r.account.last_name.clone(),
                email: r.account.email.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.member_id.cmp(&b.member_id));
        Ok(entries)
    }

    async fn update_user_account(&self, updated: UpdateUserAccountData) -> Result<()> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&updated.member_id)
            .ok_or_else(|| AccountServiceError::no_such_member(&updated.member_id))?;

        record.account.first_name = updated.first_name;
        record.account.last_name = updated.last_name;
        record.account.email = updated.email;
        record.account.phone_number = updated.phone_number;
        record.account.account_type = updated.account_type;
        record.account.account_status = updated.account_status;
        record.account.updated_at = Utc::now();

        tracing::debug!(member_id = %updated.member_id, "updated user account");
        Ok(())
    }

    async fn delete_user_account(&self, member_id: &str) -> Result<()> {
        let mut records = self.records.write().await;
        records
            .remove(member_id)
            .ok_or_else(|| AccountServiceError::no_such_member(member_id))?;
        tracing::debug!(%member_id, "deleted user account and owned records");
        Ok(())
    }

    async fn get_log_in_credential(&self, member_id: &str) -> Result<LogInCredential> {
        let records = self.records.read().await;
        records
            .get(member_id)
            .and_then(|r| r.credential.clone())
            .ok_or_else(|| {
                AccountServiceError::NotFound(format!("no credential for member {member_id}"))
            })
    }

    async fn set_log_in_credential(
        &self,
        member_id: &str,
        data: CreateLogInCredentialData,
    ) -> Result<LogInCredential> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(member_id)
            .ok_or_else(|| AccountServiceError::no_such_member(member_id))?;

        let now = Utc::now();
        let credential = match record.credential.take() {
            Some(existing) => LogInCredential {
                password_hash: data.password_hash,
                password_salt: data.password_salt,
                updated_at: now,
                ..existing
            },
            None => LogInCredential {
                id: Uuid::new_v4(),
                member_id: member_id.to_string(),
                password_hash: data.password_hash,
                password_salt: data.password_salt,
                created_at: now,
                updated_at: now,
            },
        };
        record.credential = Some(credential.clone());
        Ok(credential)
    }

    async fn add_certification(
        &self,
        member_id: &str,
        data: CreateCertificationData,
    ) -> Result<Certification> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(member_id)
            .ok_or_else(|| AccountServiceError::no_such_member(member_id))?;

        let certification = Certification {
            id: Uuid::new_v4(),
            member_id: member_id.to_string(),
            name: data.name,
            awarded_on: data.awarded_on,
            expires_on: data.expires_on,
            created_at: Utc::now(),
        };
        record.certifications.push(certification.clone());
        Ok(certification)
    }

    async fn get_certifications(&self, member_id: &str) -> Result<Vec<Certification>> {
        let records = self.records.read().await;
        let mut certifications = records
            .get(member_id)
            .map(|r| r.certifications.clone())
            .unwrap_or_default();
        certifications.sort_by(|a, b| {
            b.awarded_on
                .cmp(&a.awarded_on)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(certifications)
    }

    async fn add_waiver(&self, member_id: &str, data: CreateWaiverData) -> Result<Waiver> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(member_id)
            .ok_or_else(|| AccountServiceError::no_such_member(member_id))?;

        let waiver = Waiver {
            id: Uuid::new_v4(),
            member_id: member_id.to_string(),
            kind: data.kind,
            signed_on: data.signed_on,
            document_url: data.document_url,
            created_at: Utc::now(),
        };
        record.waivers.push(waiver.clone());
        Ok(waiver)
    }

    async fn get_waivers(&self, member_id: &str) -> Result<Vec<Waiver>> {
        let records = self.records.read().await;
        let mut waivers = records
            .get(member_id)
            .map(|r| r.waivers.clone())
            .unwrap_or_default();
        waivers.sort_by(|a, b| {
            b.signed_on
                .cmp(&a.signed_on)
                .then_with(|| a.kind.cmp(&b.kind))
        });
        Ok(waivers)
    }

    async fn record_check_in(
        &self,
        member_id: &str,
        station: Option<&str>,
    ) -> Result<CheckInActivity> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(member_id)
            .ok_or_else(|| AccountServiceError::no_such_member(member_id))?;

        let activity = CheckInActivity {
            id: Uuid::new_v4(),
            member_id: member_id.to_string(),
            station: station.map(str::to_string),
            occurred_at: Utc::now(),
        };
        record.check_ins.push(activity.clone());
        Ok(activity)
    }

    async fn get_check_in_activities(&self, member_id: &str) -> Result<Vec<CheckInActivity>> {
        let records = self.records.read().await;
        let mut check_ins = records
            .get(member_id)
            .map(|r| r.check_ins.clone())
            .unwrap_or_default();
        check_ins.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(check_ins)
    }
}
