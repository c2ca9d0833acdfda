//! Contract tests for the account service, run against the in-memory backend.
//! Every property here is part of the service contract and holds for any
//! `UserAccountService` implementation.

use chrono::NaiveDate;

use roster_core::error::AccountServiceError;
use roster_core::models::{
    CreateCertificationData, CreateLogInCredentialData, CreateUserAccountData, CreateWaiverData,
    UpdateUserAccountData, UserAccountStatus, UserAccountType,
};
use roster_core::services::{InMemoryUserAccountService, UserAccountService};

fn account_data(member_id: &str) -> CreateUserAccountData {
    CreateUserAccountData {
        member_id: member_id.to_string(),
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        email: format!("{}@example.org", member_id.to_lowercase()),
        phone_number: Some("555-0100".to_string()),
        account_type: UserAccountType::Standard,
        account_status: UserAccountStatus::Active,
        credential: None,
        certifications: Vec::new(),
        waivers: Vec::new(),
    }
}

fn update_from(data: &CreateUserAccountData, status: UserAccountStatus) -> UpdateUserAccountData {
    UpdateUserAccountData {
        member_id: data.member_id.clone(),
        first_name: data.first_name.clone(),
        last_name: data.last_name.clone(),
        email: data.email.clone(),
        phone_number: data.phone_number.clone(),
        account_type: data.account_type,
        account_status: status,
    }
}

#[tokio::test]
async fn create_then_get_returns_the_created_account() {
    let service = InMemoryUserAccountService::new();
    service.create_user(account_data("M100")).await.unwrap();

    let account = service.get_user_account("M100").await.unwrap();
    assert_eq!(account.member_id, "M100");
    assert_eq!(account.first_name, "Grace");
    assert_eq!(account.last_name, "Hopper");
    assert_eq!(account.email, "m100@example.org");
    assert_eq!(account.account_type, UserAccountType::Standard);
    assert_eq!(account.account_status, UserAccountStatus::Active);
}

#[tokio::test]
async fn duplicate_member_id_is_a_conflict_and_leaves_data_untouched() {
    let service = InMemoryUserAccountService::new();
    service.create_user(account_data("M100")).await.unwrap();

    let mut second = account_data("M100");
    second.first_name = "Imposter".to_string();
    let err = service.create_user(second).await.unwrap_err();
    assert!(matches!(err, AccountServiceError::Conflict(_)));

    let account = service.get_user_account("M100").await.unwrap();
    assert_eq!(account.first_name, "Grace");
}

#[tokio::test]
async fn get_unknown_member_is_not_found() {
    let service = InMemoryUserAccountService::new();
    let err = service.get_user_account("M404").await.unwrap_err();
    assert!(matches!(err, AccountServiceError::NotFound(_)));
}

#[tokio::test]
async fn update_never_creates_an_account() {
    let service = InMemoryUserAccountService::new();
    let data = account_data("M200");

    let err = service
        .update_user_account(update_from(&data, UserAccountStatus::Active))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountServiceError::NotFound(_)));

    let err = service.get_user_account("M200").await.unwrap_err();
    assert!(matches!(err, AccountServiceError::NotFound(_)));
}

#[tokio::test]
async fn list_by_type_returns_exactly_the_matching_set() {
    let service = InMemoryUserAccountService::new();

    let mut student = account_data("M301");
    student.account_type = UserAccountType::Student;
    service.create_user(student).await.unwrap();
    service.create_user(account_data("M302")).await.unwrap();
    service.create_user(account_data("M303")).await.unwrap();

    let standard = service
        .get_user_accounts(UserAccountType::Standard)
        .await
        .unwrap();
    let ids: Vec<&str> = standard.iter().map(|a| a.member_id.as_str()).collect();
    assert_eq!(ids, ["M302", "M303"]);

    let staff = service
        .get_user_accounts(UserAccountType::Staff)
        .await
        .unwrap();
    assert!(staff.is_empty());
}

#[tokio::test]
async fn validation_failure_surfaces_before_any_write() {
    let service = InMemoryUserAccountService::new();
    let mut data = account_data("");
    data.member_id = String::new();

    let err = service.create_user(data).await.unwrap_err();
    assert!(matches!(err, AccountServiceError::Validation(_)));
}

#[tokio::test]
async fn single_status_queries_pick_the_earliest_created_account() {
    let service = InMemoryUserAccountService::new();

    let mut first = account_data("M401");
    first.account_status = UserAccountStatus::Pending;
    service.create_user(first).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let mut second = account_data("M402");
    second.account_status = UserAccountStatus::Pending;
    service.create_user(second).await.unwrap();

    let pending = service.get_pending_user_account().await.unwrap();
    assert_eq!(pending.member_id, "M401");

    let err = service.get_suspended_user_account().await.unwrap_err();
    assert!(matches!(err, AccountServiceError::NotFound(_)));
}

#[tokio::test]
async fn listserv_projection_carries_only_contact_fields() {
    let service = InMemoryUserAccountService::new();
    service.create_user(account_data("M501")).await.unwrap();

    let mut other_type = account_data("M502");
    other_type.account_type = UserAccountType::Senior;
    service.create_user(other_type).await.unwrap();

    let entries = service
        .get_listserv_data(UserAccountType::Standard)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].member_id, "M501");
    assert_eq!(entries[0].first_name, "Grace");
    assert_eq!(entries[0].email, "m501@example.org");
}

#[tokio::test]
async fn credential_is_one_to_one_and_replaced_on_set() {
    let service = InMemoryUserAccountService::new();
    service.create_user(account_data("M600")).await.unwrap();

    service
        .set_log_in_credential(
            "M600",
            CreateLogInCredentialData {
                password_hash: "hash-one".to_string(),
                password_salt: "salt-one".to_string(),
            },
        )
        .await
        .unwrap();

    service
        .set_log_in_credential(
            "M600",
            CreateLogInCredentialData {
                password_hash: "hash-two".to_string(),
                password_salt: "salt-two".to_string(),
            },
        )
        .await
        .unwrap();

    let credential = service.get_log_in_credential("M600").await.unwrap();
    assert_eq!(credential.password_hash, "hash-two");

    let err = service
        .set_log_in_credential(
            "M999",
            CreateLogInCredentialData {
                password_hash: "h".to_string(),
                password_salt: "s".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AccountServiceError::NotFound(_)));
}

#[tokio::test]
async fn check_ins_list_newest_first() {
    let service = InMemoryUserAccountService::new();
    service.create_user(account_data("M700")).await.unwrap();

    service
        .record_check_in("M700", Some("front desk"))
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    service
        .record_check_in("M700", Some("wood shop"))
        .await
        .unwrap();

    let check_ins = service.get_check_in_activities("M700").await.unwrap();
    assert_eq!(check_ins.len(), 2);
    assert_eq!(check_ins[0].station.as_deref(), Some("wood shop"));
    assert_eq!(check_ins[1].station.as_deref(), Some("front desk"));

    let err = service.record_check_in("M999", None).await.unwrap_err();
    assert!(matches!(err, AccountServiceError::NotFound(_)));
}

#[tokio::test]
async fn deleting_an_account_removes_the_whole_owned_subgraph() {
    let service = InMemoryUserAccountService::new();

    let mut data = account_data("M800");
    data.credential = Some(CreateLogInCredentialData {
        password_hash: "hash".to_string(),
        password_salt: "salt".to_string(),
    });
    data.certifications.push(CreateCertificationData {
        name: "laser cutter".to_string(),
        awarded_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        expires_on: None,
    });
    data.waivers.push(CreateWaiverData {
        kind: "general liability".to_string(),
        signed_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        document_url: None,
    });
    service.create_user(data).await.unwrap();
    service.record_check_in("M800", None).await.unwrap();

    assert_eq!(service.get_certifications("M800").await.unwrap().len(), 1);
    assert_eq!(service.get_waivers("M800").await.unwrap().len(), 1);

    service.delete_user_account("M800").await.unwrap();

    let err = service.get_user_account("M800").await.unwrap_err();
    assert!(matches!(err, AccountServiceError::NotFound(_)));
    assert!(service.get_certifications("M800").await.unwrap().is_empty());
    assert!(service.get_waivers("M800").await.unwrap().is_empty());
    assert!(service
        .get_check_in_activities("M800")
        .await
        .unwrap()
        .is_empty());
    let err = service.get_log_in_credential("M800").await.unwrap_err();
    assert!(matches!(err, AccountServiceError::NotFound(_)));

    let err = service.delete_user_account("M800").await.unwrap_err();
    assert!(matches!(err, AccountServiceError::NotFound(_)));
}

/// Full lifecycle: create with a waiver, fetch, suspend, list by status,
/// delete, observe the owned subgraph gone.
#[tokio::test]
async fn account_lifecycle_end_to_end() {
    let service = InMemoryUserAccountService::new();

    let mut data = account_data("M100");
    data.waivers.push(CreateWaiverData {
        kind: "general liability".to_string(),
        signed_on: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        document_url: Some("https://files.example.org/waivers/m100.pdf".to_string()),
    });
    service.create_user(data.clone()).await.unwrap();

    let account = service.get_user_account("M100").await.unwrap();
    assert_eq!(account.member_id, "M100");
    assert_eq!(account.account_status, UserAccountStatus::Active);

    service
        .update_user_account(update_from(&data, UserAccountStatus::Suspended))
        .await
        .unwrap();

    let suspended = service
        .get_suspended_user_accounts(UserAccountType::Standard)
        .await
        .unwrap();
    assert_eq!(suspended.len(), 1);
    assert_eq!(suspended[0].member_id, "M100");

    service.delete_user_account("M100").await.unwrap();

    let err = service.get_user_account("M100").await.unwrap_err();
    assert!(matches!(err, AccountServiceError::NotFound(_)));
    assert!(service.get_waivers("M100").await.unwrap().is_empty());
}
