use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccountServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl AccountServiceError {
    /// NotFound for a member id with no matching account.
    pub fn no_such_member(member_id: &str) -> Self {
        Self::NotFound(format!("no account with member id {member_id}"))
    }
}

pub type Result<T> = std::result::Result<T, AccountServiceError>;
