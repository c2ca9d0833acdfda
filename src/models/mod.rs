// Models module - Database entity representations

pub mod account;
pub mod certification;
pub mod check_in;
pub mod credential;
pub mod waiver;

pub use account::{
    CreateUserAccountData, ListservEntry, UpdateUserAccountData, UserAccount, UserAccountStatus,
    UserAccountType,
};
pub use certification::{Certification, CreateCertificationData};
pub use check_in::CheckInActivity;
pub use credential::{CreateLogInCredentialData, LogInCredential};
pub use waiver::{CreateWaiverData, Waiver};
