// Services module - Account service contract and its storage backends

pub mod accounts;
pub mod memory;

pub use accounts::{PgUserAccountService, UserAccountService};
pub use memory::InMemoryUserAccountService;
