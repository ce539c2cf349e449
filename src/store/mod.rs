//! Persistence boundary.
//!
//! Each store is a trait so handlers and the auth service only ever see
//! `Arc<dyn ...>`. The PostgreSQL implementations live next to their trait;
//! [`memory`] holds in-process implementations with the same semantics.

pub mod memory;
pub mod tasks;
pub mod tokens;
pub mod users;

pub use tasks::{PgTaskStore, TaskStore};
pub use tokens::{PgTokenLedger, TokenLedger};
pub use users::{CredentialStore, PgCredentialStore};
