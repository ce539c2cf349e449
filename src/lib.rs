#![doc = "The `taskmate` library crate."]
#![doc = ""]
#![doc = "Task-management backend: registration and login with ledger-tracked session"]
#![doc = "tokens, and per-user task CRUD behind a bearer-token middleware. The binary"]
#![doc = "(`main.rs`) builds an `AppState` from configuration and mounts `routes::config`."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use error::AppError;
pub use state::AppState;
