//! PostgreSQL pool construction and idempotent schema bootstrap.

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Executor;
use std::time::Duration;

use crate::config::Config;

/// Statements run at start-up, in order. Each one is safe to run against an
/// already-initialised database.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        full_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE TABLE IF NOT EXISTS tokens (
        id SERIAL PRIMARY KEY,
        user_id INT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        token TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        expires_at TIMESTAMPTZ NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE
    )",
    "CREATE INDEX IF NOT EXISTS tokens_token_idx ON tokens (token)",
    "DO $$ BEGIN
        CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'review', 'done');
    EXCEPTION WHEN duplicate_object THEN NULL;
    END $$",
    "DO $$ BEGIN
        CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high', 'urgent');
    EXCEPTION WHEN duplicate_object THEN NULL;
    END $$",
    "CREATE TABLE IF NOT EXISTS tasks (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT,
        status task_status NOT NULL DEFAULT 'todo',
        priority task_priority,
        due_date TIMESTAMPTZ,
        user_id INT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE INDEX IF NOT EXISTS tasks_user_created_idx ON tasks (user_id, created_at DESC)",
];

/// Creates the connection pool. Connections are acquired per query and returned
/// immediately afterwards.
pub async fn create_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    log::debug!(
        "Connecting to {}:{}/{}",
        config.db_host,
        config.db_port,
        config.db_name
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&config.database_url())
        .await?;

    log::info!("Database connection pool created");
    Ok(pool)
}

/// Creates the `users`, `tokens` and `tasks` tables (and their enum types) if missing.
pub async fn bootstrap(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Plain `&str` goes over the simple-query protocol, which `DO` blocks need.
    for statement in SCHEMA {
        pool.execute(*statement).await?;
    }
    log::info!("Database schema ready");
    Ok(())
}
