//! Database initialization
//!
//! Creates the SQLite database on first run and applies the schema for the
//! reference relations (roles, terms, majors) and the importable entities
//! (users, classes). Table creation is idempotent.
//!
//! Constraint naming matters to the import error translator: every length
//! limit is a CHECK constraint named `<table>_<column>_len`.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Busy timeout applied to every connection
const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Foreign keys are a per-connection setting in SQLite, so they are set on
    // the connect options rather than with a one-off PRAGMA.
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// Open a private in-memory database with the full schema
///
/// Uses a single connection that never expires: an in-memory SQLite database
/// lives exactly as long as its connection.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create every table (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_roles_table(pool).await?;
    create_terms_table(pool).await?;
    create_majors_table(pool).await?;
    create_classes_table(pool).await?;
    create_users_table(pool).await?;
    Ok(())
}

async fn create_roles_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS roles (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
                CONSTRAINT roles_name_len CHECK (length(name) <= 50),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_terms_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS terms (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
                CONSTRAINT terms_name_len CHECK (length(name) <= 100),
            starts_on TEXT,
            ends_on TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_majors_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS majors (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
                CONSTRAINT majors_name_len CHECK (length(name) <= 100),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_classes_table(pool: &SqlitePool) -> Result<()> {
    // homeroom_teacher_id references users, which is created afterwards;
    // SQLite resolves foreign key targets lazily.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS classes (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
                CONSTRAINT classes_name_len CHECK (length(name) <= 100),
            code TEXT UNIQUE
                CONSTRAINT classes_code_len CHECK (length(code) <= 32),
            room TEXT
                CONSTRAINT classes_room_len CHECK (length(room) <= 32),
            capacity INTEGER,
            term_id TEXT REFERENCES terms(id),
            major_id TEXT REFERENCES majors(id),
            homeroom_teacher_id TEXT REFERENCES users(id),
            tags TEXT NOT NULL DEFAULT '[]',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
                CONSTRAINT users_name_len CHECK (length(name) <= 100),
            email TEXT UNIQUE
                CONSTRAINT users_email_len CHECK (length(email) <= 255),
            username TEXT UNIQUE
                CONSTRAINT users_username_len CHECK (length(username) <= 50),
            phone TEXT
                CONSTRAINT users_phone_len CHECK (length(phone) <= 20),
            gender TEXT
                CONSTRAINT users_gender_len CHECK (length(gender) <= 16),
            birth_date TEXT
                CONSTRAINT users_birth_date_len CHECK (length(birth_date) <= 10),
            address TEXT
                CONSTRAINT users_address_len CHECK (length(address) <= 255),
            student_number TEXT UNIQUE
                CONSTRAINT users_student_number_len CHECK (length(student_number) <= 32),
            role_id TEXT REFERENCES roles(id),
            term_id TEXT REFERENCES terms(id),
            class_id TEXT REFERENCES classes(id),
            major_id TEXT REFERENCES majors(id),
            tags TEXT NOT NULL DEFAULT '[]',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
