//! Reference data maintenance and row lookups
//!
//! Roles, terms and majors are maintained outside the import pipeline; these
//! helpers exist for provisioning and for inspecting imported rows.

use crate::db::models::{ClassGroup, Major, Role, Term, User};
use crate::Result;
use sqlx::SqlitePool;

pub async fn insert_role(pool: &SqlitePool, id: &str, name: &str) -> Result<()> {
    sqlx::query("INSERT INTO roles (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn insert_term(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    starts_on: Option<&str>,
    ends_on: Option<&str>,
) -> Result<()> {
    sqlx::query("INSERT INTO terms (id, name, starts_on, ends_on) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(name)
        .bind(starts_on)
        .bind(ends_on)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn insert_major(pool: &SqlitePool, id: &str, name: &str) -> Result<()> {
    sqlx::query("INSERT INTO majors (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await?;
    Ok(())
}

/// Insert a bare class group (name only), e.g. for provisioning references
pub async fn insert_class(pool: &SqlitePool, id: &str, name: &str) -> Result<()> {
    sqlx::query("INSERT INTO classes (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_roles(pool: &SqlitePool) -> Result<Vec<Role>> {
    Ok(sqlx::query_as::<_, Role>("SELECT id, name, created_at FROM roles ORDER BY name")
        .fetch_all(pool)
        .await?)
}

pub async fn list_terms(pool: &SqlitePool) -> Result<Vec<Term>> {
    Ok(sqlx::query_as::<_, Term>(
        "SELECT id, name, starts_on, ends_on, created_at FROM terms ORDER BY starts_on, name",
    )
    .fetch_all(pool)
    .await?)
}

pub async fn list_majors(pool: &SqlitePool) -> Result<Vec<Major>> {
    Ok(sqlx::query_as::<_, Major>("SELECT id, name, created_at FROM majors ORDER BY name")
        .fetch_all(pool)
        .await?)
}

pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    Ok(sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY name, id")
        .fetch_all(pool)
        .await?)
}

pub async fn list_classes(pool: &SqlitePool) -> Result<Vec<ClassGroup>> {
    Ok(sqlx::query_as::<_, ClassGroup>("SELECT * FROM classes ORDER BY name, id")
        .fetch_all(pool)
        .await?)
}

/// Row count of a known table
///
/// `table` must be one of the schema's table names; it is interpolated.
pub async fn count_rows(pool: &SqlitePool, table: &str) -> Result<i64> {
    if !matches!(table, "roles" | "terms" | "majors" | "classes" | "users") {
        return Err(crate::Error::InvalidInput(format!("Unknown table: {}", table)));
    }
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await?;
    Ok(count)
}
