//! Database models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Role a user holds (student, teacher, staff, ...)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub created_at: NaiveDateTime,
}

/// Academic term (semester, quarter)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Term {
    pub id: String,
    pub name: String,
    pub starts_on: Option<String>,
    pub ends_on: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Field of study
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Major {
    pub id: String,
    pub name: String,
    pub created_at: NaiveDateTime,
}

/// Imported person row as stored
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub username: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<String>,
    pub address: Option<String>,
    pub student_number: Option<String>,
    pub role_id: Option<String>,
    pub term_id: Option<String>,
    pub class_id: Option<String>,
    pub major_id: Option<String>,
    /// JSON array text
    pub tags: String,
    pub created_at: NaiveDateTime,
}

/// Imported class group row as stored
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ClassGroup {
    pub id: String,
    pub name: String,
    pub code: Option<String>,
    pub room: Option<String>,
    pub capacity: Option<i64>,
    pub term_id: Option<String>,
    pub major_id: Option<String>,
    pub homeroom_teacher_id: Option<String>,
    /// JSON array text
    pub tags: String,
    pub created_at: NaiveDateTime,
}
