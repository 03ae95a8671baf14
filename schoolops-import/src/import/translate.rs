//! Error Translator
//!
//! Classifies a raw store failure raised during commit into the fixed
//! [`ImportError`] taxonomy. Classification uses the store's error code
//! first and falls back to the message text. No retries happen here:
//! constraint violations are not transient.

use crate::import::error::ImportError;
use crate::import::schema::EntitySchema;
use crate::import::store::StoreFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConstraintKind {
    Unique,
    ForeignKey,
    TooLong,
}

// SQLite extended result codes
const SQLITE_TOOBIG: &str = "18";
const SQLITE_CONSTRAINT_CHECK: &str = "275";
const SQLITE_CONSTRAINT_FOREIGNKEY: &str = "787";
const SQLITE_CONSTRAINT_PRIMARYKEY: &str = "1555";
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";

// PostgreSQL SQLSTATE codes
const PG_STRING_DATA_RIGHT_TRUNCATION: &str = "22001";
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";
const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_CHECK_VIOLATION: &str = "23514";

/// Suffix of length-limit CHECK constraints (`users_phone_len`)
const LENGTH_CHECK_SUFFIX: &str = "_len";

/// Suffix PostgreSQL gives implicit unique constraints (`users_email_key`)
const UNIQUE_KEY_SUFFIX: &str = "_key";

/// Translate a commit-stage store failure
///
/// `schema` maps storage columns back to the caller's field keys.
pub fn translate_commit_failure(failure: &StoreFailure, schema: &EntitySchema) -> ImportError {
    let detail = failure.message.clone();

    match classify(failure) {
        Some(ConstraintKind::Unique) => ImportError::DuplicateEntry {
            field: unique_fields(&failure.message, schema),
            detail,
        },
        Some(ConstraintKind::ForeignKey) => ImportError::ReferenceViolation {
            field: foreign_key_field(&failure.message, schema),
            detail,
        },
        Some(ConstraintKind::TooLong) => ImportError::ValueTooLong {
            field: length_check_field(&failure.message, schema),
            detail,
        },
        None => ImportError::UnknownCommitFailure {
            detail,
            code: failure.code.clone(),
        },
    }
}

fn classify(failure: &StoreFailure) -> Option<ConstraintKind> {
    if let Some(code) = failure.code.as_deref() {
        match code {
            SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY | PG_UNIQUE_VIOLATION => {
                return Some(ConstraintKind::Unique)
            }
            SQLITE_CONSTRAINT_FOREIGNKEY | PG_FOREIGN_KEY_VIOLATION => {
                return Some(ConstraintKind::ForeignKey)
            }
            SQLITE_TOOBIG | PG_STRING_DATA_RIGHT_TRUNCATION => return Some(ConstraintKind::TooLong),
            // Only length checks are classified; other CHECKs stay unknown
            SQLITE_CONSTRAINT_CHECK | PG_CHECK_VIOLATION => {
                return is_length_check(&failure.message).then_some(ConstraintKind::TooLong)
            }
            _ => {}
        }
    }

    let message = failure.message.to_ascii_lowercase();
    if message.contains("unique constraint failed") || message.contains("duplicate key") {
        Some(ConstraintKind::Unique)
    } else if message.contains("foreign key constraint") {
        Some(ConstraintKind::ForeignKey)
    } else if message.contains("value too long") || is_length_check(&failure.message) {
        Some(ConstraintKind::TooLong)
    } else {
        None
    }
}

/// `UNIQUE constraint failed: users.email, users.username` → `email,username`;
/// `... violates unique constraint "users_email_key"` → `email`
fn unique_fields(message: &str, schema: &EntitySchema) -> Option<String> {
    let Some((_, columns)) = message.split_once("constraint failed:") else {
        return unique_constraint_field(message, schema);
    };
    let keys: Vec<&str> = columns
        .split(',')
        .filter_map(|qualified| {
            let column = qualified.trim().rsplit('.').next()?;
            Some(schema.key_for_column(column).unwrap_or(column))
        })
        .filter(|key| !key.is_empty())
        .collect();

    (!keys.is_empty()).then(|| keys.join(","))
}

fn unique_constraint_field(message: &str, schema: &EntitySchema) -> Option<String> {
    let (_, rest) = message.split_once("unique constraint \"")?;
    let (constraint, _) = rest.split_once('"')?;
    let column = constraint
        .strip_prefix(schema.table)?
        .strip_prefix('_')?
        .strip_suffix(UNIQUE_KEY_SUFFIX)?;
    Some(schema.key_for_column(column).unwrap_or(column).to_string())
}

/// PostgreSQL reports `Key (role_id)=(...) is not present`; SQLite names no column
fn foreign_key_field(message: &str, schema: &EntitySchema) -> Option<String> {
    let (_, rest) = message.split_once("Key (")?;
    let (column, _) = rest.split_once(')')?;
    Some(schema.key_for_column(column).unwrap_or(column).to_string())
}

/// `CHECK constraint failed: users_phone_len` → `phone`
fn length_check_field(message: &str, schema: &EntitySchema) -> Option<String> {
    let constraint = check_constraint_name(message)?;
    let column = constraint
        .strip_prefix(schema.table)?
        .strip_prefix('_')?
        .strip_suffix(LENGTH_CHECK_SUFFIX)?;
    Some(schema.key_for_column(column).unwrap_or(column).to_string())
}

fn is_length_check(message: &str) -> bool {
    check_constraint_name(message).is_some_and(|name| name.ends_with(LENGTH_CHECK_SUFFIX))
}

/// Constraint name from SQLite (`...failed: name`) or PostgreSQL (`...constraint "name"`)
fn check_constraint_name(message: &str) -> Option<&str> {
    if let Some((_, rest)) = message.split_once("CHECK constraint failed:") {
        return Some(rest.trim());
    }
    let (_, rest) = message.split_once("check constraint \"")?;
    rest.split_once('"').map(|(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::schema::EntityKind;

    fn translate(code: Option<&str>, message: &str) -> ImportError {
        translate_commit_failure(&StoreFailure::new(code, message), EntityKind::User.schema())
    }

    #[test]
    fn test_sqlite_unique_maps_to_duplicate_with_field() {
        let err = translate(Some("2067"), "UNIQUE constraint failed: users.email");
        assert_eq!(
            err,
            ImportError::DuplicateEntry {
                detail: "UNIQUE constraint failed: users.email".to_string(),
                field: Some("email".to_string()),
            }
        );
    }

    #[test]
    fn test_composite_unique_reports_caller_keys() {
        let err = translate(
            Some("2067"),
            "UNIQUE constraint failed: users.student_number, users.email",
        );
        match err {
            ImportError::DuplicateEntry { field, .. } => {
                assert_eq!(field.as_deref(), Some("studentNumber,email"))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_postgres_unique_constraint_names_field() {
        let message = r#"duplicate key value violates unique constraint "users_student_number_key""#;
        let err = translate(Some("23505"), message);
        assert_eq!(
            err,
            ImportError::DuplicateEntry {
                detail: message.to_string(),
                field: Some("studentNumber".to_string()),
            }
        );

        let custom = translate(Some("23505"), r#"duplicate key value violates unique constraint "uq_contact""#);
        assert!(matches!(custom, ImportError::DuplicateEntry { field: None, .. }));
    }

    #[test]
    fn test_primary_key_collision_is_duplicate() {
        let err = translate(Some("1555"), "UNIQUE constraint failed: users.id");
        assert!(matches!(err, ImportError::DuplicateEntry { field: Some(f), .. } if f == "id"));
    }

    #[test]
    fn test_sqlite_foreign_key_has_no_field() {
        let err = translate(Some("787"), "FOREIGN KEY constraint failed");
        assert!(matches!(err, ImportError::ReferenceViolation { field: None, .. }));
    }

    #[test]
    fn test_postgres_foreign_key_names_field() {
        let err = translate(
            Some("23503"),
            "insert or update on table \"users\" violates foreign key constraint \"users_role_id_fkey\": Key (role_id)=(R9) is not present in table \"roles\".",
        );
        assert!(matches!(err, ImportError::ReferenceViolation { field: Some(f), .. } if f == "roleId"));
    }

    #[test]
    fn test_length_check_maps_to_value_too_long() {
        let err = translate(Some("275"), "CHECK constraint failed: users_birth_date_len");
        assert!(matches!(err, ImportError::ValueTooLong { field: Some(f), .. } if f == "birthDate"));
    }

    #[test]
    fn test_postgres_truncation_without_column() {
        let err = translate(Some("22001"), "value too long for type character varying(20)");
        assert!(matches!(err, ImportError::ValueTooLong { field: None, .. }));
    }

    #[test]
    fn test_other_check_is_unknown() {
        let err = translate(Some("275"), "CHECK constraint failed: users_capacity_positive");
        assert_eq!(
            err,
            ImportError::UnknownCommitFailure {
                detail: "CHECK constraint failed: users_capacity_positive".to_string(),
                code: Some("275".to_string()),
            }
        );
    }

    #[test]
    fn test_message_fallback_without_code() {
        assert!(matches!(
            translate(None, "UNIQUE constraint failed: users.username"),
            ImportError::DuplicateEntry { field: Some(f), .. } if f == "username"
        ));
        assert!(matches!(
            translate(None, "FOREIGN KEY constraint failed"),
            ImportError::ReferenceViolation { .. }
        ));
    }

    #[test]
    fn test_unrecognized_keeps_code_verbatim() {
        let err = translate(Some("5"), "database is locked");
        assert_eq!(
            err,
            ImportError::UnknownCommitFailure {
                detail: "database is locked".to_string(),
                code: Some("5".to_string()),
            }
        );
    }
}
