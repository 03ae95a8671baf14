//! Importable entity kinds and their field allowlists
//!
//! Each kind has a static schema naming its table, its identifying field, the
//! optional scalar fields, the reference fields (each pointing at a relation)
//! and the list-valued fields. Callers use camelCase keys; storage uses
//! snake_case columns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Plain field: caller key and storage column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub key: &'static str,
    pub column: &'static str,
}

/// Foreign-key dimension a record may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    /// Caller-facing key, also the key used in error details (`roleId`)
    pub key: &'static str,
    /// Column on the importing table (`role_id`)
    pub column: &'static str,
    /// Referenced table (`roles`)
    pub table: &'static str,
}

/// Static description of one importable entity
#[derive(Debug)]
pub struct EntitySchema {
    pub table: &'static str,
    /// Required, non-empty identifying field
    pub identifying: Field,
    pub scalars: &'static [Field],
    pub references: &'static [Relation],
    pub lists: &'static [Field],
}

/// Key under which a caller may supply its own primary key
pub const ID_KEY: &str = "id";

const fn field(key: &'static str, column: &'static str) -> Field {
    Field { key, column }
}

const fn relation(key: &'static str, column: &'static str, table: &'static str) -> Relation {
    Relation { key, column, table }
}

static USER_SCHEMA: EntitySchema = EntitySchema {
    table: "users",
    identifying: field("name", "name"),
    scalars: &[
        field("email", "email"),
        field("username", "username"),
        field("phone", "phone"),
        field("gender", "gender"),
        field("birthDate", "birth_date"),
        field("address", "address"),
        field("studentNumber", "student_number"),
    ],
    references: &[
        relation("roleId", "role_id", "roles"),
        relation("termId", "term_id", "terms"),
        relation("classId", "class_id", "classes"),
        relation("majorId", "major_id", "majors"),
    ],
    lists: &[field("tags", "tags")],
};

static CLASS_SCHEMA: EntitySchema = EntitySchema {
    table: "classes",
    identifying: field("name", "name"),
    scalars: &[
        field("code", "code"),
        field("room", "room"),
        field("capacity", "capacity"),
    ],
    references: &[
        relation("termId", "term_id", "terms"),
        relation("majorId", "major_id", "majors"),
        relation("homeroomTeacherId", "homeroom_teacher_id", "users"),
    ],
    lists: &[field("tags", "tags")],
};

impl EntitySchema {
    /// Every storage column in insert order (`id` first)
    pub fn columns(&self) -> Vec<&'static str> {
        std::iter::once(ID_KEY)
            .chain(std::iter::once(self.identifying.column))
            .chain(self.scalars.iter().map(|f| f.column))
            .chain(self.references.iter().map(|r| r.column))
            .chain(self.lists.iter().map(|f| f.column))
            .collect()
    }

    /// Every caller key in the same order as [`columns`](Self::columns)
    pub fn keys(&self) -> Vec<&'static str> {
        std::iter::once(ID_KEY)
            .chain(std::iter::once(self.identifying.key))
            .chain(self.scalars.iter().map(|f| f.key))
            .chain(self.references.iter().map(|r| r.key))
            .chain(self.lists.iter().map(|f| f.key))
            .collect()
    }

    pub fn is_list_key(&self, key: &str) -> bool {
        self.lists.iter().any(|f| f.key == key)
    }

    /// Map a storage column back to the caller key
    pub fn key_for_column(&self, column: &str) -> Option<&'static str> {
        self.columns()
            .into_iter()
            .zip(self.keys())
            .find(|(c, _)| *c == column)
            .map(|(_, k)| k)
    }
}

/// Closed set of importable entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "users")]
    User,
    #[serde(rename = "classes")]
    Class,
}

impl EntityKind {
    pub const ALL: [EntityKind; 2] = [EntityKind::User, EntityKind::Class];

    pub fn schema(self) -> &'static EntitySchema {
        match self {
            EntityKind::User => &USER_SCHEMA,
            EntityKind::Class => &CLASS_SCHEMA,
        }
    }

    /// Path segment naming this kind (`users`, `classes`)
    pub fn as_str(self) -> &'static str {
        self.schema().table
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized entity kind name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown entity kind: {0}")]
pub struct UnknownEntityKind(pub String);

impl FromStr for EntityKind {
    type Err = UnknownEntityKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEntityKind(s.to_string()))
    }
}
