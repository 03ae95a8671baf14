//! Bulk entity import
//!
//! Accepts a batch of heterogeneous candidate records for one entity kind,
//! normalizes and validates them, verifies every cross-entity reference
//! against the store in one concurrent pass and commits the batch
//! atomically, or rejects it whole with a structured [`ImportError`].

pub mod commit;
pub mod error;
pub mod integrity;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod references;
pub mod schema;
pub mod store;
pub mod translate;
pub mod validate;
pub mod value;

#[cfg(test)]
pub(crate) mod memory_store;

pub use commit::CommitResult;
pub use error::ImportError;
pub use integrity::IntegrityReport;
pub use pipeline::ImportPipeline;
pub use record::{CandidateRecord, NormalizedRecord};
pub use references::ReferenceSet;
pub use schema::{EntityKind, EntitySchema, Relation};
pub use store::{CommitOptions, ImportStore, StoreFailure};
pub use value::{RawValue, Value};
