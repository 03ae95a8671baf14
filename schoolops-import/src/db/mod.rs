//! Database access layer for schoolops-import
//!
//! Schema creation lives in `schoolops_common::db`; this module provides the
//! store the import pipeline runs against.

mod store;

pub use store::SqliteStore;
