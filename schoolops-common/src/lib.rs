//! # SchoolOps Common Library
//!
//! Shared code for the SchoolOps services:
//! - Database initialization and row models
//! - Bootstrap configuration loading
//! - Common error type

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
