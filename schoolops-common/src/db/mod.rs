//! Database models and queries

pub mod init;
pub mod models;
pub mod reference;

pub use init::*;
pub use models::*;
pub use reference::*;
