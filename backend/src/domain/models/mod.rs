//! Stored document shapes. Field names follow the camelCase layout of the
//! per-user document tree.

pub mod budget;
pub mod savings;
pub mod transaction;
pub mod user;
